mod catalog;
mod config;
mod errors;
mod fields;
mod generator;
mod handlers;
mod models;
mod names;
mod states;

use axum::{routing::get, Router};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::persona,
        handlers::persona_export,
        handlers::field_catalog,
        handlers::state_catalog,
    ),
    components(schemas(
        models::PersonaResponse,
        models::PersonRecord,
        models::SchoolRecord,
        models::UniversityRecord,
    )),
    tags((name = "persona", description = "Deterministic synthetic identity generation"))
)]
struct ApiDoc;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the lookup caches and the catalog
/// client, then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "persona_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Lookup results are stable for a (jurisdiction, seed) pair, so cache
    // them and spare the catalog repeated identical queries (1 hour TTL,
    // negative results included).
    let school_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(10_000)
        .build();
    let university_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(10_000)
        .build();
    tracing::info!("Catalog lookup caches initialized (1h TTL, 10k capacity)");

    let catalog = catalog::CatalogClient::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize catalog client: {}", e))?;
    tracing::info!("Catalog client initialized: {}", config.catalog_base_url);

    // Build application state
    let app_state = Arc::new(AppState {
        catalog,
        school_cache,
        university_cache,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/persona", get(handlers::persona))
        .route("/api/v1/persona/export", get(handlers::persona_export))
        .route("/api/v1/fields", get(handlers::field_catalog))
        .route("/api/v1/states", get(handlers::state_catalog))
        .layer(
            ServiceBuilder::new()
                // Requests are GET-only; a small body cap is plenty
                .layer(RequestBodyLimitLayer::new(64 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
