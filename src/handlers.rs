use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use moka::future::Cache;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::errors::{AppError, ResultExt};
use crate::fields;
use crate::generator;
use crate::models::{
    GenerationRequest, PersonRecord, PersonaQueryParams, PersonaResponse, SchoolRecord,
    UniversityRecord,
};
use crate::states;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the external school/university catalog.
    pub catalog: CatalogClient,
    /// School lookup cache. Key: "{state}|{city}|{seed}", value includes
    /// negative results so repeated misses stay off the network.
    pub school_cache: Cache<String, Option<SchoolRecord>>,
    /// University lookup cache, same keying as the school cache.
    pub university_cache: Cache<String, Option<UniversityRecord>>,
}

/// Health check endpoint.
///
/// Returns the service status and version.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is healthy")),
    tag = "persona"
)]
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "persona-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/v1/persona
///
/// Generates the deterministic person record for the given seed and
/// filters, augmented with the school and university lookups.
#[utoipa::path(
    get,
    path = "/api/v1/persona",
    params(PersonaQueryParams),
    responses(
        (status = 200, description = "Generated persona with any resolved records", body = PersonaResponse),
        (status = 400, description = "Invalid parameters"),
    ),
    tag = "persona"
)]
pub async fn persona(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PersonaQueryParams>,
) -> Result<Json<PersonaResponse>, AppError> {
    tracing::info!("GET /api/v1/persona - params: {:?}", params);

    let response = build_persona(&state, &params).await?;

    tracing::info!(
        "Generated persona (seed: {}, school: {}, university: {})",
        response.seed,
        response.school.is_some(),
        response.university.is_some()
    );

    Ok(Json(response))
}

/// GET /api/v1/persona/export
///
/// Same generation as `/api/v1/persona`, rendered as the flat export
/// document filtered to the caller's `fields` selection.
#[utoipa::path(
    get,
    path = "/api/v1/persona/export",
    params(PersonaQueryParams),
    responses(
        (status = 200, description = "Flat export document keyed by the requested field names"),
        (status = 400, description = "Invalid parameters or unknown field name"),
    ),
    tag = "persona"
)]
pub async fn persona_export(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PersonaQueryParams>,
) -> Result<Json<Map<String, Value>>, AppError> {
    tracing::info!("GET /api/v1/persona/export - params: {:?}", params);

    // Resolve the selection before doing any work so an unknown field name
    // fails fast.
    let keys = fields::parse_fields(params.fields.as_deref())?;
    let response = build_persona(&state, &params).await?;
    let export = fields::build_export(&keys, &response)
        .context("Failed to build export document")?;

    Ok(Json(export))
}

/// GET /api/v1/fields
///
/// The exportable field names grouped by presentation category.
#[utoipa::path(
    get,
    path = "/api/v1/fields",
    responses((status = 200, description = "Field catalog grouped by category")),
    tag = "persona"
)]
pub async fn field_catalog() -> Json<Value> {
    let categories: Vec<Value> = fields::FIELD_CATEGORIES
        .iter()
        .map(|(name, fields)| json!({ "category": name, "fields": fields }))
        .collect();
    Json(json!({ "categories": categories, "default": fields::DEFAULT_VISIBLE_FIELDS }))
}

/// GET /api/v1/states
///
/// The 50-state code/name table used for jurisdiction filters.
#[utoipa::path(
    get,
    path = "/api/v1/states",
    responses((status = 200, description = "State code/name table")),
    tag = "persona"
)]
pub async fn state_catalog() -> Json<Value> {
    let table: Vec<Value> = states::US_STATES
        .iter()
        .map(|s| json!({ "code": s.code, "name": s.name }))
        .collect();
    Json(json!({ "states": table }))
}

/// Generates the person record and runs both catalog lookups.
async fn build_persona(
    state: &AppState,
    params: &PersonaQueryParams,
) -> Result<PersonaResponse, AppError> {
    let request = GenerationRequest::from_params(params)?;
    let person = generator::generate(&request, Utc::now().date_naive());

    let (school_state, school_city) = lookup_jurisdiction(
        params.high_state.as_deref(),
        params.high_city.as_deref(),
        &person,
    );
    let (university_state, university_city) = lookup_jurisdiction(
        params.university_state.as_deref(),
        params.university_city.as_deref(),
        &person,
    );

    // Independent lookups; each owns its request and response.
    let (school, university) = tokio::join!(
        cached_school_lookup(state, request.seed, &school_state, &school_city),
        cached_university_lookup(state, request.seed, &university_state, &university_city),
    );

    Ok(PersonaResponse {
        seed: request.seed,
        person,
        school,
        university,
    })
}

/// Resolves the jurisdiction for a lookup: explicit overrides win, the
/// generated person's state/city are the default. A "random" override is
/// passed through for the catalog client to skip on.
fn lookup_jurisdiction(
    state_override: Option<&str>,
    city_override: Option<&str>,
    person: &PersonRecord,
) -> (String, String) {
    let state = match state_override.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => person.state.clone(),
    };
    let city = match city_override.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => person.city.clone(),
    };
    (state, city)
}

async fn cached_school_lookup(
    state: &AppState,
    seed: u64,
    school_state: &str,
    school_city: &str,
) -> Option<SchoolRecord> {
    let key = format!("{}|{}|{}", school_state, school_city, seed);
    if let Some(cached) = state.school_cache.get(&key).await {
        tracing::debug!("School cache hit: {}", key);
        return cached;
    }

    let result = state
        .catalog
        .lookup_school(seed, school_state, Some(school_city))
        .await;
    state.school_cache.insert(key, result.clone()).await;
    result
}

async fn cached_university_lookup(
    state: &AppState,
    seed: u64,
    university_state: &str,
    university_city: &str,
) -> Option<UniversityRecord> {
    let key = format!("{}|{}|{}", university_state, university_city, seed);
    if let Some(cached) = state.university_cache.get(&key).await {
        tracing::debug!("University cache hit: {}", key);
        return cached;
    }

    let result = state
        .catalog
        .lookup_university(seed, university_state, Some(university_city))
        .await;
    state.university_cache.insert(key, result.clone()).await;
    result
}
