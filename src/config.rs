use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub catalog_base_url: String,
    pub catalog_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| "https://public.opendatasoft.com".to_string())
                .trim_end_matches('/')
                .to_string(),
            catalog_timeout_secs: std::env::var("CATALOG_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("CATALOG_TIMEOUT_SECS must be a valid number"))?,
        };

        if config.catalog_base_url.trim().is_empty() {
            anyhow::bail!("CATALOG_BASE_URL cannot be empty");
        }
        if !config.catalog_base_url.starts_with("http://")
            && !config.catalog_base_url.starts_with("https://")
        {
            anyhow::bail!("CATALOG_BASE_URL must start with http:// or https://");
        }
        if config.catalog_timeout_secs == 0 {
            anyhow::bail!("CATALOG_TIMEOUT_SECS must be greater than zero");
        }

        tracing::debug!("Catalog base URL: {}", config.catalog_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}
