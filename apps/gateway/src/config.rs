use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Gateway configuration loaded from environment variables.
/// Startup aborts if `API_URL` or `JWT_SECRET` is missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external backend API, without a trailing slash.
    pub api_url: String,
    pub jwt_secret: String,
    pub environment: Environment,
    pub port: u16,
    pub rust_log: String,
    /// Built front end served behind the access gate. Pages 404 when unset.
    pub static_dir: Option<PathBuf>,
    pub backend_connect_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_url: require_env("API_URL")?.trim_end_matches('/').to_string(),
            jwt_secret: require_env("JWT_SECRET")?,
            environment: Environment::parse(
                &std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            ),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            static_dir: std::env::var("STATIC_DIR").ok().map(PathBuf::from),
            backend_connect_timeout: Duration::from_secs(
                std::env::var("BACKEND_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse::<u64>()
                    .context("BACKEND_CONNECT_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value =
        std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
