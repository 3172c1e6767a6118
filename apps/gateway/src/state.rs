use crate::auth::{SessionCookie, TokenVerifier};
use crate::backend::BackendClient;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    /// Verifier for the session token, keyed with `JWT_SECRET`.
    pub tokens: TokenVerifier,
    pub cookies: SessionCookie,
}

impl AppState {
    pub fn new(config: Config, backend: BackendClient) -> Self {
        Self {
            tokens: TokenVerifier::new(&config.jwt_secret),
            cookies: SessionCookie::new(config.environment.is_production()),
            backend,
            config,
        }
    }
}

#[cfg(test)]
impl AppState {
    pub fn for_tests(api_url: &str) -> Self {
        use std::time::Duration;

        use crate::auth::token::test_tokens::SECRET;
        use crate::config::Environment;

        let config = Config {
            api_url: api_url.to_string(),
            jwt_secret: SECRET.to_string(),
            environment: Environment::Development,
            port: 0,
            rust_log: "debug".to_string(),
            static_dir: None,
            backend_connect_timeout: Duration::from_secs(2),
        };
        let backend = BackendClient::new(&config.api_url, config.backend_connect_timeout)
            .expect("test HTTP client");
        Self::new(config, backend)
    }
}
