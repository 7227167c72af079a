use std::env;

use tracing::info;

/// Environment variable holding the backend endpoint URL.
pub const ENV_BACKEND_URL: &str = "ANISTREAM_BACKEND_URL";
/// Environment variable holding the backend access key.
pub const ENV_BACKEND_KEY: &str = "ANISTREAM_BACKEND_KEY";

/// Connection parameters for the remote backend.
///
/// Constructed once at process start and handed to the catalog service;
/// nothing else in the crate re-reads the environment, so every call site
/// agrees on whether a backend is configured.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub url: String,
    pub key: String,
}

impl BackendConfig {
    /// Builds a config from explicit parameters.
    ///
    /// Returns `None` unless both values are non-blank; a half-configured
    /// backend is treated as no backend at all.
    #[must_use]
    pub fn new(url: &str, key: &str) -> Option<Self> {
        let url = url.trim();
        let key = key.trim();
        if url.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self {
            url: url.to_string(),
            key: key.to_string(),
        })
    }

    /// Reads the connection parameters from the environment (after loading
    /// `.env` if present).
    #[must_use]
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        let url = env::var(ENV_BACKEND_URL).unwrap_or_default();
        let key = env::var(ENV_BACKEND_KEY).unwrap_or_default();
        let config = Self::new(&url, &key);
        if config.is_none() {
            info!("backend endpoint or access key missing; running in demo mode");
        }
        config
    }
}
