//! Backend location, read from the environment with logged defaults.

use std::env;

use tracing::info;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api/go";

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
        }
    }
}

impl ClientConfig {
    /// Reads `DECK_API_URL` and `DECK_API_PREFIX`, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            base_url: load("DECK_API_URL", DEFAULT_BASE_URL),
            api_prefix: load("DECK_API_PREFIX", DEFAULT_API_PREFIX),
        }
    }

    /// Base URL joined with the API prefix.
    pub fn api_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        }
    }
}

fn load(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            info!("{key} not set, using default: {default}");
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_api_url() {
        assert_eq!(ClientConfig::default().api_url(), "http://localhost:8000/api/go");
    }

    #[test]
    fn api_url_normalises_slashes() {
        let config = ClientConfig {
            base_url: "http://example.test/".to_string(),
            api_prefix: "/v1/".to_string(),
        };
        assert_eq!(config.api_url(), "http://example.test/v1");
    }

    #[test]
    fn empty_prefix_uses_base_only() {
        let config = ClientConfig {
            base_url: "http://example.test".to_string(),
            api_prefix: String::new(),
        };
        assert_eq!(config.api_url(), "http://example.test");
    }
}
