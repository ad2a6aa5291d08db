//! Client configuration: backend base URL and per-call timeout.
//!
//! Loading order: defaults, then an optional JSON document, then
//! `TASKPAD_*` environment overrides. Call `validate()` before use.

use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

pub const ENV_BASE_URL: &str = "TASKPAD_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "TASKPAD_TIMEOUT_MS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            info!("{ENV_BASE_URL} overrides base URL with {url}");
            self.base_url = url;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_MS) {
            self.timeout_ms = raw.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_TIMEOUT_MS,
                value: raw.clone(),
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = Url::parse(&self.base_url).map_err(|e| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::BaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn defaults_are_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        config.validate().unwrap();
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = ClientConfig::from_json(r#"{"base_url":"http://10.0.2.2:3000"}"#).unwrap();
        assert_eq!(config.base_url, "http://10.0.2.2:3000");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::new("ftp://example.com").validate().unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = ClientConfig::new("not a url").validate().unwrap_err();
        assert!(matches!(err, ConfigError::BaseUrl { .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let config = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        std::env::set_var(ENV_BASE_URL, "http://127.0.0.1:9999");
        std::env::set_var(ENV_TIMEOUT_MS, "250");
        let config = ClientConfig::from_env();
        std::env::remove_var(ENV_BASE_URL);
        std::env::remove_var(ENV_TIMEOUT_MS);

        let config = config.unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_ms, 250);
    }

    #[test]
    #[serial]
    fn env_timeout_must_be_numeric() {
        std::env::set_var(ENV_TIMEOUT_MS, "soon");
        let result = ClientConfig::from_env();
        std::env::remove_var(ENV_TIMEOUT_MS);

        assert!(matches!(result, Err(ConfigError::Env { .. })));
    }
}
