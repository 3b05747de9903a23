//! Provider configuration
//!
//! Values come from the provider block first and fall back to environment
//! variables. Empty strings count as unset.

use tfplug::{State, TfplugError};
use thiserror::Error;
use url::Url;

pub const DEFAULT_HOST: &str = "api.nullplatform.com";
pub const API_KEY_ENV: &str = "NULLPLATFORM_API_KEY";
pub const HOST_ENV: &str = "NULLPLATFORM_HOST";
pub const INSECURE_ENV: &str = "NULLPLATFORM_INSECURE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("api_key is required (set in provider config or NULLPLATFORM_API_KEY env var)")]
    MissingApiKey,

    #[error("invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error(transparent)]
    Attribute(#[from] TfplugError),
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub host: String,
    pub api_key: String,
    pub insecure: bool,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .field("insecure", &self.insecure)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
            insecure: false,
        }
    }

    /// Read the provider block, falling back to the environment
    pub fn from_state(config: &State) -> Result<Self, ConfigError> {
        let host = non_empty(config.get_optional_string("host")?)
            .or_else(|| non_empty(std::env::var(HOST_ENV).ok()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let api_key = non_empty(config.get_optional_string("api_key")?)
            .or_else(|| non_empty(std::env::var(API_KEY_ENV).ok()))
            .ok_or(ConfigError::MissingApiKey)?;

        let insecure = match config.get_optional_bool("insecure")? {
            Some(insecure) => insecure,
            None => std::env::var(INSECURE_ENV)
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(false),
        };

        Ok(Self {
            host,
            api_key,
            insecure,
        })
    }

    /// Base URL every API path is joined onto
    ///
    /// A bare host is served over https; the path always ends in `/` so
    /// joins append instead of replacing the last segment.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };

        let mut url = Url::parse(&raw).map_err(|e| ConfigError::InvalidHost {
            host: self.host.clone(),
            reason: e.to_string(),
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidHost {
                host: self.host.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(HOST_ENV);
        std::env::remove_var(INSECURE_ENV);
    }

    #[test]
    #[serial]
    fn config_values_take_precedence_over_env() {
        clear_env();
        std::env::set_var(API_KEY_ENV, "env-key");
        std::env::set_var(HOST_ENV, "env.example.com");

        let state =
            State::from_value(json!({"api_key": "block-key", "host": "block.example.com"}))
                .unwrap();
        let config = ProviderConfig::from_state(&state).unwrap();

        assert_eq!(config.api_key, "block-key");
        assert_eq!(config.host, "block.example.com");

        clear_env();
    }

    #[test]
    #[serial]
    fn env_fills_missing_values_and_host_defaults() {
        clear_env();
        std::env::set_var(API_KEY_ENV, "env-key");

        let state = State::from_value(json!({"api_key": ""})).unwrap();
        let config = ProviderConfig::from_state(&state).unwrap();

        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(!config.insecure);

        clear_env();
    }

    #[test]
    #[serial]
    fn missing_api_key_is_an_error() {
        clear_env();

        let err = ProviderConfig::from_state(&State::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("api_key is required"));
    }

    #[test]
    fn bare_host_uses_https() {
        let url = ProviderConfig::new("api.nullplatform.com", "k")
            .base_url()
            .unwrap();
        assert_eq!(url.as_str(), "https://api.nullplatform.com/");
    }

    #[test]
    fn explicit_scheme_and_path_are_kept() {
        let url = ProviderConfig::new("http://127.0.0.1:8080/v2", "k")
            .base_url()
            .unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/v2/");
        assert_eq!(url.join("parameter/1").unwrap().path(), "/v2/parameter/1");
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ProviderConfig::new("h", "super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
