//! Runtime settings sourced from the environment.
//!
//! Nothing is persisted. Every value is read once at startup and then passed
//! explicitly through the flow.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Environment variable holding the bearer token for the completion API.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the completion endpoint URL.
pub const API_URL_ENV_VAR: &str = "DIFFSCRIBE_API_URL";

/// Environment variable overriding the model identifier.
pub const MODEL_ENV_VAR: &str = "DIFFSCRIBE_MODEL";

/// Environment variable for the request timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "DIFFSCRIBE_TIMEOUT";

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// A bearer token that never appears in logs or debug output.
#[derive(Clone, Default)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw token. Only call this when building the request header.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

/// Settings for talking to the completion endpoint.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub api_key: ApiKey,
    pub model: String,
    pub timeout: Duration,
}

impl Settings {
    /// Build settings from the process environment.
    ///
    /// A missing API key is not an error here; the endpoint rejects the
    /// request and the flow reports that HTTP failure instead.
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var(API_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: ApiKey::new(non_empty_var(API_KEY_ENV_VAR).unwrap_or_default()),
            model: non_empty_var(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: get_timeout(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read the request timeout from `DIFFSCRIBE_TIMEOUT`, falling back to the
/// default when unset or invalid.
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("sk-very-secret");
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_settings_debug_hides_key() {
        let settings = Settings {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: ApiKey::new("sk-very-secret"),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(!format!("{:?}", settings).contains("sk-very-secret"));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        temp_env::with_vars_unset(
            [API_KEY_ENV_VAR, API_URL_ENV_VAR, MODEL_ENV_VAR, TIMEOUT_ENV_VAR],
            || {
                let settings = Settings::from_env();
                assert_eq!(settings.api_url, DEFAULT_API_URL);
                assert_eq!(settings.model, DEFAULT_MODEL);
                assert!(settings.api_key.is_empty());
                assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            },
        );
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                (API_KEY_ENV_VAR, Some("sk-test")),
                (API_URL_ENV_VAR, Some("http://localhost:9999/v1/chat/completions")),
                (MODEL_ENV_VAR, Some("local-model")),
                (TIMEOUT_ENV_VAR, Some("15")),
            ],
            || {
                let settings = Settings::from_env();
                assert_eq!(settings.api_key.expose(), "sk-test");
                assert_eq!(settings.api_url, "http://localhost:9999/v1/chat/completions");
                assert_eq!(settings.model, "local-model");
                assert_eq!(settings.timeout, Duration::from_secs(15));
            },
        );
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_falls_back() {
        for bad in ["abc", "-5", "0"] {
            temp_env::with_var(TIMEOUT_ENV_VAR, Some(bad), || {
                assert_eq!(get_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
            });
        }
    }
}
