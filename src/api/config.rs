//! Endpoint configuration for the auth API. Defaults point at a local backend;
//! environment variables override them so deployments can change endpoints
//! without rebuilding. Configuration values are public; do not store secrets here.

use std::{env, time::Duration};

pub const ENV_API_URL: &str = "AUTH_PORTAL_API_URL";
pub const ENV_TIMEOUT_SECONDS: &str = "AUTH_PORTAL_TIMEOUT_SECONDS";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Connection settings shared by every auth API call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Loads defaults and applies `AUTH_PORTAL_*` overrides from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let overrides = EnvOverrides {
            base_url: env::var(ENV_API_URL)
                .ok()
                .and_then(|value| normalize_value(&value)),
            timeout_seconds: env::var(ENV_TIMEOUT_SECONDS)
                .ok()
                .and_then(|value| normalize_value(&value))
                .and_then(|value| value.parse::<u64>().ok()),
        };
        apply_overrides(&mut config, overrides);
        config
    }
}

#[derive(Default)]
struct EnvOverrides {
    base_url: Option<String>,
    timeout_seconds: Option<u64>,
}

fn apply_overrides(config: &mut ApiConfig, overrides: EnvOverrides) {
    if let Some(value) = overrides.base_url {
        config.base_url = value;
    }
    if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
        config.timeout = Duration::from_secs(seconds);
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_value_trims_and_rejects_empty() {
        assert_eq!(normalize_value(""), None);
        assert_eq!(normalize_value("   "), None);
        assert_eq!(
            normalize_value("  https://auth.example.com/api "),
            Some("https://auth.example.com/api".to_string())
        );
    }

    #[test]
    fn apply_overrides_ignores_missing_and_zero() {
        let mut config = ApiConfig::default();
        apply_overrides(
            &mut config,
            EnvOverrides {
                base_url: None,
                timeout_seconds: Some(0),
            },
        );

        assert_eq!(config.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
    }

    #[test]
    fn apply_overrides_overwrites_when_present() {
        let mut config = ApiConfig::default();
        apply_overrides(
            &mut config,
            EnvOverrides {
                base_url: Some("https://auth.override/api".to_string()),
                timeout_seconds: Some(3),
            },
        );

        assert_eq!(config.base_url, "https://auth.override/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn from_env_reads_overrides() {
        temp_env::with_vars(
            [
                (ENV_API_URL, Some(" https://auth.env/api ")),
                (ENV_TIMEOUT_SECONDS, Some("30")),
            ],
            || {
                let config = ApiConfig::from_env();
                assert_eq!(config.base_url, "https://auth.env/api");
                assert_eq!(config.timeout, Duration::from_secs(30));
            },
        );
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        temp_env::with_vars(
            [
                (ENV_API_URL, Some("   ")),
                (ENV_TIMEOUT_SECONDS, Some("soon")),
            ],
            || {
                assert_eq!(ApiConfig::from_env(), ApiConfig::default());
            },
        );
    }
}
