//! Configuration for community service implementations
//!
//! Values come from `COMMUNITY_*` environment variables layered over
//! built-in defaults.

use config::{Config, Environment};
use serde::Deserialize;
use std::time::Duration;

use crate::error::ConfigError;

/// Simulated latency applied by the fixture service
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Identity substituted when the caller has none
pub const DEFAULT_FALLBACK_USER_ID: &str = "mock-user-id";

/// Backend used by the HTTP client implementation
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Community service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityConfig {
    /// Simulated latency in milliseconds
    pub delay_ms: u64,
    /// Sentinel identity used when the request carries none; `None` disables it
    pub fallback_user_id: Option<String>,
    /// Base URL of the remote backend
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    delay_ms: u64,
    fallback_user_id: String,
    base_url: String,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            fallback_user_id: Some(DEFAULT_FALLBACK_USER_ID.to_string()),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CommunityConfig {
    /// Create a new CommunityConfig from environment variables
    ///
    /// # Environment Variables
    /// - `COMMUNITY_DELAY_MS`: simulated latency (default: 500)
    /// - `COMMUNITY_FALLBACK_USER_ID`: fallback identity, empty to disable
    ///   (default: "mock-user-id")
    /// - `COMMUNITY_BASE_URL`: remote backend URL (default: "http://localhost:3001")
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix("COMMUNITY").try_parsing(true))
    }

    /// Load configuration from the given environment source
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("delay_ms", DEFAULT_DELAY_MS as i64)?
            .set_default("fallback_user_id", DEFAULT_FALLBACK_USER_ID)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .add_source(environment)
            .build()?;

        let raw: RawConfig = settings.try_deserialize()?;

        if !raw.base_url.starts_with("http://") && !raw.base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "base_url".to_string(),
                message: format!("expected an http(s) URL, got {:?}", raw.base_url),
            });
        }

        let fallback_user_id = Some(raw.fallback_user_id.trim().to_string()).filter(|id| !id.is_empty());

        Ok(Self {
            delay_ms: raw.delay_ms,
            fallback_user_id,
            base_url: raw.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Configuration with no simulated latency
    pub fn without_delay() -> Self {
        Self {
            delay_ms: 0,
            ..Self::default()
        }
    }

    /// Simulated latency as a duration
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("COMMUNITY")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults_apply_without_variables() {
        let config = CommunityConfig::load(environment(&[])).expect("config should load");
        assert_eq!(config, CommunityConfig::default());
        assert_eq!(config.delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = CommunityConfig::load(environment(&[
            ("COMMUNITY_DELAY_MS", "25"),
            ("COMMUNITY_FALLBACK_USER_ID", "guest"),
            ("COMMUNITY_BASE_URL", "https://community.example.org/"),
        ]))
        .expect("config should load");

        assert_eq!(config.delay_ms, 25);
        assert_eq!(config.fallback_user_id.as_deref(), Some("guest"));
        assert_eq!(config.base_url, "https://community.example.org");
    }

    #[test]
    fn test_empty_fallback_disables_it() {
        let config = CommunityConfig::load(environment(&[("COMMUNITY_FALLBACK_USER_ID", "")]))
            .expect("config should load");
        assert_eq!(config.fallback_user_id, None);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let result = CommunityConfig::load(environment(&[("COMMUNITY_BASE_URL", "ftp://nope")]));
        assert!(matches!(result, Err(ConfigError::Invalid { key, .. }) if key == "base_url"));
    }

    #[test]
    fn test_rejects_non_numeric_delay() {
        let result = CommunityConfig::load(environment(&[("COMMUNITY_DELAY_MS", "soon")]));
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }

    #[test]
    #[serial]
    fn test_from_env_reads_process_environment() {
        unsafe {
            std::env::set_var("COMMUNITY_DELAY_MS", "7");
        }
        let config = CommunityConfig::from_env();
        unsafe {
            std::env::remove_var("COMMUNITY_DELAY_MS");
        }

        assert_eq!(config.expect("config should load").delay_ms, 7);
    }
}
