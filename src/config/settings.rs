//! Client settings configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::{ClientOptions, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};

/// Client-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The name of the default profile to use.
    pub default_profile: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    /// Check that both timeouts are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// HTTP options for building a client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_client_defaults() {
        assert_eq!(Settings::default().client_options(), ClientOptions::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = Settings {
            timeout_secs: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_settings_deserialize() {
        let settings: Settings = toml::from_str("timeout_secs = 5").unwrap();
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert!(settings.default_profile.is_none());
    }
}
