//! JIRA profile configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::Session;

fn default_port() -> u16 {
    Session::DEFAULT_PORT
}

/// A JIRA profile configuration.
///
/// Profiles store connection details for a JIRA instance.
/// Passwords are stored separately in the OS keychain for security.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The name of this profile.
    ///
    /// Must be non-empty and unique across all profiles.
    pub name: String,

    /// The JIRA host including its scheme (e.g., "https://jira.example.com").
    pub host: String,

    /// The port JIRA listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// The JIRA username used for Basic authentication.
    pub username: String,
}

impl Profile {
    /// Create a new profile.
    pub fn new(name: String, host: String, port: u16, username: String) -> Self {
        Self {
            name,
            host,
            port,
            username,
        }
    }

    /// Validate this profile.
    ///
    /// Checks that:
    /// - The name is non-empty and has no whitespace
    /// - The host is non-empty and starts with http:// or https://
    /// - The port is non-zero
    /// - The username is non-empty
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` with details if validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "profile name cannot be empty".to_string(),
            ));
        }

        if self.name.contains(char::is_whitespace) {
            return Err(ConfigError::ValidationError(format!(
                "profile name '{}' cannot contain whitespace",
                self.name
            )));
        }

        if self.host.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': host cannot be empty",
                self.name
            )));
        }

        if !self.host.starts_with("https://") && !self.host.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': host must start with http:// or https://",
                self.name
            )));
        }

        if self.port == 0 {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': port cannot be zero",
                self.name
            )));
        }

        if self.username.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "profile '{}': username cannot be empty",
                self.name
            )));
        }

        Ok(())
    }

    /// Build a session for this profile with the given password.
    pub fn session(&self, password: &str) -> Result<Session> {
        Session::new(&self.username, password, &self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_profile() -> Profile {
        Profile::new(
            "work".to_string(),
            "https://jira.example.com".to_string(),
            443,
            "jdoe".to_string(),
        )
    }

    #[test]
    fn test_valid_profile() {
        assert!(work_profile().validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let profile = Profile {
            name: "".to_string(),
            ..work_profile()
        };

        let result = profile.validate();
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("name cannot be empty"));
    }

    #[test]
    fn test_whitespace_name_rejected() {
        let profile = Profile {
            name: "my work".to_string(),
            ..work_profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("cannot contain whitespace"));
    }

    #[test]
    fn test_invalid_host_scheme_rejected() {
        let profile = Profile {
            host: "jira.example.com".to_string(),
            ..work_profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("must start with http"));
    }

    #[test]
    fn test_empty_username_rejected() {
        let profile = Profile {
            username: "".to_string(),
            ..work_profile()
        };

        assert!(profile
            .validate()
            .unwrap_err()
            .to_string()
            .contains("username cannot be empty"));
    }

    #[test]
    fn test_zero_port_rejected() {
        let profile = Profile {
            port: 0,
            ..work_profile()
        };

        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_session_from_profile() {
        let session = work_profile().session("secret").unwrap();
        assert_eq!(session.username(), "jdoe");
        assert_eq!(session.base_url(), "https://jira.example.com:443/rest/api/2");
    }

    #[test]
    fn test_profile_serialization() {
        let profile = work_profile();

        let toml_str = toml::to_string(&profile).unwrap();
        let parsed: Profile = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed, profile);
    }
}
