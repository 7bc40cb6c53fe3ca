//! Centralized error types for jira-lite.
//!
//! Library operations never fail the caller; these errors cover everything
//! around them: loading configuration, reaching the keyring, building the
//! HTTP client and talking to the terminal.

use thiserror::Error;

use crate::api::error::RequestError;
use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Request-related errors.
    #[error("{0}")]
    Request(#[from] RequestError),

    /// IO errors (stdin, stdout, ...).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::ProfileNotFound(name) => format!("Profile '{}' not found.", name),
                ConfigError::NoProfileSelected => {
                    "No profile selected. Pass --profile or set a default profile.".to_string()
                }
                ConfigError::Keyring(_) => {
                    "Could not access secure storage for the password.".to_string()
                }
            },
            AppError::Request(e) => e.to_string(),
            AppError::Io(_) => "A terminal or file operation failed.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::NoProfileSelected)
            | AppError::Config(ConfigError::ProfileNotFound(_)) => {
                Some("Add a [[profiles]] entry to the configuration file.")
            }
            AppError::Config(ConfigError::Keyring(_)) => {
                Some("Run 'jira-lite store-token <profile>' or set JIRA_PASSWORD.")
            }
            AppError::Request(RequestError::Transport(_)) => {
                Some("Check your network connection and the profile's host and port.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_request_error() {
        let app_err: AppError = RequestError::NotInitialized.into();
        assert!(matches!(
            app_err,
            AppError::Request(RequestError::NotInitialized)
        ));
        assert_eq!(app_err.user_message(), "Jira service not properly initialised");
    }

    #[test]
    fn test_user_message_profile_not_found() {
        let err = AppError::Config(ConfigError::ProfileNotFound("work".to_string()));
        assert_eq!(err.user_message(), "Profile 'work' not found.");
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "duplicate profile 'work'".to_string(),
        ));
        assert!(err.user_message().contains("duplicate profile"));
    }

    #[test]
    fn test_suggested_action_keyring() {
        let err = AppError::Config(ConfigError::Keyring("locked".to_string()));
        assert!(err.suggested_action().unwrap().contains("JIRA_PASSWORD"));
    }

    #[test]
    fn test_no_suggested_action_for_other() {
        let err = AppError::other("something went wrong");
        assert!(err.suggested_action().is_none());
        assert_eq!(err.user_message(), "something went wrong");
    }
}
