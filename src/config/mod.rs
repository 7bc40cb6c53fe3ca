//! Configuration management for jira-lite.
//!
//! This module handles loading, saving, and validating the TOML
//! configuration file that holds connection profiles and client settings.
//! Passwords are never written to the file; they come from the OS keyring
//! or the `JIRA_PASSWORD` environment variable.

mod profile;
mod settings;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use profile::Profile;
pub use settings::Settings;

/// Environment variable that overrides the keyring password.
pub const PASSWORD_ENV_VAR: &str = "JIRA_PASSWORD";

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine the configuration directory")]
    NoConfigDir,

    /// The configuration directory could not be created.
    #[error("failed to create configuration directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file could not be written.
    #[error("failed to write configuration file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// The requested profile does not exist.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// No profile was named and none could be chosen.
    #[error("no profile selected: pass --profile or set settings.default_profile")]
    NoProfileSelected,

    /// The OS keyring could not be used.
    #[error("keyring error: {0}")]
    Keyring(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Client-wide settings.
    #[serde(default)]
    pub settings: Settings,
    /// Known JIRA connection profiles.
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Config {
    /// The default configuration file path.
    ///
    /// - Linux: `~/.config/jira-lite/config.toml`
    /// - macOS: `~/Library/Application Support/jira-lite/config.toml`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\jira-lite\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let base_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base_dir.join("jira-lite").join("config.toml"))
    }

    /// Load the configuration from the default path.
    ///
    /// A missing file yields the default (empty) configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load and validate the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        debug!(
            path = %path.display(),
            profiles = config.profiles.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Validate and write the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::WriteError)
    }

    /// Validate every profile and the cross-profile invariants.
    ///
    /// Profile names must be unique and `default_profile`, when set, must
    /// name an existing profile.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            profile.validate()?;
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate profile '{}'",
                    profile.name
                )));
            }
        }

        if let Some(name) = &self.settings.default_profile {
            if !seen.contains(name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "default profile '{}' is not defined",
                    name
                )));
            }
        }

        self.settings.validate()
    }

    /// Pick a profile.
    ///
    /// An explicit `name` wins, then `settings.default_profile`, then the
    /// only profile if exactly one is defined.
    pub fn profile(&self, name: Option<&str>) -> Result<&Profile> {
        let name = match name.or(self.settings.default_profile.as_deref()) {
            Some(name) => name,
            None => {
                return match self.profiles.as_slice() {
                    [only] => Ok(only),
                    _ => Err(ConfigError::NoProfileSelected),
                }
            }
        };

        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))
    }
}

/// Find the password for a profile.
///
/// `JIRA_PASSWORD` takes precedence over the OS keyring.
pub fn resolve_password(profile: &Profile) -> Result<String> {
    match std::env::var(PASSWORD_ENV_VAR) {
        Ok(password) if !password.is_empty() => {
            debug!(profile = %profile.name, "Using password from environment");
            Ok(password)
        }
        _ => crate::api::auth::get_token(&profile.name),
    }
}
