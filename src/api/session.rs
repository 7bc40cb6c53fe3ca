//! Session state: who to authenticate as and where JIRA lives.

use tracing::warn;

use super::auth::Auth;
use crate::config::{ConfigError, Result};

/// Path prefix of the JIRA REST API v2.
const API_PREFIX: &str = "/rest/api/2";

/// A validated JIRA session.
///
/// A `Session` only exists once its inputs have been checked, so a client
/// holding one is initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    auth: Auth,
    host: String,
    port: u16,
}

impl Session {
    /// Port used when none is configured.
    pub const DEFAULT_PORT: u16 = 80;

    /// Create a session from credentials, host and port.
    ///
    /// The host must include its scheme, e.g. `https://jira.example.com`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` if the username, password or
    /// host is empty, the host has no http(s) scheme, or the port is zero.
    pub fn new(username: &str, password: &str, host: &str, port: u16) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "username cannot be empty".to_string(),
            ));
        }

        if password.is_empty() {
            return Err(ConfigError::ValidationError(
                "password cannot be empty".to_string(),
            ));
        }

        let host = host.trim();
        if host.is_empty() {
            return Err(ConfigError::ValidationError(
                "host cannot be empty".to_string(),
            ));
        }

        if !host.starts_with("https://") && !host.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "host '{}' must start with http:// or https://",
                host
            )));
        }

        if port == 0 {
            return Err(ConfigError::ValidationError(
                "port cannot be zero".to_string(),
            ));
        }

        Ok(Self {
            auth: Auth::new(username, password),
            host: normalize_host(host),
            port,
        })
    }

    /// The credentials for this session.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The JIRA username.
    pub fn username(&self) -> &str {
        self.auth.username()
    }

    /// The JIRA host, without trailing slashes.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The JIRA port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The REST API base: `<host>:<port>/rest/api/2`.
    pub fn base_url(&self) -> String {
        format!("{}:{}{}", self.host, self.port, API_PREFIX)
    }

    /// The full URL for a resource path such as `issue/PROJ-1`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path)
    }
}

/// Remove trailing slashes and flag plain-HTTP hosts.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !host.starts_with("https://") && !host.contains("localhost") && !host.contains("127.0.0.1")
    {
        warn!("Host does not use HTTPS: {}. Credentials will be sent in clear text.", host);
    }

    host.to_string()
}
