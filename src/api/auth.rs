//! Authentication handling for JIRA API.
//!
//! This module handles authentication with JIRA using Basic Auth
//! (username + password) and secure password storage via the OS keyring.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::config::ConfigError;

/// The keyring service name for jira-lite passwords.
const KEYRING_SERVICE: &str = "jira-lite";

/// Authentication credentials for JIRA.
#[derive(Clone, PartialEq, Eq)]
pub struct Auth {
    /// The JIRA username.
    username: String,
    /// The Base64-encoded authorization header value.
    auth_header: String,
}

impl Auth {
    /// Create new authentication credentials from username and password.
    ///
    /// The password is immediately encoded and the raw password is not stored.
    pub fn new(username: &str, password: &str) -> Self {
        let auth_header = build_auth_header(username, password);
        Self {
            username: username.to_string(),
            auth_header,
        }
    }

    /// Get the authorization header value for HTTP requests.
    ///
    /// Returns the complete "Basic ..." header value.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The header is base64 of "username:password".
        f.debug_struct("Auth")
            .field("username", &self.username)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

/// Build the Basic Auth header value.
///
/// Encodes "username:password" in Base64 and prepends "Basic ".
fn build_auth_header(username: &str, password: &str) -> String {
    let credentials = format!("{}:{}", username, password);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

/// Store a password in the OS keyring.
///
/// # Arguments
///
/// * `profile_name` - The profile name to use as the keyring account
/// * `password` - The password to store
///
/// # Errors
///
/// Returns an error if the password cannot be stored in the keyring.
pub fn store_token(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ConfigError::Keyring(format!("failed to create keyring entry: {}", e)))?;

    entry
        .set_password(password)
        .map_err(|e| ConfigError::Keyring(format!("failed to store password: {}", e)))?;

    Ok(())
}

/// Retrieve a password from the OS keyring.
///
/// # Errors
///
/// Returns an error if the password cannot be retrieved from the keyring.
pub fn get_token(profile_name: &str) -> Result<String, ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, profile_name)
        .map_err(|e| ConfigError::Keyring(format!("failed to access keyring: {}", e)))?;

    entry
        .get_password()
        .map_err(|e| ConfigError::Keyring(format!("failed to retrieve password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("jdoe", "hunter2");
        assert!(header.starts_with("Basic "));

        // Decode and verify
        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "jdoe:hunter2");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("jdoe", "secret_password");
        assert_eq!(auth.username(), "jdoe");
        assert_eq!(auth.header_value(), "Basic amRvZTpzZWNyZXRfcGFzc3dvcmQ=");
    }

    #[test]
    fn test_password_with_colon_is_kept_whole() {
        let auth = Auth::new("jdoe", "pa:ss");
        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();
        let decoded = String::from_utf8(BASE64.decode(encoded).unwrap()).unwrap();
        assert_eq!(decoded, "jdoe:pa:ss");
    }

    #[test]
    fn test_auth_does_not_expose_password() {
        let auth = Auth::new("jdoe", "secret_password");
        let debug_output = format!("{:?}", auth);
        let encoded = auth.header_value().strip_prefix("Basic ").unwrap();

        assert!(!debug_output.contains("secret_password"));
        assert!(!debug_output.contains(encoded));
        assert!(debug_output.contains("jdoe"));
    }
}
