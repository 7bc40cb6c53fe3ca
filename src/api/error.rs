//! Request error types for the JIRA client.
//!
//! Each failed operation is recorded as a `RequestError`. Callers that want
//! the legacy JIRA error envelope get it through [`RequestError::envelope`],
//! which is the only place errors are turned into that shape.

use reqwest::StatusCode;
use thiserror::Error;

use super::types::ErrorEnvelope;

/// Errors that can occur while executing a JIRA operation.
#[derive(Debug, Error)]
pub enum RequestError {
    /// An operation was invoked before the client was given a session.
    #[error("Jira service not properly initialised")]
    NotInitialized,

    /// The request never completed: connection refused, DNS, timeout, ...
    #[error("Unable to reach Jira: {0}")]
    Transport(#[from] reqwest::Error),

    /// JIRA answered with a non-2xx status.
    #[error("{}", describe_status(.status))]
    HttpStatus { status: u16 },

    /// JIRA answered 2xx with an error envelope, e.g. field validation.
    #[error("{}", .0.messages().join(", "))]
    Domain(ErrorEnvelope),

    /// The request payload could not be encoded.
    #[error("Unable to encode the request for Jira: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JIRA answered 2xx with a body that is not JSON.
    #[error("Jira returned a response that is not valid JSON: {0}")]
    Decode(String),
}

/// Result type for request operations.
pub type Result<T> = std::result::Result<T, RequestError>;

impl RequestError {
    /// Create an error from a non-success HTTP status code.
    pub fn from_status(status: StatusCode) -> Self {
        RequestError::HttpStatus {
            status: status.as_u16(),
        }
    }

    /// The HTTP status behind this error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::HttpStatus { status } => Some(*status),
            RequestError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Convert into the JIRA error envelope shape.
    ///
    /// Domain errors hand back the envelope the server sent; everything else
    /// becomes a single-message envelope with an empty `errors` map.
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            RequestError::Domain(envelope) => envelope.clone(),
            other => ErrorEnvelope::from_messages([other.to_string()]),
        }
    }
}

/// The envelope message for a non-success status code.
fn describe_status(status: &u16) -> &'static str {
    match status {
        400 => "Bad request sent to Jira.",
        401 => "Authentication or authorisation error with Jira.",
        403 | 405 => "That action is not permitted on Jira.",
        404 | 501 => "That action does not exist on Jira.",
        500 => "Jira encountered a server error.",
        502..=504 => "Jira is currently unavailable.",
        _ => "There was a problem with the Jira service.",
    }
}
