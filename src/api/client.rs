//! JIRA API client implementation.
//!
//! This module provides the blocking client for the JIRA REST API v2.
//! Every operation performs exactly one HTTP round trip, classifies the
//! outcome, and stores it as the client's last response. Operations never
//! fail the caller: transport and server failures are recorded as error
//! envelopes and can be inspected through the accessor methods.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{header, redirect, Method, StatusCode};
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};

use super::error::{RequestError, Result};
use super::session::Session;
use super::types::JiraResponse;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP settings for the underlying client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Total time allowed for a request, including reading the body.
    pub timeout: Duration,
    /// Time allowed to establish the connection.
    pub connect_timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// A single JIRA operation, built fresh for each call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation<'a> {
    /// `GET search` with `{"jql": ...}` as the body.
    Search { jql: Option<&'a str> },
    /// `POST issue` with `{"fields": ...}` as the body.
    Create { fields: &'a Map<String, Value> },
    /// `PUT issue/<key>` with `{"fields": ...}` as the body.
    Update {
        issue_key: &'a str,
        fields: &'a Map<String, Value>,
    },
}

impl Operation<'_> {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Search { .. } => "search",
            Operation::Create { .. } => "create",
            Operation::Update { .. } => "update",
        }
    }

    /// Resource path relative to `/rest/api/2/`.
    pub fn path(&self) -> String {
        match self {
            Operation::Search { .. } => "search".to_string(),
            Operation::Create { .. } => "issue".to_string(),
            Operation::Update { issue_key, .. } => format!("issue/{}", issue_key),
        }
    }

    /// The HTTP verb. Search is a GET that still carries a body.
    pub fn method(&self) -> Method {
        match self {
            Operation::Search { .. } => Method::GET,
            Operation::Create { .. } => Method::POST,
            Operation::Update { .. } => Method::PUT,
        }
    }

    /// The JSON request body.
    ///
    /// Issue payloads have every `\\` pair collapsed to a single `\`, so
    /// field values that arrive already escaped are not escaped twice.
    pub fn payload(&self) -> Result<String> {
        match self {
            Operation::Search { jql } => Ok(serde_json::to_string(&json!({ "jql": jql }))?),
            Operation::Create { fields } | Operation::Update { fields, .. } => {
                let payload = serde_json::to_string(&json!({ "fields": fields }))?;
                Ok(collapse_escapes(&payload))
            }
        }
    }
}

/// The JIRA API client.
///
/// Holds the session, the HTTP client, and the outcome of the most recent
/// operation. A second call overwrites the last response, so use one client
/// per sequence of request-then-inspect steps.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    http: Client,
    /// Credentials and host; `None` until initialised.
    session: Option<Session>,
    /// The decoded outcome of the last operation.
    last_response: Option<JiraResponse>,
    /// Why the last operation failed, if it did.
    last_error: Option<RequestError>,
}

impl JiraClient {
    /// Create an uninitialised client with default HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_options(ClientOptions::default())
    }

    /// Create an uninitialised client with explicit HTTP settings.
    pub fn with_options(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http: Self::build_http_client(options)?,
            session: None,
            last_response: None,
            last_error: None,
        })
    }

    /// Create a client that is already initialised with `session`.
    pub fn with_session(session: Session, options: ClientOptions) -> Result<Self> {
        let mut client = Self::with_options(options)?;
        client.configure(session);
        Ok(client)
    }

    /// Build the HTTP client with appropriate settings.
    ///
    /// Redirects are not followed: a 3xx is classified like any other
    /// non-2xx status rather than replayed against another resource.
    fn build_http_client(options: ClientOptions) -> Result<Client> {
        Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(RequestError::Transport)
    }

    /// Initialise the client with credentials, host and port.
    ///
    /// Returns `false` and leaves any previous session in place if an input
    /// is empty or invalid. Calling again with valid inputs reconfigures the
    /// client.
    ///
    /// The host must include its scheme: `jira.example.com` is rejected,
    /// `http://jira.example.com` is accepted.
    #[instrument(skip(self, password))]
    pub fn initialize(&mut self, username: &str, password: &str, host: &str, port: u16) -> bool {
        match Session::new(username, password, host, port) {
            Ok(session) => {
                self.configure(session);
                true
            }
            Err(e) => {
                warn!("Rejected JIRA session: {}", e);
                false
            }
        }
    }

    /// Replace the session with an already validated one.
    pub fn configure(&mut self, session: Session) {
        info!(host = %session.host(), port = session.port(), "JIRA session initialised");
        self.session = Some(session);
    }

    /// Whether a session has been configured.
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// The configured session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Search for issues using JQL.
    ///
    /// `None` sends `{"jql": null}`, leaving the query to the server default.
    #[instrument(skip(self))]
    pub fn search(&mut self, jql: Option<&str>) -> &JiraResponse {
        self.run(Operation::Search { jql })
    }

    /// Create a single issue from the given fields.
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub fn create(&mut self, fields: &Map<String, Value>) -> &JiraResponse {
        self.run(Operation::Create { fields })
    }

    /// Change fields on an existing issue.
    #[instrument(skip(self, fields), fields(field_count = fields.len()))]
    pub fn update(&mut self, issue_key: &str, fields: &Map<String, Value>) -> &JiraResponse {
        self.run(Operation::Update { issue_key, fields })
    }

    /// Execute an operation and record its outcome as the last response.
    fn run(&mut self, operation: Operation<'_>) -> &JiraResponse {
        let (response, error) = match self.execute(&operation) {
            Ok(body) => {
                let response = JiraResponse::from_value(body);
                let error = response.envelope().cloned().map(RequestError::Domain);
                if let Some(e) = &error {
                    debug!(operation = operation.name(), "JIRA rejected request: {}", e);
                }
                (response, error)
            }
            Err(e) => {
                warn!(operation = operation.name(), "JIRA request failed: {}", e);
                (JiraResponse::Error(e.envelope()), Some(e))
            }
        };

        self.last_error = error;
        self.last_response.insert(response)
    }

    /// Perform the HTTP round trip for an operation.
    fn execute(&self, operation: &Operation<'_>) -> Result<Value> {
        let session = self.session.as_ref().ok_or(RequestError::NotInitialized)?;

        let url = session.endpoint(&operation.path());
        let method = operation.method();
        let payload = operation.payload()?;
        debug!(%method, %url, "Sending JIRA request");

        let response = self
            .http
            .request(method, &url)
            .header(header::AUTHORIZATION, session.auth().header_value())
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        debug!(%status, bytes = body.len(), "Received JIRA response");

        classify(status, &body)
    }

    /// The outcome of the last operation, if any has run.
    pub fn last_response(&self) -> Option<&JiraResponse> {
        self.last_response.as_ref()
    }

    /// Why the last operation failed, or `None` if it succeeded.
    pub fn last_error(&self) -> Option<&RequestError> {
        self.last_error.as_ref()
    }

    /// True unless the last response is an issue.
    pub fn is_error_response(&self) -> bool {
        self.last_response
            .as_ref()
            .map_or(true, JiraResponse::is_error_response)
    }

    /// True if the last response carries `errorMessages` or `errors`.
    pub fn has_error_messages(&self) -> bool {
        self.last_response
            .as_ref()
            .is_some_and(JiraResponse::has_error_messages)
    }

    /// Every error message in the last response.
    pub fn error_collection(&self) -> Vec<String> {
        self.last_response
            .as_ref()
            .map(JiraResponse::error_collection)
            .unwrap_or_default()
    }

    /// Look up a field on the last response, falling back to `default`.
    ///
    /// See [`JiraResponse::response_field`].
    pub fn response_field(&self, name: &str, default: Value) -> Value {
        match &self.last_response {
            Some(response) => response.response_field(name, default),
            None => default,
        }
    }
}

/// Classify a raw HTTP outcome.
///
/// 2xx bodies are decoded as JSON unchanged, with an empty body decoding to
/// `null`. Any other status becomes a `RequestError::HttpStatus`; the body
/// the server sent with it is only logged.
pub fn classify(status: StatusCode, body: &str) -> Result<Value> {
    if !status.is_success() {
        debug!(%status, "Error response body: {}", body);
        return Err(RequestError::from_status(status));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|e| RequestError::Decode(e.to_string()))
}

/// Collapse every `\\` pair to a single `\`.
fn collapse_escapes(payload: &str) -> String {
    payload.replace(r"\\", r"\")
}
