//! JIRA API client and types.
//!
//! This module provides the blocking client for the JIRA REST API v2: the
//! session it authenticates with, the request engine that turns operations
//! into HTTP calls, and the accessors used to inspect what came back.

pub mod auth;
mod client;
pub mod error;
mod session;
mod types;

pub use auth::Auth;
pub use client::{
    classify, ClientOptions, JiraClient, Operation, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::RequestError;
pub use session::Session;
pub use types::{ErrorEnvelope, JiraResponse};
