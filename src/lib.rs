//! jira-lite - a minimal blocking client for the JIRA REST API v2.
//!
//! The client exposes three operations, [`search`](api::JiraClient::search),
//! [`create`](api::JiraClient::create) and [`update`](api::JiraClient::update).
//! None of them fail the caller: each stores its decoded outcome as the
//! client's last response, which is then inspected with the accessor methods.
//!
//! ```no_run
//! use jira_lite::api::JiraClient;
//! use serde_json::{json, Map, Value};
//!
//! let mut client = JiraClient::new().expect("HTTP client");
//! client.initialize("jdoe", "secret", "https://jira.example.com", 443);
//!
//! let mut fields = Map::new();
//! fields.insert("project".to_string(), json!({"key": "PROJ"}));
//! fields.insert("summary".to_string(), json!("Login page is broken"));
//! fields.insert("issuetype".to_string(), json!({"name": "Bug"}));
//! client.create(&fields);
//!
//! if client.is_error_response() {
//!     for message in client.error_collection() {
//!         eprintln!("{}", message);
//!     }
//! } else {
//!     println!("created {}", client.response_field("key", Value::Null));
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{ErrorEnvelope, JiraClient, JiraResponse, RequestError, Session};
