//! JIRA API response types.
//!
//! Every decoded response body is classified once, at decode time, into one
//! of three shapes: an issue, an error envelope, or anything else the server
//! returned (search results, an empty body, ...). The raw JSON is kept intact
//! so callers can always get back exactly what the server sent.

use serde_json::{Map, Value};

/// Key carrying the ordered list of error messages in an envelope.
const ERROR_MESSAGES_KEY: &str = "errorMessages";

/// Key carrying the field-name to message mapping in an envelope.
const ERRORS_KEY: &str = "errors";

/// The JIRA error envelope.
///
/// Shape: `{"errorMessages": [string, ...], "errors": {field: message, ...}}`.
/// Both keys are optional. Any other keys the server sent are preserved in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorEnvelope {
    /// The `errorMessages` value, if the key was present.
    pub error_messages: Option<Value>,
    /// The `errors` value, if the key was present.
    pub errors: Option<Value>,
    /// Any remaining top-level keys.
    pub extra: Map<String, Value>,
}

impl ErrorEnvelope {
    /// Build an envelope carrying the given messages and an empty `errors` map.
    pub fn from_messages<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let messages = messages
            .into_iter()
            .map(|m| Value::String(m.into()))
            .collect();

        Self {
            error_messages: Some(Value::Array(messages)),
            errors: Some(Value::Object(Map::new())),
            extra: Map::new(),
        }
    }

    /// Split an envelope out of a decoded JSON object.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let error_messages = map.remove(ERROR_MESSAGES_KEY);
        let errors = map.remove(ERRORS_KEY);
        Self {
            error_messages,
            errors,
            extra: map,
        }
    }

    /// All messages in the envelope.
    ///
    /// `errorMessages` entries come first, followed by the values of
    /// `errors` with their field names dropped. Duplicates are kept.
    pub fn messages(&self) -> Vec<String> {
        collect_messages(self.error_messages.as_ref(), self.errors.as_ref())
    }

    /// Convert back into the JSON shape it was decoded from.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        if let Some(messages) = &self.error_messages {
            map.insert(ERROR_MESSAGES_KEY.to_string(), messages.clone());
        }
        if let Some(errors) = &self.errors {
            map.insert(ERRORS_KEY.to_string(), errors.clone());
        }
        Value::Object(map)
    }
}

/// A decoded JIRA response.
#[derive(Debug, Clone, PartialEq)]
pub enum JiraResponse {
    /// An object carrying both `id` and `key`.
    Issue(Map<String, Value>),
    /// An object carrying `errorMessages` and/or `errors`.
    Error(ErrorEnvelope),
    /// Anything else: search results, `null` for an empty body, arrays.
    Other(Value),
}

impl JiraResponse {
    /// Classify a decoded JSON body.
    ///
    /// `id` and `key` both being present is the only thing that makes a
    /// response an issue; the HTTP status has already been dealt with.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) if is_present(&map, "id") && is_present(&map, "key") => {
                JiraResponse::Issue(map)
            }
            Value::Object(map)
                if is_present(&map, ERROR_MESSAGES_KEY) || is_present(&map, ERRORS_KEY) =>
            {
                JiraResponse::Error(ErrorEnvelope::from_map(map))
            }
            other => JiraResponse::Other(other),
        }
    }

    /// The JSON body this response was decoded from.
    pub fn to_value(&self) -> Value {
        match self {
            JiraResponse::Issue(map) => Value::Object(map.clone()),
            JiraResponse::Error(envelope) => envelope.to_value(),
            JiraResponse::Other(value) => value.clone(),
        }
    }

    /// True unless this is an issue-shaped response.
    pub fn is_error_response(&self) -> bool {
        !matches!(self, JiraResponse::Issue(_))
    }

    /// True if the response carries `errorMessages` or `errors`.
    pub fn has_error_messages(&self) -> bool {
        match self {
            JiraResponse::Issue(map) => {
                is_present(map, ERROR_MESSAGES_KEY) || is_present(map, ERRORS_KEY)
            }
            JiraResponse::Error(_) => true,
            JiraResponse::Other(_) => false,
        }
    }

    /// Every error message in the response, in envelope order.
    ///
    /// Empty when the response carries no error keys.
    pub fn error_collection(&self) -> Vec<String> {
        match self {
            JiraResponse::Error(envelope) => envelope.messages(),
            JiraResponse::Issue(map) => {
                collect_messages(map.get(ERROR_MESSAGES_KEY), map.get(ERRORS_KEY))
            }
            JiraResponse::Other(_) => Vec::new(),
        }
    }

    /// The envelope, if this is an error-shaped response.
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            JiraResponse::Error(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// All top-level fields of an issue response.
    pub fn issue(&self) -> Option<&Map<String, Value>> {
        match self {
            JiraResponse::Issue(map) => Some(map),
            _ => None,
        }
    }

    /// A single top-level field of an issue response.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.issue().and_then(|map| map.get(name))
    }

    /// Look up a field on an issue response, falling back to `default`.
    ///
    /// Error responses always yield `default`. An empty `name` yields the
    /// whole issue object.
    pub fn response_field(&self, name: &str, default: Value) -> Value {
        let Some(map) = self.issue() else {
            return default;
        };

        if name.is_empty() {
            return Value::Object(map.clone());
        }

        map.get(name).cloned().unwrap_or(default)
    }

    /// The issue ID, e.g. "10001".
    pub fn issue_id(&self) -> Option<&str> {
        self.field("id").and_then(Value::as_str)
    }

    /// The issue key, e.g. "PROJ-1".
    pub fn issue_key(&self) -> Option<&str> {
        self.field("key").and_then(Value::as_str)
    }
}

/// A key counts as present when it exists and is not `null`.
fn is_present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

fn collect_messages(error_messages: Option<&Value>, errors: Option<&Value>) -> Vec<String> {
    let mut messages = Vec::new();

    if let Some(Value::Array(items)) = error_messages {
        messages.extend(items.iter().map(message_text));
    }

    if let Some(Value::Object(fields)) = errors {
        messages.extend(fields.values().map(message_text));
    }

    messages
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_issue_response_is_not_error() {
        let response =
            JiraResponse::from_value(json!({"id": "10001", "key": "PROJ-1", "summary": "x"}));

        assert!(!response.is_error_response());
        assert!(!response.has_error_messages());
        assert_eq!(response.issue_key(), Some("PROJ-1"));
        assert_eq!(response.issue_id(), Some("10001"));
        assert_eq!(response.response_field("key", Value::Null), json!("PROJ-1"));
        assert_eq!(response.response_field("missing", json!("d")), json!("d"));
    }

    #[test]
    fn test_empty_field_name_returns_whole_issue() {
        let body = json!({"id": "10001", "key": "PROJ-1", "fields": {"summary": "x"}});
        let response = JiraResponse::from_value(body.clone());

        assert_eq!(response.response_field("", Value::Null), body);
    }

    #[test]
    fn test_error_response_field_returns_default() {
        let response = JiraResponse::from_value(json!({"errorMessages": ["bad"]}));

        assert_eq!(response.response_field("", json!("d")), json!("d"));
        assert_eq!(response.response_field("errorMessages", json!(1)), json!(1));
        assert!(response.field("errorMessages").is_none());
    }

    #[test]
    fn test_null_id_is_not_an_issue() {
        let response = JiraResponse::from_value(json!({"id": null, "key": "PROJ-1"}));
        assert!(response.is_error_response());
        assert!(matches!(response, JiraResponse::Other(_)));
    }

    #[test]
    fn test_error_collection_order() {
        let response = JiraResponse::from_value(json!({
            "errorMessages": ["bad"],
            "errors": {"summary": "required"}
        }));

        assert!(response.is_error_response());
        assert!(response.has_error_messages());
        assert_eq!(response.error_collection(), vec!["bad", "required"]);
    }

    #[test]
    fn test_error_collection_keeps_duplicates_and_field_order() {
        let response = JiraResponse::from_value(json!({
            "errorMessages": ["dup", "dup"],
            "errors": {"summary": "dup", "assignee": "unknown user"}
        }));

        assert_eq!(
            response.error_collection(),
            vec!["dup", "dup", "dup", "unknown user"]
        );
    }

    #[test]
    fn test_error_collection_skips_wrongly_shaped_keys() {
        let response = JiraResponse::from_value(json!({
            "errorMessages": "not a list",
            "errors": {"priority": "invalid"}
        }));
        assert_eq!(response.error_collection(), vec!["invalid"]);

        let response = JiraResponse::from_value(json!({
            "errorMessages": ["only"],
            "errors": ["not", "an", "object"]
        }));
        assert_eq!(response.error_collection(), vec!["only"]);
    }

    #[test]
    fn test_non_string_messages_are_rendered() {
        let response = JiraResponse::from_value(json!({"errors": {"count": 3}}));
        assert_eq!(response.error_collection(), vec!["3"]);
    }

    #[test]
    fn test_search_result_is_other() {
        let body = json!({"startAt": 0, "maxResults": 50, "total": 0, "issues": []});
        let response = JiraResponse::from_value(body.clone());

        assert!(matches!(response, JiraResponse::Other(_)));
        assert!(response.is_error_response());
        assert!(!response.has_error_messages());
        assert!(response.error_collection().is_empty());
        assert_eq!(response.to_value(), body);
    }

    #[test]
    fn test_null_body_has_no_messages() {
        let response = JiraResponse::from_value(Value::Null);
        assert!(response.is_error_response());
        assert!(!response.has_error_messages());
        assert!(response.error_collection().is_empty());
    }

    #[test]
    fn test_envelope_round_trip_preserves_extra_keys() {
        let body = json!({
            "errorMessages": [],
            "errors": {"summary": "required"},
            "warningMessages": ["careful"],
            "status": null
        });
        let response = JiraResponse::from_value(body.clone());

        assert!(matches!(response, JiraResponse::Error(_)));
        assert_eq!(response.to_value(), body);
    }

    #[test]
    fn test_issue_with_error_keys_reports_messages() {
        let response = JiraResponse::from_value(json!({
            "id": "1",
            "key": "PROJ-1",
            "errorMessages": ["partial failure"]
        }));

        assert!(!response.is_error_response());
        assert!(response.has_error_messages());
        assert_eq!(response.error_collection(), vec!["partial failure"]);
    }

    #[test]
    fn test_from_messages_shape() {
        let envelope = ErrorEnvelope::from_messages(["Jira service not properly initialised"]);
        assert_eq!(
            envelope.to_value(),
            json!({"errorMessages": ["Jira service not properly initialised"], "errors": {}})
        );
    }
}
