//! Core error type for the Watson SDK.

use serde_json::{Map, Value};
use thiserror::Error;

/// Message used for every 401/403 response that carries no service error field.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized: Access is denied due to invalid credentials.";

/// Unified error type.
///
/// When a call fails the caller never receives a response body: the body
/// (if any) is folded into the error variant instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WatsonError {
    /// The facade could not be constructed (missing version, missing credentials, bad option).
    #[error("{0}")]
    Configuration(String),

    /// One or more required call parameters were absent. Raised before any network I/O.
    #[error("Missing required parameters: {}", .0.join(", "))]
    MissingParameters(Vec<String>),

    /// Transport-level failure (DNS, connection reset, TLS, aborted request).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a JSON body carrying `error` or `error_code`.
    #[error("{message}")]
    Service {
        /// HTTP status of the response that carried the error body.
        status: u16,
        /// Human readable message taken from the error body.
        message: String,
        /// Raw `error_code` field, when the service sent one.
        code: Option<Value>,
        /// Every field of the error body.
        fields: Map<String, Value>,
    },

    /// Non-2xx response without a service error field.
    #[error("{message}")]
    Status {
        code: u16,
        message: String,
        /// Original message, kept when `message` was replaced (401/403).
        body: Option<String>,
    },

    /// JSON (de)serialization failure on a successful response.
    #[error("JSON error: {0}")]
    Json(String),

    /// Local I/O failure (opening an upload, reading a credentials file).
    #[error("IO error: {0}")]
    Io(String),

    /// A request could not be assembled from the given input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl WatsonError {
    /// Build a `MissingParameters` error from borrowed names.
    pub fn missing_parameters<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameters(names.into_iter().map(Into::into).collect())
    }

    /// HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the service rejected the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401 | 403))
    }

    /// Whether the call was rejected locally before any request was sent.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::MissingParameters(_))
    }

    /// Look up a field copied from a service error body.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Service { fields, .. } => fields.get(name),
            _ => None,
        }
    }

    /// Original message of a status error whose message was overridden.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameters_message_lists_names_in_order() {
        let err = WatsonError::missing_parameters(["workspace_id", "text"]);
        assert_eq!(
            err.to_string(),
            "Missing required parameters: workspace_id, text"
        );
        assert!(err.is_validation_error());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn status_error_exposes_code_and_original_body() {
        let err = WatsonError::Status {
            code: 403,
            message: UNAUTHORIZED_MESSAGE.to_string(),
            body: Some("forbidden".into()),
        };
        assert!(err.is_unauthorized());
        assert_eq!(err.body(), Some("forbidden"));
        assert_eq!(err.to_string(), UNAUTHORIZED_MESSAGE);
    }

    #[test]
    fn service_error_fields_are_reachable() {
        let mut fields = Map::new();
        fields.insert("error".into(), Value::String("boom".into()));
        fields.insert("code".into(), Value::from(400));
        let err = WatsonError::Service {
            status: 200,
            message: "boom".into(),
            code: None,
            fields,
        };
        assert_eq!(err.field("code"), Some(&Value::from(400)));
        assert_eq!(err.status_code(), Some(200));
        assert!(!err.is_unauthorized());
    }
}
