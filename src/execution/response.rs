//! Response normalization
//!
//! Turns a raw HTTP response into either a [`ServiceResponse`] or a single
//! [`WatsonError`]. A body that carries an `error` / `error_code` field is an
//! error even under a 2xx status; any other non-2xx status is an error keyed
//! off the status code. The body is never handed back alongside an error.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{UNAUTHORIZED_MESSAGE, WatsonError};

/// Parsed response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Empty,
    Json(Value),
    Text(String),
    Binary(Bytes),
}

impl ResponseBody {
    /// Interpret raw bytes: JSON when it parses, otherwise text or bytes.
    pub fn parse(raw: Bytes) -> Self {
        if raw.is_empty() {
            return Self::Empty;
        }
        // Not every response is JSON; a parse failure is not an error here.
        if let Ok(json) = serde_json::from_slice::<Value>(&raw) {
            return Self::Json(json);
        }
        match String::from_utf8(raw.to_vec()) {
            Ok(text) => Self::Text(text),
            Err(_) => Self::Binary(raw),
        }
    }

    /// Text used as an error message for non-2xx responses.
    fn message_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json(v) => v.to_string(),
            Self::Text(t) => t.clone(),
            Self::Binary(b) => String::from_utf8_lossy(b).into_owned(),
        }
    }
}

/// A successful service response.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    status: u16,
    headers: HeaderMap,
    body: ResponseBody,
}

impl ServiceResponse {
    pub fn new(status: u16, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// JSON body, if the response carried one.
    pub fn json(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Deserialize the body. An empty body deserializes from `{}`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, WatsonError> {
        let value = match self.body {
            ResponseBody::Json(v) => v,
            ResponseBody::Empty => Value::Object(Map::new()),
            ResponseBody::Text(t) => {
                return Err(WatsonError::Json(format!(
                    "expected a JSON response body, got text: {t}"
                )));
            }
            ResponseBody::Binary(_) => {
                return Err(WatsonError::Json(
                    "expected a JSON response body, got binary data".to_string(),
                ));
            }
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Body as raw bytes (audio, archives).
    pub fn into_bytes(self) -> Bytes {
        match self.body {
            ResponseBody::Empty => Bytes::new(),
            ResponseBody::Json(v) => Bytes::from(v.to_string()),
            ResponseBody::Text(t) => Bytes::from(t),
            ResponseBody::Binary(b) => b,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|v| is_truthy(v))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten a service error body into a `WatsonError::Service`.
///
/// Handles the nested shapes some services use:
/// - `{"error": {"description": .., "code": .., "error_id": ..}}`: the inner
///   keys are lifted to the top level and `description` becomes the message
/// - `{"error": {"error": {..}}}`: the outer object is kept under `rawError`
///   and the message is the inner object's JSON
fn service_error(status: u16, mut body: Map<String, Value>) -> WatsonError {
    if let Some(Value::Object(inner)) = body.get("error").cloned() {
        if let Some(description) = truthy_field(&inner, "description").cloned() {
            for (k, v) in inner {
                body.insert(k, v);
            }
            body.insert("error".to_string(), description);
        } else if let Some(nested @ Value::Object(_)) = inner.get("error") {
            let message = nested.to_string();
            body.insert("rawError".to_string(), Value::Object(inner));
            body.insert("error".to_string(), Value::String(message));
        }
    }

    let code = body.get("error_code").filter(|v| !v.is_null()).cloned();
    let message = truthy_field(&body, "error")
        .or_else(|| truthy_field(&body, "error_message"))
        .map(display_value)
        .unwrap_or_else(|| {
            format!(
                "Error Code: {}",
                code.as_ref().map(display_value).unwrap_or_default()
            )
        });

    WatsonError::Service {
        status,
        message,
        code,
        fields: body,
    }
}

/// Normalize a completed HTTP exchange.
pub fn normalize_response(
    status: u16,
    headers: HeaderMap,
    raw: Bytes,
) -> Result<ServiceResponse, WatsonError> {
    let body = ResponseBody::parse(raw);

    if let ResponseBody::Json(Value::Object(map)) = &body
        && (truthy_field(map, "error").is_some() || truthy_field(map, "error_code").is_some())
    {
        return Err(service_error(status, map.clone()));
    }

    if !(200..300).contains(&status) {
        let message = body.message_text();
        return Err(if status == 401 || status == 403 {
            WatsonError::Status {
                code: status,
                message: UNAUTHORIZED_MESSAGE.to_string(),
                body: Some(message),
            }
        } else {
            WatsonError::Status {
                code: status,
                message,
                body: None,
            }
        });
    }

    Ok(ServiceResponse::new(status, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(status: u16, raw: &'static str) -> Result<ServiceResponse, WatsonError> {
        normalize_response(status, HeaderMap::new(), Bytes::from_static(raw.as_bytes()))
    }

    #[test]
    fn error_field_under_200_is_an_error() {
        let err = normalize(200, r#"{"error":"boom"}"#).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.field("error"), Some(&json!("boom")));
    }

    #[test]
    fn error_code_only_builds_message_from_code() {
        let err = normalize(400, r#"{"error_code":404,"extra":"x"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Error Code: 404");
        match err {
            WatsonError::Service { code, fields, .. } => {
                assert_eq!(code, Some(json!(404)));
                assert_eq!(fields["extra"], "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_message_field_is_used_when_present() {
        let err = normalize(400, r#"{"error_code":400,"error_message":"bad lang"}"#).unwrap_err();
        assert_eq!(err.to_string(), "bad lang");
    }

    #[test]
    fn nested_description_is_lifted() {
        let err = normalize(
            400,
            r#"{"error":{"description":"Invalid image","code":400,"error_id":"input_error"}}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid image");
        assert_eq!(err.field("error_id"), Some(&json!("input_error")));
        assert_eq!(err.field("code"), Some(&json!(400)));
    }

    #[test]
    fn doubly_nested_error_is_kept_raw() {
        let err = normalize(400, r#"{"error":{"error":{"reason":"dup"}}}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"{"reason":"dup"}"#);
        assert!(err.field("rawError").is_some());
    }

    #[test]
    fn non_json_500_uses_raw_text() {
        let err = normalize(500, "Internal failure").unwrap_err();
        assert_eq!(err.to_string(), "Internal failure");
        assert_eq!(err.status_code(), Some(500));
    }

    #[test]
    fn json_non_2xx_without_error_field_is_stringified() {
        let err = normalize(404, r#"{"code":404}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"{"code":404}"#);
    }

    #[test]
    fn unauthorized_overrides_message_and_keeps_body() {
        for status in [401, 403] {
            let err = normalize(status, "Not Authorized").unwrap_err();
            assert_eq!(err.to_string(), UNAUTHORIZED_MESSAGE);
            assert_eq!(err.body(), Some("Not Authorized"));
            assert_eq!(err.status_code(), Some(status));
        }
    }

    #[test]
    fn success_passes_parsed_body_through() {
        let resp = normalize(200, r#"{"classes":[]}"#).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.json(), Some(&json!({"classes": []})));
    }

    #[test]
    fn falsy_error_fields_are_not_errors() {
        let resp = normalize(200, r#"{"error":"","error_code":0,"ok":true}"#).unwrap();
        assert_eq!(resp.json().unwrap()["ok"], true);
    }

    #[test]
    fn plain_text_success_is_kept_as_text() {
        let resp = normalize(200, "token-value").unwrap();
        assert_eq!(resp.body(), &ResponseBody::Text("token-value".into()));
        assert_eq!(resp.into_bytes(), Bytes::from_static(b"token-value"));
    }

    #[test]
    fn empty_body_deserializes_from_empty_object() {
        #[derive(serde::Deserialize)]
        struct Empty {}
        let resp = normalize(200, "").unwrap();
        assert!(resp.into_json::<Empty>().is_ok());
    }
}
