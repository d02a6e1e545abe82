//! Request descriptors.
//!
//! A [`ServiceRequest`] describes one call: verb, URL template, path and
//! query parameters, headers, and a [`Payload`]. [`ServiceDefaults`] holds
//! what every call of a service instance shares (base URL, auth headers,
//! default query parameters). The executor merges the two before sending.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::WatsonError;
use crate::execution::multipart::FormField;
use crate::params::ParamPresence;
use crate::types::{FileParam, FileValue};
use crate::utils::http_headers::{Headers, merge_headers, set_header};
use crate::utils::path::PathParams;

/// HTTP verbs used by the Watson APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(value: HttpMethod) -> Self {
        match value {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// Request body. Exactly one encoding per request.
#[derive(Debug, Default)]
pub enum Payload {
    #[default]
    Empty,
    /// `application/json`
    Json(Value),
    /// Raw body with an explicit or sniffed content type.
    Raw {
        data: FileValue,
        content_type: Option<String>,
    },
    /// `application/x-www-form-urlencoded`
    Form(Map<String, Value>),
    /// `multipart/form-data`, fields in insertion order.
    Multipart(Vec<(String, FormField)>),
}

impl Payload {
    fn is_supplied(&self, key: &str) -> bool {
        match self {
            Self::Json(body) => body.is_supplied(key),
            Self::Form(form) => form.is_supplied(key),
            Self::Multipart(fields) => fields
                .iter()
                .any(|(name, field)| name == key && field.is_supplied()),
            Self::Empty | Self::Raw { .. } => false,
        }
    }
}

/// One call against a service endpoint.
#[derive(Debug)]
pub struct ServiceRequest {
    pub method: HttpMethod,
    /// Absolute URL or a path template starting with `/`.
    pub url: String,
    pub path: PathParams,
    pub qs: Map<String, Value>,
    pub headers: Headers,
    pub payload: Payload,
}

impl ServiceRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            path: PathParams::new(),
            qs: Map::new(),
            headers: Headers::new(),
            payload: Payload::Empty,
        }
    }

    /// Set a path placeholder value.
    pub fn path_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.insert(key.into(), value.into());
        self
    }

    /// Set a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.qs.insert(key.into(), value.into());
        self
    }

    /// Set a query parameter only when a value is given.
    pub fn query_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Add every field of a serializable struct as a query parameter.
    /// `None` fields serialize to `null` and are skipped.
    pub fn query_from<T: Serialize>(mut self, params: &T) -> Result<Self, WatsonError> {
        match serde_json::to_value(params)? {
            Value::Object(map) => {
                for (k, v) in map {
                    if !v.is_null() {
                        self.qs.insert(k, v);
                    }
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(WatsonError::InvalidInput(format!(
                "query parameters must serialize to an object, got {other}"
            ))),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    /// JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.payload = Payload::Json(body);
        self
    }

    /// JSON body from any serializable value.
    pub fn json_from<T: Serialize>(self, body: &T) -> Result<Self, WatsonError> {
        Ok(self.json(serde_json::to_value(body)?))
    }

    /// Raw body, e.g. audio for speech recognition.
    pub fn raw(mut self, data: FileValue, content_type: Option<String>) -> Self {
        self.payload = Payload::Raw { data, content_type };
        self
    }

    /// URL-encoded form field.
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match &mut self.payload {
            Payload::Form(form) => {
                form.insert(key.into(), value.into());
            }
            _ => {
                let mut form = Map::new();
                form.insert(key.into(), value.into());
                self.payload = Payload::Form(form);
            }
        }
        self
    }

    /// Multipart field.
    pub fn multipart(mut self, name: impl Into<String>, field: FormField) -> Self {
        match &mut self.payload {
            Payload::Multipart(fields) => fields.push((name.into(), field)),
            _ => self.payload = Payload::Multipart(vec![(name.into(), field)]),
        }
        self
    }

    /// Multipart file field.
    pub fn multipart_file(self, name: impl Into<String>, file: FileParam) -> Self {
        self.multipart(name, FormField::File(file))
    }

    /// Multipart file field, skipped when `file` is `None`.
    pub fn multipart_file_opt(self, name: impl Into<String>, file: Option<FileParam>) -> Self {
        match file {
            Some(f) => self.multipart_file(name, f),
            None => self,
        }
    }

    /// Multipart text/JSON field, skipped when `value` is `None`.
    pub fn multipart_value_opt<V: Into<Value>>(
        self,
        name: impl Into<String>,
        value: Option<V>,
    ) -> Self {
        match value {
            Some(v) => self.multipart(name, FormField::Json(v.into())),
            None => self,
        }
    }
}

impl ParamPresence for ServiceRequest {
    fn is_supplied(&self, key: &str) -> bool {
        self.path.is_supplied(key) || self.qs.is_supplied(key) || self.payload.is_supplied(key)
    }
}

/// Settings shared by every call of one service instance.
#[derive(Debug, Clone, Default)]
pub struct ServiceDefaults {
    /// Base URL without trailing slash.
    pub base_url: String,
    pub headers: Headers,
    pub qs: Map<String, Value>,
}

impl ServiceDefaults {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: Headers::new(),
            qs: Map::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.qs.insert(key.into(), value.into());
        self
    }

    /// Merge these defaults under `request`. Header and query maps combine
    /// key by key; the request wins on conflicts. `null` query values in the
    /// request remove the default.
    pub fn merge(&self, mut request: ServiceRequest) -> ServiceRequest {
        request.headers = merge_headers(self.headers.clone(), &request.headers);

        let mut qs = self.qs.clone();
        for (k, v) in std::mem::take(&mut request.qs) {
            if v.is_null() {
                qs.remove(&k);
            } else {
                qs.insert(k, v);
            }
        }
        request.qs = qs;
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::validate_required;
    use crate::utils::http_headers::get_header;
    use serde_json::json;

    #[test]
    fn merge_combines_headers_and_query() {
        let defaults = ServiceDefaults::new("https://svc/api")
            .with_header("Authorization", "Basic abc")
            .with_header("Accept", "application/json")
            .with_query("version", "2017-01-01");

        let req = ServiceRequest::new(HttpMethod::Get, "/v1/things")
            .header("accept", "text/plain")
            .query("version", "2018-01-01")
            .query("count", 5);

        let merged = defaults.merge(req);
        assert_eq!(get_header(&merged.headers, "Authorization"), Some("Basic abc"));
        assert_eq!(get_header(&merged.headers, "Accept"), Some("text/plain"));
        assert_eq!(merged.headers.len(), 2);
        assert_eq!(merged.qs["version"], "2018-01-01");
        assert_eq!(merged.qs["count"], 5);
    }

    #[test]
    fn null_query_value_removes_default() {
        let defaults = ServiceDefaults::new("https://svc").with_query("api_key", "k");
        let merged = defaults.merge(
            ServiceRequest::new(HttpMethod::Get, "/x").query("api_key", Value::Null),
        );
        assert!(!merged.qs.contains_key("api_key"));
    }

    #[test]
    fn presence_spans_path_query_and_payload() {
        let req = ServiceRequest::new(HttpMethod::Post, "/v1/{id}")
            .path_param("id", "abc")
            .query("version", "v")
            .json(json!({"text": "hello", "empty": ""}));

        assert!(validate_required(Some(&req), &["id", "version", "text"]).is_ok());
        let err = validate_required(Some(&req), &["empty", "missing"]).unwrap_err();
        assert_eq!(err.to_string(), "Missing required parameters: empty, missing");
    }

    #[test]
    fn multipart_files_count_as_supplied() {
        let req = ServiceRequest::new(HttpMethod::Post, "/v1/classifiers")
            .multipart_file(
                "training_data",
                FileParam::new(FileValue::from("a,b")),
            )
            .multipart("name", FormField::Text(String::new()));
        assert!(req.is_supplied("training_data"));
        assert!(!req.is_supplied("name"));
    }

    #[test]
    fn form_fields_accumulate() {
        let req = ServiceRequest::new(HttpMethod::Post, "/token")
            .form_field("grant_type", "refresh_token")
            .form_field("refresh_token", "r");
        match &req.payload {
            Payload::Form(form) => assert_eq!(form.len(), 2),
            other => panic!("unexpected payload: {other:?}"),
        }
    }
}
