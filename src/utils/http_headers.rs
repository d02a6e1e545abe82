//! HTTP Headers Utility
//!
//! Service defaults and call options carry headers as plain string maps so
//! they can be merged before the request is built. Names compare
//! case-insensitively: a call-level `content-type` replaces a default
//! `Content-Type`.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::WatsonError;

/// String header map used while assembling requests.
pub type Headers = BTreeMap<String, String>;

/// Insert `name: value`, replacing any entry whose name matches case-insensitively.
pub fn set_header(headers: &mut Headers, name: impl Into<String>, value: impl Into<String>) {
    let name = name.into();
    remove_header(headers, &name);
    headers.insert(name, value.into());
}

/// Remove every entry whose name matches `name` case-insensitively.
pub fn remove_header(headers: &mut Headers, name: &str) {
    headers.retain(|k, _| !k.eq_ignore_ascii_case(name));
}

/// Look up a header case-insensitively.
pub fn get_header<'a>(headers: &'a Headers, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Merge `extra` over `base`; entries in `extra` win.
pub fn merge_headers(mut base: Headers, extra: &Headers) -> Headers {
    for (k, v) in extra {
        set_header(&mut base, k.clone(), v.clone());
    }
    base
}

/// Convert to a `reqwest` header map, rejecting invalid names or values.
pub fn to_header_map(headers: &Headers) -> Result<HeaderMap, WatsonError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
            WatsonError::InvalidInput(format!("Invalid header name '{key}': {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            WatsonError::InvalidInput(format!("Invalid header value for '{key}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

/// `Basic base64(username:password)`
pub fn basic_auth_value(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_case_insensitively() {
        let mut base = Headers::new();
        base.insert("Content-Type".into(), "application/json".into());
        base.insert("Accept".into(), "application/json".into());
        let mut extra = Headers::new();
        extra.insert("content-type".into(), "text/plain".into());

        let merged = merge_headers(base, &extra);
        assert_eq!(merged.len(), 2);
        assert_eq!(get_header(&merged, "CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(get_header(&merged, "accept"), Some("application/json"));
    }

    #[test]
    fn basic_auth_matches_rfc7617_example() {
        assert_eq!(
            basic_auth_value("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn invalid_header_names_are_rejected() {
        let mut headers = Headers::new();
        headers.insert("bad header".into(), "x".into());
        assert!(matches!(
            to_header_map(&headers),
            Err(WatsonError::InvalidInput(_))
        ));
    }
}
