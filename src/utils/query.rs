//! Query-string serialization
//!
//! Arrays become repeated keys, booleans and numbers their literal form, and
//! nested objects their JSON text. The `watson-token` parameter is passed
//! through verbatim: the token endpoint only accepts the exact string it
//! issued, even where that string is not URL-safe.

use serde_json::{Map, Value};

/// Query parameter that is never percent-encoded.
pub const WATSON_TOKEN_PARAM: &str = "watson-token";

/// Serialize query parameters into `a=1&b=x&b=y` form (no leading `?`).
///
/// `null` values are skipped.
pub fn stringify_query(qs: &Map<String, Value>) -> String {
    let mut pairs: Vec<String> = Vec::with_capacity(qs.len());
    for (key, value) in qs {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar_to_string(item) {
                        pairs.push(encode_pair(key, &v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar_to_string(other) {
                    pairs.push(encode_pair(key, &v));
                }
            }
        }
    }
    pairs.join("&")
}

/// Render a JSON value as a single form/query value. `null` yields `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    if key == WATSON_TOKEN_PARAM {
        format!("{}={}", urlencoding::encode(key), value)
    } else {
        format!("{}={}", urlencoding::encode(key), urlencoding::encode(value))
    }
}

/// Append a serialized query to `url`, respecting an existing `?`.
pub fn append_query(url: &str, qs: &Map<String, Value>) -> String {
    let query = stringify_query(qs);
    if query.is_empty() {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn qs(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn encodes_values_but_not_watson_token() {
        let q = qs(json!({"text": "a b&c", "watson-token": "ab%2F=="}));
        assert_eq!(stringify_query(&q), "text=a%20b%26c&watson-token=ab%2F==");
    }

    #[test]
    fn arrays_repeat_keys_and_scalars_render_literally() {
        let q = qs(json!({"count": 3, "features": ["x", "y"], "skip": null, "verbose": true}));
        assert_eq!(
            stringify_query(&q),
            "count=3&features=x&features=y&verbose=true"
        );
    }

    #[test]
    fn append_respects_existing_query() {
        let q = qs(json!({"version": "2018-03-19"}));
        assert_eq!(
            append_query("https://h/v1/x?a=1", &q),
            "https://h/v1/x?a=1&version=2018-03-19"
        );
        assert_eq!(append_query("https://h/v1/x", &Map::new()), "https://h/v1/x");
    }
}
