//! URL path templating
//!
//! Endpoint templates such as `/v1/classifiers/{classifier_id}` are expanded
//! with percent-encoded values. Placeholders without a matching value are left
//! untouched, so a template expanded with a partial map still shows which
//! segments are unresolved.

use std::collections::BTreeMap;

/// Path parameters keyed by placeholder name.
pub type PathParams = BTreeMap<String, String>;

/// Substitute every `{key}` in `template` with the percent-encoded value of `key`.
///
/// Returns the template unchanged when `params` is `None`. Keys that do not
/// appear in the template are ignored.
pub fn expand_path(template: &str, params: Option<&PathParams>) -> String {
    let Some(params) = params else {
        return template.to_string();
    };
    params.iter().fold(template.to_string(), |path, (key, value)| {
        let placeholder = format!("{{{key}}}");
        if path.contains(&placeholder) {
            path.replace(&placeholder, &urlencoding::encode(value))
        } else {
            path
        }
    })
}

/// Remove a single trailing `/` from a base URL.
pub fn strip_trailing_slash(url: &str) -> &str {
    url.strip_suffix('/').unwrap_or(url)
}
