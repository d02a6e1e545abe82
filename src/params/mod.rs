//! Required-parameter validation
//!
//! Every facade operation declares an ordered list of parameter names that
//! must be supplied. The executor checks them against the union of the
//! request's path, query, body, form and multipart fields before any network
//! I/O happens.
//!
//! A value counts as supplied unless it is absent, JSON `null`, or an empty
//! string. `0` and `false` are legitimate values for numeric and boolean
//! parameters and are accepted.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::error::WatsonError;

/// Anything that can answer "was this parameter supplied?".
pub trait ParamPresence {
    fn is_supplied(&self, key: &str) -> bool;
}

/// Whether a single JSON value counts as supplied.
pub fn is_supplied_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

impl ParamPresence for Map<String, Value> {
    fn is_supplied(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_supplied_value)
    }
}

impl ParamPresence for HashMap<String, Value> {
    fn is_supplied(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_supplied_value)
    }
}

impl ParamPresence for BTreeMap<String, String> {
    fn is_supplied(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }
}

impl ParamPresence for Value {
    fn is_supplied(&self, key: &str) -> bool {
        match self {
            Value::Object(map) => map.is_supplied(key),
            _ => false,
        }
    }
}

/// A view over several parameter sources; a key is supplied if any source supplies it.
pub struct ParamUnion<'a> {
    sources: Vec<&'a dyn ParamPresence>,
}

impl<'a> ParamUnion<'a> {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with(mut self, source: &'a dyn ParamPresence) -> Self {
        self.sources.push(source);
        self
    }
}

impl Default for ParamUnion<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamPresence for ParamUnion<'_> {
    fn is_supplied(&self, key: &str) -> bool {
        self.sources.iter().any(|s| s.is_supplied(key))
    }
}

/// Names from `required` that `params` does not supply, in declared order.
///
/// With no params at all, every required name is missing.
pub fn missing_params<'r, P>(params: Option<&P>, required: &[&'r str]) -> Vec<&'r str>
where
    P: ParamPresence + ?Sized,
{
    match params {
        None => required.to_vec(),
        Some(p) => required
            .iter()
            .copied()
            .filter(|name| !p.is_supplied(name))
            .collect(),
    }
}

/// Check `params` against `required`.
///
/// Returns `Ok(())` when `required` is empty, whatever `params` holds.
pub fn validate_required<P>(params: Option<&P>, required: &[&str]) -> Result<(), WatsonError>
where
    P: ParamPresence + ?Sized,
{
    if required.is_empty() {
        return Ok(());
    }
    let missing = missing_params(params, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WatsonError::missing_parameters(missing))
    }
}
