//! JSON equivalence for string attributes holding JSON documents
//!
//! Users write JSON in whatever layout they like and the backend echoes it
//! back re-serialized. Two strings that parse to the same document are
//! treated as the same value so the plan stays quiet.

use serde_json::Value;
use tfplug::plan_modifier::{PlanModifier, PlanModifyRequest, PlanModifyResponse};
use tfplug::Diagnostics;

/// Whether two strings encode the same JSON document
///
/// Object keys are compared regardless of order, arrays positionally. If
/// either side is not valid JSON the raw strings are compared instead.
pub fn json_equivalent(old: &str, new: &str) -> bool {
    match (
        serde_json::from_str::<Value>(old),
        serde_json::from_str::<Value>(new),
    ) {
        // Map equality in serde_json ignores insertion order
        (Ok(old), Ok(new)) => old == new,
        _ => old == new,
    }
}

/// Canonical text form: compact, keys sorted
///
/// Invalid JSON is returned unchanged.
pub fn normalize_json(raw: &str) -> String {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => sort_keys(value).to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Compact text of an arbitrary JSON value with keys sorted
pub fn to_canonical_string(value: &Value) -> String {
    sort_keys(value.clone()).to_string()
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Keeps the prior value in the plan when the configured JSON string is
/// equivalent to it
pub struct SuppressEquivalentJson;

impl PlanModifier for SuppressEquivalentJson {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = match (request.state.as_str(), request.plan.as_str()) {
            (Some(old), Some(new)) if old != new && json_equivalent(old, new) => {
                tracing::debug!(
                    "Suppressing diff on {}: JSON documents are equivalent",
                    request.attribute_path
                );
                request.state.clone()
            }
            _ => request.plan,
        };

        PlanModifyResponse {
            plan_value,
            requires_replace: false,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Treats an unset map and an empty map as the same value
///
/// When prior and proposed are both empty the prior value is planned, so
/// switching between the two spellings neither updates nor replaces.
pub struct EmptyMapAsNull;

impl PlanModifier for EmptyMapAsNull {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        if is_empty_map(&request.state) && is_empty_map(&request.plan) {
            return PlanModifyResponse {
                plan_value: request.state.clone(),
                requires_replace: false,
                diagnostics: Diagnostics::new(),
            };
        }
        PlanModifyResponse::unchanged(request)
    }
}

fn is_empty_map(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(entries) => entries.is_empty(),
        _ => false,
    }
}
