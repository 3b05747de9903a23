//! Stable identifiers for parameter values
//!
//! The backend addresses a parameter value by an auto-increment row id that
//! changes on every update, since each update appends a new version. The
//! resource id is instead derived from where the value sits: its NRN and
//! dimension set. The value itself never takes part.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

use crate::api::parameter::ParameterValue;

/// Derive the stable id of a parameter value
///
/// Dimensions are appended as `key:value;` in ascending key order, then
/// `nrn;`. The SHA-256 digest of that buffer is returned as 64 lowercase hex
/// characters. An empty dimension map contributes nothing.
pub fn compute_id(nrn: &str, dimensions: &BTreeMap<String, String>) -> String {
    let mut buffer = String::new();
    for (key, value) in dimensions {
        buffer.push_str(key);
        buffer.push(':');
        buffer.push_str(value);
        buffer.push(';');
    }
    buffer.push_str(nrn);
    buffer.push(';');

    format!("{:x}", Sha256::digest(buffer.as_bytes()))
}

/// Outcome of looking a generated id up in a parameter's value list
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(ParameterValue),
    NotFound,
}

impl Resolution {
    pub fn found(self) -> Option<ParameterValue> {
        match self {
            Resolution::Found(value) => Some(value),
            Resolution::NotFound => None,
        }
    }
}

/// First value, in backend order, whose generated id matches
pub fn resolve<I>(values: I, generated_id: &str) -> Resolution
where
    I: IntoIterator<Item = ParameterValue>,
{
    values
        .into_iter()
        .find(|value| value.generated_id() == generated_id)
        .map(Resolution::Found)
        .unwrap_or(Resolution::NotFound)
}
