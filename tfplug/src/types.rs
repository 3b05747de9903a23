//! Core value types for tfplug
//!
//! Attribute values are carried as `serde_json::Value`, keyed by attribute
//! name. Resources read and write them through the typed accessors on
//! [`State`] rather than matching on the raw values.

use crate::error::{Result, TfplugError};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Attribute values of one resource or data source instance
///
/// A `null` attribute and an absent attribute are treated the same way by
/// every accessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    values: Map<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from a JSON object
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(TfplugError::TypeMismatch {
                attribute: "<root>".to_string(),
                expected: "object".to_string(),
                actual: type_name(&other).to_string(),
            }),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(Value::is_null)
    }

    /// Raw value of an attribute, `None` when absent or null
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn get_string(&self, name: &str) -> Result<String> {
        match self.require(name)? {
            Value::String(s) => Ok(s.clone()),
            other => Err(mismatch(name, "string", other)),
        }
    }

    pub fn get_optional_string(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(mismatch(name, "string", other)),
        }
    }

    /// Integer attribute; numeric strings are accepted since ids are often
    /// passed around as strings in configuration
    pub fn get_i64(&self, name: &str) -> Result<i64> {
        let value = self.require(name)?;
        as_i64(value).ok_or_else(|| mismatch(name, "number", value))
    }

    pub fn get_optional_i64(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(value) => as_i64(value)
                .map(Some)
                .ok_or_else(|| mismatch(name, "number", value)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.require(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(mismatch(name, "bool", other)),
        }
    }

    pub fn get_optional_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(mismatch(name, "bool", other)),
        }
    }

    /// String map attribute; absent yields an empty map
    pub fn get_string_map(&self, name: &str) -> Result<BTreeMap<String, String>> {
        match self.get(name) {
            None => Ok(BTreeMap::new()),
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => Ok((k.clone(), s.clone())),
                    other => Err(mismatch(&format!("{}.{}", name, k), "string", other)),
                })
                .collect(),
            Some(other) => Err(mismatch(name, "map", other)),
        }
    }

    pub fn set_value(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn set_string(&mut self, name: &str, value: impl Into<String>) {
        self.set_value(name, Value::String(value.into()));
    }

    pub fn set_i64(&mut self, name: &str, value: i64) {
        self.set_value(name, Value::from(value));
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_value(name, Value::Bool(value));
    }

    pub fn set_string_map(&mut self, name: &str, value: &BTreeMap<String, String>) {
        let entries = value
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        self.set_value(name, Value::Object(entries));
    }

    /// Sets the attribute when `value` is present, nulls it otherwise
    pub fn set_optional<T: Into<Value>>(&mut self, name: &str, value: Option<T>) {
        self.set_value(name, value.map(Into::into).unwrap_or(Value::Null));
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    fn require(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| TfplugError::MissingAttribute(name.to_string()))
    }
}

impl From<Map<String, Value>> for State {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn mismatch(name: &str, expected: &str, actual: &Value) -> TfplugError {
    TfplugError::TypeMismatch {
        attribute: name.to_string(),
        expected: expected.to_string(),
        actual: type_name(actual).to_string(),
    }
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Diagnostic represents a warning or error from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub summary: String,
    pub detail: String,
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

/// Errors and warnings collected while serving one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, summary: impl Into<String>, detail: Option<impl Into<String>>) {
        self.push(Diagnostic::error(
            summary,
            detail.map(Into::<String>::into).unwrap_or_default(),
        ));
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: Option<impl Into<String>>) {
        self.push(Diagnostic::warning(
            summary,
            detail.map(Into::<String>::into).unwrap_or_default(),
        ));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            DiagnosticSeverity::Error => self.errors.push(diagnostic),
            DiagnosticSeverity::Warning => self.warnings.push(diagnostic),
        }
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        let mut diags = Diagnostics::new();
        diags.push(diagnostic);
        diags
    }
}

impl From<TfplugError> for Diagnostic {
    fn from(err: TfplugError) -> Self {
        let diagnostic = Diagnostic::error("Invalid attribute value", err.to_string());
        match err.attribute() {
            Some(attribute) => diagnostic.with_attribute(attribute),
            None => diagnostic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn state_string_access() {
        let mut state = State::new();
        state.set_string("name", "test");

        assert_eq!(state.get_string("name").unwrap(), "test");
        assert_eq!(state.get_optional_string("missing").unwrap(), None);
    }

    #[test]
    fn null_attributes_behave_as_absent() {
        let state = State::from_value(json!({"value": null})).unwrap();

        assert!(!state.is_set("value"));
        assert!(matches!(
            state.get_string("value"),
            Err(TfplugError::MissingAttribute(name)) if name == "value"
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let state = State::from_value(json!({"a": 42, "b": "17", "c": "x"})).unwrap();

        assert_eq!(state.get_i64("a").unwrap(), 42);
        assert_eq!(state.get_i64("b").unwrap(), 17);
        assert!(matches!(
            state.get_i64("c"),
            Err(TfplugError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn string_map_defaults_to_empty() {
        let mut state = State::new();
        assert!(state.get_string_map("dimensions").unwrap().is_empty());

        let dims = BTreeMap::from([("environment".to_string(), "dev".to_string())]);
        state.set_string_map("dimensions", &dims);
        assert_eq!(state.get_string_map("dimensions").unwrap(), dims);
    }

    #[test]
    fn string_map_rejects_non_string_entries() {
        let state = State::from_value(json!({"dimensions": {"env": 1}})).unwrap();

        let err = state.get_string_map("dimensions").unwrap_err();
        assert!(err.to_string().contains("dimensions.env"));
    }

    #[test]
    fn from_value_rejects_scalars() {
        assert!(State::from_value(json!("nope")).is_err());
        assert!(State::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn set_optional_nulls_missing_values() {
        let mut state = State::new();
        state.set_optional("origin_version", Some(3));
        state.set_optional::<i64>("other", None);

        assert_eq!(state.get_optional_i64("origin_version").unwrap(), Some(3));
        assert_eq!(state.get_optional_i64("other").unwrap(), None);
    }

    #[test]
    fn diagnostics_split_by_severity() {
        let mut diags = Diagnostics::new();
        diags.add_error("boom", Some("detail"));
        diags.add_warning("careful", None::<String>);

        assert!(diags.has_errors());
        assert_eq!(diags.errors[0].detail, "detail");
        assert_eq!(diags.warnings.len(), 1);
    }
}
