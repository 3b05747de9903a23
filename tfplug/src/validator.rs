use crate::types::{Diagnostic, Diagnostics};
use serde_json::Value;

/// Validates a configured (non-null) attribute value
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Value, attribute: &str, diagnostics: &mut Diagnostics);
}

pub struct StringLengthValidator {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Validator for StringLengthValidator {
    fn validate(&self, value: &Value, attribute: &str, diagnostics: &mut Diagnostics) {
        let Some(s) = value.as_str() else {
            return;
        };
        let len = s.chars().count();

        if let Some(min) = self.min {
            if len < min {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have minimum length of {}", attribute, min),
                        format!("Got length {}", len),
                    )
                    .with_attribute(attribute),
                );
            }
        }
        if let Some(max) = self.max {
            if len > max {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must have maximum length of {}", attribute, max),
                        format!("Got length {}", len),
                    )
                    .with_attribute(attribute),
                );
            }
        }
    }
}

pub struct StringPatternValidator {
    pub pattern: regex::Regex,
    pub description: String,
}

impl StringPatternValidator {
    pub fn new(pattern: regex::Regex, description: impl Into<String>) -> Self {
        Self {
            pattern,
            description: description.into(),
        }
    }

    pub fn from_pattern(
        pattern: &str,
        description: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(regex::Regex::new(pattern)?, description))
    }
}

impl Validator for StringPatternValidator {
    fn validate(&self, value: &Value, attribute: &str, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_str() {
            if !self.pattern.is_match(s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("{} must match {}", attribute, self.description),
                        format!("Value '{}' does not match pattern", s),
                    )
                    .with_attribute(attribute),
                );
            }
        }
    }
}

/// Restricts a string attribute to a fixed set of values
pub struct OneOf {
    allowed: Vec<String>,
}

impl OneOf {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Validator for OneOf {
    fn validate(&self, value: &Value, attribute: &str, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_str() {
            if !self.allowed.iter().any(|allowed| allowed == s) {
                diagnostics.push(
                    Diagnostic::error(
                        format!("Invalid value for {}", attribute),
                        format!(
                            "Expected one of [{}], got '{}'",
                            self.allowed.join(", "),
                            s
                        ),
                    )
                    .with_attribute(attribute),
                );
            }
        }
    }
}
