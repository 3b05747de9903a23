//! Schema types and builders for tfplug
//!
//! A schema lists the attributes a resource or data source exposes, with
//! their types, requiredness, validators and plan modifiers.

use crate::plan_modifier::PlanModifier;
use crate::types::{type_name, Diagnostic, Diagnostics, State};
use crate::validator::Validator;
use serde_json::Value;
use std::collections::BTreeMap;

/// AttributeType mirrors the subset of Terraform's type system used here
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Number,
    Bool,
    List(Box<AttributeType>),
    Map(Box<AttributeType>),
    /// Fixed structure; every field is optional within the object
    Object(BTreeMap<String, AttributeType>),
}

impl AttributeType {
    /// Whether a JSON value fits this type; null fits everything
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (AttributeType::String, Value::String(_)) => true,
            (AttributeType::Number, Value::Number(_)) => true,
            (AttributeType::Number, Value::String(s)) => s.parse::<f64>().is_ok(),
            (AttributeType::Bool, Value::Bool(_)) => true,
            (AttributeType::List(inner), Value::Array(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (AttributeType::Map(inner), Value::Object(entries)) => {
                entries.values().all(|item| inner.accepts(item))
            }
            (AttributeType::Object(fields), Value::Object(entries)) => {
                entries.iter().all(|(key, item)| {
                    fields
                        .get(key)
                        .is_some_and(|field_type| field_type.accepts(item))
                })
            }
            _ => false,
        }
    }
}

/// Attribute represents a single configuration attribute
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub validators: Vec<Box<dyn Validator>>,
    pub plan_modifiers: Vec<Box<dyn PlanModifier>>,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("validators", &self.validators.len())
            .field("plan_modifiers", &self.plan_modifiers.len())
            .finish()
    }
}

/// Schema is returned by resources and data sources
#[derive(Debug)]
pub struct Schema {
    pub version: i64,
    pub description: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration against the schema
    ///
    /// Reports missing required attributes, values of the wrong type,
    /// attributes the schema does not declare, user-set computed-only
    /// attributes and any validator failures.
    pub fn validate(&self, config: &State) -> Diagnostics {
        let mut diags = Diagnostics::new();

        for name in config.attribute_names() {
            if self.attribute(name).is_none() && config.is_set(name) {
                diags.push(
                    Diagnostic::error(
                        "Unsupported attribute",
                        format!("An attribute named '{}' is not expected here", name),
                    )
                    .with_attribute(name.as_str()),
                );
            }
        }

        for attr in &self.attributes {
            let value = config.get(&attr.name);

            match value {
                None if attr.required => {
                    diags.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!("The argument '{}' is required", attr.name),
                        )
                        .with_attribute(attr.name.as_str()),
                    );
                }
                None => {}
                Some(_) if attr.computed && !attr.optional && !attr.required => {
                    diags.push(
                        Diagnostic::error(
                            "Value for unconfigurable attribute",
                            format!("'{}' is computed and cannot be set", attr.name),
                        )
                        .with_attribute(attr.name.as_str()),
                    );
                }
                Some(value) if !attr.r#type.accepts(value) => {
                    diags.push(
                        Diagnostic::error(
                            "Incorrect attribute value type",
                            format!(
                                "'{}' expects {:?}, got {}",
                                attr.name,
                                attr.r#type,
                                type_name(value)
                            ),
                        )
                        .with_attribute(attr.name.as_str()),
                    );
                }
                Some(value) => {
                    for validator in &attr.validators {
                        validator.validate(value, &attr.name, &mut diags);
                    }
                }
            }
        }

        diags
    }
}

/// AttributeBuilder provides fluent API for building attributes
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                validators: Vec::new(),
                plan_modifiers: Vec::new(),
            },
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(name, AttributeType::String)
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, AttributeType::Number)
    }

    pub fn bool(name: &str) -> Self {
        Self::new(name, AttributeType::Bool)
    }

    pub fn string_map(name: &str) -> Self {
        Self::new(name, AttributeType::Map(Box::new(AttributeType::String)))
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.attribute.validators.push(Box::new(validator));
        self
    }

    pub fn plan_modifier(mut self, modifier: impl PlanModifier + 'static) -> Self {
        self.attribute.plan_modifiers.push(Box::new(modifier));
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                description: String::new(),
                attributes: Vec::new(),
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.description = desc.to_string();
        self
    }

    pub fn attribute(mut self, attr: impl Into<Attribute>) -> Self {
        self.schema.attributes.push(attr.into());
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<AttributeBuilder> for Attribute {
    fn from(builder: AttributeBuilder) -> Self {
        builder.build()
    }
}
