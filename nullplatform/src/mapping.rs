//! Table-driven translation between schema attributes and API payloads
//!
//! Simple resources are described by a [`RestMapping`]: an endpoint plus a
//! list of [`FieldSpec`]s. The mapping derives the schema, builds request
//! bodies from configuration and folds responses back into state.

use serde_json::{Map, Value};
use thiserror::Error;
use tfplug::{
    AttributeBuilder, RequiresReplaceIfChanged, Schema, SchemaBuilder, State, TfplugError,
    UseStateForUnknown,
};

use crate::api::common::DELETED_STATUS;
use crate::diff::{json_equivalent, normalize_json, to_canonical_string, SuppressEquivalentJson};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Bool,
    StringMap,
    /// Arbitrary JSON document, exposed as a JSON-encoded string
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Required,
    Optional,
    /// Optional; the backend fills it in when left unset
    OptionalComputed,
    Computed,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub api_name: &'static str,
    pub kind: FieldKind,
    pub mode: FieldMode,
    pub force_new: bool,
    pub sensitive: bool,
    pub description: &'static str,
}

impl FieldSpec {
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            api_name: name,
            kind,
            mode: FieldMode::Optional,
            force_new: false,
            sensitive: false,
            description: "",
        }
    }

    pub fn api_name(mut self, api_name: &'static str) -> Self {
        self.api_name = api_name;
        self
    }

    pub fn required(mut self) -> Self {
        self.mode = FieldMode::Required;
        self
    }

    pub fn optional_computed(mut self) -> Self {
        self.mode = FieldMode::OptionalComputed;
        self
    }

    pub fn computed(mut self) -> Self {
        self.mode = FieldMode::Computed;
        self
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    fn sent_to_api(&self) -> bool {
        self.mode != FieldMode::Computed
    }
}

#[derive(Debug, Error)]
pub enum MappingError {
    #[error(transparent)]
    Attribute(#[from] TfplugError),

    #[error("'{field}' is not valid JSON: {reason}")]
    InvalidJson { field: String, reason: String },

    #[error("response has no usable 'id'")]
    MissingId,
}

/// Description of one REST-backed resource type
#[derive(Debug, Clone)]
pub struct RestMapping {
    pub type_name: &'static str,
    pub description: &'static str,
    /// Collection path, e.g. `/dimension`
    pub path: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Response field holding the lifecycle status, if the entity has one
    pub status_field: Option<&'static str>,
}

impl RestMapping {
    pub fn resource_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    pub fn schema(&self) -> Schema {
        let mut builder = SchemaBuilder::new().description(self.description).attribute(
            AttributeBuilder::string("id")
                .description("Backend identifier")
                .computed()
                .plan_modifier(UseStateForUnknown),
        );

        for field in &self.fields {
            let mut attr = match field.kind {
                FieldKind::String | FieldKind::Json => AttributeBuilder::string(field.name),
                FieldKind::Integer => AttributeBuilder::number(field.name),
                FieldKind::Bool => AttributeBuilder::bool(field.name),
                FieldKind::StringMap => AttributeBuilder::string_map(field.name),
            }
            .description(field.description);

            attr = match field.mode {
                FieldMode::Required => attr.required(),
                FieldMode::Optional => attr.optional(),
                FieldMode::OptionalComputed => attr.optional().computed(),
                FieldMode::Computed => attr.computed(),
            };
            if matches!(field.mode, FieldMode::OptionalComputed | FieldMode::Computed) {
                attr = attr.plan_modifier(UseStateForUnknown);
            }
            if field.kind == FieldKind::Json {
                attr = attr.plan_modifier(SuppressEquivalentJson);
            }
            if field.force_new {
                attr = attr.plan_modifier(RequiresReplaceIfChanged);
            }
            if field.sensitive {
                attr = attr.sensitive();
            }

            builder = builder.attribute(attr);
        }

        builder.build()
    }

    /// Request body for create and update
    ///
    /// Only configured, non-computed attributes are sent.
    pub fn request_body(&self, config: &State) -> Result<Value, MappingError> {
        let mut body = Map::new();

        for field in self.fields.iter().filter(|f| f.sent_to_api()) {
            if !config.is_set(field.name) {
                continue;
            }
            let value = match field.kind {
                FieldKind::String => Value::String(config.get_string(field.name)?),
                FieldKind::Integer => Value::from(config.get_i64(field.name)?),
                FieldKind::Bool => Value::Bool(config.get_bool(field.name)?),
                FieldKind::StringMap => {
                    let map = config.get_string_map(field.name)?;
                    Value::Object(
                        map.into_iter()
                            .map(|(k, v)| (k, Value::String(v)))
                            .collect(),
                    )
                }
                FieldKind::Json => {
                    let raw = config.get_string(field.name)?;
                    serde_json::from_str(&raw).map_err(|e| MappingError::InvalidJson {
                        field: field.name.to_string(),
                        reason: e.to_string(),
                    })?
                }
            };
            body.insert(field.api_name.to_string(), value);
        }

        Ok(Value::Object(body))
    }

    /// Fold an API response into state
    ///
    /// Fields missing from the response keep their prior value. A JSON field
    /// whose prior text is equivalent to the response keeps the prior text.
    pub fn apply_response(&self, response: &Value, prior: &State) -> Result<State, MappingError> {
        let mut state = prior.clone();

        match response.get("id") {
            Some(Value::Number(n)) => state.set_string("id", n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => state.set_string("id", s.clone()),
            _ if prior.is_set("id") => {}
            _ => return Err(MappingError::MissingId),
        }

        for field in &self.fields {
            let Some(value) = response.get(field.api_name) else {
                continue;
            };
            let value = match (field.kind, value) {
                (_, Value::Null) => Value::Null,
                (FieldKind::String, Value::String(_)) => value.clone(),
                (FieldKind::String, other) => Value::String(scalar_text(other)),
                (FieldKind::Integer, _) | (FieldKind::Bool, _) => value.clone(),
                (FieldKind::StringMap, Value::Object(entries)) => Value::Object(
                    entries
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::String(scalar_text(v))))
                        .collect(),
                ),
                (FieldKind::StringMap, other) => other.clone(),
                (FieldKind::Json, other) => {
                    let canonical = match other {
                        Value::String(s) => normalize_json(s),
                        other => to_canonical_string(other),
                    };
                    match prior.get_optional_string(field.name)? {
                        Some(old) if json_equivalent(&old, &canonical) => Value::String(old),
                        _ => Value::String(canonical),
                    }
                }
            };
            state.set_value(field.name, value);
        }

        Ok(state)
    }

    /// Whether the response describes a soft-deleted entity
    pub fn is_gone(&self, response: &Value) -> bool {
        self.status_field
            .and_then(|field| response.get(field))
            .and_then(Value::as_str)
            == Some(DELETED_STATUS)
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use tfplug::{plan_resource_change, AttributeType, PlanAction};

    fn mapping() -> RestMapping {
        RestMapping {
            type_name: "nullplatform_widget",
            description: "test widget",
            path: "/widget",
            fields: vec![
                FieldSpec::new("name", FieldKind::String).required(),
                FieldSpec::new("nrn", FieldKind::String).required().force_new(),
                FieldSpec::new("order", FieldKind::Integer).optional_computed(),
                FieldSpec::new("enabled", FieldKind::Bool),
                FieldSpec::new("labels", FieldKind::StringMap),
                FieldSpec::new("json_schema", FieldKind::Json)
                    .api_name("schema")
                    .required(),
                FieldSpec::new("status", FieldKind::String).computed(),
            ],
            status_field: Some("status"),
        }
    }

    fn state(value: Value) -> State {
        State::from_value(value).unwrap()
    }

    #[test]
    fn schema_follows_field_modes() {
        let schema = mapping().schema();

        let id = schema.attribute("id").unwrap();
        assert!(id.computed && !id.optional);

        let order = schema.attribute("order").unwrap();
        assert!(order.optional && order.computed);
        assert_eq!(order.r#type, AttributeType::Number);

        assert!(schema.attribute("name").unwrap().required);
        assert_eq!(
            schema.attribute("labels").unwrap().r#type,
            AttributeType::Map(Box::new(AttributeType::String))
        );
        assert_eq!(schema.attribute("json_schema").unwrap().plan_modifiers.len(), 1);
    }

    #[test]
    fn request_body_uses_api_names_and_skips_computed() {
        let body = mapping()
            .request_body(&state(json!({
                "name": "env",
                "nrn": "organization=1",
                "order": "2",
                "labels": {"team": "core"},
                "json_schema": "{\"type\": \"object\"}",
                "status": "active"
            })))
            .unwrap();

        assert_eq!(
            body,
            json!({
                "name": "env",
                "nrn": "organization=1",
                "order": 2,
                "labels": {"team": "core"},
                "schema": {"type": "object"}
            })
        );
    }

    #[test]
    fn invalid_json_field_is_rejected() {
        let err = mapping()
            .request_body(&state(json!({"name": "x", "json_schema": "{oops"})))
            .unwrap_err();
        assert!(matches!(err, MappingError::InvalidJson { ref field, .. } if field == "json_schema"));
    }

    #[test]
    fn apply_response_keeps_equivalent_json_text() {
        let prior = state(json!({
            "name": "env",
            "json_schema": "{ \"b\": 1, \"a\": 2 }"
        }));
        let response = json!({
            "id": 9,
            "name": "env",
            "order": 1,
            "schema": {"a": 2, "b": 1},
            "status": "active"
        });

        let new_state = mapping().apply_response(&response, &prior).unwrap();
        assert_eq!(new_state.get_string("id").unwrap(), "9");
        assert_eq!(new_state.get_i64("order").unwrap(), 1);
        assert_eq!(new_state.get_string("status").unwrap(), "active");
        assert_eq!(
            new_state.get_string("json_schema").unwrap(),
            "{ \"b\": 1, \"a\": 2 }"
        );
    }

    #[test]
    fn apply_response_canonicalises_changed_json() {
        let prior = state(json!({"id": "9", "json_schema": "{\"a\": 1}"}));
        let response = json!({"schema": {"z": [1, 2], "a": 2}});

        let new_state = mapping().apply_response(&response, &prior).unwrap();
        assert_eq!(
            new_state.get_string("json_schema").unwrap(),
            r#"{"a":2,"z":[1,2]}"#
        );
        assert_eq!(new_state.get_string("id").unwrap(), "9");
    }

    #[test]
    fn apply_response_normalizes_json_returned_as_text() {
        let prior = state(json!({"id": "9", "json_schema": "{\"a\": 1}"}));
        let response = json!({"schema": "{ \"z\": [1, 2],\n  \"a\": 2 }"});

        let new_state = mapping().apply_response(&response, &prior).unwrap();
        assert_eq!(
            new_state.get_string("json_schema").unwrap(),
            r#"{"a":2,"z":[1,2]}"#
        );
    }

    #[test]
    fn apply_response_without_id_fails_on_create() {
        let err = mapping()
            .apply_response(&json!({"name": "x"}), &State::new())
            .unwrap_err();
        assert!(matches!(err, MappingError::MissingId));
    }

    #[test]
    fn deleted_status_is_gone() {
        let m = mapping();
        assert!(m.is_gone(&json!({"status": "deleted"})));
        assert!(!m.is_gone(&json!({"status": "active"})));
        assert!(!m.is_gone(&json!({})));
    }

    #[test]
    fn nrn_change_forces_replacement() {
        let schema = mapping().schema();
        let prior = state(json!({
            "id": "9",
            "name": "env",
            "nrn": "organization=1",
            "json_schema": "{}",
            "order": 1,
            "status": "active"
        }));
        let proposed = state(json!({
            "name": "env",
            "nrn": "organization=2",
            "json_schema": "{ }"
        }));

        let plan = plan_resource_change(&schema, &prior, &proposed);
        assert_eq!(plan.action, PlanAction::Replace);
        assert_eq!(plan.requires_replace, vec!["nrn".to_string()]);
        assert_eq!(plan.planned_state.get_string("json_schema").unwrap(), "{}");
        assert_eq!(plan.planned_state.get_i64("order").unwrap(), 1);
    }
}
