//! Per-attribute planning
//!
//! Runs each attribute's plan modifiers over the proposed new state and
//! classifies the resulting change. This is the provider's half of
//! planning; computing the proposed state itself is the host's job.

use crate::plan_modifier::PlanModifyRequest;
use crate::schema::Schema;
use crate::types::{Diagnostics, State};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    NoOp,
    Create,
    Update,
    Replace,
    Delete,
}

#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub action: PlanAction,
    pub planned_state: State,
    pub requires_replace: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Plan the change from `prior` to `proposed` for one resource instance
///
/// An empty `prior` is a create, an empty `proposed` a delete.
pub fn plan_resource_change(schema: &Schema, prior: &State, proposed: &State) -> PlannedChange {
    if proposed.is_empty() {
        return PlannedChange {
            action: if prior.is_empty() {
                PlanAction::NoOp
            } else {
                PlanAction::Delete
            },
            planned_state: State::new(),
            requires_replace: Vec::new(),
            diagnostics: Diagnostics::new(),
        };
    }

    let mut planned_state = proposed.clone();
    let mut requires_replace = Vec::new();
    let mut diagnostics = Diagnostics::new();

    for attr in &schema.attributes {
        let state = prior.get(&attr.name).cloned().unwrap_or(Value::Null);
        let config = proposed.get(&attr.name).cloned().unwrap_or(Value::Null);
        let mut plan = config.clone();

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify_plan(PlanModifyRequest {
                state: state.clone(),
                plan,
                config: config.clone(),
                attribute_path: attr.name.clone(),
            });
            plan = response.plan_value;
            diagnostics.extend(response.diagnostics);
            if response.requires_replace && !requires_replace.contains(&attr.name) {
                requires_replace.push(attr.name.clone());
            }
        }

        planned_state.set_value(&attr.name, plan);
    }

    let action = if prior.is_empty() {
        PlanAction::Create
    } else if !requires_replace.is_empty() {
        PlanAction::Replace
    } else if schema
        .attributes
        .iter()
        .all(|attr| {
            value_or_null(prior, &attr.name) == value_or_null(&planned_state, &attr.name)
        })
    {
        PlanAction::NoOp
    } else {
        PlanAction::Update
    };

    tracing::debug!(?action, replace = ?requires_replace, "planned resource change");

    PlannedChange {
        action,
        planned_state,
        requires_replace,
        diagnostics,
    }
}

/// Absent and null attributes plan the same
fn value_or_null<'a>(state: &'a State, name: &str) -> &'a Value {
    static NULL: Value = Value::Null;
    state.get(name).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan_modifier::{RequiresReplaceIfChanged, UseStateForUnknown};
    use crate::schema::{AttributeBuilder, SchemaBuilder};
    use serde_json::json;

    fn schema() -> Schema {
        SchemaBuilder::new()
            .attribute(
                AttributeBuilder::string("id")
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .attribute(
                AttributeBuilder::string("nrn")
                    .required()
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(AttributeBuilder::string("value").required())
            .build()
    }

    fn state(value: Value) -> State {
        State::from_value(value).unwrap()
    }

    #[test]
    fn empty_prior_is_create() {
        let change = plan_resource_change(
            &schema(),
            &State::new(),
            &state(json!({"nrn": "organization=1", "value": "x"})),
        );

        assert_eq!(change.action, PlanAction::Create);
        assert!(change.requires_replace.is_empty());
    }

    #[test]
    fn unchanged_config_keeps_computed_id() {
        let prior = state(json!({"id": "abc", "nrn": "organization=1", "value": "x"}));
        let change = plan_resource_change(
            &schema(),
            &prior,
            &state(json!({"nrn": "organization=1", "value": "x"})),
        );

        assert_eq!(change.action, PlanAction::NoOp);
        assert_eq!(change.planned_state.get_string("id").unwrap(), "abc");
    }

    #[test]
    fn value_change_is_update() {
        let prior = state(json!({"id": "abc", "nrn": "organization=1", "value": "x"}));
        let change = plan_resource_change(
            &schema(),
            &prior,
            &state(json!({"nrn": "organization=1", "value": "y"})),
        );

        assert_eq!(change.action, PlanAction::Update);
    }

    #[test]
    fn nrn_change_is_replace() {
        let prior = state(json!({"id": "abc", "nrn": "organization=1", "value": "x"}));
        let change = plan_resource_change(
            &schema(),
            &prior,
            &state(json!({"nrn": "organization=2", "value": "x"})),
        );

        assert_eq!(change.action, PlanAction::Replace);
        assert_eq!(change.requires_replace, vec!["nrn".to_string()]);
    }

    #[test]
    fn empty_proposed_is_delete() {
        let prior = state(json!({"id": "abc", "nrn": "organization=1", "value": "x"}));
        let change = plan_resource_change(&schema(), &prior, &State::new());

        assert_eq!(change.action, PlanAction::Delete);
    }
}
