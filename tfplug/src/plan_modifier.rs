use crate::types::Diagnostics;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct PlanModifyRequest {
    pub state: Value,
    pub plan: Value,
    pub config: Value,
    pub attribute_path: String,
}

#[derive(Debug, Clone)]
pub struct PlanModifyResponse {
    pub plan_value: Value,
    pub requires_replace: bool,
    pub diagnostics: Diagnostics,
}

impl PlanModifyResponse {
    pub fn unchanged(request: PlanModifyRequest) -> Self {
        Self {
            plan_value: request.plan,
            requires_replace: false,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Trait for modifying terraform plan behavior
///
/// Plan modifiers run once per attribute after the proposed new state is
/// known and can:
/// - Modify the planned value
/// - Mark an attribute as requiring replacement
/// - Add warnings or errors to the plan
pub trait PlanModifier: Send + Sync {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse;
}

/// Marks an attribute as requiring replacement when it changes
///
/// Creation (null prior state) never requires replacement.
pub struct RequiresReplaceIfChanged;

impl PlanModifier for RequiresReplaceIfChanged {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let requires_replace = !request.state.is_null() && request.state != request.plan;

        PlanModifyResponse {
            plan_value: request.plan,
            requires_replace,
            diagnostics: Diagnostics::new(),
        }
    }
}

/// Keeps the prior state value for computed attributes the configuration
/// leaves unset
pub struct UseStateForUnknown;

impl PlanModifier for UseStateForUnknown {
    fn modify_plan(&self, request: PlanModifyRequest) -> PlanModifyResponse {
        let plan_value = if request.plan.is_null() && !request.state.is_null() {
            request.state.clone()
        } else {
            request.plan
        };

        PlanModifyResponse {
            plan_value,
            requires_replace: false,
            diagnostics: Diagnostics::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(state: Value, plan: Value) -> PlanModifyRequest {
        PlanModifyRequest {
            config: plan.clone(),
            state,
            plan,
            attribute_path: "test.field".to_string(),
        }
    }

    #[test]
    fn requires_replace_if_changed_does_not_trigger_on_same_value() {
        let response =
            RequiresReplaceIfChanged.modify_plan(request(json!("hello"), json!("hello")));

        assert!(!response.requires_replace);
        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn requires_replace_if_changed_triggers_on_different_value() {
        let response =
            RequiresReplaceIfChanged.modify_plan(request(json!("hello"), json!("world")));

        assert!(response.requires_replace);
    }

    #[test]
    fn requires_replace_ignores_creation() {
        let response =
            RequiresReplaceIfChanged.modify_plan(request(Value::Null, json!("new")));

        assert!(!response.requires_replace);
    }

    #[test]
    fn requires_replace_compares_maps_without_order() {
        let response = RequiresReplaceIfChanged.modify_plan(request(
            json!({"a": "1", "b": "2"}),
            json!({"b": "2", "a": "1"}),
        ));

        assert!(!response.requires_replace);
    }

    #[test]
    fn use_state_for_unknown_keeps_prior_value() {
        let response = UseStateForUnknown.modify_plan(request(json!("abc123"), Value::Null));
        assert_eq!(response.plan_value, json!("abc123"));

        let response = UseStateForUnknown.modify_plan(request(Value::Null, Value::Null));
        assert!(response.plan_value.is_null());
    }
}
