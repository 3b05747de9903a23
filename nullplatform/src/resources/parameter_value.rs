//! nullplatform_parameter_value
//!
//! The resource id is the generated id of the value's NRN and dimensions,
//! not the backend row id. Every value update appends a new row, so the
//! current row is always found again by scanning the parent parameter.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::{
    AttributeBuilder, Diagnostics, RequiresReplaceIfChanged, Resource, Schema, SchemaBuilder,
    State, UseStateForUnknown,
};

use super::common::{NrnValidator, ResourceError};
use crate::api::parameter::{CreateParameterValueRequest, ParameterValue};
use crate::api::Client;
use crate::diff::EmptyMapAsNull;
use crate::identity::{compute_id, Resolution};

pub const TYPE_NAME: &str = "nullplatform_parameter_value";

pub struct ParameterValueResource {
    client: Client,
}

/// The attributes that locate a value
struct Placement {
    parameter_id: i64,
    nrn: String,
    dimensions: BTreeMap<String, String>,
}

impl Placement {
    fn from_state(state: &State) -> Result<Self, ResourceError> {
        Ok(Self {
            parameter_id: state.get_i64("parameter_id")?,
            nrn: state.get_string("nrn")?,
            dimensions: state.get_string_map("dimensions")?,
        })
    }

    fn generated_id(&self) -> String {
        compute_id(&self.nrn, &self.dimensions)
    }
}

impl ParameterValueResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Manages the value of a parameter at an NRN and dimension combination")
            .attribute(
                AttributeBuilder::string("id")
                    .description("Generated from nrn and dimensions; stable across value updates")
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .attribute(
                AttributeBuilder::number("parameter_id")
                    .description("Parameter the value belongs to")
                    .required()
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(
                AttributeBuilder::string("nrn")
                    .description("NRN the value applies to")
                    .required()
                    .validator(NrnValidator)
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(
                AttributeBuilder::string_map("dimensions")
                    .description("Dimension selectors, e.g. environment = dev")
                    .optional()
                    .plan_modifier(EmptyMapAsNull)
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(
                AttributeBuilder::string("value")
                    .description("The value; may be empty")
                    .required()
                    .sensitive(),
            )
            .attribute(
                AttributeBuilder::number("origin_version")
                    .description("Version the value was rolled back from")
                    .optional(),
            )
            .attribute(
                AttributeBuilder::number("value_id")
                    .description("Backend id of the current version")
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .attribute(
                AttributeBuilder::string("created_at")
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .build()
    }

    /// Append a version and record it in `state`
    async fn write_version(&self, config: &State, planned: &State) -> Result<State, ResourceError> {
        let placement = Placement::from_state(config)?;
        let request = CreateParameterValueRequest {
            nrn: placement.nrn.clone(),
            value: config.get_string("value")?,
            dimensions: placement.dimensions.clone(),
            origin_version: config.get_optional_i64("origin_version")?,
        };

        let created = self
            .client
            .parameters()
            .create_value(placement.parameter_id, &request)
            .await?;

        let mut state = planned.clone();
        state.set_string("id", placement.generated_id());
        apply_version(&mut state, &created);
        Ok(state)
    }

    async fn resolve(&self, state: &State) -> Result<Resolution, ResourceError> {
        let parameter_id = state.get_i64("parameter_id")?;
        let generated_id = match state.get_optional_string("id")? {
            Some(id) => id,
            None => Placement::from_state(state)?.generated_id(),
        };

        match self
            .client
            .parameters()
            .resolve_value(parameter_id, &generated_id)
            .await
        {
            Ok(resolution) => Ok(resolution),
            Err(e) if e.is_not_found() => Ok(Resolution::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    async fn do_delete(&self, state: &State) -> Result<(), ResourceError> {
        let parameter_id = state.get_i64("parameter_id")?;

        match self.resolve(state).await? {
            Resolution::Found(ParameterValue { id: Some(id), .. }) => {
                match self.client.parameters().delete_value(parameter_id, id).await {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_not_found() => Ok(()),
                    Err(e) => Err(e.into()),
                }
            }
            Resolution::Found(_) => Err(ResourceError::MissingValueId { parameter_id }),
            Resolution::NotFound => {
                tracing::debug!("Parameter value already gone, nothing to delete");
                Ok(())
            }
        }
    }
}

/// Copy the backend-assigned fields of one version into state
fn apply_version(state: &mut State, value: &ParameterValue) {
    state.set_optional("value_id", value.id);
    state.set_optional("created_at", value.created_at.map(|t| t.to_rfc3339()));
}

#[async_trait]
impl Resource for ParameterValueResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self
            .write_version(&request.config, &request.planned_state)
            .await
        {
            Ok(new_state) => {
                tracing::info!(
                    "Created parameter value {}",
                    new_state.get_optional_string("id").ok().flatten().unwrap_or_default()
                );
                CreateResourceResponse {
                    new_state,
                    diagnostics: Diagnostics::new(),
                }
            }
            Err(e) => CreateResourceResponse::error(
                request.planned_state,
                e.to_diagnostic("Failed to create parameter value"),
            ),
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.resolve(&request.current_state).await {
            Ok(Resolution::Found(value)) => {
                let mut state = request.current_state;
                state.set_string("nrn", value.nrn.clone());
                state.set_string("value", value.value.clone());
                state.set_optional("origin_version", value.origin_version);
                // absent and empty dimensions are the same placement
                if !value.dimensions.is_empty() || state.is_set("dimensions") {
                    state.set_string_map("dimensions", &value.dimensions);
                }
                apply_version(&mut state, &value);
                ReadResourceResponse::found(state)
            }
            Ok(Resolution::NotFound) => {
                tracing::warn!("Parameter value no longer exists, removing from state");
                ReadResourceResponse::not_found()
            }
            Err(e) => ReadResourceResponse::error(
                request.current_state,
                e.to_diagnostic("Failed to read parameter value"),
            ),
        }
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self
            .write_version(&request.config, &request.planned_state)
            .await
        {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: Diagnostics::new(),
            },
            Err(e) => UpdateResourceResponse::error(
                request.prior_state,
                e.to_diagnostic("Failed to update parameter value"),
            ),
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = Diagnostics::new();
        if let Err(e) = self.do_delete(&request.prior_state).await {
            diagnostics.push(e.to_diagnostic("Failed to delete parameter value"));
        }
        DeleteResourceResponse { diagnostics }
    }
}
