//! Generic resource driven by a [`RestMapping`]

use async_trait::async_trait;
use serde_json::Value;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::{Diagnostics, Resource, Schema, State};

use super::common::{state_id, ResourceError};
use crate::api::Client;
use crate::mapping::RestMapping;

pub struct RestResource {
    mapping: RestMapping,
    client: Client,
}

impl RestResource {
    pub fn new(mapping: RestMapping, client: Client) -> Self {
        Self { mapping, client }
    }

    pub fn mapping(&self) -> &RestMapping {
        &self.mapping
    }

    async fn do_create(&self, config: &State, planned: &State) -> Result<State, ResourceError> {
        let body = self.mapping.request_body(config)?;
        let response: Value = self.client.post(self.mapping.path, &body).await?;
        Ok(self.mapping.apply_response(&response, planned)?)
    }

    async fn do_read(&self, current: &State) -> Result<Option<State>, ResourceError> {
        let id = state_id(current)?;
        let response: Value = self.client.get(&self.mapping.resource_path(id)).await?;
        if self.mapping.is_gone(&response) {
            return Ok(None);
        }
        Ok(Some(self.mapping.apply_response(&response, current)?))
    }

    async fn do_update(
        &self,
        prior: &State,
        planned: &State,
        config: &State,
    ) -> Result<State, ResourceError> {
        let id = state_id(prior)?;
        let path = self.mapping.resource_path(id);
        let body = self.mapping.request_body(config)?;
        let response: Value = self.client.patch(&path, &body).await?;

        let mut planned = planned.clone();
        planned.set_string("id", id.to_string());

        // Some endpoints answer PATCH with an empty body
        let response = if response.is_object() {
            response
        } else {
            self.client.get(&path).await?
        };
        Ok(self.mapping.apply_response(&response, &planned)?)
    }
}

#[async_trait]
impl Resource for RestResource {
    fn type_name(&self) -> &str {
        self.mapping.type_name
    }

    fn schema(&self) -> Schema {
        self.mapping.schema()
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self
            .do_create(&request.config, &request.planned_state)
            .await
        {
            Ok(new_state) => {
                tracing::info!(
                    "Created {} {}",
                    self.mapping.type_name,
                    new_state.get_optional_string("id").ok().flatten().unwrap_or_default()
                );
                CreateResourceResponse {
                    new_state,
                    diagnostics: Diagnostics::new(),
                }
            }
            Err(e) => CreateResourceResponse::error(
                request.planned_state,
                e.to_diagnostic(&format!("Failed to create {}", self.mapping.type_name)),
            ),
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.do_read(&request.current_state).await {
            Ok(Some(state)) => ReadResourceResponse::found(state),
            Ok(None) => {
                tracing::warn!("{} was deleted outside of Terraform", self.mapping.type_name);
                ReadResourceResponse::gone()
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("{} no longer exists", self.mapping.type_name);
                ReadResourceResponse::not_found()
            }
            Err(e) => ReadResourceResponse::error(
                request.current_state,
                e.to_diagnostic(&format!("Failed to read {}", self.mapping.type_name)),
            ),
        }
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self
            .do_update(&request.prior_state, &request.planned_state, &request.config)
            .await
        {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: Diagnostics::new(),
            },
            Err(e) => UpdateResourceResponse::error(
                request.prior_state,
                e.to_diagnostic(&format!("Failed to update {}", self.mapping.type_name)),
            ),
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let result = match state_id(&request.prior_state) {
            Ok(id) => self
                .client
                .delete(&self.mapping.resource_path(id))
                .await
                .map_err(ResourceError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::debug!("{} already deleted", self.mapping.type_name);
            }
            Err(e) => diagnostics.push(
                e.to_diagnostic(&format!("Failed to delete {}", self.mapping.type_name)),
            ),
        }

        DeleteResourceResponse { diagnostics }
    }
}
