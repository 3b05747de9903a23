//! Resource trait and related types
//!
//! Resources implement CRUD against their backend. Responses carry the new
//! state plus diagnostics; errors are reported as diagnostics, never as
//! panics or `Err` values, so the host can surface them to the user.

use crate::schema::Schema;
use crate::types::{Diagnostic, Diagnostics, State};
use async_trait::async_trait;

/// Base trait for resources - implement CRUD operations
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name should be constant (e.g., "nullplatform_parameter")
    /// and match the name the provider dispatches on
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    /// Called during plan to validate configuration
    async fn validate(
        &self,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        ValidateResourceConfigResponse {
            diagnostics: self.schema().validate(&request.config),
        }
    }

    /// MUST populate all attributes in response.new_state (including computed)
    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse;

    /// MUST report whether the remote object still exists
    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse;

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse;
}

pub struct ValidateResourceConfigRequest {
    pub config: State,
}

pub struct ValidateResourceConfigResponse {
    pub diagnostics: Diagnostics,
}

pub struct CreateResourceRequest {
    pub config: State,
    pub planned_state: State,
}

pub struct CreateResourceResponse {
    pub new_state: State,
    pub diagnostics: Diagnostics,
}

impl CreateResourceResponse {
    /// Failed create; the planned state is handed back untouched
    pub fn error(planned_state: State, diagnostic: Diagnostic) -> Self {
        Self {
            new_state: planned_state,
            diagnostics: diagnostic.into(),
        }
    }
}

pub struct ReadResourceRequest {
    pub current_state: State,
}

/// Result of refreshing a resource
///
/// `NotFound` and `Gone` both tell the host to drop the resource from
/// state: the former means the backend has no such object, the latter that
/// it still exists but is marked deleted.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    Found(State),
    NotFound,
    Gone,
}

impl ReadOutcome {
    pub fn into_state(self) -> Option<State> {
        match self {
            ReadOutcome::Found(state) => Some(state),
            ReadOutcome::NotFound | ReadOutcome::Gone => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ReadOutcome::Found(_))
    }
}

pub struct ReadResourceResponse {
    pub outcome: ReadOutcome,
    pub diagnostics: Diagnostics,
}

impl ReadResourceResponse {
    pub fn found(state: State) -> Self {
        Self {
            outcome: ReadOutcome::Found(state),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            outcome: ReadOutcome::NotFound,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn gone() -> Self {
        Self {
            outcome: ReadOutcome::Gone,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Failed refresh; the current state is kept so nothing is lost
    pub fn error(current_state: State, diagnostic: Diagnostic) -> Self {
        Self {
            outcome: ReadOutcome::Found(current_state),
            diagnostics: diagnostic.into(),
        }
    }
}

pub struct UpdateResourceRequest {
    pub prior_state: State,
    pub planned_state: State,
    pub config: State,
}

pub struct UpdateResourceResponse {
    pub new_state: State,
    pub diagnostics: Diagnostics,
}

impl UpdateResourceResponse {
    /// Failed update; the prior state is kept
    pub fn error(prior_state: State, diagnostic: Diagnostic) -> Self {
        Self {
            new_state: prior_state,
            diagnostics: diagnostic.into(),
        }
    }
}

pub struct DeleteResourceRequest {
    pub prior_state: State,
}

pub struct DeleteResourceResponse {
    pub diagnostics: Diagnostics,
}
