//! DataSource trait and related types

use crate::schema::Schema;
use crate::types::{Diagnostic, Diagnostics, State};
use async_trait::async_trait;

/// Base trait for data sources - implement read operations
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name should be constant (e.g., "nullplatform_application")
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    async fn validate(
        &self,
        request: ValidateDataSourceConfigRequest,
    ) -> ValidateDataSourceConfigResponse {
        ValidateDataSourceConfigResponse {
            diagnostics: self.schema().validate(&request.config),
        }
    }

    /// MUST populate all attributes in response.state
    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

pub struct ValidateDataSourceConfigRequest {
    pub config: State,
}

pub struct ValidateDataSourceConfigResponse {
    pub diagnostics: Diagnostics,
}

pub struct ReadDataSourceRequest {
    pub config: State,
}

pub struct ReadDataSourceResponse {
    pub state: State,
    pub diagnostics: Diagnostics,
}

impl ReadDataSourceResponse {
    pub fn error(config: State, diagnostic: Diagnostic) -> Self {
        Self {
            state: config,
            diagnostics: diagnostic.into(),
        }
    }
}
