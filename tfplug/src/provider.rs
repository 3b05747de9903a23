//! Provider trait
//!
//! A provider is configured once, then acts as a factory for the resources
//! and data sources it serves. Configured clients are handed to each
//! resource at construction instead of living in globals.

use crate::data_source::DataSource;
use crate::resource::Resource;
use crate::schema::Schema;
use crate::types::{Diagnostics, State};
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub struct ConfigureRequest {
    pub config: State,
}

pub struct ConfigureResponse {
    pub diagnostics: Diagnostics,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn type_name(&self) -> &str;

    fn schema(&self) -> Schema;

    async fn configure(&mut self, request: ConfigureRequest) -> ConfigureResponse;

    /// Fails with `ProviderNotConfigured` before a successful configure
    async fn create_resource(&self, name: &str) -> Result<Box<dyn Resource>>;

    async fn create_data_source(&self, name: &str) -> Result<Box<dyn DataSource>>;

    fn resource_schemas(&self) -> HashMap<String, Schema>;

    fn data_source_schemas(&self) -> HashMap<String, Schema>;
}
