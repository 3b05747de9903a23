pub mod api;
pub mod config;
pub mod data_sources;
pub mod diff;
pub mod identity;
pub mod logging;
pub mod mapping;
pub mod nrn;
pub mod resources;

use async_trait::async_trait;
use std::collections::HashMap;
use tfplug::provider::{ConfigureRequest, ConfigureResponse};
use tfplug::{
    AttributeBuilder, DataSource, Diagnostic, Diagnostics, Provider, Resource, Schema,
    SchemaBuilder, TfplugError,
};

pub use config::ProviderConfig;
pub use identity::compute_id;

pub const PROVIDER_NAME: &str = "nullplatform";

pub struct NullplatformProvider {
    client: Option<api::Client>,
}

impl Default for NullplatformProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl NullplatformProvider {
    pub fn new() -> Self {
        Self { client: None }
    }

    /// Provider already holding a client, e.g. one built with a known token
    pub fn with_client(client: api::Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> tfplug::Result<api::Client> {
        self.client
            .clone()
            .ok_or(TfplugError::ProviderNotConfigured)
    }
}

#[async_trait]
impl Provider for NullplatformProvider {
    fn type_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn schema(&self) -> Schema {
        SchemaBuilder::new()
            .description("Manages nullplatform resources")
            .attribute(
                AttributeBuilder::string("api_key")
                    .description("API key; falls back to NULLPLATFORM_API_KEY")
                    .optional()
                    .sensitive(),
            )
            .attribute(
                AttributeBuilder::string("host")
                    .description("API host; falls back to NULLPLATFORM_HOST")
                    .optional(),
            )
            .attribute(
                AttributeBuilder::bool("insecure")
                    .description("Skip TLS certificate verification")
                    .optional(),
            )
            .build()
    }

    async fn configure(&mut self, request: ConfigureRequest) -> ConfigureResponse {
        let mut diags = Diagnostics::new();

        let config = match ProviderConfig::from_state(&request.config) {
            Ok(config) => config,
            Err(e) => {
                diags.add_error(e.to_string(), None::<String>);
                return ConfigureResponse { diagnostics: diags };
            }
        };

        tracing::debug!("Configuring provider with {:?}", config);

        match api::Client::authenticate(&config).await {
            Ok(client) => {
                self.client = Some(client);
            }
            Err(e) => {
                diags.push(Diagnostic::error(
                    "Failed to authenticate with nullplatform",
                    e.to_string(),
                ));
            }
        }

        ConfigureResponse { diagnostics: diags }
    }

    async fn create_resource(&self, name: &str) -> tfplug::Result<Box<dyn Resource>> {
        let client = self.client()?;
        resources::create(name, client)
            .ok_or_else(|| TfplugError::ResourceNotFound(name.to_string()))
    }

    async fn create_data_source(&self, name: &str) -> tfplug::Result<Box<dyn DataSource>> {
        let client = self.client()?;
        data_sources::create(name, client)
            .ok_or_else(|| TfplugError::DataSourceNotFound(name.to_string()))
    }

    fn resource_schemas(&self) -> HashMap<String, Schema> {
        resources::RESOURCE_TYPES
            .iter()
            .filter_map(|name| resources::schema(name).map(|schema| (name.to_string(), schema)))
            .collect()
    }

    fn data_source_schemas(&self) -> HashMap<String, Schema> {
        data_sources::DATA_SOURCE_TYPES
            .iter()
            .filter_map(|name| data_sources::schema(name).map(|schema| (name.to_string(), schema)))
            .collect()
    }
}
