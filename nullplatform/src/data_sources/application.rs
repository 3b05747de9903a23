//! nullplatform_application data source

use async_trait::async_trait;
use tfplug::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfplug::{AttributeBuilder, DataSource, Diagnostics, Schema, SchemaBuilder, State};

use crate::api::application::SoftDeletable;
use crate::api::Client;
use crate::resources::ResourceError;

pub const TYPE_NAME: &str = "nullplatform_application";

pub struct ApplicationDataSource {
    client: Client,
}

impl ApplicationDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        SchemaBuilder::new()
            .description("Reads an application, mainly to obtain its NRN")
            .attribute(AttributeBuilder::string("id").required())
            .attribute(AttributeBuilder::string("name").computed())
            .attribute(AttributeBuilder::string("nrn").computed())
            .attribute(AttributeBuilder::string("slug").computed())
            .attribute(AttributeBuilder::string("status").computed())
            .attribute(AttributeBuilder::number("namespace_id").computed())
            .attribute(AttributeBuilder::string("repository_url").computed())
            .build()
    }

    async fn do_read(&self, config: &State) -> Result<State, ResourceError> {
        let id = config.get_i64("id")?;
        let application = self.client.applications().get(id).await?;
        if application.is_deleted() {
            return Err(ResourceError::Deleted {
                entity: "application",
                id,
            });
        }

        let mut state = config.clone();
        state.set_string("id", application.id.to_string());
        state.set_string("name", application.name);
        state.set_string("nrn", application.nrn);
        state.set_optional("slug", application.slug);
        state.set_optional("status", application.status);
        state.set_optional("namespace_id", application.namespace_id);
        state.set_optional("repository_url", application.repository_url);
        Ok(state)
    }
}

#[async_trait]
impl DataSource for ApplicationDataSource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        match self.do_read(&request.config).await {
            Ok(state) => ReadDataSourceResponse {
                state,
                diagnostics: Diagnostics::new(),
            },
            Err(e) => ReadDataSourceResponse::error(
                request.config,
                e.to_diagnostic("Failed to read application"),
            ),
        }
    }
}
