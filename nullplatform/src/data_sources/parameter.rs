//! nullplatform_parameter data source

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tfplug::data_source::{ReadDataSourceRequest, ReadDataSourceResponse};
use tfplug::{AttributeBuilder, AttributeType, DataSource, Diagnostics, Schema, SchemaBuilder, State};

use crate::api::parameter::{Parameter, ParameterValue};
use crate::api::Client;
use crate::resources::ResourceError;

pub const TYPE_NAME: &str = "nullplatform_parameter";

pub struct ParameterDataSource {
    client: Client,
}

impl ParameterDataSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        let computed_string = |name: &str| AttributeBuilder::string(name).computed();

        SchemaBuilder::new()
            .description("Reads a parameter and its current values")
            .attribute(
                AttributeBuilder::string("id")
                    .description("Parameter id")
                    .required(),
            )
            .attribute(computed_string("name"))
            .attribute(computed_string("nrn"))
            .attribute(computed_string("type"))
            .attribute(computed_string("encoding"))
            .attribute(computed_string("variable"))
            .attribute(computed_string("destination_path"))
            .attribute(AttributeBuilder::bool("secret").computed())
            .attribute(AttributeBuilder::bool("read_only").computed())
            .attribute(
                AttributeBuilder::new("values", value_type())
                    .description("Current value per NRN and dimension combination")
                    .computed()
                    .sensitive(),
            )
            .build()
    }

    async fn do_read(&self, config: &State) -> Result<State, ResourceError> {
        let parameter = self.client.parameters().get(config.get_i64("id")?).await?;
        Ok(parameter_state(&parameter, config))
    }
}

fn value_type() -> AttributeType {
    AttributeType::List(Box::new(AttributeType::Object(BTreeMap::from([
        ("id".to_string(), AttributeType::Number),
        ("generated_id".to_string(), AttributeType::String),
        ("nrn".to_string(), AttributeType::String),
        ("value".to_string(), AttributeType::String),
        ("origin_version".to_string(), AttributeType::Number),
        (
            "dimensions".to_string(),
            AttributeType::Map(Box::new(AttributeType::String)),
        ),
        ("created_at".to_string(), AttributeType::String),
    ]))))
}

fn value_object(value: &ParameterValue) -> Value {
    json!({
        "id": value.id,
        "generated_id": value.generated_id(),
        "nrn": value.nrn,
        "value": value.value,
        "origin_version": value.origin_version,
        "dimensions": value.dimensions,
        "created_at": value.created_at.map(|t| t.to_rfc3339()),
    })
}

fn parameter_state(parameter: &Parameter, config: &State) -> State {
    let mut state = config.clone();
    state.set_string("id", parameter.id.to_string());
    state.set_string("name", parameter.name.clone());
    state.set_string("nrn", parameter.nrn.clone());
    state.set_string("type", parameter.parameter_type.as_str());
    state.set_string("encoding", parameter.encoding.as_str());
    state.set_optional("variable", parameter.variable.clone());
    state.set_optional("destination_path", parameter.destination_path.clone());
    state.set_bool("secret", parameter.secret);
    state.set_bool("read_only", parameter.read_only);
    state.set_value(
        "values",
        Value::Array(parameter.values.iter().map(value_object).collect()),
    );
    state
}

#[async_trait]
impl DataSource for ParameterDataSource {
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
                e.to_diagnostic("Failed to read parameter"),
            ),
        }
    }
}
