//! nullplatform_parameter

use async_trait::async_trait;
use tfplug::resource::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ReadResourceRequest, ReadResourceResponse, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::validator::{OneOf, StringLengthValidator, StringPatternValidator};
use tfplug::{
    AttributeBuilder, Diagnostic, Diagnostics, RequiresReplaceIfChanged, Resource, Schema,
    SchemaBuilder, State, UseStateForUnknown,
};

use super::common::{resolve_nrn, state_id, NrnComponents, ResourceError};
use crate::api::parameter::{
    CreateParameterRequest, Parameter, ParameterEncoding, ParameterType, UpdateParameterRequest,
};
use crate::api::Client;

pub const TYPE_NAME: &str = "nullplatform_parameter";

const ENV_VAR_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

pub struct ParameterResource {
    client: Client,
}

impl ParameterResource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn schema_static() -> Schema {
        let mut variable = AttributeBuilder::string("variable")
            .description("Environment variable name, for environment parameters")
            .optional();
        if let Ok(validator) =
            StringPatternValidator::from_pattern(ENV_VAR_PATTERN, "an environment variable name")
        {
            variable = variable.validator(validator);
        }

        let builder = SchemaBuilder::new()
            .version(0)
            .description("Manages a parameter definition for an application or scope")
            .attribute(
                AttributeBuilder::string("id")
                    .description("Parameter id")
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .attribute(
                AttributeBuilder::string("name")
                    .description("Display name")
                    .required()
                    .validator(StringLengthValidator {
                        min: Some(1),
                        max: Some(255),
                    }),
            );

        NrnComponents::schema_attributes(builder)
            .attribute(
                AttributeBuilder::string("type")
                    .description("environment or file")
                    .optional()
                    .computed()
                    .validator(OneOf::new(["environment", "file"]))
                    .plan_modifier(UseStateForUnknown)
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(
                AttributeBuilder::string("encoding")
                    .description("plaintext or base64")
                    .optional()
                    .computed()
                    .validator(OneOf::new(["plaintext", "base64"]))
                    .plan_modifier(UseStateForUnknown)
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(variable)
            .attribute(
                AttributeBuilder::string("destination_path")
                    .description("Mount path, for file parameters")
                    .optional(),
            )
            .attribute(
                AttributeBuilder::bool("secret")
                    .description("Whether values are hidden once written")
                    .optional()
                    .computed()
                    .plan_modifier(UseStateForUnknown)
                    .plan_modifier(RequiresReplaceIfChanged),
            )
            .attribute(
                AttributeBuilder::bool("read_only")
                    .optional()
                    .computed()
                    .plan_modifier(UseStateForUnknown),
            )
            .build()
    }

    fn parameter_type(config: &State) -> Result<ParameterType, ResourceError> {
        Ok(config
            .get_optional_string("type")?
            .and_then(|t| t.parse().ok())
            .unwrap_or_default())
    }

    async fn do_create(&self, config: &State, planned: &State) -> Result<State, ResourceError> {
        let nrn = resolve_nrn(&self.client, &NrnComponents::from_state(config)?).await?;

        let request = CreateParameterRequest {
            name: config.get_string("name")?,
            nrn: nrn.to_string(),
            parameter_type: Self::parameter_type(config)?,
            encoding: config
                .get_optional_string("encoding")?
                .and_then(|e| e.parse().ok())
                .unwrap_or_default(),
            variable: config.get_optional_string("variable")?,
            destination_path: config.get_optional_string("destination_path")?,
            secret: config.get_optional_bool("secret")?.unwrap_or(false),
            read_only: config.get_optional_bool("read_only")?.unwrap_or(false),
        };

        let parameter = self.client.parameters().create(&request).await?;
        tracing::info!("Created parameter {} at {}", parameter.id, parameter.nrn);
        Ok(parameter_to_state(&parameter, planned))
    }

    async fn do_read(&self, current: &State) -> Result<State, ResourceError> {
        let parameter = self.client.parameters().get(state_id(current)?).await?;
        Ok(parameter_to_state(&parameter, current))
    }

    async fn do_update(
        &self,
        prior: &State,
        planned: &State,
        config: &State,
    ) -> Result<State, ResourceError> {
        let id = state_id(prior)?;
        let request = UpdateParameterRequest {
            name: Some(config.get_string("name")?),
            variable: config.get_optional_string("variable")?,
            destination_path: config.get_optional_string("destination_path")?,
            secret: None,
            read_only: config.get_optional_bool("read_only")?,
        };

        self.client.parameters().update(id, &request).await?;
        let parameter = self.client.parameters().get(id).await?;
        Ok(parameter_to_state(&parameter, planned))
    }
}

/// Fold a parameter into state; NRN source ids are kept as configured
fn parameter_to_state(parameter: &Parameter, prior: &State) -> State {
    let mut state = prior.clone();
    state.set_string("id", parameter.id.to_string());
    state.set_string("name", parameter.name.clone());
    state.set_string("nrn", parameter.nrn.clone());
    state.set_string("type", parameter.parameter_type.as_str());
    state.set_string("encoding", parameter.encoding.as_str());
    state.set_optional("variable", parameter.variable.clone());
    state.set_optional("destination_path", parameter.destination_path.clone());
    state.set_bool("secret", parameter.secret);
    state.set_bool("read_only", parameter.read_only);
    state
}

#[async_trait]
impl Resource for ParameterResource {
    fn type_name(&self) -> &str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Self::schema_static()
    }

    async fn validate(
        &self,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let mut diagnostics = self.schema().validate(&request.config);

        match Self::parameter_type(&request.config) {
            Ok(ParameterType::Environment) if !request.config.is_set("variable") => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing variable",
                        "environment parameters require 'variable'",
                    )
                    .with_attribute("variable"),
                );
            }
            Ok(ParameterType::File) if !request.config.is_set("destination_path") => {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing destination_path",
                        "file parameters require 'destination_path'",
                    )
                    .with_attribute("destination_path"),
                );
            }
            _ => {}
        }

        if request.config.get_optional_string("encoding").ok().flatten().as_deref()
            == Some(ParameterEncoding::Base64.as_str())
            && Self::parameter_type(&request.config).ok() == Some(ParameterType::Environment)
        {
            diagnostics.push(Diagnostic::warning(
                "base64 encoding on an environment parameter",
                "values will be exposed base64-encoded in the environment",
            ));
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self
            .do_create(&request.config, &request.planned_state)
            .await
        {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: Diagnostics::new(),
            },
            Err(e) => CreateResourceResponse::error(
                request.planned_state,
                e.to_diagnostic("Failed to create parameter"),
            ),
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        match self.do_read(&request.current_state).await {
            Ok(state) => ReadResourceResponse::found(state),
            Err(e) if e.is_not_found() => {
                tracing::warn!("Parameter no longer exists, removing from state");
                ReadResourceResponse::not_found()
            }
            Err(e) => ReadResourceResponse::error(
                request.current_state,
                e.to_diagnostic("Failed to read parameter"),
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
                e.to_diagnostic("Failed to update parameter"),
            ),
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let mut diagnostics = Diagnostics::new();

        let result = match state_id(&request.prior_state) {
            Ok(id) => self
                .client
                .parameters()
                .delete(id)
                .await
                .map_err(ResourceError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {}
            Err(e) if e.is_not_found() => tracing::debug!("Parameter already deleted"),
            Err(e) => diagnostics.push(e.to_diagnostic("Failed to delete parameter")),
        }

        DeleteResourceResponse { diagnostics }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use url::Url;

    fn resource() -> ParameterResource {
        let client =
            Client::with_token(Url::parse("http://127.0.0.1:1/").unwrap(), "t", false).unwrap();
        ParameterResource::new(client)
    }

    fn validate(config: serde_json::Value) -> Diagnostics {
        tokio_test::block_on(resource().validate(ValidateResourceConfigRequest {
            config: State::from_value(config).unwrap(),
        }))
        .diagnostics
    }

    #[test]
    fn environment_parameter_requires_variable() {
        let diags = validate(json!({"name": "DB", "nrn": "organization=1"}));
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute.as_deref(), Some("variable"));
    }

    #[test]
    fn file_parameter_requires_destination_path() {
        let diags = validate(json!({"name": "cfg", "nrn": "organization=1", "type": "file"}));
        assert_eq!(
            diags.errors[0].attribute.as_deref(),
            Some("destination_path")
        );
    }

    #[test]
    fn invalid_variable_name_and_type_are_reported() {
        let diags = validate(json!({
            "name": "DB",
            "nrn": "organization=1",
            "type": "secret",
            "variable": "1-DB"
        }));
        let attributes: Vec<_> = diags
            .errors
            .iter()
            .filter_map(|d| d.attribute.as_deref())
            .collect();
        assert!(attributes.contains(&"type"));
        assert!(attributes.contains(&"variable"));
    }

    #[test]
    fn base64_environment_parameter_warns() {
        let diags = validate(json!({
            "name": "DB",
            "nrn": "organization=1",
            "variable": "DB",
            "encoding": "base64"
        }));
        assert!(!diags.has_errors());
        assert_eq!(diags.warnings.len(), 1);
    }

    #[test]
    fn state_keeps_nrn_source_ids() {
        let parameter: Parameter = serde_json::from_value(json!({
            "id": 3,
            "name": "DB",
            "nrn": "organization=1:account=2:namespace=3:application=4",
            "type": "environment",
            "encoding": "plaintext",
            "variable": "DB",
            "secret": false,
            "read_only": false
        }))
        .unwrap();
        let prior = State::from_value(json!({"application_id": 4})).unwrap();

        let state = parameter_to_state(&parameter, &prior);
        assert_eq!(state.get_string("id").unwrap(), "3");
        assert_eq!(state.get_i64("application_id").unwrap(), 4);
        assert_eq!(state.get_string("type").unwrap(), "environment");
        assert!(!state.is_set("destination_path"));
    }
}
