//! Shared pieces of the resource implementations

use thiserror::Error;
use tfplug::validator::Validator;
use tfplug::{
    AttributeBuilder, Diagnostic, Diagnostics, RequiresReplaceIfChanged, SchemaBuilder, State,
    TfplugError, UseStateForUnknown,
};

use crate::api::application::SoftDeletable;
use crate::api::{ApiError, Client};
use crate::mapping::MappingError;
use crate::nrn::{Nrn, NrnBuilder, NrnError, NrnLevel};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid NRN: {0}")]
    Nrn(#[from] NrnError),

    #[error(transparent)]
    Attribute(#[from] TfplugError),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("{entity} {id} has been deleted")]
    Deleted { entity: &'static str, id: i64 },

    #[error("one of nrn, scope_id, application_id or organization_id must be set")]
    MissingNrnSource,

    #[error("value of parameter {parameter_id} was returned without an id")]
    MissingValueId { parameter_id: i64 },
}

impl ResourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::Api(e) if e.is_not_found())
    }

    pub fn is_gone(&self) -> bool {
        matches!(self, ResourceError::Deleted { .. })
    }

    pub fn to_diagnostic(&self, summary: &str) -> Diagnostic {
        let diagnostic = Diagnostic::error(summary, self.to_string());
        match self {
            ResourceError::Attribute(e) => match e.attribute() {
                Some(attribute) => diagnostic.with_attribute(attribute),
                None => diagnostic,
            },
            ResourceError::Mapping(MappingError::InvalidJson { field, .. }) => {
                diagnostic.with_attribute(field.as_str())
            }
            ResourceError::Nrn(_) => diagnostic.with_attribute("nrn"),
            _ => diagnostic,
        }
    }
}

/// Backend integer id kept in the `id` attribute
pub fn state_id(state: &State) -> Result<i64, ResourceError> {
    Ok(state.get_i64("id")?)
}

/// Rejects strings that are not well-formed NRNs
pub struct NrnValidator;

impl Validator for NrnValidator {
    fn validate(&self, value: &serde_json::Value, attribute: &str, diagnostics: &mut Diagnostics) {
        if let Some(raw) = value.as_str() {
            if let Err(e) = raw.parse::<Nrn>() {
                diagnostics.push(
                    Diagnostic::error(format!("Invalid NRN for {}", attribute), e.to_string())
                        .with_attribute(attribute),
                );
            }
        }
    }
}

/// Where an NRN can come from, in order of precedence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NrnComponents {
    pub nrn: Option<String>,
    pub scope_id: Option<i64>,
    pub application_id: Option<i64>,
    pub organization_id: Option<i64>,
    pub account_id: Option<i64>,
    pub namespace_id: Option<i64>,
}

impl NrnComponents {
    pub fn from_state(state: &State) -> Result<Self, ResourceError> {
        Ok(Self {
            nrn: state.get_optional_string("nrn")?,
            scope_id: state.get_optional_i64("scope_id")?,
            application_id: state.get_optional_i64("application_id")?,
            organization_id: state.get_optional_i64("organization_id")?,
            account_id: state.get_optional_i64("account_id")?,
            namespace_id: state.get_optional_i64("namespace_id")?,
        })
    }

    /// Attributes accepted as NRN sources; any change forces replacement
    pub fn schema_attributes(builder: SchemaBuilder) -> SchemaBuilder {
        let builder = builder.attribute(
            AttributeBuilder::string("nrn")
                .description("NRN of the owning entity; derived from the ids below when unset")
                .optional()
                .computed()
                .validator(NrnValidator)
                .plan_modifier(UseStateForUnknown)
                .plan_modifier(RequiresReplaceIfChanged),
        );

        [
            ("scope_id", "Scope whose NRN is used"),
            ("application_id", "Application whose NRN is used"),
            ("organization_id", "Organization id used to build the NRN"),
            ("account_id", "Account id used to build the NRN"),
            ("namespace_id", "Namespace id used to build the NRN"),
        ]
        .into_iter()
        .fold(builder, |builder, (name, description)| {
            builder.attribute(
                AttributeBuilder::number(name)
                    .description(description)
                    .optional()
                    .plan_modifier(RequiresReplaceIfChanged),
            )
        })
    }
}

/// Resolve the NRN a resource belongs to
///
/// An explicit `nrn` wins. Otherwise a scope or application is looked up
/// and its NRN used, failing if the entity is soft-deleted. As a last resort
/// the NRN is built from the organization, account and namespace ids.
pub async fn resolve_nrn(client: &Client, components: &NrnComponents) -> Result<Nrn, ResourceError> {
    if let Some(raw) = components.nrn.as_deref().filter(|s| !s.is_empty()) {
        return Ok(raw.parse()?);
    }

    if let Some(id) = components.scope_id {
        let scope = client.applications().get_scope(id).await?;
        if scope.is_deleted() {
            return Err(ResourceError::Deleted { entity: "scope", id });
        }
        tracing::debug!("Resolved NRN {} from scope {}", scope.nrn, id);
        return Ok(scope.nrn.parse()?);
    }

    if let Some(id) = components.application_id {
        let application = client.applications().get(id).await?;
        if application.is_deleted() {
            return Err(ResourceError::Deleted {
                entity: "application",
                id,
            });
        }
        tracing::debug!("Resolved NRN {} from application {}", application.nrn, id);
        return Ok(application.nrn.parse()?);
    }

    if components.organization_id.is_none() {
        return Err(ResourceError::MissingNrnSource);
    }

    Ok(NrnBuilder::new()
        .set_optional(NrnLevel::Organization, components.organization_id)
        .set_optional(NrnLevel::Account, components.account_id)
        .set_optional(NrnLevel::Namespace, components.namespace_id)
        .build()?)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde_json::json;
    use url::Url;

    fn client(server: &Server) -> Client {
        Client::with_token(Url::parse(&server.url()).unwrap(), "tok", false).unwrap()
    }

    #[tokio::test]
    async fn explicit_nrn_wins() {
        let server = Server::new_async().await;
        let components = NrnComponents {
            nrn: Some("organization=1:account=2".to_string()),
            application_id: Some(4),
            ..Default::default()
        };

        let nrn = resolve_nrn(&client(&server), &components).await.unwrap();
        assert_eq!(nrn.to_string(), "organization=1:account=2");
    }

    #[tokio::test]
    async fn application_id_is_looked_up() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/application/4")
            .with_body(
                r#"{"id":4,"name":"checkout","nrn":"organization=1:account=2:namespace=3:application=4","status":"active"}"#,
            )
            .create_async()
            .await;

        let components = NrnComponents {
            application_id: Some(4),
            ..Default::default()
        };
        let nrn = resolve_nrn(&client(&server), &components).await.unwrap();

        assert_eq!(nrn.level(), NrnLevel::Application);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn deleted_scope_is_gone() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/scope/5")
            .with_body(r#"{"id":5,"name":"dev","nrn":"organization=1:account=2:namespace=3:application=4:scope=5","status":"deleted"}"#)
            .create_async()
            .await;

        let components = NrnComponents {
            scope_id: Some(5),
            ..Default::default()
        };
        let err = resolve_nrn(&client(&server), &components)
            .await
            .unwrap_err();
        assert!(err.is_gone());
    }

    #[tokio::test]
    async fn built_from_ids_when_nothing_else_is_set() {
        let server = Server::new_async().await;
        let components = NrnComponents::from_state(
            &State::from_value(json!({
                "organization_id": 1,
                "account_id": "2",
                "namespace_id": 3
            }))
            .unwrap(),
        )
        .unwrap();

        let nrn = resolve_nrn(&client(&server), &components).await.unwrap();
        assert_eq!(nrn.to_string(), "organization=1:account=2:namespace=3");

        let err = resolve_nrn(&client(&server), &NrnComponents::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::MissingNrnSource));
    }

    #[tokio::test]
    async fn namespace_without_account_is_rejected() {
        let server = Server::new_async().await;
        let components = NrnComponents {
            organization_id: Some(1),
            namespace_id: Some(3),
            ..Default::default()
        };

        let err = resolve_nrn(&client(&server), &components)
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::Nrn(NrnError::MissingAncestor { .. })));
        assert_eq!(err.to_diagnostic("x").attribute.as_deref(), Some("nrn"));
    }

    #[test]
    fn nrn_validator_flags_malformed_values() {
        let mut diags = Diagnostics::new();
        NrnValidator.validate(&json!("organization=1"), "nrn", &mut diags);
        assert!(diags.is_empty());

        NrnValidator.validate(&json!("org=1"), "nrn", &mut diags);
        assert_eq!(diags.errors.len(), 1);
        assert_eq!(diags.errors[0].attribute.as_deref(), Some("nrn"));
    }
}
