//! Parameter and parameter value API implementation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::common::{null_as_default, NullplatformApiResource};
use super::{ApiError, Client};
use crate::identity::{self, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    Environment,
    File,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::Environment => "environment",
            ParameterType::File => "file",
        }
    }
}

impl std::str::FromStr for ParameterType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "environment" => Ok(ParameterType::Environment),
            "file" => Ok(ParameterType::File),
            other => Err(format!("unknown parameter type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterEncoding {
    #[default]
    Plaintext,
    Base64,
}

impl ParameterEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterEncoding::Plaintext => "plaintext",
            ParameterEncoding::Base64 => "base64",
        }
    }
}

impl std::str::FromStr for ParameterEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plaintext" => Ok(ParameterEncoding::Plaintext),
            "base64" => Ok(ParameterEncoding::Base64),
            other => Err(format!("unknown parameter encoding '{}'", other)),
        }
    }
}

/// A parameter definition with its current values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub name: String,
    pub nrn: String,
    #[serde(rename = "type", default)]
    pub parameter_type: ParameterType,
    #[serde(default)]
    pub encoding: ParameterEncoding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    #[serde(default)]
    pub secret: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<ParameterValue>,
}

/// One value of a parameter at an NRN and dimension combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub nrn: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_version: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ParameterValue {
    /// Stable id derived from placement, independent of the value
    pub fn generated_id(&self) -> String {
        identity::compute_id(&self.nrn, &self.dimensions)
    }
}

impl NullplatformApiResource for Parameter {
    fn api_path() -> &'static str {
        "/parameter"
    }
}

/// Request body for creating parameters
#[derive(Debug, Clone, Serialize)]
pub struct CreateParameterRequest {
    pub name: String,
    pub nrn: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub encoding: ParameterEncoding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    pub secret: bool,
    pub read_only: bool,
}

/// Request body for updating parameters; absent fields are left alone
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateParameterRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

/// Request body for appending a parameter value version
#[derive(Debug, Clone, Serialize)]
pub struct CreateParameterValueRequest {
    pub nrn: String,
    pub value: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dimensions: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_version: Option<i64>,
}

/// Parameters API for parameter and value operations
pub struct ParametersApi<'a> {
    client: &'a Client,
}

impl<'a> ParametersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /parameter/{id}
    pub async fn get(&self, id: i64) -> Result<Parameter, ApiError> {
        self.client.get(&Parameter::resource_path(id)).await
    }

    /// POST /parameter
    pub async fn create(&self, request: &CreateParameterRequest) -> Result<Parameter, ApiError> {
        self.client.post(Parameter::api_path(), request).await
    }

    /// PATCH /parameter/{id}
    pub async fn update(&self, id: i64, request: &UpdateParameterRequest) -> Result<(), ApiError> {
        self.client
            .patch::<serde_json::Value, _>(&Parameter::resource_path(id), request)
            .await
            .map(|_| ())
    }

    /// DELETE /parameter/{id}
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&Parameter::resource_path(id)).await
    }

    /// POST /parameter/{id}/value
    ///
    /// Always appends a new version; the returned row has a fresh id.
    pub async fn create_value(
        &self,
        parameter_id: i64,
        request: &CreateParameterValueRequest,
    ) -> Result<ParameterValue, ApiError> {
        self.client
            .post(&value_path(parameter_id), request)
            .await
    }

    /// DELETE /parameter/{id}/value/{value_id}
    pub async fn delete_value(&self, parameter_id: i64, value_id: i64) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", value_path(parameter_id), value_id))
            .await
    }

    /// Find the current row for a generated id by scanning the parameter's
    /// value list
    pub async fn resolve_value(
        &self,
        parameter_id: i64,
        generated_id: &str,
    ) -> Result<Resolution, ApiError> {
        let parameter = self.get(parameter_id).await?;
        tracing::debug!(
            "Scanning {} values of parameter {} for {}",
            parameter.values.len(),
            parameter_id,
            generated_id
        );
        Ok(identity::resolve(parameter.values, generated_id))
    }
}

fn value_path(parameter_id: i64) -> String {
    format!("{}/value", Parameter::resource_path(parameter_id))
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parameter_wire_shape() {
        let parameter: Parameter = serde_json::from_value(json!({
            "id": 12,
            "name": "DB host",
            "nrn": "organization=1:account=2:namespace=3:application=4",
            "type": "file",
            "encoding": "base64",
            "destination_path": "/etc/db.conf",
            "secret": true,
            "read_only": false,
            "values": [{
                "id": 100,
                "nrn": "organization=1:account=2:namespace=3:application=4",
                "value": "ZGI=",
                "dimensions": {"environment": "dev"},
                "created_at": "2024-03-01T10:00:00Z"
            }]
        }))
        .unwrap();

        assert_eq!(parameter.parameter_type, ParameterType::File);
        assert_eq!(parameter.encoding, ParameterEncoding::Base64);
        assert!(parameter.variable.is_none());
        assert_eq!(parameter.values.len(), 1);
        assert_eq!(parameter.values[0].dimensions["environment"], "dev");
        assert!(parameter.values[0].created_at.is_some());
    }

    #[test]
    fn null_values_list_is_empty() {
        let parameter: Parameter = serde_json::from_value(json!({
            "id": 1,
            "name": "X",
            "nrn": "organization=1",
            "values": null
        }))
        .unwrap();
        assert!(parameter.values.is_empty());
        assert_eq!(parameter.parameter_type, ParameterType::Environment);
    }

    #[test]
    fn value_request_omits_empty_dimensions() {
        let body = serde_json::to_value(CreateParameterValueRequest {
            nrn: "organization=1".to_string(),
            value: "".to_string(),
            dimensions: BTreeMap::new(),
            origin_version: None,
        })
        .unwrap();
        assert_eq!(body, json!({"nrn": "organization=1", "value": ""}));
    }

    #[test]
    fn type_and_encoding_parse_from_strings() {
        assert_eq!("file".parse::<ParameterType>(), Ok(ParameterType::File));
        assert!("secret".parse::<ParameterType>().is_err());
        assert_eq!(
            "plaintext".parse::<ParameterEncoding>(),
            Ok(ParameterEncoding::Plaintext)
        );
        assert_eq!(ParameterEncoding::Base64.as_str(), "base64");
    }
}
