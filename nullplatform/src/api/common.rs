//! Common types and utilities for the nullplatform API

use serde::{Deserialize, Deserializer};

/// Error body returned by the backend on non-success responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: code={code:?}, errors={errors:?}")]
pub struct ApiErrorDetails {
    pub code: Option<String>,
    pub errors: Option<Vec<String>>,
}

/// Status value the backend uses for soft-deleted entities
pub const DELETED_STATUS: &str = "deleted";

pub trait NullplatformApiResource: Sized {
    fn api_path() -> &'static str;

    fn resource_path(id: i64) -> String {
        format!("{}/{}", Self::api_path(), id)
    }
}

/// Deserializes `null` as the type's default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
