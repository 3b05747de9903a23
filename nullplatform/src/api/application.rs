//! Application and scope API implementation (read only)

use serde::{Deserialize, Serialize};

use super::common::{NullplatformApiResource, DELETED_STATUS};
use super::{ApiError, Client};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub nrn: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub namespace_id: Option<i64>,
    #[serde(default)]
    pub repository_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub id: i64,
    pub name: String,
    pub nrn: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub application_id: Option<i64>,
}

impl NullplatformApiResource for Application {
    fn api_path() -> &'static str {
        "/application"
    }
}

impl NullplatformApiResource for Scope {
    fn api_path() -> &'static str {
        "/scope"
    }
}

/// Soft-deleted entities keep answering GET with `status: deleted`
pub trait SoftDeletable {
    fn status(&self) -> Option<&str>;

    fn is_deleted(&self) -> bool {
        self.status() == Some(DELETED_STATUS)
    }
}

impl SoftDeletable for Application {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

impl SoftDeletable for Scope {
    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Applications API for application and scope lookups
pub struct ApplicationsApi<'a> {
    client: &'a Client,
}

impl<'a> ApplicationsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /application/{id}
    pub async fn get(&self, id: i64) -> Result<Application, ApiError> {
        self.client.get(&Application::resource_path(id)).await
    }

    /// GET /scope/{id}
    pub async fn get_scope(&self, id: i64) -> Result<Scope, ApiError> {
        self.client.get(&Scope::resource_path(id)).await
    }
}
