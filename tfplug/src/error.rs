//! Error types for tfplug

/// Error type for tfplug operations
#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("Resource type not found: {0}")]
    ResourceNotFound(String),

    #[error("Data source type not found: {0}")]
    DataSourceNotFound(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Missing required attribute '{0}'")]
    MissingAttribute(String),

    #[error("Type mismatch for '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    Custom(String),
}

impl TfplugError {
    /// Attribute the error refers to, if any
    pub fn attribute(&self) -> Option<&str> {
        match self {
            TfplugError::MissingAttribute(name) => Some(name),
            TfplugError::TypeMismatch { attribute, .. } => Some(attribute),
            _ => None,
        }
    }
}

/// Result type alias for tfplug operations
pub type Result<T> = std::result::Result<T, TfplugError>;

impl From<String> for TfplugError {
    fn from(s: String) -> Self {
        TfplugError::Custom(s)
    }
}

impl From<&str> for TfplugError {
    fn from(s: &str) -> Self {
        TfplugError::Custom(s.to_string())
    }
}
