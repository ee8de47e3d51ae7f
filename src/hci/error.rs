//! Error types for HCI API calls and resource operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HciError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("Error {operation} network ACL rule {rule_number}: {source}")]
    Operation {
        operation: &'static str,
        rule_number: String,
        #[source]
        source: Box<HciError>,
    },
}

impl HciError {
    pub fn validation(message: impl Into<String>) -> Self {
        HciError::Validation(message.into())
    }

    /// Wrap an API failure with the lifecycle operation and rule number
    pub fn operation(operation: &'static str, rule_number: &str, source: HciError) -> Self {
        HciError::Operation {
            operation,
            rule_number: rule_number.to_string(),
            source: Box::new(source),
        }
    }

    /// True when the server reported that the referenced resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            HciError::NotFound { .. } => true,
            HciError::Api { status, .. } => *status == 404,
            HciError::Operation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HciError::Validation(_))
    }
}
