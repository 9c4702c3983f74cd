use thiserror::Error;

use crate::capability::Capability;

pub type Result<T> = std::result::Result<T, ResourceError>;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Invalid URI '{input}': {reason}")]
    InvalidUri { input: String, reason: String },

    #[error("Invalid media type '{0}'")]
    InvalidMediaType(String),

    #[error("No resource provider registered for scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Resource {uri} does not support {capability}")]
    UnsupportedCapability { uri: String, capability: Capability },

    #[error("Unsupported charset '{0}'")]
    UnsupportedCharset(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Resource I/O error: {0}")]
    ResourceIo(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResourceError {
    pub(crate) fn invalid_uri(input: &str, reason: impl Into<String>) -> Self {
        ResourceError::InvalidUri {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_capability(uri: impl ToString, capability: Capability) -> Self {
        ResourceError::UnsupportedCapability {
            uri: uri.to_string(),
            capability,
        }
    }
}
