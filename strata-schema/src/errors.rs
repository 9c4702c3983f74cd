use strata_core::ResourceError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SchemaError>;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Invalid descriptor set: {0}")]
    DescriptorValidation(String),

    #[error("Failed to decode protobuf: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Type not registered: {0}")]
    UnknownType(String),

    #[error("No protobuf format for media type {0}")]
    UnsupportedMediaType(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

impl From<prost_reflect::DescriptorError> for SchemaError {
    fn from(error: prost_reflect::DescriptorError) -> Self {
        SchemaError::DescriptorValidation(error.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        SchemaError::Serialization(error.to_string())
    }
}

impl From<serde_yaml::Error> for SchemaError {
    fn from(error: serde_yaml::Error) -> Self {
        SchemaError::Serialization(error.to_string())
    }
}

impl From<prost_reflect::text_format::ParseError> for SchemaError {
    fn from(error: prost_reflect::text_format::ParseError) -> Self {
        SchemaError::Serialization(error.to_string())
    }
}
