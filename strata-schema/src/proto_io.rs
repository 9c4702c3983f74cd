use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor, ReflectMessage, SerializeOptions};
use strata_core::MediaType;
use strata_resource::Resource;
use tracing::debug;

use crate::errors::{Result, SchemaError};
use crate::type_registry::TypeRegistry;

/// Wire and text encodings of protobuf messages, chosen by media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtoFormat {
    Binary,
    Json,
    Yaml,
    Text,
}

impl ProtoFormat {
    /// Only the essence of `media_type` is considered; parameters such as
    /// `charset` are ignored.
    pub fn for_media_type(media_type: &MediaType) -> Result<Self> {
        match media_type.essence().as_str() {
            "application/protobuf" | "application/x-protobuf" => Ok(ProtoFormat::Binary),
            "application/json" => Ok(ProtoFormat::Json),
            "application/yaml" => Ok(ProtoFormat::Yaml),
            "text/protobuf" => Ok(ProtoFormat::Text),
            _ => Err(SchemaError::UnsupportedMediaType(media_type.to_string())),
        }
    }
}

/// Reads and writes messages of a [`TypeRegistry`] through resources.
///
/// Messages are converted into the registry's own descriptors before they are
/// written, so `google.protobuf.Any` payloads are expanded (in JSON, YAML and
/// text format) with whatever the registry knows.
#[derive(Debug, Clone)]
pub struct ProtoIo {
    registry: TypeRegistry,
}

impl ProtoIo {
    pub fn new(registry: TypeRegistry) -> Self {
        ProtoIo { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn write<M: ReflectMessage>(&self, message: &M, resource: &dyn Resource) -> Result<()> {
        let format = ProtoFormat::for_media_type(resource.media_type())?;
        let descriptor = self.descriptor(message.descriptor().full_name())?;
        let mut dynamic = DynamicMessage::new(descriptor);
        dynamic.transcode_from(message)?;

        debug!(uri = %resource.uri(), message = %dynamic.descriptor().full_name(), ?format, "writing message");
        match format {
            ProtoFormat::Binary => resource.byte_sink()?.write(&dynamic.encode_to_vec())?,
            ProtoFormat::Json => {
                let json = serde_json::to_string_pretty(&to_value(&dynamic)?)?;
                resource.char_sink()?.write(&json)?;
            }
            ProtoFormat::Yaml => {
                let yaml = serde_yaml::to_string(&to_value(&dynamic)?)?;
                resource.char_sink()?.write(&yaml)?;
            }
            ProtoFormat::Text => resource.char_sink()?.write(&dynamic.to_text_format())?,
        }
        Ok(())
    }

    /// Reads a `message_name` message in the format of the resource's media type.
    pub fn read(&self, resource: &dyn Resource, message_name: &str) -> Result<DynamicMessage> {
        let format = ProtoFormat::for_media_type(resource.media_type())?;
        let descriptor = self.descriptor(message_name)?;

        debug!(uri = %resource.uri(), message = %message_name, ?format, "reading message");
        let message = match format {
            ProtoFormat::Binary => {
                DynamicMessage::decode(descriptor, resource.byte_source()?.read()?.as_slice())?
            }
            ProtoFormat::Json => {
                let text = resource.char_source()?.read()?;
                let mut deserializer = serde_json::Deserializer::from_str(&text);
                let message = DynamicMessage::deserialize(descriptor, &mut deserializer)?;
                deserializer.end()?;
                message
            }
            ProtoFormat::Yaml => {
                let text = resource.char_source()?.read()?;
                DynamicMessage::deserialize(descriptor, serde_yaml::Deserializer::from_str(&text))?
            }
            ProtoFormat::Text => {
                let text = resource.char_source()?.read()?;
                DynamicMessage::parse_text_format(descriptor, &text)?
            }
        };
        Ok(message)
    }

    fn descriptor(&self, name: &str) -> Result<MessageDescriptor> {
        self.registry
            .find_message(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_owned()))
    }
}

fn to_value(message: &DynamicMessage) -> Result<serde_json::Value> {
    Ok(message.serialize_with_options(serde_json::value::Serializer, &SerializeOptions::new())?)
}
