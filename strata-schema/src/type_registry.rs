use prost_reflect::{DescriptorPool, EnumDescriptor, MessageDescriptor};

/// A message or enum type known to a [`TypeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Message(MessageDescriptor),
    Enum(EnumDescriptor),
}

impl TypeDescriptor {
    pub fn full_name(&self) -> &str {
        match self {
            TypeDescriptor::Message(message) => message.full_name(),
            TypeDescriptor::Enum(enumeration) => enumeration.full_name(),
        }
    }
}

/// Read-only lookup of fully-qualified type names to their descriptors.
///
/// Lookups are pure; clones share the same descriptor pool.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    pool: DescriptorPool,
}

impl TypeRegistry {
    pub(crate) fn new(pool: DescriptorPool) -> Self {
        TypeRegistry { pool }
    }

    pub fn find(&self, name: &str) -> Option<TypeDescriptor> {
        self.find_message(name)
            .map(TypeDescriptor::Message)
            .or_else(|| self.find_enum(name).map(TypeDescriptor::Enum))
    }

    pub fn find_message(&self, name: &str) -> Option<MessageDescriptor> {
        self.pool.get_message_by_name(name)
    }

    pub fn find_enum(&self, name: &str) -> Option<EnumDescriptor> {
        self.pool.get_enum_by_name(name)
    }

    /// Resolves the message named by an `Any` type URL, such as
    /// `type.googleapis.com/google.protobuf.Timestamp`.
    pub fn find_by_type_url(&self, type_url: &str) -> Option<MessageDescriptor> {
        let name = type_url.rsplit_once('/').map_or(type_url, |(_, name)| name);
        self.find_message(name)
    }

    pub fn descriptor_pool(&self) -> &DescriptorPool {
        &self.pool
    }
}
