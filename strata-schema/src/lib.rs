//! Protobuf type registries assembled from descriptor closures.
//!
//! A [`TypeRegistryWrapper`] collects file descriptors together with all
//! their imports, deduplicated by file name, and can be exported to and
//! rebuilt from a single `FileDescriptorSet` blob. Its [`TypeRegistry`]
//! resolves every declared type name, which [`ProtoIo`] uses to read and
//! write messages (including `Any` payloads) through resources.

mod errors;
pub use errors::{Result, SchemaError};

mod proto_io;
pub use proto_io::{ProtoFormat, ProtoIo};

mod type_registry;
pub use type_registry::{TypeDescriptor, TypeRegistry};

mod wrapper;
pub use wrapper::{TypeRegistryWrapper, TypeRegistryWrapperBuilder};
