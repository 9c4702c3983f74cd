//! URI-addressed resources.
//!
//! A [`ResourceProviders`] registry maps URI schemes to [`ResourceProvider`]s;
//! resolving a [`Uri`] yields a [`Resource`], a media-typed factory of byte
//! and character streams. Built-in kinds cover bundled content
//! (`classpath:`), always-empty (`empty:`), zero/discard (`null:`) and
//! inline text (`string:`) resources, plus the delegating decorators.

pub mod config;
pub use config::ResourceConfig;

pub mod providers;
pub use providers::{
    Bundle, BundledResource, DelegatingResource, EmptyResource, LoggingResource, NullResource,
    StringResource,
};

mod registry;
pub use registry::{ResourceProvider, ResourceProviders};

mod resource;
pub use resource::Resource;

pub mod source;
pub use source::{ByteSink, ByteSource, CharSink, CharSource};

pub use strata_core::{
    Access, Capability, Charset, MediaType, ResourceError, Result, Uri, UriBuilder,
};
