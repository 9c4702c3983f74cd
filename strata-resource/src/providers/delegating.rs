use std::fmt;

use strata_core::{Access, Capability, MediaType, Result, Uri};

use crate::resource::Resource;
use crate::source::{ByteSink, ByteSource, CharSink, CharSource};

/// Forwards every accessor, and its string form, to the wrapped resource.
///
/// Decorators hold a `DelegatingResource` and implement [`Resource`] by
/// forwarding to it, replacing only the accessors they change.
#[derive(Debug, Clone)]
pub struct DelegatingResource<R = Box<dyn Resource>> {
    delegate: R,
}

impl<R: Resource> DelegatingResource<R> {
    pub fn new(delegate: R) -> Self {
        DelegatingResource { delegate }
    }

    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    pub fn into_inner(self) -> R {
        self.delegate
    }
}

impl<R: Resource> Resource for DelegatingResource<R> {
    fn uri(&self) -> &Uri {
        self.delegate.uri()
    }

    fn media_type(&self) -> &MediaType {
        self.delegate.media_type()
    }

    fn access(&self) -> Access {
        self.delegate.access()
    }

    fn supports(&self, capability: Capability) -> bool {
        self.delegate.supports(capability)
    }

    fn byte_source(&self) -> Result<ByteSource> {
        self.delegate.byte_source()
    }

    fn byte_sink(&self) -> Result<ByteSink> {
        self.delegate.byte_sink()
    }

    fn char_source(&self) -> Result<CharSource> {
        self.delegate.char_source()
    }

    fn char_sink(&self) -> Result<CharSink> {
        self.delegate.char_sink()
    }
}

impl<R: Resource> fmt::Display for DelegatingResource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.delegate, f)
    }
}
