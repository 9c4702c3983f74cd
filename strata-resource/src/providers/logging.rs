use std::fmt;

use strata_core::{Access, Capability, MediaType, Result, Uri};
use tracing::debug;

use super::DelegatingResource;
use crate::resource::Resource;
use crate::source::{ByteSink, ByteSource, CharSink, CharSource};

/// Emits a `tracing` event whenever a stream of the wrapped resource is
/// opened; otherwise behaves exactly like it.
#[derive(Debug, Clone)]
pub struct LoggingResource<R = Box<dyn Resource>> {
    inner: DelegatingResource<R>,
}

impl<R: Resource> LoggingResource<R> {
    pub fn new(delegate: R) -> Self {
        LoggingResource {
            inner: DelegatingResource::new(delegate),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn logged_source(&self, source: &ByteSource, direction: &'static str) -> ByteSource {
        let source = source.clone();
        let uri = self.uri().to_string();
        ByteSource::new(move || {
            debug!(uri = %uri, direction, "opening stream");
            source.open_stream()
        })
    }

    fn logged_sink(&self, sink: &ByteSink, direction: &'static str) -> ByteSink {
        let sink = sink.clone();
        let uri = self.uri().to_string();
        ByteSink::new(move || {
            debug!(uri = %uri, direction, "opening stream");
            sink.open_stream()
        })
    }
}

impl<R: Resource> Resource for LoggingResource<R> {
    fn uri(&self) -> &Uri {
        self.inner.uri()
    }

    fn media_type(&self) -> &MediaType {
        self.inner.media_type()
    }

    fn access(&self) -> Access {
        self.inner.access()
    }

    fn supports(&self, capability: Capability) -> bool {
        self.inner.supports(capability)
    }

    fn byte_source(&self) -> Result<ByteSource> {
        let source = self.inner.byte_source()?;
        Ok(self.logged_source(&source, "byte read"))
    }

    fn byte_sink(&self) -> Result<ByteSink> {
        let sink = self.inner.byte_sink()?;
        Ok(self.logged_sink(&sink, "byte write"))
    }

    fn char_source(&self) -> Result<CharSource> {
        let source = self.inner.char_source()?;
        Ok(CharSource::new(
            self.logged_source(source.byte_source(), "char read"),
            source.charset(),
        ))
    }

    fn char_sink(&self) -> Result<CharSink> {
        let sink = self.inner.char_sink()?;
        Ok(CharSink::new(
            self.logged_sink(sink.byte_sink(), "char write"),
            sink.charset(),
        ))
    }
}

impl<R: Resource> fmt::Display for LoggingResource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
