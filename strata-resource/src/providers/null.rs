use std::fmt;
use std::io;

use strata_core::{Access, MediaType, Result, Uri};

use super::media_type_of;
use crate::registry::ResourceProvider;
use crate::resource::Resource;
use crate::source::{ByteReader, ByteSink, ByteSource};

/// Read-write resource that reads endless zero bytes and discards writes,
/// like `/dev/zero` and `/dev/null` combined.
#[derive(Debug, Clone)]
pub struct NullResource {
    uri: Uri,
    media_type: MediaType,
}

impl NullResource {
    pub const SCHEME: &'static str = "null";

    pub fn new(media_type: MediaType) -> Self {
        NullResource {
            uri: Uri::scheme_only(Self::SCHEME).with_media_type(&media_type),
            media_type,
        }
    }
}

impl Resource for NullResource {
    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn access(&self) -> Access {
        Access::ReadWrite
    }

    /// Streams never end; read them with a bound.
    fn byte_source(&self) -> Result<ByteSource> {
        Ok(ByteSource::new(|| Ok(Box::new(io::repeat(0)) as ByteReader)))
    }

    fn byte_sink(&self) -> Result<ByteSink> {
        Ok(ByteSink::discarding())
    }
}

impl fmt::Display for NullResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NullResource{{uri={}, mediaType={}}}",
            self.uri, self.media_type
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl ResourceProvider for NullProvider {
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let media_type = media_type_of(uri, MediaType::octet_stream)?;
        Ok(Box::new(NullResource::new(media_type)))
    }
}
