use std::fmt;
use std::sync::Arc;

use strata_core::{Access, Capability, Charset, MediaType, ResourceError, Result, Uri};

use crate::source::{ByteSink, ByteSource, CharSink, CharSource};

/// A URI-identified, media-typed handle exposing some of the four stream
/// capabilities.
///
/// A resource is a reusable factory of streams, not a stream itself: every
/// accessor may be called any number of times and hands back an independent
/// source or sink. Accessors for capabilities outside [`Resource::access`]
/// fail with [`ResourceError::UnsupportedCapability`].
pub trait Resource: fmt::Debug + fmt::Display + Send + Sync {
    fn uri(&self) -> &Uri;

    fn media_type(&self) -> &MediaType;

    fn access(&self) -> Access;

    fn supports(&self, capability: Capability) -> bool {
        self.access().supports(capability)
    }

    fn byte_source(&self) -> Result<ByteSource> {
        Err(ResourceError::unsupported_capability(
            self.uri(),
            Capability::ByteRead,
        ))
    }

    fn byte_sink(&self) -> Result<ByteSink> {
        Err(ResourceError::unsupported_capability(
            self.uri(),
            Capability::ByteWrite,
        ))
    }

    /// Defaults to [`Resource::byte_source`] decoded with the media type's charset.
    fn char_source(&self) -> Result<CharSource> {
        if !self.supports(Capability::CharRead) {
            return Err(ResourceError::unsupported_capability(
                self.uri(),
                Capability::CharRead,
            ));
        }
        let charset = Charset::for_media_type(self.media_type())?;
        Ok(self.byte_source()?.as_char_source(charset))
    }

    /// Defaults to [`Resource::byte_sink`] encoded with the media type's charset.
    fn char_sink(&self) -> Result<CharSink> {
        if !self.supports(Capability::CharWrite) {
            return Err(ResourceError::unsupported_capability(
                self.uri(),
                Capability::CharWrite,
            ));
        }
        let charset = Charset::for_media_type(self.media_type())?;
        Ok(self.byte_sink()?.as_char_sink(charset))
    }
}

macro_rules! forward_resource {
    ($pointer:ident) => {
        impl<R: Resource + ?Sized> Resource for $pointer<R> {
            fn uri(&self) -> &Uri {
                (**self).uri()
            }

            fn media_type(&self) -> &MediaType {
                (**self).media_type()
            }

            fn access(&self) -> Access {
                (**self).access()
            }

            fn supports(&self, capability: Capability) -> bool {
                (**self).supports(capability)
            }

            fn byte_source(&self) -> Result<ByteSource> {
                (**self).byte_source()
            }

            fn byte_sink(&self) -> Result<ByteSink> {
                (**self).byte_sink()
            }

            fn char_source(&self) -> Result<CharSource> {
                (**self).char_source()
            }

            fn char_sink(&self) -> Result<CharSink> {
                (**self).char_sink()
            }
        }
    };
}

forward_resource!(Box);
forward_resource!(Arc);
