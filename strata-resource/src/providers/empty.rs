use std::fmt;

use once_cell::sync::OnceCell;
use strata_core::{Access, Charset, MediaType, Result, Uri};

use super::media_type_of;
use crate::registry::ResourceProvider;
use crate::resource::Resource;
use crate::source::{ByteSource, CharSource};

type UriSupplier = Box<dyn Fn() -> Uri + Send + Sync>;

/// Read-only resource that is always at end-of-stream.
///
/// Like reading `/dev/null`, but writing is unsupported rather than
/// discarded; see [`NullResource`](super::NullResource) for a resource that
/// reads endless zeros and swallows writes.
pub struct EmptyResource {
    media_type: MediaType,
    uri: OnceCell<Uri>,
    uri_supplier: Option<UriSupplier>,
}

impl EmptyResource {
    pub const SCHEME: &'static str = "empty";

    /// An empty resource identified by `empty:?mediaType=…`.
    pub fn new(media_type: MediaType) -> Self {
        EmptyResource {
            uri: OnceCell::with_value(Self::default_uri(&media_type)),
            media_type,
            uri_supplier: None,
        }
    }

    /// An empty resource whose URI is computed by `supplier` on first use.
    ///
    /// The result is cached for the lifetime of the resource. Concurrent
    /// first uses may both call the supplier; only one result is kept, so the
    /// supplier should return equal URIs.
    pub fn with_uri_supplier<F>(media_type: MediaType, supplier: F) -> Self
    where
        F: Fn() -> Uri + Send + Sync + 'static,
    {
        EmptyResource {
            media_type,
            uri: OnceCell::new(),
            uri_supplier: Some(Box::new(supplier)),
        }
    }

    fn default_uri(media_type: &MediaType) -> Uri {
        Uri::scheme_only(Self::SCHEME).with_media_type(media_type)
    }

    fn charset(&self) -> Charset {
        Charset::for_media_type(&self.media_type).unwrap_or(Charset::Utf8)
    }
}

impl Resource for EmptyResource {
    fn uri(&self) -> &Uri {
        self.uri.get_or_init(|| match &self.uri_supplier {
            Some(supplier) => supplier(),
            None => Self::default_uri(&self.media_type),
        })
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn access(&self) -> Access {
        Access::ReadOnly
    }

    fn byte_source(&self) -> Result<ByteSource> {
        Ok(ByteSource::empty())
    }

    fn char_source(&self) -> Result<CharSource> {
        Ok(ByteSource::empty().as_char_source(self.charset()))
    }
}

impl fmt::Debug for EmptyResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmptyResource")
            .field("uri", &self.uri.get())
            .field("media_type", &self.media_type)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for EmptyResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EmptyResource{{uri={}, mediaType={}}}",
            self.uri(),
            self.media_type
        )
    }
}

/// Resolves `empty:` URIs; the resource keeps the requested URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyProvider;

impl ResourceProvider for EmptyProvider {
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let media_type = media_type_of(uri, MediaType::octet_stream)?;
        let uri = uri.clone();
        Ok(Box::new(EmptyResource::with_uri_supplier(
            media_type,
            move || uri.clone(),
        )))
    }
}
