use std::fmt;
use std::sync::Arc;

use strata_core::{Access, MediaType, Result, Uri};

use super::media_type_of;
use crate::registry::ResourceProvider;
use crate::resource::Resource;
use crate::source::ByteSource;

/// Read-only resource whose content is a string, e.g. `string:hello`.
#[derive(Debug, Clone)]
pub struct StringResource {
    uri: Uri,
    media_type: MediaType,
    text: Arc<str>,
}

impl StringResource {
    pub const SCHEME: &'static str = "string";

    /// Plain UTF-8 text.
    pub fn of(text: &str) -> Self {
        Self::new(text, MediaType::plain_text_utf8())
    }

    pub fn new(text: &str, media_type: MediaType) -> Self {
        StringResource {
            uri: Uri::scheme_only(Self::SCHEME)
                .with_authority(text)
                .with_media_type(&media_type),
            media_type,
            text: Arc::from(text),
        }
    }

    fn from_uri(uri: &Uri) -> Result<Self> {
        Ok(StringResource {
            media_type: media_type_of(uri, MediaType::plain_text_utf8)?,
            text: Arc::from(uri.location()),
            uri: uri.clone(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Resource for StringResource {
    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn access(&self) -> Access {
        Access::ReadOnly
    }

    fn byte_source(&self) -> Result<ByteSource> {
        Ok(ByteSource::wrap(self.text.as_bytes()))
    }
}

impl fmt::Display for StringResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StringResource{{uri={}, mediaType={}}}",
            self.uri, self.media_type
        )
    }
}

/// Resolves `string:` URIs; the content is the URI's location.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringProvider;

impl ResourceProvider for StringProvider {
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        Ok(Box::new(StringResource::from_uri(uri)?))
    }
}
