//! Built-in resource kinds and the providers that resolve their schemes.

mod bundle;
pub use bundle::{Bundle, BundleProvider, BundledResource};

mod delegating;
pub use delegating::DelegatingResource;

mod empty;
pub use empty::{EmptyProvider, EmptyResource};

mod logging;
pub use logging::LoggingResource;

mod null;
pub use null::{NullProvider, NullResource};

mod string;
pub use string::{StringProvider, StringResource};

use strata_core::{MediaType, Result, Uri};

/// The media type carried by `uri`, or `default()` when it has none.
pub(crate) fn media_type_of(uri: &Uri, default: fn() -> MediaType) -> Result<MediaType> {
    Ok(uri.media_type()?.unwrap_or_else(default))
}
