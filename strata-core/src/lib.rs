//! Shared types for the Strata resource layer and type registry.

mod capability;
pub use capability::{Access, Capability};

mod errors;
pub use errors::{ResourceError, Result};

pub mod media_type;
pub use media_type::{Charset, MediaType};

pub mod uri;
pub use uri::{Uri, UriBuilder, MEDIA_TYPE_PARAM};
