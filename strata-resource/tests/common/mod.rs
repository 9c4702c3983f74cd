#![allow(dead_code)]

use include_dir::{include_dir, Dir};
use strata_resource::{Bundle, ResourceProviders, Uri};

pub static FIXTURES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/tests/fixtures");

/// Bundle holding every file under `tests/fixtures`.
pub fn fixture_bundle() -> Bundle {
    Bundle::from_embedded(&FIXTURES)
}

/// Registry with the built-in schemes over the fixture bundle.
pub fn builtin_providers() -> ResourceProviders {
    ResourceProviders::with_builtins(fixture_bundle())
}

pub fn uri(text: &str) -> Uri {
    Uri::parse(text).expect("valid test uri")
}
