mod common;

use std::io::Read;

use common::*;
use strata_resource::{
    Access, BundledResource, Capability, DelegatingResource, EmptyResource, LoggingResource,
    MediaType, Resource, StringResource,
};
use tracing_test::traced_test;

/// **What:** reads an empty resource with buffers of many sizes.
/// **Why:** the empty resource stands in for "no content" everywhere, so
/// every read must report end-of-stream immediately, however it is asked.
#[test]
fn empty_resource_reads_nothing_for_any_buffer() -> anyhow::Result<()> {
    let resource = EmptyResource::new(MediaType::plain_text_utf8());
    let source = resource.byte_source()?;
    for len in [1usize, 2, 3, 128, 1 << 16] {
        let mut buffer = vec![0u8; len];
        assert_eq!(source.open_stream()?.read(&mut buffer)?, 0);
    }
    let mut line = String::new();
    assert_eq!(
        std::io::BufRead::read_line(&mut resource.char_source()?.open_stream()?, &mut line)?,
        0
    );
    assert_eq!(resource.uri().to_string().split('?').next(), Some("empty:"));
    Ok(())
}

/// **What:** compares every accessor of a delegating wrapper with the
/// resource it wraps.
/// **Why:** decorators are only safe to stack if the plain delegate is
/// indistinguishable from what it wraps.
#[test]
fn delegating_resource_is_transparent() -> anyhow::Result<()> {
    let bundle = fixture_bundle();
    let inner = BundledResource::read_write(&bundle, "scratch.txt", MediaType::plain_text_utf8());
    inner.char_sink()?.write("scratch")?;
    let wrapped = DelegatingResource::new(inner.clone());

    assert_eq!(wrapped.uri(), inner.uri());
    assert_eq!(wrapped.media_type(), inner.media_type());
    assert_eq!(wrapped.access(), inner.access());
    assert_eq!(wrapped.to_string(), inner.to_string());
    for capability in [
        Capability::ByteRead,
        Capability::ByteWrite,
        Capability::CharRead,
        Capability::CharWrite,
    ] {
        assert_eq!(wrapped.supports(capability), inner.supports(capability));
    }
    assert_eq!(wrapped.byte_source()?.read()?, inner.byte_source()?.read()?);
    assert_eq!(wrapped.char_source()?.read()?, "scratch");

    wrapped.byte_sink()?.write(b"through wrapper")?;
    assert_eq!(inner.char_source()?.read()?, "through wrapper");
    wrapped.char_sink()?.write("again")?;
    assert_eq!(bundle.get("scratch.txt").as_deref(), Some(b"again".as_slice()));
    Ok(())
}

/// **What:** wraps a boxed, read-only resource in a delegating wrapper.
/// **Why:** resolved resources are trait objects; refusals must pass through
/// unchanged.
#[test]
fn delegating_boxed_resource_keeps_refusals() {
    let inner: Box<dyn Resource> = Box::new(StringResource::of("fixed"));
    let expected = inner.to_string();
    let wrapped: DelegatingResource = DelegatingResource::new(inner);

    assert_eq!(wrapped.access(), Access::ReadOnly);
    assert_eq!(wrapped.to_string(), expected);
    assert!(wrapped.byte_sink().is_err());
    assert!(wrapped.char_sink().is_err());
    assert_eq!(wrapped.into_inner().char_source().unwrap().read().unwrap(), "fixed");
}

/// **What:** opens streams through a logging wrapper.
/// **Why:** stream opening is the one observable side effect of resources
/// and has to show up in the trace with the resource URI.
#[test]
#[traced_test]
fn logging_resource_traces_stream_opening() -> anyhow::Result<()> {
    let providers = builtin_providers();
    let resource = LoggingResource::new(providers.get_resource(&uri("classpath:greeting.txt"))?);

    let source = resource.char_source()?;
    assert!(!logs_contain("opening stream"));
    assert_eq!(source.read()?, "hello from the bundle\n");
    assert!(logs_contain("opening stream"));
    assert!(logs_contain("char read"));
    assert!(logs_contain("classpath:"));

    assert!(resource.byte_sink().is_err());
    assert_eq!(
        resource.to_string(),
        format!(
            "BundledResource{{uri={}, mediaType=application/octet-stream}}",
            resource.uri()
        )
    );
    Ok(())
}

/// **What:** loads the embedded fixture directory into a bundle.
/// **Why:** applications ship their default content with `include_dir!`;
/// nested directories must keep their relative paths.
#[test]
fn embedded_fixtures_are_bundled() -> anyhow::Result<()> {
    let bundle = fixture_bundle();
    assert_eq!(bundle.len(), 2);
    assert!(bundle.contains("greeting.txt"));
    assert!(bundle.contains("/models/demo.yaml"));

    let demo = BundledResource::read_only(&bundle, "models/demo.yaml", MediaType::yaml_utf8())?;
    assert_eq!(demo.char_source()?.read()?, "kind: demo\nversion: 1\n");
    Ok(())
}
