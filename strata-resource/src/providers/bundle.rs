use std::fmt;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use include_dir::Dir;
use strata_core::{Access, MediaType, ResourceError, Result, Uri};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::media_type_of;
use crate::registry::ResourceProvider;
use crate::resource::Resource;
use crate::source::{ByteReader, ByteSink, ByteSource, ByteWriter};

/// In-memory content store behind `classpath:` resources.
///
/// Entries are keyed by relative, `/`-separated paths. Clones share the same
/// entries, so content written through a read-write resource is visible to
/// every resource resolved from the same bundle.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    entries: Arc<DashMap<String, Arc<[u8]>>>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle holding every file of a directory embedded with `include_dir!`.
    pub fn from_embedded(dir: &Dir<'_>) -> Self {
        let bundle = Bundle::new();
        bundle.add_embedded("", dir);
        bundle
    }

    /// Adds the files of an embedded directory under `prefix`.
    pub fn add_embedded(&self, prefix: &str, dir: &Dir<'_>) -> usize {
        let mut added = 0;
        for file in dir.files() {
            let relative = file.path().to_string_lossy();
            self.insert(&join(prefix, &relative), file.contents());
            added += 1;
        }
        for subdir in dir.dirs() {
            added += self.add_embedded(prefix, subdir);
        }
        added
    }

    /// Copies every file below `dir` into the bundle, under `prefix`.
    pub fn load_dir(&self, prefix: &str, dir: &Path) -> Result<usize> {
        let mut loaded = 0;
        for entry in WalkDir::new(dir) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
                .to_string_lossy()
                .into_owned();
            self.insert(&join(prefix, &relative), fs::read(entry.path())?);
            loaded += 1;
        }
        info!(dir = %dir.display(), prefix = %prefix, files = loaded, "loaded directory into bundle");
        Ok(loaded)
    }

    pub fn insert(&self, path: &str, contents: impl Into<Arc<[u8]>>) {
        self.entries.insert(normalize(path), contents.into());
    }

    pub fn get(&self, path: &str) -> Option<Arc<[u8]>> {
        self.entries
            .get(&normalize(path))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(&normalize(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").trim_start_matches('/').to_string()
}

fn join(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", prefix, relative)
    }
}

/// A resource backed by an entry of a [`Bundle`].
///
/// The media type is whatever the caller supplies; it is not guessed from
/// the path's extension.
#[derive(Debug, Clone)]
pub struct BundledResource {
    uri: Uri,
    media_type: MediaType,
    bundle: Bundle,
    path: String,
    access: Access,
}

impl BundledResource {
    pub const SCHEME: &'static str = "classpath";

    /// Fails with [`ResourceError::ResourceNotFound`] if `path` is not in the bundle.
    pub fn read_only(bundle: &Bundle, path: &str, media_type: MediaType) -> Result<Self> {
        let uri = Uri::scheme_only(Self::SCHEME).with_path(path);
        Self::open(bundle, uri, path, media_type, Access::ReadOnly)
    }

    /// The entry does not have to exist yet; writing creates it.
    pub fn read_write(bundle: &Bundle, path: &str, media_type: MediaType) -> Self {
        BundledResource {
            uri: Uri::scheme_only(Self::SCHEME).with_path(path),
            media_type,
            bundle: bundle.clone(),
            path: normalize(path),
            access: Access::ReadWrite,
        }
    }

    fn open(
        bundle: &Bundle,
        uri: Uri,
        path: &str,
        media_type: MediaType,
        access: Access,
    ) -> Result<Self> {
        if access == Access::ReadOnly && !bundle.contains(path) {
            return Err(ResourceError::ResourceNotFound(uri.to_string()));
        }
        Ok(BundledResource {
            uri,
            media_type,
            bundle: bundle.clone(),
            path: normalize(path),
            access,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Resource for BundledResource {
    fn uri(&self) -> &Uri {
        &self.uri
    }

    fn media_type(&self) -> &MediaType {
        &self.media_type
    }

    fn access(&self) -> Access {
        self.access
    }

    fn byte_source(&self) -> Result<ByteSource> {
        let bundle = self.bundle.clone();
        let path = self.path.clone();
        let uri = self.uri.to_string();
        Ok(ByteSource::new(move || {
            let contents = bundle
                .get(&path)
                .ok_or_else(|| ResourceError::ResourceNotFound(uri.clone()))?;
            Ok(Box::new(Cursor::new(contents)) as ByteReader)
        }))
    }

    fn byte_sink(&self) -> Result<ByteSink> {
        if !self.access.is_writable() {
            return Err(ResourceError::unsupported_capability(
                &self.uri,
                strata_core::Capability::ByteWrite,
            ));
        }
        let bundle = self.bundle.clone();
        let path = self.path.clone();
        Ok(ByteSink::new(move || {
            Ok(Box::new(BundleWriter {
                bundle: bundle.clone(),
                path: path.clone(),
                buffer: Vec::new(),
                pending: false,
            }) as ByteWriter)
        }))
    }
}

impl fmt::Display for BundledResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BundledResource{{uri={}, mediaType={}}}",
            self.uri, self.media_type
        )
    }
}

/// Buffers writes and stores them in the bundle on flush, replacing the
/// previous content of the entry. Bytes written after the last flush are
/// discarded when the stream is dropped.
struct BundleWriter {
    bundle: Bundle,
    path: String,
    buffer: Vec<u8>,
    pending: bool,
}

impl Write for BundleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.pending = true;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.bundle.insert(&self.path, self.buffer.as_slice());
        self.pending = false;
        debug!(path = %self.path, bytes = self.buffer.len(), "stored bundle entry");
        Ok(())
    }
}

impl Drop for BundleWriter {
    fn drop(&mut self) {
        if self.pending {
            debug!(path = %self.path, bytes = self.buffer.len(), "discarded unflushed bundle write");
        }
    }
}

/// Resolves `classpath:` URIs against a [`Bundle`].
///
/// The path is the URI's [`location`](Uri::location); the media type comes
/// from the URI's `mediaType` parameter, defaulting to
/// `application/octet-stream`.
#[derive(Debug, Clone)]
pub struct BundleProvider {
    bundle: Bundle,
    writable: bool,
}

impl BundleProvider {
    pub fn new(bundle: Bundle) -> Self {
        BundleProvider {
            bundle,
            writable: false,
        }
    }

    /// Resolved resources are read-write and may name entries not yet present.
    pub fn writable(bundle: Bundle) -> Self {
        BundleProvider {
            bundle,
            writable: true,
        }
    }
}

impl ResourceProvider for BundleProvider {
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let media_type = media_type_of(uri, MediaType::octet_stream)?;
        let access = if self.writable {
            Access::ReadWrite
        } else {
            Access::ReadOnly
        };
        let resource =
            BundledResource::open(&self.bundle, uri.clone(), &uri.location(), media_type, access)?;
        Ok(Box::new(resource))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Capability;

    fn bundle() -> Bundle {
        let bundle = Bundle::new();
        bundle.insert("models/demo.yaml", b"kind: demo\n".as_slice());
        bundle
    }

    #[test]
    fn read_only_requires_existing_entry() {
        let bundle = bundle();
        assert!(matches!(
            BundledResource::read_only(&bundle, "models/missing.yaml", MediaType::yaml_utf8()),
            Err(ResourceError::ResourceNotFound(_))
        ));

        let resource =
            BundledResource::read_only(&bundle, "/models/demo.yaml", MediaType::yaml_utf8())
                .unwrap();
        assert_eq!(resource.path(), "models/demo.yaml");
        assert_eq!(resource.uri().to_string(), "classpath:/models/demo.yaml");
        assert_eq!(resource.char_source().unwrap().read().unwrap(), "kind: demo\n");
        assert!(matches!(
            resource.byte_sink(),
            Err(ResourceError::UnsupportedCapability {
                capability: Capability::ByteWrite,
                ..
            })
        ));
        assert!(resource.char_sink().is_err());
    }

    #[test]
    fn read_write_creates_entries() {
        let bundle = bundle();
        let resource =
            BundledResource::read_write(&bundle, "out/result.txt", MediaType::plain_text_utf8());
        assert!(!bundle.contains("out/result.txt"));

        resource.char_sink().unwrap().write("first").unwrap();
        assert_eq!(resource.char_source().unwrap().read().unwrap(), "first");

        resource.byte_sink().unwrap().write(b"second").unwrap();
        assert_eq!(resource.byte_source().unwrap().read().unwrap(), b"second");
        assert_eq!(bundle.get("out/result.txt").as_deref(), Some(b"second".as_slice()));
    }

    #[test]
    fn abandoned_stream_leaves_entry_untouched() {
        let bundle = Bundle::new();
        bundle.insert("cfg.json", br#"{"ok":true}"#.as_slice());
        let resource = BundledResource::read_write(&bundle, "cfg.json", MediaType::json_utf8());
        {
            let mut stream = resource.byte_sink().unwrap().open_stream().unwrap();
            stream.write_all(br#"{"ok":"#).unwrap();
        }
        assert_eq!(bundle.get("cfg.json").as_deref(), Some(br#"{"ok":true}"#.as_slice()));

        let mut stream = resource.byte_sink().unwrap().open_stream().unwrap();
        stream.write_all(br#"{"ok":false}"#).unwrap();
        stream.flush().unwrap();
        drop(stream);
        assert_eq!(bundle.get("cfg.json").as_deref(), Some(br#"{"ok":false}"#.as_slice()));
    }

    #[test]
    fn provider_uses_uri_location_and_media_type() {
        let provider = BundleProvider::new(bundle());
        let uri = Uri::parse("classpath:models/demo.yaml?mediaType=application/yaml").unwrap();
        let resource = provider.get_resource(&uri).unwrap();
        assert_eq!(resource.uri(), &uri);
        assert_eq!(resource.media_type(), &MediaType::new("application", "yaml"));
        assert_eq!(resource.access(), Access::ReadOnly);

        let missing = Uri::parse("classpath:models/other.yaml").unwrap();
        assert!(matches!(
            provider.get_resource(&missing),
            Err(ResourceError::ResourceNotFound(_))
        ));
    }

    #[test]
    fn load_dir_mounts_files_under_prefix() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("top.txt"), "top").unwrap();
        fs::write(dir.path().join("nested/inner.txt"), "inner").unwrap();

        let bundle = Bundle::new();
        assert_eq!(bundle.load_dir("mnt", dir.path()).unwrap(), 2);
        assert_eq!(bundle.get("mnt/top.txt").as_deref(), Some(b"top".as_slice()));
        assert_eq!(
            bundle.get("mnt/nested/inner.txt").as_deref(),
            Some(b"inner".as_slice())
        );
    }
}
