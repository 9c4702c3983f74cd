use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_core::{Capability, ResourceError, Result, Uri};
use tracing::{debug, info, warn};

use crate::config::ResourceConfig;
use crate::providers::{
    Bundle, BundleProvider, BundledResource, EmptyProvider, EmptyResource, NullProvider,
    NullResource, StringProvider, StringResource,
};
use crate::resource::Resource;

/// Constructs resources for the URIs of one scheme.
pub trait ResourceProvider: Send + Sync {
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>>;
}

impl<F> ResourceProvider for F
where
    F: Fn(&Uri) -> Result<Box<dyn Resource>> + Send + Sync,
{
    fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        self(uri)
    }
}

/// Maps URI schemes to the providers that resolve them.
///
/// Build it once at startup, then share it (it is `Clone`, `Send` and
/// `Sync`). Schemes are matched case-sensitively. Resolution does not cache:
/// every call asks the provider for a new resource.
#[derive(Clone, Default)]
pub struct ResourceProviders {
    providers: HashMap<String, Arc<dyn ResourceProvider>>,
}

impl ResourceProviders {
    /// A registry with no schemes at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `classpath`, `empty`, `null` and `string` schemes,
    /// `classpath` resolving read-only against `bundle`.
    pub fn with_builtins(bundle: Bundle) -> Self {
        let mut providers = Self::new();
        providers
            .register(BundledResource::SCHEME, BundleProvider::new(bundle))
            .register(EmptyResource::SCHEME, EmptyProvider)
            .register(NullResource::SCHEME, NullProvider)
            .register(StringResource::SCHEME, StringProvider);
        providers
    }

    /// A registry with the built-in schemes enabled by `config`, after
    /// loading the configured directories into `bundle`.
    pub fn from_config(config: &ResourceConfig, bundle: Bundle) -> Result<Self> {
        for mount in &config.bundle_dirs {
            bundle.load_dir(&mount.prefix, &mount.dir)?;
        }

        let schemes = &config.schemes;
        let mut providers = Self::new();
        if schemes.classpath {
            if config.writable_bundle {
                providers.register(BundledResource::SCHEME, BundleProvider::writable(bundle));
            } else {
                providers.register(BundledResource::SCHEME, BundleProvider::new(bundle));
            }
        }
        if schemes.empty {
            providers.register(EmptyResource::SCHEME, EmptyProvider);
        }
        if schemes.null {
            providers.register(NullResource::SCHEME, NullProvider);
        }
        if schemes.string {
            providers.register(StringResource::SCHEME, StringProvider);
        }
        info!(schemes = ?providers.schemes(), "initialized resource providers");
        Ok(providers)
    }

    /// Associates `scheme` with `provider`. A provider already registered for
    /// the scheme is replaced.
    pub fn register<P>(&mut self, scheme: impl Into<String>, provider: P) -> &mut Self
    where
        P: ResourceProvider + 'static,
    {
        let scheme = scheme.into();
        if self
            .providers
            .insert(scheme.clone(), Arc::new(provider))
            .is_some()
        {
            warn!(scheme = %scheme, "replaced previously registered resource provider");
        } else {
            debug!(scheme = %scheme, "registered resource provider");
        }
        self
    }

    pub fn contains(&self, scheme: &str) -> bool {
        self.providers.contains_key(scheme)
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Resolves `uri` with the provider of its scheme.
    pub fn get_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let provider = self
            .providers
            .get(uri.scheme())
            .ok_or_else(|| ResourceError::UnsupportedScheme(uri.scheme().to_string()))?;
        debug!(uri = %uri, "resolving resource");
        provider.get_resource(uri)
    }

    /// Resolves `uri` and checks that the resource can be read.
    pub fn get_readable_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let resource = self.get_resource(uri)?;
        if !resource.access().is_readable() {
            return Err(ResourceError::unsupported_capability(
                uri,
                Capability::ByteRead,
            ));
        }
        Ok(resource)
    }

    /// Resolves `uri` and checks that the resource can be written.
    pub fn get_writable_resource(&self, uri: &Uri) -> Result<Box<dyn Resource>> {
        let resource = self.get_resource(uri)?;
        if !resource.access().is_writable() {
            return Err(ResourceError::unsupported_capability(
                uri,
                Capability::ByteWrite,
            ));
        }
        Ok(resource)
    }
}

impl fmt::Debug for ResourceProviders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceProviders")
            .field("schemes", &self.schemes())
            .finish()
    }
}
