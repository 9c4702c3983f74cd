use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_core::{ResourceError, Result};

/// Resource layer settings, usually loaded from a YAML file.
///
/// ```yaml
/// schemes:
///   "null": false
/// writable_bundle: true
/// bundle_dirs:
///   - prefix: models
///     dir: ./models
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Built-in schemes to register
    #[serde(default)]
    pub schemes: BuiltinSchemes,
    /// Whether `classpath:` resources can be written
    #[serde(default)]
    pub writable_bundle: bool,
    /// Directories copied into the bundle at startup
    #[serde(default)]
    pub bundle_dirs: Vec<BundleMount>,
}

/// Built-in schemes; all are enabled unless switched off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinSchemes {
    #[serde(default = "enabled")]
    pub classpath: bool,
    #[serde(default = "enabled")]
    pub empty: bool,
    #[serde(default = "enabled")]
    pub null: bool,
    #[serde(default = "enabled")]
    pub string: bool,
}

impl Default for BuiltinSchemes {
    fn default() -> Self {
        BuiltinSchemes {
            classpath: true,
            empty: true,
            null: true,
            string: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// A filesystem directory mounted into the bundle under `prefix`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleMount {
    #[serde(default)]
    pub prefix: String,
    pub dir: PathBuf,
}

impl ResourceConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ResourceError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }
}
