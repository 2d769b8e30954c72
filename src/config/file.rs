//! Optional `.license-collect.yaml` configuration file

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LicenseCollectError, Result};

/// Config file looked up next to the manifest when `--config` is not given
pub const CONFIG_FILE_NAME: &str = ".license-collect.yaml";

/// Settings that may be provided by the config file; all optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub jobs: Option<usize>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retries: Option<u32>,
    /// Module coordinates to leave out of the bundle
    #[serde(default)]
    pub skip: Vec<String>,
}

impl FileConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str, path: &Path) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| LicenseCollectError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(LicenseCollectError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        let yaml = std::fs::read_to_string(path).map_err(|e| LicenseCollectError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_yaml(&yaml, path)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load a config file if it exists, defaults otherwise
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
