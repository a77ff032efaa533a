use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Directory name used under the platform data directory.
pub const APP_DIR: &str = "coco-dets";

/// Configuration for a corpus scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Corpus (sub-directory of the asset root) to scan
    pub corpus: String,
    /// Rotation passed with every detection request
    pub rotation_degrees: i32,
    pub output: OutputConfig,
}

/// Where result files go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Preferred, externally visible directory
    pub external_dir: Option<PathBuf>,
    /// Private fallback directory; defaults to the platform data directory
    pub private_dir: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            corpus: "val2017_500".to_string(),
            rotation_degrees: 0,
            output: OutputConfig::default(),
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

impl OutputConfig {
    /// The fallback directory, resolved against platform defaults.
    pub fn private_dir(&self) -> PathBuf {
        self.private_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }
}
