//! Persisting detection batches in COCO results format.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use time::OffsetDateTime;

use crate::coco::DetectionBatch;
use crate::config::OutputConfig;
use crate::error::{OutputReadError, OutputWriteError};

/// Milliseconds since the unix epoch, used to stamp result files.
pub fn unix_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}

/// `all_detections_<stamp>.json`
pub fn detections_file_name(stamp: i128) -> String {
    format!("all_detections_{stamp}.json")
}

/// Output directory choice: the preferred directory when it can be used,
/// otherwise the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    preferred: Option<PathBuf>,
    fallback: PathBuf,
}

impl OutputLocation {
    pub fn new(preferred: Option<PathBuf>, fallback: impl Into<PathBuf>) -> Self {
        Self {
            preferred,
            fallback: fallback.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.external_dir.clone(), config.private_dir())
    }

    /// Create (if needed) and return the directory to write into.
    pub fn resolve(&self) -> Result<PathBuf, OutputWriteError> {
        let mut tried = Vec::new();
        if let Some(preferred) = &self.preferred {
            match fs::create_dir_all(preferred) {
                Ok(()) => return Ok(preferred.clone()),
                Err(err) => {
                    tracing::warn!(
                        dir = %preferred.display(),
                        error = %err,
                        "preferred output directory unavailable, using fallback"
                    );
                    tried.push(preferred.clone());
                }
            }
        }

        tried.push(self.fallback.clone());
        fs::create_dir_all(&self.fallback)
            .map(|()| self.fallback.clone())
            .map_err(|source| OutputWriteError::NoDirectory { tried, source })
    }
}

/// Appends detection batches to one results file.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    path: PathBuf,
}

impl ResultWriter {
    /// Writer for a fresh, timestamp-named file under `location`.
    pub fn create(location: &OutputLocation) -> Result<Self, OutputWriteError> {
        Self::create_at(location, unix_millis())
    }

    /// Writer for `all_detections_<stamp>.json` under `location`.
    pub fn create_at(location: &OutputLocation, stamp: i128) -> Result<Self, OutputWriteError> {
        let dir = location.resolve()?;
        Ok(Self::at(dir.join(detections_file_name(stamp))))
    }

    /// Writer for an explicit file path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `batch` as a 4-space indented JSON array plus a newline.
    ///
    /// The file is never truncated: appending twice leaves two array
    /// literals back-to-back, which [`read_batches`] can split again but a
    /// plain JSON parser rejects.
    pub fn append(&self, batch: &DetectionBatch) -> Result<(), OutputWriteError> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        batch.serialize(&mut ser)?;
        buf.push(b'\n');

        let io_err = |source: std::io::Error| OutputWriteError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(&buf).map_err(io_err)?;

        tracing::info!(path = %self.path.display(), records = batch.len(), "detections written");
        Ok(())
    }
}

/// Read every batch stored in a results file, in file order.
pub fn read_batches(path: &Path) -> Result<Vec<DetectionBatch>, OutputReadError> {
    let content = fs::read(path).map_err(|source| OutputReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::Deserializer::from_slice(&content)
        .into_iter::<DetectionBatch>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| OutputReadError::Json {
            path: path.to_path_buf(),
            source,
        })
}
