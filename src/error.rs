//! Error types for the scan and export pipeline.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use crate::integration::ScanReport;

/// A corpus filename whose stem is not a base-10 integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot derive image id from {filename:?}")]
pub struct ImageIdParseError {
    pub filename: String,
    #[source]
    pub source: ParseIntError,
}

/// Failure reported by the detector for one image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detector failed on image {image_id}: {message}")]
pub struct DetectionError {
    pub image_id: u64,
    pub message: String,
}

/// Failure opening or decoding one corpus image.
#[derive(Debug, Error)]
#[error("failed to load image {path}")]
pub struct ImageLoadError {
    pub path: String,
    #[source]
    pub source: image::ImageError,
}

/// Per-image failure recorded during a scan. None of these abort the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    ImageId(#[from] ImageIdParseError),
    #[error(transparent)]
    ImageLoad(#[from] ImageLoadError),
    #[error(transparent)]
    Detection(#[from] DetectionError),
}

#[derive(Debug, Error)]
pub enum OutputWriteError {
    #[error("no usable output directory (tried {tried:?})")]
    NoDirectory {
        tried: Vec<PathBuf>,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize detections")]
    Json(#[from] serde_json::Error),
}

/// The scan finished but its detections could not be exported.
///
/// Carries the complete report so the batch can be written again without
/// rescanning.
#[derive(Debug, Error)]
#[error("scan finished but detections could not be exported")]
pub struct RunError {
    pub report: Box<ScanReport>,
    #[source]
    pub source: OutputWriteError,
}

#[derive(Debug, Error)]
pub enum OutputReadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed detections in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config")]
    Toml(#[from] toml::de::Error),
}

/// Shape mismatch between dense box and score arrays.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenseDecodeError {
    #[error("boxes must have 4 columns, got {0}")]
    BoxColumns(usize),
    #[error("{boxes} boxes but {scores} score rows")]
    RowMismatch { boxes: usize, scores: usize },
}
