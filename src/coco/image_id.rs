//! Image id derivation from corpus filenames.

use crate::error::ImageIdParseError;

/// Derive the COCO image id from a corpus filename.
///
/// COCO files are named after their zero-padded id, so `"000000397133.jpg"`
/// maps to `397133`. Everything from the first `.` on is ignored, leading
/// zeros are stripped and an all-zero stem maps to `0`.
pub fn image_id_from_filename(filename: &str) -> Result<u64, ImageIdParseError> {
    let stem = filename.split('.').next().unwrap_or_default();
    let digits = match stem.trim_start_matches('0') {
        "" => "0",
        rest => rest,
    };
    digits.parse().map_err(|source| ImageIdParseError {
        filename: filename.to_string(),
        source,
    })
}

/// A corpus entry and its derived id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub filename: String,
    pub image_id: u64,
}

impl ImageRecord {
    pub fn from_filename(filename: impl Into<String>) -> Result<Self, ImageIdParseError> {
        let filename = filename.into();
        let image_id = image_id_from_filename(&filename)?;
        Ok(Self { filename, image_id })
    }
}
