use std::fs;
use std::path::Path;

use crate::error::OutputWriteError;
use crate::integration::ImageTiming;

/// `inference_times_<stamp>.csv`
pub fn timings_file_name(stamp: i128) -> String {
    format!("inference_times_{stamp}.csv")
}

/// Write per-image latencies as `image_id,total_ms` CSV, replacing `path`.
pub fn write_timings(path: &Path, timings: &[ImageTiming]) -> Result<(), OutputWriteError> {
    let mut csv = String::from("image_id,total_ms\n");
    for timing in timings {
        csv.push_str(&format!("{},{}\n", timing.image_id, timing.inference_time_ms));
    }
    fs::write(path, csv).map_err(|source| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
