//! Run an object detector over an image corpus and export the detections in
//! COCO results format.
//!
//! ```ignore
//! use coco_dets_rs::{AssetDir, CorpusScanner, OutputLocation, ScanConfig, run_evaluation};
//!
//! let config = ScanConfig::default();
//! let assets = AssetDir::new("assets");
//! let mut scanner = CorpusScanner::new(assets.clone(), assets, my_detector, config.clone());
//! let outcome = run_evaluation(&mut scanner, &OutputLocation::from_config(&config.output))?;
//! println!("wrote {}", outcome.detections_path.display());
//! ```

pub mod coco;
pub mod config;
pub mod error;
pub mod integration;
pub mod output;

pub use coco::{
    Category, CocoDetection, DetectionBatch, ImageRecord, PixelBox, RawDetection, SharedBatch,
    aggregate, image_id_from_filename, to_coco_bbox,
};
pub use config::{OutputConfig, ScanConfig};
pub use error::{
    ConfigError, DenseDecodeError, DetectionError, ImageIdParseError, ImageLoadError,
    OutputReadError, OutputWriteError, RunError, ScanError,
};
pub use integration::{
    AssetDir, CorpusScanner, CorpusSource, Detector, DetectorListener, DetectorOutput,
    ImageLoader, ImageTiming, RawDetectionBuilder, RunOutcome, ScanReport, decode_dense,
    run_evaluation,
};
pub use output::{OutputLocation, ResultWriter, read_batches, write_timings};

#[cfg(feature = "burn-backend")]
pub use integration::{BurnDetector, BurnDetectorError, BurnModel, DenseOutput};
