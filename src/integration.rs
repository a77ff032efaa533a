//! Integration module for connecting object detection backends with the
//! COCO export pipeline.
//!
//! This module provides the collaborator traits (detector, corpus, image
//! loader), the corpus scanner driving them and the one-shot evaluation run.

mod builder;
mod corpus;
mod dense;
mod detector;
mod run;
mod scanner;

pub use builder::RawDetectionBuilder;
pub use corpus::{AssetDir, CorpusSource, ImageLoader};
pub use dense::decode_dense;
pub use detector::{Detector, DetectorListener, DetectorOutput, notify};
pub use run::{RunOutcome, run_evaluation};
pub use scanner::{CorpusScanner, ImageTiming, ScanReport};

#[cfg(feature = "burn-backend")]
mod burn_backend;

#[cfg(feature = "burn-backend")]
pub use burn_backend::{BurnDetector, BurnDetectorError, BurnModel, DenseOutput};
