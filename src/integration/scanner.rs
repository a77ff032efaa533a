//! CorpusScanner for running a detector over a whole image corpus.

use crate::coco::{DetectionBatch, ImageRecord, aggregate};
use crate::config::ScanConfig;
use crate::error::{DetectionError, ScanError};

use super::{CorpusSource, Detector, DetectorListener, DetectorOutput, ImageLoader, notify};

/// Inference latency reported for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageTiming {
    pub image_id: u64,
    pub inference_time_ms: u64,
}

/// Outcome of one corpus scan.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// COCO records in notification order
    pub batch: DetectionBatch,
    /// Number of filenames in the corpus listing
    pub listed: usize,
    /// Number of images handed to the detector
    pub submitted: usize,
    pub timings: Vec<ImageTiming>,
    /// Per-image failures; none of them stopped the scan
    pub failures: Vec<ScanError>,
}

impl DetectorListener for ScanReport {
    fn on_results(&mut self, output: DetectorOutput) {
        let appended = aggregate(&mut self.batch, output.image_id, output.detections.as_deref());
        tracing::debug!(
            image_id = output.image_id,
            appended,
            inference_time_ms = output.inference_time_ms,
            "detections aggregated"
        );
        self.timings.push(ImageTiming {
            image_id: output.image_id,
            inference_time_ms: output.inference_time_ms,
        });
    }

    fn on_error(&mut self, error: DetectionError) {
        tracing::warn!(image_id = error.image_id, message = %error.message, "could not process image");
        self.failures.push(error.into());
    }
}

/// Drives one detection request per corpus image, strictly one at a time.
///
/// Each [`scan`](Self::scan) starts from an empty batch and returns it in the
/// report, so repeated scans never share state.
pub struct CorpusScanner<C, L, D> {
    corpus: C,
    loader: L,
    detector: D,
    config: ScanConfig,
}

impl<C: CorpusSource, L: ImageLoader, D: Detector> CorpusScanner<C, L, D> {
    pub fn new(corpus: C, loader: L, detector: D, config: ScanConfig) -> Self {
        Self {
            corpus,
            loader,
            detector,
            config,
        }
    }

    /// Scan the configured corpus.
    ///
    /// A missing or empty corpus yields an empty report. Images whose id
    /// cannot be derived, that fail to load, or that the detector rejects are
    /// recorded in [`ScanReport::failures`] and skipped.
    pub fn scan(&mut self) -> ScanReport {
        let mut report = ScanReport::default();
        let corpus = self.config.corpus.as_str();

        let Some(filenames) = self.corpus.list(corpus) else {
            tracing::info!(corpus, "corpus not found, nothing to scan");
            return report;
        };
        report.listed = filenames.len();
        tracing::info!(corpus, images = filenames.len(), "scanning corpus");

        for filename in filenames {
            let record = match ImageRecord::from_filename(filename) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!(filename = %err.filename, "skipping image without numeric id");
                    report.failures.push(err.into());
                    continue;
                }
            };

            let path = format!("{corpus}/{}", record.filename);
            let image = match self.loader.open(&path) {
                Ok(image) => image,
                Err(err) => {
                    tracing::warn!(path = %err.path, error = %err.source, "skipping unreadable image");
                    report.failures.push(err.into());
                    continue;
                }
            };

            report.submitted += 1;
            let result = self
                .detector
                .detect(&image, self.config.rotation_degrees, record.image_id);
            notify(&mut report, record.image_id, result);
        }

        tracing::info!(
            corpus,
            submitted = report.submitted,
            detections = report.batch.len(),
            failures = report.failures.len(),
            "scan finished"
        );
        report
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }
}
