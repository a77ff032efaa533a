//! Folding one image's raw detections into a [`DetectionBatch`].

use std::sync::{Arc, Mutex, MutexGuard};

use crate::coco::batch::DetectionBatch;
use crate::coco::detection::{CocoDetection, RawDetection};
use crate::error::DetectionError;
use crate::integration::{DetectorListener, DetectorOutput};

/// Append one COCO record per categorized detection of `image_id`.
///
/// Each record takes the detection's best category (see
/// [`RawDetection::best_category`]); detections without a finite-scored
/// category are skipped. `None` and empty slices append nothing. Returns the
/// number of records appended.
pub fn aggregate(
    batch: &mut DetectionBatch,
    image_id: u64,
    detections: Option<&[RawDetection]>,
) -> usize {
    let Some(detections) = detections else {
        return 0;
    };

    let before = batch.len();
    for detection in detections {
        match CocoDetection::from_raw(image_id, detection) {
            Some(record) => batch.push(record),
            None => tracing::debug!(image_id, "skipping detection without a scored category"),
        }
    }
    batch.len() - before
}

/// A batch that detector notifications may append to from several threads.
///
/// Appends go through a mutex, so the records of one notification stay
/// contiguous and the batch order is the order in which the lock was taken.
#[derive(Debug, Clone, Default)]
pub struct SharedBatch {
    inner: Arc<Mutex<DetectionBatch>>,
}

impl SharedBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregate under the lock. See [`aggregate`].
    pub fn aggregate(&self, image_id: u64, detections: Option<&[RawDetection]>) -> usize {
        aggregate(&mut self.lock(), image_id, detections)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the records appended so far.
    pub fn snapshot(&self) -> DetectionBatch {
        self.lock().clone()
    }

    /// Take the batch out, leaving an empty one behind for any other handle.
    pub fn take(&self) -> DetectionBatch {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, DetectionBatch> {
        // Appends are single pushes, a poisoned batch is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DetectorListener for SharedBatch {
    fn on_results(&mut self, output: DetectorOutput) {
        self.aggregate(output.image_id, output.detections.as_deref());
    }

    fn on_error(&mut self, error: DetectionError) {
        tracing::warn!(image_id = error.image_id, message = %error.message, "detection failed");
    }
}
