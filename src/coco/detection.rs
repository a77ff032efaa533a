//! Raw detector output and COCO result records.

use serde::{Deserialize, Serialize};

use crate::coco::bbox::PixelBox;

/// One class hypothesis of a raw detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// 0-based class index as reported by the detector
    pub index: u32,
    /// Confidence score
    pub score: f32,
    /// Optional display name
    pub label: Option<String>,
}

impl Category {
    pub fn new(index: u32, score: f32) -> Self {
        Self {
            index,
            score,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Detection as produced by the detector, before COCO conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub bounding_box: PixelBox,
    /// Class hypotheses in detector output order
    pub categories: Vec<Category>,
}

impl RawDetection {
    pub fn new(bounding_box: PixelBox, categories: Vec<Category>) -> Self {
        Self {
            bounding_box,
            categories,
        }
    }

    /// The highest scoring category; the first one wins a tie.
    ///
    /// Categories with a non-finite score are ignored. Returns `None` when no
    /// category is left.
    pub fn best_category(&self) -> Option<&Category> {
        let mut best: Option<&Category> = None;
        for category in &self.categories {
            if !category.score.is_finite() {
                continue;
            }
            if best.is_none_or(|current| category.score > current.score) {
                best = Some(category);
            }
        }
        best
    }
}

/// A single entry of a COCO results file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CocoDetection {
    pub image_id: u64,
    /// 1-based COCO category id
    pub category_id: u32,
    /// `[x, y, width, height]` in pixels
    pub bbox: [f32; 4],
    pub score: f32,
}

impl CocoDetection {
    /// Build the COCO record for a raw detection, or `None` if it has no
    /// categories.
    pub fn from_raw(image_id: u64, detection: &RawDetection) -> Option<Self> {
        let best = detection.best_category()?;
        Some(Self {
            image_id,
            category_id: best.index + 1,
            bbox: detection.bounding_box.to_coco(),
            score: best.score,
        })
    }
}
