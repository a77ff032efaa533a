use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coco::detection::CocoDetection;

/// Ordered, append-only list of COCO records gathered during one scan.
///
/// Records keep the order in which detector notifications arrived.
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionBatch {
    records: Vec<CocoDetection>,
}

impl DetectionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CocoDetection) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CocoDetection> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[CocoDetection] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<CocoDetection> {
        self.records
    }

    /// Records grouped by image id, ids ascending. Within an image the batch
    /// order is kept.
    pub fn by_image(&self) -> BTreeMap<u64, Vec<&CocoDetection>> {
        let mut grouped: BTreeMap<u64, Vec<&CocoDetection>> = BTreeMap::new();
        for record in &self.records {
            grouped.entry(record.image_id).or_default().push(record);
        }
        grouped
    }

    /// Copy of the batch without records scoring below `min_score`.
    pub fn above_score(&self, min_score: f32) -> Self {
        Self {
            records: self
                .records
                .iter()
                .filter(|r| r.score >= min_score)
                .copied()
                .collect(),
        }
    }
}

impl From<Vec<CocoDetection>> for DetectionBatch {
    fn from(records: Vec<CocoDetection>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a DetectionBatch {
    type Item = &'a CocoDetection;
    type IntoIter = std::slice::Iter<'a, CocoDetection>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
