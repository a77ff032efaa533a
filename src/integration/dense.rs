//! Decoding of dense detector heads into raw detections.

use ndarray::ArrayView2;

use crate::coco::{Category, PixelBox, RawDetection};
use crate::error::DenseDecodeError;

/// Decode `N x 4` boxes (`[left, top, right, bottom]`) and `N x C` class
/// scores into raw detections.
///
/// Each detection keeps the classes scoring at least `score_threshold`, in
/// class-index order; rows where no class passes are dropped.
pub fn decode_dense(
    boxes: ArrayView2<'_, f32>,
    scores: ArrayView2<'_, f32>,
    score_threshold: f32,
) -> Result<Vec<RawDetection>, DenseDecodeError> {
    let (num_boxes, box_cols) = boxes.dim();
    if box_cols != 4 {
        return Err(DenseDecodeError::BoxColumns(box_cols));
    }
    let num_scores = scores.nrows();
    if num_scores != num_boxes {
        return Err(DenseDecodeError::RowMismatch {
            boxes: num_boxes,
            scores: num_scores,
        });
    }

    let detections = boxes
        .rows()
        .into_iter()
        .zip(scores.rows())
        .filter_map(|(b, s)| {
            let categories: Vec<Category> = s
                .iter()
                .enumerate()
                .filter(|&(_, &score)| score >= score_threshold)
                .map(|(index, &score)| Category::new(index as u32, score))
                .collect();
            if categories.is_empty() {
                return None;
            }
            Some(RawDetection::new(
                PixelBox::new(b[0], b[1], b[2], b[3]),
                categories,
            ))
        })
        .collect();

    Ok(detections)
}
