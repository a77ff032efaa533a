//! Builder for creating RawDetection objects from various box formats.

use crate::coco::{Category, PixelBox, RawDetection};

/// Builder for creating `RawDetection` objects from various box formats.
#[derive(Debug, Clone, Default)]
pub struct RawDetectionBuilder {
    bounding_box: PixelBox,
    categories: Vec<Category>,
}

impl RawDetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (left, top, right, bottom).
    pub fn tlbr(mut self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        self.bounding_box = PixelBox::new(left, top, right, bottom);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bounding_box = PixelBox::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f32, t: f32, w: f32, h: f32) -> Self {
        self.bounding_box = PixelBox::from_tlwh(l, t, w, h);
        self
    }

    /// Append a class hypothesis. Order is kept.
    pub fn category(mut self, index: u32, score: f32) -> Self {
        self.categories.push(Category::new(index, score));
        self
    }

    /// Append a labelled class hypothesis.
    pub fn labelled_category(mut self, index: u32, score: f32, label: &str) -> Self {
        self.categories.push(Category::new(index, score).with_label(label));
        self
    }

    /// Build the final `RawDetection`.
    pub fn build(self) -> RawDetection {
        RawDetection::new(self.bounding_box, self.categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = RawDetectionBuilder::new()
            .tlbr(10.0, 20.0, 50.0, 80.0)
            .category(2, 0.9)
            .labelled_category(0, 0.95, "person")
            .build();

        assert_eq!(det.bounding_box, PixelBox::new(10.0, 20.0, 50.0, 80.0));
        assert_eq!(det.categories.len(), 2);
        assert_eq!(det.best_category().unwrap().label.as_deref(), Some("person"));
    }

    #[test]
    fn test_center_format() {
        let det = RawDetectionBuilder::new().xywh(30.0, 50.0, 40.0, 60.0).build();
        assert_eq!(det.bounding_box.to_coco(), [10.0, 20.0, 40.0, 60.0]);
        assert!(det.categories.is_empty());
    }
}
