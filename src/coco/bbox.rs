/// Detector bounding box in pixel space.
///
/// Edges come straight from the model and may lie outside the image, e.g.
/// negative `left`/`top` near the borders.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PixelBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PixelBox {
    /// Create a PixelBox from its edges (TLBR order).
    #[inline]
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a PixelBox from TLWH format (top-left x, top-left y, width, height).
    #[inline]
    pub fn from_tlwh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Scale all edges, e.g. from model-input to image coordinates.
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(
            self.left * sx,
            self.top * sy,
            self.right * sx,
            self.bottom * sy,
        )
    }

    /// Convert to COCO `[x, y, w, h]`.
    ///
    /// `x`/`y` are clamped at zero independently of `w`/`h`, which are taken
    /// from the unclamped edges. A box hanging off the left or top edge keeps
    /// its full width, and nothing is clamped against the image size.
    #[inline]
    pub fn to_coco(&self) -> [f32; 4] {
        [
            self.left.max(0.0),
            self.top.max(0.0),
            self.width().max(0.0),
            self.height().max(0.0),
        ]
    }
}

/// Convert a pixel box to COCO `[x, y, w, h]`. See [`PixelBox::to_coco`].
pub fn to_coco_bbox(pixel_box: &PixelBox) -> [f32; 4] {
    pixel_box.to_coco()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_box() {
        let b = PixelBox::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(b.to_coco(), [10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_negative_left_clamped() {
        let b = PixelBox::new(-5.0, 10.0, 50.0, 60.0);
        assert_eq!(to_coco_bbox(&b), [0.0, 10.0, 55.0, 50.0]);
    }

    #[test]
    fn test_off_image_box_keeps_unclamped_extent() {
        // Entirely left of and above the image: x/y clamp to 0, but w/h still
        // come from the raw edges, so the result does not describe the
        // (empty) visible part of the box.
        let b = PixelBox::new(-5.0, -3.0, -1.0, -1.0);
        let [x, y, w, h] = b.to_coco();
        assert_eq!((x, y), (0.0, 0.0));
        assert_eq!((w, h), (4.0, 2.0));
        assert!(x + w > b.right);
    }

    #[test]
    fn test_inverted_box_has_zero_extent() {
        let b = PixelBox::new(50.0, 60.0, 40.0, 10.0);
        assert_eq!(b.to_coco(), [50.0, 60.0, 0.0, 0.0]);
    }

    #[test]
    fn test_no_clamp_to_image_size() {
        let b = PixelBox::new(600.0, 400.0, 700.0, 520.0);
        assert_eq!(b.to_coco(), [600.0, 400.0, 100.0, 120.0]);
    }

    #[test]
    fn test_from_tlwh_and_scale() {
        let b = PixelBox::from_tlwh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b, PixelBox::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(b.scaled(2.0, 0.5), PixelBox::new(20.0, 10.0, 80.0, 30.0));
    }
}
