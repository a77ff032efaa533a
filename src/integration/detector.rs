//! Traits for object detection backends and their notifications.

use image::DynamicImage;

use crate::coco::RawDetection;
use crate::error::DetectionError;

/// Everything a detector reports for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorOutput {
    /// `None` when the backend produced no result list at all
    pub detections: Option<Vec<RawDetection>>,
    pub inference_time_ms: u64,
    pub image_height: u32,
    pub image_width: u32,
    /// Id the request was submitted with, echoed back
    pub image_id: u64,
}

/// Trait for object detection inference backends.
///
/// Implement this trait to connect any detection model to the corpus scanner.
///
/// # Example
///
/// ```ignore
/// use coco_dets_rs::{Detector, DetectorOutput};
/// use image::DynamicImage;
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl Detector for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(
///         &mut self,
///         image: &DynamicImage,
///         rotation_degrees: i32,
///         image_id: u64,
///     ) -> Result<DetectorOutput, Self::Error> {
///         // Run inference and return detections
///         Ok(DetectorOutput {
///             detections: Some(vec![]),
///             inference_time_ms: 0,
///             image_height: image.height(),
///             image_width: image.width(),
///             image_id,
///         })
///     }
/// }
/// ```
pub trait Detector {
    /// Error type for detection failures.
    type Error: std::fmt::Display;

    /// Run inference on a decoded image.
    ///
    /// # Arguments
    /// * `image` - Decoded image
    /// * `rotation_degrees` - Rotation to apply before inference
    /// * `image_id` - Id to echo back in the output
    fn detect(
        &mut self,
        image: &DynamicImage,
        rotation_degrees: i32,
        image_id: u64,
    ) -> Result<DetectorOutput, Self::Error>;
}

impl<D: Detector + ?Sized> Detector for &mut D {
    type Error = D::Error;

    fn detect(
        &mut self,
        image: &DynamicImage,
        rotation_degrees: i32,
        image_id: u64,
    ) -> Result<DetectorOutput, Self::Error> {
        (**self).detect(image, rotation_degrees, image_id)
    }
}

/// Receiver of detector completion notifications.
///
/// Callback-style backends call this directly, possibly from another thread;
/// in that case the listener must serialize its own state, as
/// [`SharedBatch`](crate::coco::SharedBatch) does.
pub trait DetectorListener {
    fn on_results(&mut self, output: DetectorOutput);

    fn on_error(&mut self, error: DetectionError);
}

/// Deliver the outcome of one [`Detector::detect`] call to a listener.
pub fn notify<E: std::fmt::Display>(
    listener: &mut impl DetectorListener,
    image_id: u64,
    result: Result<DetectorOutput, E>,
) {
    match result {
        Ok(output) => listener.on_results(output),
        Err(err) => listener.on_error(DetectionError {
            image_id,
            message: err.to_string(),
        }),
    }
}
