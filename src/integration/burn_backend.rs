//! Burn inference backend for object detection.
//!
//! This module provides a `BurnDetector` that implements `Detector`
//! for running object detection models built with the Burn framework.
//!
//! # Example
//!
//! ```ignore
//! use coco_dets_rs::{BurnDetector, BurnModel, DenseOutput};
//! use burn::backend::NdArray;
//!
//! // Implement BurnModel for your detection model
//! struct MyModel { /* ... */ }
//!
//! impl BurnModel<NdArray> for MyModel {
//!     fn forward(&self, input: burn::tensor::Tensor<NdArray, 4>) -> DenseOutput {
//!         // Run inference
//!     }
//! }
//!
//! let model = MyModel::load("model.bin");
//! let detector = BurnDetector::new(model, Default::default());
//! ```

use std::time::Instant;

use burn::prelude::*;
use burn::tensor::Tensor;
use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array2;
use thiserror::Error;

use super::{Detector, DetectorOutput, decode_dense};
use crate::error::DenseDecodeError;

/// Error type for Burn detection failures.
#[derive(Debug, Clone, Error)]
pub enum BurnDetectorError {
    /// Only quarter turns are supported.
    #[error("unsupported rotation: {0} degrees")]
    UnsupportedRotation(i32),
    /// Model expects a channel count other than RGB.
    #[error("unsupported channel count: {0}")]
    UnsupportedChannels(u32),
    /// Model output could not be decoded.
    #[error("postprocessing error: {0}")]
    Postprocessing(#[from] DenseDecodeError),
}

/// Dense model output in model-input pixel coordinates.
#[derive(Debug, Clone)]
pub struct DenseOutput {
    /// `N x 4` boxes as `[left, top, right, bottom]`
    pub boxes: Array2<f32>,
    /// `N x C` class scores
    pub scores: Array2<f32>,
}

/// Trait for Burn-based detection models.
///
/// Implement this trait for your specific model architecture.
pub trait BurnModel<B: Backend>: Send + Sync {
    /// Run forward pass on the input tensor.
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape [batch, channels, height, width]
    fn forward(&self, input: Tensor<B, 4>) -> DenseOutput;

    /// Get the expected input size (channels, height, width).
    fn input_size(&self) -> (u32, u32, u32) {
        (3, 320, 320)
    }
}

/// Burn-based object detector implementing `Detector`.
pub struct BurnDetector<B: Backend, M: BurnModel<B>> {
    model: M,
    device: B::Device,
    score_threshold: f32,
}

impl<B: Backend, M: BurnModel<B>> BurnDetector<B, M> {
    /// Create a new Burn detector with the given model and device.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            score_threshold: 0.5,
        }
    }

    /// Set the score threshold below which classes are dropped.
    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Rotate, resize to the model input and normalize to `[0, 1]`.
    ///
    /// Returns the tensor and the size of the rotated image.
    pub fn preprocess(
        &self,
        image: &DynamicImage,
        rotation_degrees: i32,
    ) -> Result<(Tensor<B, 4>, u32, u32), BurnDetectorError> {
        let (channels, target_h, target_w) = self.model.input_size();
        if channels != 3 {
            return Err(BurnDetectorError::UnsupportedChannels(channels));
        }

        let rotated = match rotation_degrees.rem_euclid(360) {
            0 => image.clone(),
            90 => image.rotate90(),
            180 => image.rotate180(),
            270 => image.rotate270(),
            _ => return Err(BurnDetectorError::UnsupportedRotation(rotation_degrees)),
        };
        let (width, height) = (rotated.width(), rotated.height());

        let rgb = rotated
            .resize_exact(target_w, target_h, FilterType::Triangle)
            .to_rgb8();

        // HWC bytes to CHW floats
        let plane = (target_w * target_h) as usize;
        let mut data = vec![0.0f32; plane * 3];
        for (i, pixel) in rgb.pixels().enumerate() {
            for c in 0..3 {
                data[c * plane + i] = pixel[c] as f32 / 255.0;
            }
        }

        let tensor = Tensor::<B, 1>::from_floats(data.as_slice(), &self.device).reshape([
            1,
            channels as usize,
            target_h as usize,
            target_w as usize,
        ]);

        Ok((tensor, width, height))
    }
}

impl<B: Backend, M: BurnModel<B>> Detector for BurnDetector<B, M> {
    type Error = BurnDetectorError;

    fn detect(
        &mut self,
        image: &DynamicImage,
        rotation_degrees: i32,
        image_id: u64,
    ) -> Result<DetectorOutput, Self::Error> {
        let started = Instant::now();
        let (tensor, width, height) = self.preprocess(image, rotation_degrees)?;
        let output = self.model.forward(tensor);

        let (_, target_h, target_w) = self.model.input_size();
        let sx = width as f32 / target_w as f32;
        let sy = height as f32 / target_h as f32;
        let mut detections =
            decode_dense(output.boxes.view(), output.scores.view(), self.score_threshold)?;
        for det in &mut detections {
            det.bounding_box = det.bounding_box.scaled(sx, sy);
        }

        Ok(DetectorOutput {
            detections: Some(detections),
            inference_time_ms: started.elapsed().as_millis() as u64,
            image_height: height,
            image_width: width,
            image_id,
        })
    }
}
