mod aggregate;
mod batch;
mod bbox;
mod detection;
mod image_id;

pub use aggregate::{SharedBatch, aggregate};
pub use batch::DetectionBatch;
pub use bbox::{PixelBox, to_coco_bbox};
pub use detection::{Category, CocoDetection, RawDetection};
pub use image_id::{ImageRecord, image_id_from_filename};
