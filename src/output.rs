mod timings;
mod writer;

pub use timings::{timings_file_name, write_timings};
pub use writer::{
    OutputLocation, ResultWriter, detections_file_name, read_batches, unix_millis,
};
