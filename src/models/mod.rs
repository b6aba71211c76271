pub mod data;

pub use data::{CropOutcome, CropRegion, DetectionBox};
