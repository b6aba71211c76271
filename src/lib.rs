pub mod cli;
pub mod config;
pub mod face_cropper;
pub mod models;
pub mod processing;
pub mod utils;

pub use config::{CropConfig, FacePolicy};
pub use face_cropper::FaceCropper;
pub use utils::IdCropError;
