use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdCropError {
    #[error("Input file '{}' does not exist", .0.display())]
    InputNotFound(PathBuf),

    #[error("Could not read image: {0}")]
    ImageDecodeFailure(String),

    #[error("Could not find Haar Cascade classifier file: {0}")]
    ModelNotFound(String),

    #[error("No face detected")]
    NoFaceDetected,

    #[error("Error during face detection: {0}")]
    DetectionFailure(String),

    #[error("Failed to save cropped image: {0}")]
    SaveFailure(String),

    #[error("OCR error: {0}")]
    OcrFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
