pub mod cascade;
pub mod crop;
pub mod detection;
pub mod image;
pub mod ocr;
pub mod output;

pub use cascade::CascadeResolver;
pub use crop::CropPlanner;
pub use detection::{FaceDetector, HaarFaceDetector};
pub use self::image::ImageProcessor;
pub use ocr::{OcrProcessor, TesseractRecognizer, TextRecognizer};
pub use output::OutputWriter;
