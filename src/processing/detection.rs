use crate::models::DetectionBox;
use crate::processing::CascadeResolver;
use crate::utils::IdCropError;
use image::GrayImage;
use opencv::core::{Mat, Rect, Scalar, Size, Vector, CV_8UC1};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use std::path::PathBuf;

/// Multi-scale step between pyramid levels.
pub const SCALE_FACTOR: f64 = 1.3;

/// Overlapping hits a candidate needs before it counts as a face.
pub const MIN_NEIGHBORS: i32 = 5;

/// Pluggable face detection backend.
///
/// Implement this to run the cropper against something other than the
/// OpenCV Haar cascade, e.g. a fixed set of boxes in tests.
pub trait FaceDetector {
    /// Detect faces in a grayscale image. An empty list means "no face".
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<DetectionBox>, IdCropError>;
}

/// Face detector backed by an OpenCV Haar cascade.
pub struct HaarFaceDetector {
    classifier: CascadeClassifier,
}

impl HaarFaceDetector {
    /// Load the first existing cascade from `candidates`.
    pub fn from_candidates(candidates: &[PathBuf]) -> Result<Self, IdCropError> {
        let classifier = CascadeResolver::load(candidates)?;
        Ok(HaarFaceDetector { classifier })
    }

    fn to_mat(gray: &GrayImage) -> Result<Mat, IdCropError> {
        let (width, height) = gray.dimensions();
        let mut mat = Mat::new_rows_cols_with_default(
            height as i32,
            width as i32,
            CV_8UC1,
            Scalar::all(0.0),
        )
        .map_err(|e| IdCropError::DetectionFailure(format!("Failed to allocate matrix: {}", e)))?;

        mat.data_bytes_mut()
            .map_err(|e| IdCropError::DetectionFailure(format!("Failed to access matrix: {}", e)))?
            .copy_from_slice(gray.as_raw());

        Ok(mat)
    }
}

impl FaceDetector for HaarFaceDetector {
    fn detect(&mut self, gray: &GrayImage) -> Result<Vec<DetectionBox>, IdCropError> {
        let mat = Self::to_mat(gray)?;
        let mut faces = Vector::<Rect>::new();

        self.classifier
            .detect_multi_scale(
                &mat,
                &mut faces,
                SCALE_FACTOR,
                MIN_NEIGHBORS,
                0,
                Size::new(0, 0),
                Size::new(0, 0),
            )
            .map_err(|e| IdCropError::DetectionFailure(e.to_string()))?;

        let boxes: Vec<DetectionBox> = faces
            .iter()
            .map(|r| DetectionBox::new(r.x, r.y, r.width, r.height))
            .collect();
        log::debug!("Haar cascade found {} face(s): {:?}", boxes.len(), boxes);

        Ok(boxes)
    }
}
