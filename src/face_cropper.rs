use crate::config::{CropConfig, FacePolicy};
use crate::models::CropOutcome;
use crate::processing::{
    CropPlanner, FaceDetector, HaarFaceDetector, ImageProcessor, OcrProcessor, OutputWriter,
    TesseractRecognizer, TextRecognizer,
};
use crate::utils::IdCropError;
use image::{DynamicImage, GenericImageView};
use std::path::Path;

/// Where a crop run writes its result.
enum Destination<'a> {
    /// Exact output file (collisions still get a numeric suffix).
    File(&'a Path),
    /// Output directory; the file name comes from the input or an extracted ID.
    Directory { dir: &'a Path, use_id: bool },
}

/// Runs detect, crop and save for a single input image.
///
/// The OpenCV cascade is only resolved when no detector was injected, and
/// Tesseract is only created when an ID is requested and no recognizer was injected.
pub struct FaceCropper {
    config: CropConfig,
    detector: Option<Box<dyn FaceDetector>>,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl FaceCropper {
    pub fn new(config: CropConfig) -> Self {
        FaceCropper {
            config,
            detector: None,
            recognizer: None,
        }
    }

    /// Use `detector` instead of the Haar cascade from the configured candidates.
    pub fn face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Use `recognizer` instead of Tesseract for ID extraction.
    pub fn text_recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Crop the face in `input` and save it at `output`.
    pub fn crop_to_file(&mut self, input: &Path, output: &Path) -> Result<CropOutcome, IdCropError> {
        self.run(input, Destination::File(output))
    }

    /// Crop the face in `input` into `output_dir`, optionally naming the file
    /// after an ID number read from the image.
    pub fn crop_to_dir(
        &mut self,
        input: &Path,
        output_dir: &Path,
        use_id: bool,
    ) -> Result<CropOutcome, IdCropError> {
        self.run(
            input,
            Destination::Directory {
                dir: output_dir,
                use_id,
            },
        )
    }

    fn run(&mut self, input: &Path, destination: Destination) -> Result<CropOutcome, IdCropError> {
        // Step 1: Load the image
        let img = ImageProcessor::load_image(input)?;

        // Step 2: Resolve the detector, then find faces
        let detector = self.detector()?;
        let gray = ImageProcessor::to_grayscale(&img);
        let faces = detector.detect(&gray)?;
        if faces.is_empty() {
            return Err(IdCropError::NoFaceDetected);
        }
        log::info!("Detected {} face(s) in {}", faces.len(), input.display());

        // Step 3: Work out the target path
        let mut outcome = CropOutcome {
            faces_detected: faces.len(),
            ..CropOutcome::default()
        };
        let target = match destination {
            Destination::File(path) => path.to_path_buf(),
            Destination::Directory { dir, use_id } => {
                if use_id {
                    outcome.extracted_id = self.extract_id(&img);
                }
                let file_name = OutputWriter::output_file_name(
                    input,
                    outcome.extracted_id.as_deref(),
                    &self.config.default_extension,
                )?;
                dir.join(file_name)
            }
        };

        // Step 4: Crop and save
        let (width, height) = (img.width(), img.height());
        for face in &faces {
            let region = match CropPlanner::plan(face, width, height) {
                Some(region) => region,
                None => continue,
            };
            log::debug!("Cropping {:?} from face {:?}", region, face);

            let cropped = CropPlanner::crop(&img, &region);
            let saved = OutputWriter::save(&cropped, &target)?;
            outcome.saved.push(saved);

            if self.config.face_policy == FacePolicy::First {
                break;
            }
        }

        if outcome.saved.is_empty() {
            // Every box fell outside the image
            return Err(IdCropError::NoFaceDetected);
        }
        Ok(outcome)
    }

    fn detector(&mut self) -> Result<&mut Box<dyn FaceDetector>, IdCropError> {
        if self.detector.is_none() {
            let haar = HaarFaceDetector::from_candidates(&self.config.cascade_candidates)?;
            self.detector = Some(Box::new(haar));
        }
        self.detector
            .as_mut()
            .ok_or_else(|| IdCropError::ModelNotFound("no face detector available".to_string()))
    }

    fn extract_id(&mut self, img: &DynamicImage) -> Option<String> {
        let ocr_config = self.config.ocr.clone();
        let recognizer = self
            .recognizer
            .get_or_insert_with(|| -> Box<dyn TextRecognizer> {
                Box::new(TesseractRecognizer::new(ocr_config))
            });
        OcrProcessor::extract_id_number(recognizer.as_mut(), img)
    }
}

