use crate::config::OcrConfig;
use crate::processing::ImageProcessor;
use crate::utils::IdCropError;
use image::{DynamicImage, GrayImage, ImageFormat};
use lazy_static::lazy_static;
use regex::Regex;
use tesseract::Tesseract;

lazy_static! {
    // Tried in order; the first pattern that matches anywhere in the text wins.
    static ref ID_NUMBER_PATTERNS: Vec<Regex> = vec![
        // Grouped digits such as "123-4567-8901", "123 456 7890" or "12345678901"
        Regex::new(r"\b\d{3}[ \t-]?\d{3,4}[ \t-]?\d{4}\b").unwrap(),
        // Bare digit run
        Regex::new(r"\b\d{10,12}\b").unwrap(),
    ];
}

/// Text recognition backend used by the ID extractor.
pub trait TextRecognizer {
    /// Recognize text in a binarized grayscale image.
    fn recognize(&mut self, binary: &GrayImage) -> Result<String, IdCropError>;
}

/// Tesseract-backed recognizer. A fresh engine is created for every call.
pub struct TesseractRecognizer {
    config: OcrConfig,
}

impl TesseractRecognizer {
    pub fn new(config: OcrConfig) -> Self {
        TesseractRecognizer { config }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&mut self, binary: &GrayImage) -> Result<String, IdCropError> {
        // Tesseract reads from disk, so hand the binarized image over as a temp PNG
        let temp_file = tempfile::Builder::new()
            .prefix("idcrop_ocr_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| IdCropError::OcrFailure(format!("Failed to create temp file: {}", e)))?;

        binary
            .save_with_format(temp_file.path(), ImageFormat::Png)
            .map_err(|e| IdCropError::OcrFailure(format!("Failed to write temp image: {}", e)))?;

        let image_path_str = temp_file.path().to_str().ok_or_else(|| {
            IdCropError::OcrFailure("Failed to convert path to string".to_string())
        })?;

        let datapath = match &self.config.tessdata_dir {
            Some(dir) => Some(dir.to_str().ok_or_else(|| {
                IdCropError::OcrFailure(format!("Invalid tessdata path: {}", dir.display()))
            })?),
            None => None,
        };

        let mut tess = Tesseract::new(datapath, Some(self.config.language.as_str()))
            .map_err(|e| IdCropError::OcrFailure(format!("Tesseract init error: {}", e)))?
            .set_image(image_path_str)
            .map_err(|e| IdCropError::OcrFailure(format!("Tesseract set image error: {}", e)))?
            .set_variable("preserve_interword_spaces", "1")
            .map_err(|e| IdCropError::OcrFailure(format!("Tesseract set variable error: {}", e)))?;

        if let Some(whitelist) = &self.config.char_whitelist {
            tess = tess
                .set_variable("tessedit_char_whitelist", whitelist)
                .map_err(|e| {
                    IdCropError::OcrFailure(format!("Tesseract set variable error: {}", e))
                })?;
        }

        tess.set_page_seg_mode(self.config.page_seg_mode.to_tesseract());

        let text = tess
            .get_text()
            .map_err(|e| IdCropError::OcrFailure(format!("Tesseract error: {}", e)))?;

        Ok(text)
    }
}

pub struct OcrProcessor;

impl OcrProcessor {
    /// Find an ID number in OCR output. Separators are stripped from the match.
    pub fn find_id_in_text(text: &str) -> Option<String> {
        for pattern in ID_NUMBER_PATTERNS.iter() {
            if let Some(matched) = pattern.find(text) {
                let id: String = matched
                    .as_str()
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '-')
                    .collect();
                return Some(id);
            }
        }
        None
    }

    /// Binarize the image, run OCR over it and look for an ID number.
    ///
    /// OCR errors are reported and treated as "no ID found".
    pub fn extract_id_number(
        recognizer: &mut dyn TextRecognizer,
        img: &DynamicImage,
    ) -> Option<String> {
        let binary = ImageProcessor::binarize(img);

        let text = match recognizer.recognize(&binary) {
            Ok(text) => text,
            Err(e) => {
                println!("Error extracting text: {}", e);
                log::warn!("OCR failed, falling back to input file name: {}", e);
                return None;
            }
        };
        log::debug!("OCR result:\n{}", text);

        let id = Self::find_id_in_text(&text);
        match &id {
            Some(id) => println!("Extracted ID: {}", id),
            None => println!("No ID number found in image text"),
        }
        id
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedText(Result<String, String>);

    impl TextRecognizer for FixedText {
        fn recognize(&mut self, _binary: &GrayImage) -> Result<String, IdCropError> {
            self.0.clone().map_err(IdCropError::OcrFailure)
        }
    }

    #[test]
    fn test_dashed_id() {
        assert_eq!(
            OcrProcessor::find_id_in_text("Test ID: 123-4567-8901"),
            Some("12345678901".to_string())
        );
    }

    #[test]
    fn test_spaced_id() {
        assert_eq!(
            OcrProcessor::find_id_in_text("NO 123 4567 8901\nREPUBLIC"),
            Some("12345678901".to_string())
        );
    }

    #[test]
    fn test_plain_id() {
        assert_eq!(
            OcrProcessor::find_id_in_text("ID12 12345678901 X"),
            Some("12345678901".to_string())
        );
    }

    #[test]
    fn test_three_three_four_grouping() {
        assert_eq!(
            OcrProcessor::find_id_in_text("card 555-123-4567"),
            Some("5551234567".to_string())
        );
    }

    #[test]
    fn test_twelve_digit_run_uses_second_pattern() {
        assert_eq!(
            OcrProcessor::find_id_in_text("serial 123456789012 end"),
            Some("123456789012".to_string())
        );
    }

    #[test]
    fn test_groups_on_separate_lines_are_not_joined() {
        assert_eq!(OcrProcessor::find_id_in_text("123\n4567\n8901"), None);
        assert_eq!(
            OcrProcessor::find_id_in_text("DOB 1980\n555\t123-4567"),
            Some("5551234567".to_string())
        );
    }

    #[test]
    fn test_no_id_in_text() {
        assert_eq!(OcrProcessor::find_id_in_text("NAME JOHN DOE 1980"), None);
        assert_eq!(OcrProcessor::find_id_in_text("12345"), None);
        assert_eq!(OcrProcessor::find_id_in_text(""), None);
    }

    #[test]
    fn test_ocr_failure_is_soft() {
        let img = DynamicImage::new_luma8(20, 20);
        let mut recognizer = FixedText(Err("engine unavailable".to_string()));
        assert_eq!(OcrProcessor::extract_id_number(&mut recognizer, &img), None);
    }

    #[test]
    fn test_extract_from_recognized_text() {
        let img = DynamicImage::new_luma8(20, 20);
        let mut recognizer = FixedText(Ok("ID 987-6543-2100\n".to_string()));
        assert_eq!(
            OcrProcessor::extract_id_number(&mut recognizer, &img),
            Some("98765432100".to_string())
        );
    }
}
