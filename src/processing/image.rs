use crate::utils::IdCropError;
use image::{DynamicImage, GenericImageView, GrayImage};
use imageproc::contrast::{otsu_level, threshold};
use std::path::Path;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode the image at `image_path` into a pixel grid.
    pub fn load_image(image_path: &Path) -> Result<DynamicImage, IdCropError> {
        if !image_path.exists() {
            return Err(IdCropError::InputNotFound(image_path.to_path_buf()));
        }

        let img = image::open(image_path).map_err(|e| {
            IdCropError::ImageDecodeFailure(format!("{}: {}", image_path.display(), e))
        })?;

        if img.width() == 0 || img.height() == 0 {
            return Err(IdCropError::ImageDecodeFailure(format!(
                "{}: image has zero dimensions",
                image_path.display()
            )));
        }

        log::debug!(
            "Loaded {} ({}x{}, {:?})",
            image_path.display(),
            img.width(),
            img.height(),
            img.color()
        );
        Ok(img)
    }

    pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
        img.to_luma8()
    }

    /// Grayscale then Otsu binarization, for OCR contrast.
    pub fn binarize(img: &DynamicImage) -> GrayImage {
        let gray = Self::to_grayscale(img);
        let level = otsu_level(&gray);
        log::debug!("Otsu threshold level: {}", level);
        threshold(&gray, level)
    }
}
