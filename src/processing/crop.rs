use crate::models::{CropRegion, DetectionBox};
use image::DynamicImage;

/// Padding added on every side of a face box, as a fraction of the box height.
pub const PADDING_RATIO: f64 = 0.3;

pub struct CropPlanner;

impl CropPlanner {
    /// Padding in pixels for a box of the given height, rounded down.
    pub fn padding_for(height: i32) -> i64 {
        (PADDING_RATIO * height.max(0) as f64).floor() as i64
    }

    /// Expand `face` by its padding and clamp it to a `width` x `height` image.
    ///
    /// Returns `None` when nothing of the padded box lands inside the image.
    pub fn plan(face: &DetectionBox, width: u32, height: u32) -> Option<CropRegion> {
        let padding = Self::padding_for(face.height);
        let (x, y) = (face.x as i64, face.y as i64);
        let (w, h) = (face.width.max(0) as i64, face.height.max(0) as i64);

        let x1 = (x - padding).clamp(0, width as i64);
        let y1 = (y - padding).clamp(0, height as i64);
        let x2 = (x + w + padding).clamp(0, width as i64);
        let y2 = (y + h + padding).clamp(0, height as i64);

        if x2 <= x1 || y2 <= y1 {
            log::warn!("Face box {:?} falls outside the {}x{} image", face, width, height);
            return None;
        }

        Some(CropRegion {
            x1: x1 as u32,
            y1: y1 as u32,
            x2: x2 as u32,
            y2: y2 as u32,
        })
    }

    /// Cut the planned region out of the source, keeping its pixel layout.
    pub fn crop(img: &DynamicImage, region: &CropRegion) -> DynamicImage {
        img.crop_imm(region.x1, region.y1, region.width(), region.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn test_padding_rounds_down() {
        assert_eq!(CropPlanner::padding_for(100), 30);
        assert_eq!(CropPlanner::padding_for(47), 14);
        assert_eq!(CropPlanner::padding_for(3), 0);
    }

    #[test]
    fn test_plan_centered_face() {
        let face = DetectionBox::new(200, 150, 100, 100);
        let region = CropPlanner::plan(&face, 640, 480).unwrap();
        assert_eq!(
            region,
            CropRegion {
                x1: 170,
                y1: 120,
                x2: 330,
                y2: 280
            }
        );
        assert_eq!(region.width(), 160);
        assert_eq!(region.height(), 160);
    }

    #[test]
    fn test_plan_clamps_to_image_edges() {
        let face = DetectionBox::new(10, 5, 80, 80);
        let region = CropPlanner::plan(&face, 100, 90).unwrap();
        assert_eq!(region.x1, 0);
        assert_eq!(region.y1, 0);
        assert_eq!(region.x2, 100);
        assert_eq!(region.y2, 90);
    }

    #[test]
    fn test_plan_box_outside_image() {
        let face = DetectionBox::new(500, 500, 20, 20);
        assert_eq!(CropPlanner::plan(&face, 100, 100), None);
    }

    #[test]
    fn test_crop_keeps_region_size() {
        let img = DynamicImage::new_rgb8(120, 80);
        let region = CropRegion {
            x1: 10,
            y1: 20,
            x2: 70,
            y2: 80,
        };
        let cropped = CropPlanner::crop(&img, &region);
        assert_eq!(cropped.dimensions(), (60, 60));
    }
}
