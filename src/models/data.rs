use std::path::PathBuf;

/// Axis-aligned face box reported by a detector, in source image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DetectionBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        DetectionBox {
            x,
            y,
            width,
            height,
        }
    }
}

/// Padded crop rectangle, clamped to the image it was planned for.
///
/// Corners are half-open: `x1..x2` by `y1..y2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRegion {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl CropRegion {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// What a successful crop run produced.
#[derive(Debug, Clone, Default)]
pub struct CropOutcome {
    pub saved: Vec<PathBuf>,
    pub faces_detected: usize,
    pub extracted_id: Option<String>,
}
