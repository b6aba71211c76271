use crate::utils::IdCropError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Well-known install locations of the OpenCV frontal face cascade, in lookup order.
pub const DEFAULT_CASCADE_CANDIDATES: [&str; 4] = [
    "/usr/share/opencv4/haarcascades/haarcascade_frontalface_default.xml",
    "/usr/local/share/opencv4/haarcascades/haarcascade_frontalface_default.xml",
    "/usr/local/share/opencv/haarcascades/haarcascade_frontalface_default.xml",
    "haarcascade_frontalface_default.xml",
];

pub const DEFAULT_CHAR_WHITELIST: &str = "0123456789-ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Which detected faces a run turns into output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacePolicy {
    /// Crop the first face in detection order and stop.
    #[default]
    First,
    /// Crop every detected face, each into its own file.
    All,
}

/// Tesseract page segmentation modes the ID extractor supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegmentation {
    Auto,
    SingleColumn,
    #[default]
    SingleBlock,
    SingleLine,
}

impl PageSegmentation {
    pub fn to_tesseract(self) -> tesseract::PageSegMode {
        match self {
            PageSegmentation::Auto => tesseract::PageSegMode::PsmAuto,
            PageSegmentation::SingleColumn => tesseract::PageSegMode::PsmSingleColumn,
            PageSegmentation::SingleBlock => tesseract::PageSegMode::PsmSingleBlock,
            PageSegmentation::SingleLine => tesseract::PageSegMode::PsmSingleLine,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract data directory; `None` lets the engine use its compiled-in default.
    pub tessdata_dir: Option<PathBuf>,
    pub language: String,
    pub page_seg_mode: PageSegmentation,
    pub char_whitelist: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            tessdata_dir: None,
            language: "eng".to_string(),
            page_seg_mode: PageSegmentation::default(),
            char_whitelist: Some(DEFAULT_CHAR_WHITELIST.to_string()),
        }
    }
}

/// Runtime settings shared by both command-line tools.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub cascade_candidates: Vec<PathBuf>,
    pub face_policy: FacePolicy,
    /// Extension for ID-named outputs when the input file has none.
    pub default_extension: String,
    pub ocr: OcrConfig,
}

impl Default for CropConfig {
    fn default() -> Self {
        CropConfig {
            cascade_candidates: DEFAULT_CASCADE_CANDIDATES
                .iter()
                .map(PathBuf::from)
                .collect(),
            face_policy: FacePolicy::default(),
            default_extension: "jpg".to_string(),
            ocr: OcrConfig::default(),
        }
    }
}

impl CropConfig {
    /// Load a JSON configuration file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, IdCropError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            IdCropError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config: CropConfig = serde_json::from_str(&contents).map_err(|e| {
            IdCropError::Config(format!("Failed to parse config file {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Put extra cascade locations ahead of the configured ones.
    pub fn prepend_cascade_candidates(&mut self, extra: &[PathBuf]) {
        if extra.is_empty() {
            return;
        }
        let mut candidates = extra.to_vec();
        candidates.append(&mut self.cascade_candidates);
        self.cascade_candidates = candidates;
    }
}
