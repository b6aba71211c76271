use crate::utils::IdCropError;
use image::{DynamicImage, ImageFormat};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Encodes an image to a path. Swapped out in tests.
type WriteFn = fn(&DynamicImage, &Path) -> Result<(), IdCropError>;

pub struct OutputWriter;

impl OutputWriter {
    /// File name for a crop of `input`: the extracted ID when there is one,
    /// otherwise the input's own file name.
    pub fn output_file_name(
        input: &Path,
        extracted_id: Option<&str>,
        default_extension: &str,
    ) -> Result<OsString, IdCropError> {
        match extracted_id {
            Some(id) => {
                let extension = input
                    .extension()
                    .and_then(|e| e.to_str())
                    .filter(|e| !e.is_empty())
                    .unwrap_or(default_extension);
                Ok(OsString::from(format!(
                    "{}.{}",
                    Self::sanitize_id(id),
                    extension
                )))
            }
            None => input.file_name().map(|n| n.to_os_string()).ok_or_else(|| {
                IdCropError::SaveFailure(format!(
                    "Input path {} has no file name",
                    input.display()
                ))
            }),
        }
    }

    /// Replace anything that is not an ASCII letter or digit with `_`.
    pub fn sanitize_id(id: &str) -> String {
        id.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Create the parent directory of `path` if it does not exist yet.
    pub fn ensure_parent_dir(path: &Path) -> Result<(), IdCropError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                log::debug!("Creating output directory {}", parent.display());
                fs::create_dir_all(parent).map_err(|e| {
                    IdCropError::SaveFailure(format!(
                        "Could not create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(())
    }

    /// `path` itself if free, otherwise the first free `<stem>_N.<ext>` for N = 1, 2, ...
    pub fn unique_path(path: &Path) -> PathBuf {
        if !path.exists() {
            return path.to_path_buf();
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path.extension().map(|e| e.to_string_lossy().into_owned());

        let mut counter = 1u32;
        loop {
            let file_name = match &extension {
                Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                None => format!("{}_{}", stem, counter),
            };
            let candidate = path.with_file_name(file_name);
            if !candidate.exists() {
                log::debug!(
                    "{} exists, writing to {} instead",
                    path.display(),
                    candidate.display()
                );
                return candidate;
            }
            counter += 1;
        }
    }

    /// Save `img` to a free path derived from `path`, retrying once with the
    /// absolute form of that path. Returns where the file was written.
    pub fn save(img: &DynamicImage, path: &Path) -> Result<PathBuf, IdCropError> {
        Self::save_with(img, path, Self::encode)
    }

    fn save_with(
        img: &DynamicImage,
        path: &Path,
        write: WriteFn,
    ) -> Result<PathBuf, IdCropError> {
        let target = Self::unique_path(path);
        let encodable = Self::prepare_for_format(img, &target);

        let err = match Self::attempt(&encodable, &target, write) {
            Ok(()) => {
                println!("Face cropped and saved to: {}", target.display());
                return Ok(target);
            }
            Err(e) => e,
        };
        println!("Error saving image to {}: {}", target.display(), err);

        let abs_path = Self::absolute(&target)?;
        match Self::attempt(&encodable, &abs_path, write) {
            Ok(()) => {
                println!("Successfully saved to absolute path: {}", abs_path.display());
                Ok(abs_path)
            }
            Err(e) => {
                println!(
                    "Failed to save with absolute path {}: {}",
                    abs_path.display(),
                    e
                );
                Err(IdCropError::SaveFailure(format!(
                    "{}: {}",
                    abs_path.display(),
                    e
                )))
            }
        }
    }

    /// One save attempt. The error is the bare cause, without the `SaveFailure` prefix.
    fn attempt(img: &DynamicImage, path: &Path, write: WriteFn) -> Result<(), String> {
        Self::ensure_parent_dir(path)
            .and_then(|_| Self::write_checked(img, path, write))
            .map_err(|e| match e {
                IdCropError::SaveFailure(cause) => cause,
                other => other.to_string(),
            })
    }

    /// JPEG has no alpha channel, so anything other than plain luma goes out as RGB.
    fn prepare_for_format(img: &DynamicImage, path: &Path) -> DynamicImage {
        match ImageFormat::from_path(path) {
            Ok(ImageFormat::Jpeg) => match img {
                DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => img.clone(),
                _ => DynamicImage::ImageRgb8(img.to_rgb8()),
            },
            _ => img.clone(),
        }
    }

    fn encode(img: &DynamicImage, path: &Path) -> Result<(), IdCropError> {
        img.save(path).map_err(|e| IdCropError::SaveFailure(e.to_string()))
    }

    /// Write the image, rejecting results that leave an empty file behind.
    fn write_checked(img: &DynamicImage, path: &Path, write: WriteFn) -> Result<(), IdCropError> {
        write(img, path)?;

        let written = fs::metadata(path)
            .map_err(|e| IdCropError::SaveFailure(format!("{}: {}", path.display(), e)))?
            .len();
        if written == 0 {
            let _ = fs::remove_file(path);
            return Err(IdCropError::SaveFailure(format!(
                "{} is empty after writing",
                path.display()
            )));
        }
        Ok(())
    }

    fn absolute(path: &Path) -> Result<PathBuf, IdCropError> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        let cwd = std::env::current_dir().map_err(|e| {
            IdCropError::SaveFailure(format!(
                "{}: cannot resolve working directory: {}",
                path.display(),
                e
            ))
        })?;
        Ok(cwd.join(path))
    }
}
