use crate::utils::IdCropError;
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;
use std::path::{Path, PathBuf};

pub struct CascadeResolver;

impl CascadeResolver {
    /// First candidate that exists on disk, in the given order.
    pub fn resolve(candidates: &[PathBuf]) -> Result<PathBuf, IdCropError> {
        for candidate in candidates {
            log::debug!("Checking cascade candidate {}", candidate.display());
            if candidate.exists() {
                log::info!("Using cascade file {}", candidate.display());
                return Ok(candidate.clone());
            }
        }

        let tried = candidates
            .iter()
            .map(|c| c.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(IdCropError::ModelNotFound(format!("tried [{}]", tried)))
    }

    /// Resolve the cascade path and load it into an OpenCV classifier.
    pub fn load(candidates: &[PathBuf]) -> Result<CascadeClassifier, IdCropError> {
        let path = Self::resolve(candidates)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<CascadeClassifier, IdCropError> {
        let path_str = path.to_str().ok_or_else(|| {
            IdCropError::ModelNotFound(format!("non UTF-8 path {}", path.display()))
        })?;

        let classifier = CascadeClassifier::new(path_str).map_err(|e| {
            IdCropError::ModelNotFound(format!("failed to load {}: {}", path.display(), e))
        })?;

        // OpenCV hands back an empty classifier instead of failing on a bad XML file.
        let empty = classifier.empty().map_err(|e| {
            IdCropError::ModelNotFound(format!("failed to load {}: {}", path.display(), e))
        })?;
        if empty {
            return Err(IdCropError::ModelNotFound(format!(
                "{} is not a usable cascade",
                path.display()
            )));
        }

        Ok(classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_picks_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let second = dir.path().join("second.xml");
        let third = dir.path().join("third.xml");
        std::fs::write(&second, "<opencv_storage/>").unwrap();
        std::fs::write(&third, "<opencv_storage/>").unwrap();

        let candidates = vec![dir.path().join("missing.xml"), second.clone(), third];
        assert_eq!(CascadeResolver::resolve(&candidates).unwrap(), second);
    }

    #[test]
    fn test_resolve_without_any_candidate_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![dir.path().join("a.xml"), dir.path().join("b.xml")];

        let err = CascadeResolver::resolve(&candidates).unwrap_err();
        match err {
            IdCropError::ModelNotFound(msg) => assert!(msg.contains("a.xml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_empty_list() {
        assert!(matches!(
            CascadeResolver::resolve(&[]),
            Err(IdCropError::ModelNotFound(_))
        ));
    }
}
