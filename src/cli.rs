// Command-line plumbing shared by the `idcrop` and `idcrop_id` binaries
use crate::config::{CropConfig, FacePolicy};
use crate::models::CropOutcome;
use crate::utils::IdCropError;
use clap::{Args, Parser};
use env_logger::Env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra Haar cascade location, tried before the configured ones (repeatable)
    #[arg(long = "cascade", value_name = "PATH")]
    pub cascades: Vec<PathBuf>,

    /// Tesseract data directory
    #[arg(long, value_name = "DIR")]
    pub tessdata: Option<PathBuf>,

    /// Save every detected face instead of only the first one
    #[arg(long)]
    pub all_faces: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
            .format_timestamp(None)
            .try_init();
    }

    /// Config file (or defaults) with the command-line overrides applied on top.
    pub fn build_config(&self) -> Result<CropConfig, IdCropError> {
        let mut config = match &self.config {
            Some(path) => CropConfig::from_file(path)?,
            None => CropConfig::default(),
        };

        config.prepend_cascade_candidates(&self.cascades);
        if let Some(dir) = &self.tessdata {
            config.ocr.tessdata_dir = Some(dir.clone());
        }
        if self.all_faces {
            config.face_policy = FacePolicy::All;
        }
        Ok(config)
    }
}

/// Parse the process arguments, mapping usage errors to exit code 1 (help and version exit 0).
pub fn parse_args<T: Parser>() -> Result<T, ExitCode> {
    parse_args_from(std::env::args_os())
}

pub fn parse_args_from<T, I, S>(args: I) -> Result<T, ExitCode>
where
    T: Parser,
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|e| {
        let code = if e.use_stderr() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
        let _ = e.print();
        code
    })
}

/// Print the final diagnostic for a run and turn it into an exit code.
pub fn report(result: Result<CropOutcome, IdCropError>) -> ExitCode {
    match result {
        Ok(outcome) => {
            log::info!(
                "Saved {} crop(s) from {} detected face(s)",
                outcome.saved.len(),
                outcome.faces_detected
            );
            ExitCode::SUCCESS
        }
        Err(IdCropError::NoFaceDetected) => {
            println!("No face detected");
            ExitCode::FAILURE
        }
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        input: PathBuf,
        #[command(flatten)]
        common: CommonArgs,
    }

    #[test]
    fn test_overrides_apply_on_top_of_defaults() {
        let cli = TestCli::try_parse_from([
            "idcrop",
            "in.jpg",
            "--cascade",
            "/a.xml",
            "--cascade",
            "/b.xml",
            "--tessdata",
            "/opt/tessdata",
            "--all-faces",
        ])
        .unwrap();

        let config = cli.common.build_config().unwrap();
        assert_eq!(config.cascade_candidates[0], PathBuf::from("/a.xml"));
        assert_eq!(config.cascade_candidates[1], PathBuf::from("/b.xml"));
        assert_eq!(config.cascade_candidates.len(), 6);
        assert_eq!(config.ocr.tessdata_dir, Some(PathBuf::from("/opt/tessdata")));
        assert_eq!(config.face_policy, FacePolicy::All);
    }

    #[test]
    fn test_no_flags_gives_defaults() {
        let cli = TestCli::try_parse_from(["idcrop", "in.jpg"]).unwrap();
        let config = cli.common.build_config().unwrap();
        assert_eq!(config.cascade_candidates.len(), 4);
        assert_eq!(config.face_policy, FacePolicy::First);
    }

    #[test]
    fn test_missing_config_file() {
        let cli =
            TestCli::try_parse_from(["idcrop", "in.jpg", "--config", "/nonexistent/idcrop.json"])
                .unwrap();
        assert!(matches!(
            cli.common.build_config(),
            Err(IdCropError::Config(_))
        ));
    }

    #[test]
    fn test_usage_error_exits_with_failure() {
        let result = parse_args_from::<TestCli, _, _>(["idcrop"]);
        assert_eq!(result.unwrap_err(), ExitCode::FAILURE);

        let result = parse_args_from::<TestCli, _, _>(["idcrop", "in.jpg", "--bogus"]);
        assert_eq!(result.unwrap_err(), ExitCode::FAILURE);
    }

    #[test]
    fn test_help_exits_with_success() {
        let result = parse_args_from::<TestCli, _, _>(["idcrop", "--help"]);
        assert_eq!(result.unwrap_err(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_report_exit_codes() {
        let outcome = CropOutcome {
            saved: vec![PathBuf::from("face.png")],
            faces_detected: 1,
            extracted_id: None,
        };
        assert_eq!(report(Ok(outcome)), ExitCode::SUCCESS);
        assert_eq!(report(Err(IdCropError::NoFaceDetected)), ExitCode::FAILURE);
        assert_eq!(
            report(Err(IdCropError::ModelNotFound(
                "haarcascade_frontalface_default.xml".to_string()
            ))),
            ExitCode::FAILURE
        );
        assert_eq!(
            report(Err(IdCropError::InputNotFound(PathBuf::from("missing.jpg")))),
            ExitCode::FAILURE
        );
        assert_eq!(
            report(Err(IdCropError::SaveFailure("disk full".to_string()))),
            ExitCode::FAILURE
        );
    }
}
