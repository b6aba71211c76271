// idcrop: detect a face in an image and save an ID-photo style crop of it
use clap::Parser;
use idcrop::cli::{self, CommonArgs};
use idcrop::FaceCropper;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "idcrop", version, about = "Detect a face and save a padded crop of it")]
struct Cli {
    /// Image to search for a face
    input_image: PathBuf,

    /// Where to write the cropped face
    output_image: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> ExitCode {
    let args: Cli = match cli::parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };
    args.common.init_logging();

    let config = match args.common.build_config() {
        Ok(config) => config,
        Err(e) => return cli::report(Err(e)),
    };

    let mut cropper = FaceCropper::new(config);
    cli::report(cropper.crop_to_file(&args.input_image, &args.output_image))
}
