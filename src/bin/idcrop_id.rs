// idcrop_id: crop the face from an ID card, optionally naming the file after the card number
use clap::Parser;
use idcrop::cli::{self, CommonArgs};
use idcrop::FaceCropper;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "idcrop_id",
    version,
    about = "Crop the face from an ID image into a directory, optionally named by the ID number"
)]
struct Cli {
    /// ID card or photo to process
    input_image: PathBuf,

    /// Directory that receives the cropped face
    output_dir: PathBuf,

    /// Read the ID number with OCR and use it as the output file name
    #[arg(long)]
    use_id: bool,

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
    let result = cropper.crop_to_dir(&args.input_image, &args.output_dir, args.use_id);
    if let Ok(outcome) = &result {
        if args.use_id && outcome.extracted_id.is_none() {
            println!("Falling back to input file name");
        }
    }
    cli::report(result)
}
