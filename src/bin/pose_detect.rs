// Basic pose detector: white skeleton PNG from an image file or camera frame
//
// Usage: pose_detect <file|webcam> <input> <output>

use clap::{Parser, ValueEnum};
use kiosk_lib::cli::{self, DetectionReport};
use kiosk_lib::core::pose_detector::PoseDetector;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "Usage: pose_detect <mode> <input> <output> (mode: file or webcam)";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Input is an image path
    File,
    /// Input is a base64 frame, optionally a data URL
    Webcam,
}

#[derive(Parser)]
#[command(version, about = "Render a pose skeleton from an image")]
struct Args {
    #[arg(value_enum)]
    mode: Mode,
    #[arg(allow_hyphen_values = true)]
    input: String,
    output: PathBuf,
    #[arg(hide = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = match cli::parse_args::<Args>(USAGE) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let report = match PoseDetector::new() {
        Ok(detector) => DetectionReport::from(match args.mode {
            Mode::File => detector.process_image(Path::new(&args.input), &args.output),
            Mode::Webcam => detector.process_webcam_frame(&args.input, &args.output),
        }),
        Err(e) => DetectionReport::from(Err(e)),
    };

    cli::print_json(&report);
    ExitCode::SUCCESS
}
