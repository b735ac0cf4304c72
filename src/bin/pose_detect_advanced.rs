// Advanced pose detector: body, hands and face with quality scoring
//
// Usage: pose_detect_advanced <file|webcam> <input> <output> [options_json]
// options_json: {"draw_hands": true, "draw_face": true, "colorful": false, "min_quality": 0}

use clap::{Parser, ValueEnum};
use kiosk_lib::cli::{self, DetectionReport};
use kiosk_lib::core::advanced_pose_detector::{AdvancedOptions, AdvancedPoseDetector};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str =
    "Usage: pose_detect_advanced <mode> <input> <output> [options_json] (mode: file or webcam)";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    File,
    Webcam,
}

#[derive(Parser)]
#[command(version, about = "Render a holistic skeleton with a quality score")]
struct Args {
    #[arg(value_enum)]
    mode: Mode,
    #[arg(allow_hyphen_values = true)]
    input: String,
    output: PathBuf,
    /// JSON object with draw_hands, draw_face, colorful and min_quality
    #[arg(allow_hyphen_values = true)]
    options: Option<String>,
    #[arg(hide = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = match cli::parse_args::<Args>(USAGE) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let options = args
        .options
        .as_deref()
        .map(AdvancedOptions::from_json)
        .unwrap_or_default();

    let report = match AdvancedPoseDetector::new() {
        Ok(detector) => DetectionReport::from(match args.mode {
            Mode::File => detector.process_image(Path::new(&args.input), &args.output, &options),
            Mode::Webcam => {
                detector.process_webcam_frame(&args.input, &args.output, &options.draw_options())
            }
        }),
        Err(e) => DetectionReport::from(Err(e)),
    };

    cli::print_json(&report);
    ExitCode::SUCCESS
}
