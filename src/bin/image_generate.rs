// Text-to-image through a Stable Diffusion WebUI server
//
// Usage:
//   image_generate simple <prompt> <output>
//   image_generate controlnet <prompt> <skeleton_path> <output>

use clap::{Parser, Subcommand};
use kiosk_lib::cli::{self, Failure};
use kiosk_lib::core::config::{Config, Paths};
use kiosk_lib::core::image_generator::SdImageGenerator;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

const USAGE: &str = "Usage: image_generate <mode> <prompt> [skeleton_path] <output> (mode: simple or controlnet)";

#[derive(Parser)]
#[command(version, about = "Generate an image from a prompt")]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Plain text-to-image
    Simple {
        #[arg(allow_hyphen_values = true)]
        prompt: String,
        output: PathBuf,
        #[arg(hide = true, allow_hyphen_values = true)]
        _rest: Vec<String>,
    },
    /// Text-to-image with a pose hint taken from a skeleton image
    Controlnet {
        #[arg(allow_hyphen_values = true)]
        prompt: String,
        skeleton_path: PathBuf,
        output: PathBuf,
        #[arg(hide = true, allow_hyphen_values = true)]
        _rest: Vec<String>,
    },
}

#[derive(Serialize)]
struct Generated {
    success: bool,
    image_path: String,
    message: &'static str,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = match cli::parse_args::<Args>(USAGE) {
        Ok(args) => args,
        Err(code) => return code,
    };

    let paths = Paths::from_env();
    let config = Config::load_from(&paths.config_file).unwrap_or_else(|e| {
        warn!("Using default config: {}", e);
        Config::default()
    });

    let result = SdImageGenerator::new(&config.sd_api_url).and_then(|generator| match &args.mode {
        Mode::Simple { prompt, output, .. } => generator.generate_simple(prompt, output).map(|_| output),
        Mode::Controlnet {
            prompt,
            skeleton_path,
            output,
            ..
        } => generator
            .generate_with_pose_hint(prompt, skeleton_path, output)
            .map(|_| output),
    });

    match result {
        Ok(output) => cli::print_json(&Generated {
            success: true,
            image_path: output.display().to_string(),
            message: "Image generated",
        }),
        Err(e) => {
            warn!("Image generation failed: {}", e);
            cli::print_json(&Failure::new(e));
        }
    }
    ExitCode::SUCCESS
}
