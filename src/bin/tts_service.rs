// Text-to-speech through ElevenLabs
//
// Usage: tts_service <text> [output_filename]

use clap::Parser;
use kiosk_lib::cli;
use kiosk_lib::core::config::{Config, Paths};
use kiosk_lib::core::tts_service::{TtsService, TtsSettings, DEFAULT_OUTPUT_FILE};
use serde::Serialize;
use std::process::ExitCode;
use tracing::warn;

const USAGE: &str = "Usage: tts_service <text> [output_filename]";

#[derive(Parser)]
#[command(version, about = "Synthesize speech into the kiosk output directory")]
struct Args {
    #[arg(allow_hyphen_values = true)]
    text: String,
    #[arg(default_value = DEFAULT_OUTPUT_FILE)]
    output_file: String,
    #[arg(hide = true, allow_hyphen_values = true)]
    _rest: Vec<String>,
}

#[derive(Serialize)]
struct TtsReport {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
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

    let result = TtsService::new(TtsSettings::from_config(&config, &paths))
        .and_then(|service| service.synthesize(&args.text, &args.output_file));

    let report = match result {
        Ok(output) => TtsReport {
            success: true,
            message: "Speech generated".to_string(),
            audio_path: Some(output.audio_path),
            audio_url: Some(output.audio_url),
            error: None,
        },
        Err(e) => {
            warn!("{}", e);
            TtsReport {
                success: false,
                message: e.to_string(),
                audio_path: None,
                audio_url: None,
                error: Some(e.to_string()),
            }
        }
    };

    cli::print_json(&report);
    ExitCode::SUCCESS
}
