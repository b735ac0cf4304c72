// Download the Piper voice used for offline TTS into <root>/models/tts

use anyhow::{Context, Result};
use clap::Parser;
use kiosk_lib::cli;
use kiosk_lib::core::config::Paths;
use kiosk_lib::core::ml_models::{piper, ConsoleProgress, ModelManager};
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about = "Download the en_US-lessac-medium Piper voice")]
struct Args {
    /// Keep files that are already downloaded
    #[arg(long)]
    skip_existing: bool,
}

fn run(args: &Args) -> Result<()> {
    let paths = Paths::from_env();
    let manager = ModelManager::new(paths.tts_model_dir.clone())
        .with_context(|| format!("Cannot create {}", paths.tts_model_dir.display()))?;

    println!("Downloading Piper voice en_US-lessac-medium");
    println!("Destination: {}", manager.cache_dir().display());

    let mut progress = ConsoleProgress::default();
    for model in piper::lessac_medium() {
        let path = if args.skip_existing {
            manager.ensure_model(&model, &mut progress)
        } else {
            manager.download(&model, &mut progress)
        }
        .with_context(|| format!("Failed to download {}", model.name))?;
        println!("Saved {}", path.display());
    }

    println!("Model download complete");
    Ok(())
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
