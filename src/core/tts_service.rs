// Speech synthesis through the ElevenLabs text-to-speech API

use crate::core::config::{Config, Paths};
use crate::models::tts::{
    SynthesisOutput, SynthesisRequest, TtsError, TtsResult, VoiceSettings, DEFAULT_MODEL_ID,
    DEFAULT_VOICE_ID,
};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";
pub const DEFAULT_OUTPUT_FILE: &str = "output.mp3";

#[derive(Debug, Clone)]
pub struct TtsSettings {
    pub api_key: Option<String>,
    pub api_base: String,
    pub voice_id: String,
    pub model_id: String,
    pub voice_settings: VoiceSettings,
    pub output_dir: PathBuf,
    pub public_url_prefix: String,
}

impl TtsSettings {
    /// Settings for the kiosk layout, with the key resolved from config or environment
    pub fn from_config(config: &Config, paths: &Paths) -> Self {
        Self {
            api_key: config.resolve_elevenlabs_key(),
            api_base: ELEVENLABS_API_BASE.to_string(),
            voice_id: DEFAULT_VOICE_ID.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            voice_settings: VoiceSettings::default(),
            output_dir: paths.tts_output_dir.clone(),
            public_url_prefix: config.tts_public_url_prefix.clone(),
        }
    }
}

pub struct TtsService {
    settings: TtsSettings,
    client: reqwest::blocking::Client,
}

impl TtsService {
    /// Creates the output directory. A missing key is only reported on `synthesize`.
    pub fn new(settings: TtsSettings) -> TtsResult<Self> {
        fs::create_dir_all(&settings.output_dir)?;
        if settings.api_key.is_none() {
            warn!("No ElevenLabs API key configured");
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;
        Ok(Self { settings, client })
    }

    /// Synthesize `text` into `<output_dir>/<output_file>`
    pub fn synthesize(&self, text: &str, output_file: &str) -> TtsResult<SynthesisOutput> {
        let api_key = self.settings.api_key.as_deref().ok_or(TtsError::Credential)?;

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.settings.api_base.trim_end_matches('/'),
            self.settings.voice_id
        );
        let request = SynthesisRequest {
            text,
            model_id: &self.settings.model_id,
            voice_settings: &self.settings.voice_settings,
        };

        info!("Synthesizing {} characters with voice {}", text.chars().count(), self.settings.voice_id);
        let mut response = self
            .client
            .post(&url)
            .header("xi-api-key", api_key)
            .header("accept", "audio/mpeg")
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TtsError::Synthesis(format!("{} - {}", status, body.trim())));
        }

        let audio_path = self.settings.output_dir.join(output_file);
        // Partial audio is removed on failure
        let written = match write_audio(&mut response, &audio_path) {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&audio_path) {
                    warn!("Could not remove {}: {}", audio_path.display(), cleanup);
                }
                return Err(e);
            }
        };
        info!("Wrote {} bytes of audio to {}", written, audio_path.display());

        Ok(SynthesisOutput {
            audio_path: audio_path.display().to_string(),
            audio_url: format!(
                "{}/{}",
                self.settings.public_url_prefix.trim_end_matches('/'),
                output_file
            ),
        })
    }
}

fn write_audio(response: &mut reqwest::blocking::Response, path: &Path) -> TtsResult<u64> {
    let mut writer = BufWriter::new(fs::File::create(path)?);
    let written = response
        .copy_to(&mut writer)
        .map_err(|e| TtsError::Synthesis(e.to_string()))?;
    writer.flush()?;
    Ok(written)
}
