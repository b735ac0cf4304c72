// Request models for the ElevenLabs text-to-speech API

use serde::{Deserialize, Serialize};

/// "Rachel": expressive, multilingual
pub const DEFAULT_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_MODEL_ID: &str = "eleven_multilingual_v2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,        // 0.0-1.0
    pub similarity_boost: f32, // 0.0-1.0
    pub style: f32,            // Style exaggeration
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.5,
            use_speaker_boost: true,
        }
    }
}

/// Body of a `POST /v1/text-to-speech/{voice_id}` call
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: &'a VoiceSettings,
}

/// Where the synthesized audio ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisOutput {
    pub audio_path: String,
    pub audio_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TtsError {
    #[error("API key is not configured. Add elevenlabs_api_key to config.json or set ELEVENLABS_API_KEY")]
    Credential,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("Speech synthesis failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        TtsError::Synthesis(err.to_string())
    }
}

pub type TtsResult<T> = Result<T, TtsError>;
