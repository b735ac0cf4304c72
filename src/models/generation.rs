// Request/response models for the Stable Diffusion WebUI txt2img API

use serde::{Deserialize, Serialize};

pub const DEFAULT_NEGATIVE_PROMPT: &str = "bad quality, blurry, distorted, ugly, low resolution";

/// Text appended to the prompt when a skeleton is supplied
pub const POSE_HINT: &str = " (full body, standing pose)";

/// Body of a `POST /sdapi/v1/txt2img` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub steps: u32,
    pub cfg_scale: f32,
    pub width: u32,
    pub height: u32,
    pub sampler_name: String,
}

impl GenerationRequest {
    /// Request with the kiosk defaults: 8 Euler steps at cfg 2.0, 512x512
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
            steps: 8,
            cfg_scale: 2.0,
            width: 512,
            height: 512,
            sampler_name: "Euler".to_string(),
        }
    }

    /// Empty strings keep the default negative prompt
    pub fn with_negative_prompt(mut self, negative_prompt: &str) -> Self {
        if !negative_prompt.is_empty() {
            self.negative_prompt = negative_prompt.to_string();
        }
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }
}

/// Only the field we read back; the server also echoes parameters and info
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("API request failed: {0}")]
    Request(String),

    #[error("Image generation failed: server returned no images")]
    EmptyResponse,

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Request(err.to_string())
    }
}

pub type GenerationResult<T> = Result<T, GenerationError>;
