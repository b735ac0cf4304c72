// Image generation through a Stable Diffusion WebUI compatible server

use crate::models::generation::{
    GenerationError, GenerationRequest, GenerationResponse, GenerationResult, POSE_HINT,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_API_URL: &str = "http://localhost:7861";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_ERROR_BODY: usize = 512;

pub struct SdImageGenerator {
    txt2img_endpoint: String,
    client: reqwest::blocking::Client,
}

impl SdImageGenerator {
    pub fn new(api_url: &str) -> GenerationResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            txt2img_endpoint: format!("{}/sdapi/v1/txt2img", api_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.txt2img_endpoint
    }

    /// Text-to-image with the default parameters
    pub fn generate_simple(&self, prompt: &str, output_path: &Path) -> GenerationResult<()> {
        self.generate(&GenerationRequest::new(prompt), output_path)
    }

    /// Text-to-image guided by a pose skeleton. The skeleton must be readable, but only
    /// a textual pose hint reaches the server; no conditioning image is sent.
    pub fn generate_with_pose_hint(
        &self,
        prompt: &str,
        skeleton_path: &Path,
        output_path: &Path,
    ) -> GenerationResult<()> {
        let skeleton = std::fs::read(skeleton_path)?;
        info!(
            "Using skeleton {} ({} bytes) as a pose hint",
            skeleton_path.display(),
            skeleton.len()
        );
        let request = GenerationRequest::new(format!("{}{}", prompt, POSE_HINT));
        self.generate(&request, output_path)
    }

    /// POST the request and save the first returned image
    pub fn generate(&self, request: &GenerationRequest, output_path: &Path) -> GenerationResult<()> {
        info!("Requesting {} steps at {}x{}", request.steps, request.width, request.height);

        let response = self
            .client
            .post(&self.txt2img_endpoint)
            .json(request)
            .send()
            .map_err(|e| {
                let msg = if e.is_timeout() {
                    format!("timed out after {}s", REQUEST_TIMEOUT.as_secs())
                } else {
                    e.to_string()
                };
                error!("txt2img request failed: {}", msg);
                GenerationError::Request(msg)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<failed to read body>".to_string());
            let truncated: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(GenerationError::Request(format!("{} - {}", status, truncated)));
        }

        let body: GenerationResponse = response.json()?;
        let first = body.images.first().ok_or(GenerationError::EmptyResponse)?;
        let image = STANDARD
            .decode(first)
            .map_err(|e| GenerationError::InvalidImage(e.to_string()))?;

        std::fs::write(output_path, &image)?;
        info!("Saved generated image to {} ({} bytes)", output_path.display(), image.len());
        Ok(())
    }
}
