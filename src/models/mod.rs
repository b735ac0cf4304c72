// Data models for pose estimation, image generation and speech synthesis

pub mod generation;
pub mod landmarks;
pub mod pose;
pub mod tts;
