// Advanced pose detection - body, hands and face with quality scoring
//
// Runs the holistic solution, scores the body landmarks and renders the requested
// overlays either in ControlNet style (white on black) or MediaPipe colors.

use crate::core::frame_io::{decode_base64_frame, load_image_file, save_png_base64};
use crate::core::pose_quality::calculate_pose_quality;
use crate::core::skeleton_renderer::{blank_canvas, render_holistic, DrawOptions};
use crate::models::pose::{
    DetectedPerson, PoseConfig, PoseError, PoseResult, SkeletonOutput,
};
use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};
use image::RgbImage;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, warn};

/// Options accepted by the advanced CLI as a JSON object
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdvancedOptions {
    pub draw_hands: bool,
    pub draw_face: bool,
    pub colorful: bool,
    /// Minimum overall quality (0-100) for file input
    pub min_quality: f64,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            draw_hands: true,
            draw_face: true,
            colorful: false,
            min_quality: 0.0,
        }
    }
}

impl AdvancedOptions {
    /// Parse user options. Unparseable input keeps the defaults.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(options) => options,
            Err(e) => {
                warn!("Ignoring invalid options {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    pub fn draw_options(&self) -> DrawOptions {
        DrawOptions {
            draw_pose: true,
            draw_hands: self.draw_hands,
            draw_face: self.draw_face,
            colorful: self.colorful,
        }
    }
}

pub struct AdvancedPoseDetector<B: MediaPipeBridge = DefaultMediaPipe> {
    bridge: B,
}

impl AdvancedPoseDetector<DefaultMediaPipe> {
    pub fn new() -> PoseResult<Self> {
        Self::with_config(&PoseConfig::holistic())
    }
}

impl<B: MediaPipeBridge> AdvancedPoseDetector<B> {
    pub fn with_config(config: &PoseConfig) -> PoseResult<Self> {
        Ok(Self::with_backend(B::new(config)?))
    }

    pub fn with_backend(bridge: B) -> Self {
        info!("Advanced pose detector using {}", bridge.get_model_info());
        Self { bridge }
    }

    /// Detect one person, score the pose and write the skeleton PNG
    pub fn process_single_person(
        &self,
        image: &RgbImage,
        output_path: &Path,
        options: &DrawOptions,
    ) -> PoseResult<SkeletonOutput> {
        let result = self.bridge.process_frame(image)?;
        if !result.has_pose() {
            return Err(PoseError::NoDetection);
        }

        let quality = calculate_pose_quality(result.pose.as_deref());
        let features = result.detected_features();
        debug!("Detected features: {:?}", features);

        let mut canvas = blank_canvas(image.width(), image.height());
        render_holistic(&mut canvas, &result, options);
        let skeleton_base64 = save_png_base64(&canvas, output_path)?;

        info!(
            "Pose detected with score {:.1} in {} ms",
            quality.overall_score, result.processing_time_ms
        );

        Ok(SkeletonOutput {
            skeleton_path: output_path.display().to_string(),
            skeleton_base64,
            message: format!("Pose detected (quality: {})", quality.quality_level.as_str()),
            pose_quality: Some(quality),
            detected_features: Some(features),
        })
    }

    /// List the people in the frame. The holistic solution tracks a single person,
    /// so this yields at most one entry.
    pub fn detect_multiple_people(&self, image: &RgbImage) -> PoseResult<Vec<DetectedPerson>> {
        let result = self.bridge.process_frame(image)?;
        let people = match result.pose {
            Some(pose) if !pose.is_empty() => {
                let quality = calculate_pose_quality(Some(&pose));
                vec![DetectedPerson {
                    person_id: 0,
                    pose_landmarks: pose,
                    quality,
                }]
            }
            _ => Vec::new(),
        };
        Ok(people)
    }

    /// Process an image file, then reject the result when its quality is below
    /// `options.min_quality`. The skeleton file is written before the check.
    pub fn process_image(
        &self,
        image_path: &Path,
        output_path: &Path,
        options: &AdvancedOptions,
    ) -> PoseResult<SkeletonOutput> {
        let image = load_image_file(image_path)?;
        let output = self.process_single_person(&image, output_path, &options.draw_options())?;

        if let Some(quality) = &output.pose_quality {
            if quality.overall_score < options.min_quality {
                warn!(
                    "Rejecting pose with score {:.1} (minimum {:.1})",
                    quality.overall_score, options.min_quality
                );
                return Err(PoseError::LowQuality(quality.clone()));
            }
        }
        Ok(output)
    }

    /// Process a base64 camera frame. No quality filter is applied.
    pub fn process_webcam_frame(
        &self,
        frame: &str,
        output_path: &Path,
        options: &DrawOptions,
    ) -> PoseResult<SkeletonOutput> {
        let image = decode_base64_frame(frame)?;
        self.process_single_person(&image, output_path, options)
    }
}
