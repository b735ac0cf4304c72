// Data models for pose estimation, hand tracking and face landmarks

use serde::{Deserialize, Serialize};

// ==============================================================================
// Landmarks
// ==============================================================================

/// A single detected keypoint in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates
    pub z: f32, // Depth relative to the hip midpoint (body) or wrist (hand)
    /// Likelihood the landmark is visible; only body landmarks carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
    /// Likelihood the landmark is inside the frame; only body landmarks carry it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
            presence: None,
        }
    }

    pub fn with_scores(x: f32, y: f32, z: f32, visibility: f32, presence: f32) -> Self {
        Self {
            x,
            y,
            z,
            visibility: Some(visibility),
            presence: Some(presence),
        }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility.unwrap_or(0.0) > threshold
    }
}

/// Ordered landmarks for one body part (33 body, 21 per hand, 468/478 face)
pub type LandmarkSet = Vec<Landmark>;

// ==============================================================================
// Holistic Result (Unified Result)
// ==============================================================================

/// Everything a detector found in one image. A missing part is `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolisticResult {
    pub pose: Option<LandmarkSet>,
    pub left_hand: Option<LandmarkSet>,
    pub right_hand: Option<LandmarkSet>,
    pub face: Option<LandmarkSet>,
    pub processing_time_ms: u64,
}

impl HolisticResult {
    pub fn has_pose(&self) -> bool {
        self.pose.as_ref().is_some_and(|p| !p.is_empty())
    }

    pub fn detected_features(&self) -> DetectedFeatures {
        DetectedFeatures {
            pose: self.has_pose(),
            left_hand: self.left_hand.is_some(),
            right_hand: self.right_hand.is_some(),
            face: self.face.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedFeatures {
    pub pose: bool,
    pub left_hand: bool,
    pub right_hand: bool,
    pub face: bool,
}

// ==============================================================================
// Pose Quality
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
    None,
}

impl QualityLevel {
    /// Map an overall score (0-100) to its level. Boundaries are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            QualityLevel::Excellent
        } else if score >= 60.0 {
            QualityLevel::Good
        } else if score >= 40.0 {
            QualityLevel::Fair
        } else {
            QualityLevel::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "excellent",
            QualityLevel::Good => "good",
            QualityLevel::Fair => "fair",
            QualityLevel::Poor => "poor",
            QualityLevel::None => "none",
        }
    }
}

/// Heuristic rating of a landmark set. Scores are percentages rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseQuality {
    pub overall_score: f64,
    pub visibility_score: f64,
    pub presence_score: f64,
    pub coverage: f64,
    pub quality_level: QualityLevel,
    pub visible_landmarks: usize,
    pub total_landmarks: usize,
}

impl PoseQuality {
    pub fn none() -> Self {
        Self {
            overall_score: 0.0,
            visibility_score: 0.0,
            presence_score: 0.0,
            coverage: 0.0,
            quality_level: QualityLevel::None,
            visible_landmarks: 0,
            total_landmarks: 0,
        }
    }
}

/// One entry of the multi-person listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPerson {
    pub person_id: u32,
    pub pose_landmarks: LandmarkSet,
    pub quality: PoseQuality,
}

/// What a successful detection hands back to the caller
#[derive(Debug, Clone)]
pub struct SkeletonOutput {
    pub skeleton_path: String,
    pub skeleton_base64: String,
    pub pose_quality: Option<PoseQuality>,
    pub detected_features: Option<DetectedFeatures>,
    pub message: String,
}

// ==============================================================================
// Configuration
// ==============================================================================

/// Which MediaPipe solution the bridge should load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaPipeModel {
    Pose,     // 33 body keypoints
    Holistic, // Body, both hands and face mesh combined
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelComplexity {
    Lite = 0,  // Fastest, less accurate
    Full = 1,  // Balanced
    Heavy = 2, // Slowest, most accurate
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseConfig {
    pub model: MediaPipeModel,
    pub enable_body_tracking: bool,
    pub enable_face_tracking: bool,
    pub enable_hand_tracking: bool,
    pub model_complexity: ModelComplexity,
    pub min_detection_confidence: f32, // Minimum confidence for detection (default: 0.5)
    pub min_tracking_confidence: f32,  // Minimum confidence for tracking (default: 0.5)
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            model: MediaPipeModel::Pose,
            enable_body_tracking: true,
            enable_face_tracking: false,
            enable_hand_tracking: false,
            model_complexity: ModelComplexity::Full,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }
}

impl PoseConfig {
    /// Body, hands and face in one pass
    pub fn holistic() -> Self {
        Self {
            model: MediaPipeModel::Holistic,
            enable_face_tracking: true,
            enable_hand_tracking: true,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PoseResult<()> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::InvalidConfig(format!(
                    "{} must be between 0.0 and 1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Could not read image: {0}")]
    Decode(String),

    #[error("No pose detected")]
    NoDetection,

    #[error("Pose quality too low (score: {:.1})", .0.overall_score)]
    LowQuality(PoseQuality),

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to encode skeleton image: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PoseError {
    /// Quality attached to a rejected detection, if any
    pub fn pose_quality(&self) -> Option<&PoseQuality> {
        match self {
            PoseError::LowQuality(quality) => Some(quality),
            _ => None,
        }
    }
}

pub type PoseResult<T> = Result<T, PoseError>;
