// Pose quality scoring - rates how well a landmark set was detected

use crate::models::pose::{Landmark, PoseQuality, QualityLevel};

/// Visibility above which a landmark counts toward coverage
const VISIBLE_THRESHOLD: f32 = 0.5;

/// Score a landmark set on a 0-100 scale.
///
/// `overall = 0.5 * visibility + 0.3 * presence + 0.2 * coverage`, where visibility and
/// presence are the mean scores as percentages and coverage is the percentage of landmarks
/// with visibility above 0.5. Missing scores count as zero. The level is taken from the
/// unrounded overall score; reported scores are rounded to 2 decimals.
pub fn calculate_pose_quality(landmarks: Option<&[Landmark]>) -> PoseQuality {
    let landmarks = match landmarks {
        Some(l) if !l.is_empty() => l,
        _ => return PoseQuality::none(),
    };

    let total_landmarks = landmarks.len();
    let mut total_visibility = 0.0f64;
    let mut total_presence = 0.0f64;
    let mut visible_landmarks = 0usize;

    for landmark in landmarks {
        total_visibility += landmark.visibility.unwrap_or(0.0) as f64;
        total_presence += landmark.presence.unwrap_or(0.0) as f64;
        if landmark.is_visible(VISIBLE_THRESHOLD) {
            visible_landmarks += 1;
        }
    }

    let total = total_landmarks as f64;
    let visibility_score = total_visibility / total * 100.0;
    let presence_score = total_presence / total * 100.0;
    let coverage = visible_landmarks as f64 / total * 100.0;

    // Integer weights keep exact inputs exact (0.3 and 0.2 are not representable)
    let overall_score = (5.0 * visibility_score + 3.0 * presence_score + 2.0 * coverage) / 10.0;

    PoseQuality {
        overall_score: round2(overall_score),
        visibility_score: round2(visibility_score),
        presence_score: round2(presence_score),
        coverage: round2(coverage),
        quality_level: QualityLevel::from_score(overall_score),
        visible_landmarks,
        total_landmarks,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
