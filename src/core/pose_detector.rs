use crate::core::frame_io::{decode_base64_frame, load_image_file, save_png_base64};
use crate::core::skeleton_renderer::{blank_canvas, render_pose};
use crate::models::pose::{PoseConfig, PoseError, PoseResult, SkeletonOutput};
use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};
use image::RgbImage;
use std::path::Path;
use tracing::info;

/// Line thickness and ring radius for skeletons from image files
const FILE_STROKE: (u32, u32) = (2, 2);
/// Camera frames are usually smaller, so draw heavier strokes
const WEBCAM_STROKE: (u32, u32) = (3, 3);

// ==============================================================================
// Pose Detector
// ==============================================================================

/// Body-only detector that renders a white skeleton on black
pub struct PoseDetector<B: MediaPipeBridge = DefaultMediaPipe> {
    bridge: B,
}

impl PoseDetector<DefaultMediaPipe> {
    pub fn new() -> PoseResult<Self> {
        Self::with_config(&PoseConfig::default())
    }
}

impl<B: MediaPipeBridge> PoseDetector<B> {
    pub fn with_config(config: &PoseConfig) -> PoseResult<Self> {
        Ok(Self::with_backend(B::new(config)?))
    }

    pub fn with_backend(bridge: B) -> Self {
        info!("Pose detector using {}", bridge.get_model_info());
        Self { bridge }
    }

    /// Detect a pose in an image file and write its skeleton to `output_path`
    pub fn process_image(&self, image_path: &Path, output_path: &Path) -> PoseResult<SkeletonOutput> {
        let image = load_image_file(image_path)?;
        self.render_skeleton(&image, output_path, FILE_STROKE)
    }

    /// Same as `process_image` for a base64 (optionally data-URL) camera frame
    pub fn process_webcam_frame(&self, frame: &str, output_path: &Path) -> PoseResult<SkeletonOutput> {
        let image = decode_base64_frame(frame)?;
        self.render_skeleton(&image, output_path, WEBCAM_STROKE)
    }

    fn render_skeleton(
        &self,
        image: &RgbImage,
        output_path: &Path,
        (thickness, radius): (u32, u32),
    ) -> PoseResult<SkeletonOutput> {
        let result = self.bridge.process_frame(image)?;
        let pose = match result.pose {
            Some(pose) if !pose.is_empty() => pose,
            _ => return Err(PoseError::NoDetection),
        };

        let mut canvas = blank_canvas(image.width(), image.height());
        render_pose(&mut canvas, &pose, thickness, radius);
        let skeleton_base64 = save_png_base64(&canvas, output_path)?;

        info!(
            "Pose detected ({} landmarks) in {} ms",
            pose.len(),
            result.processing_time_ms
        );

        Ok(SkeletonOutput {
            skeleton_path: output_path.display().to_string(),
            skeleton_base64,
            pose_quality: None,
            detected_features: None,
            message: "Pose detected".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pose::HolisticResult;
    use crate::test_support::{png_base64, standing_pose, write_test_image, FakeBridge};

    fn detector_with(result: HolisticResult) -> PoseDetector<FakeBridge> {
        PoseDetector::with_backend(FakeBridge::returning(result))
    }

    fn with_pose() -> HolisticResult {
        HolisticResult {
            pose: Some(standing_pose(0.9)),
            ..Default::default()
        }
    }

    #[test]
    fn test_process_image_writes_skeleton() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_image(dir.path(), "person.png", 64, 48);
        let output = dir.path().join("skeleton.png");

        let out = detector_with(with_pose()).process_image(&input, &output).unwrap();
        assert_eq!(out.skeleton_path, output.display().to_string());
        assert_eq!(out.message, "Pose detected");
        assert!(out.pose_quality.is_none());

        let skeleton = image::open(&output).unwrap().to_rgb8();
        assert_eq!(skeleton.dimensions(), (64, 48));
        assert!(skeleton.pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_unreadable_image_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("skeleton.png");

        let err = detector_with(with_pose())
            .process_image(&dir.path().join("missing.jpg"), &output)
            .unwrap_err();
        assert!(matches!(err, PoseError::Decode(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_no_pose_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_image(dir.path(), "empty_room.png", 32, 32);
        let output = dir.path().join("skeleton.png");

        let err = detector_with(HolisticResult::default())
            .process_image(&input, &output)
            .unwrap_err();
        assert!(matches!(err, PoseError::NoDetection));
        assert!(!output.exists());

        let empty = HolisticResult {
            pose: Some(vec![]),
            ..Default::default()
        };
        let err = detector_with(empty).process_image(&input, &output).unwrap_err();
        assert!(matches!(err, PoseError::NoDetection));
    }

    #[test]
    fn test_webcam_frame_with_data_url() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("frame_skeleton.png");
        let frame = format!("data:image/png;base64,{}", png_base64(40, 30));

        let out = detector_with(with_pose()).process_webcam_frame(&frame, &output).unwrap();
        assert!(!out.skeleton_base64.is_empty());
        assert_eq!(image::open(&output).unwrap().width(), 40);
    }

    #[test]
    fn test_webcam_strokes_are_heavier() {
        let dir = tempfile::tempdir().unwrap();
        let detector = detector_with(with_pose());

        let input = write_test_image(dir.path(), "person.png", 80, 80);
        let from_file = dir.path().join("file.png");
        detector.process_image(&input, &from_file).unwrap();

        let from_webcam = dir.path().join("webcam.png");
        detector
            .process_webcam_frame(&png_base64(80, 80), &from_webcam)
            .unwrap();

        let lit = |path: &Path| {
            image::open(path)
                .unwrap()
                .to_rgb8()
                .pixels()
                .filter(|p| p.0 != [0, 0, 0])
                .count()
        };
        assert!(lit(&from_webcam) > lit(&from_file));
    }

    #[test]
    fn test_backend_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_test_image(dir.path(), "person.png", 16, 16);
        let detector = PoseDetector::with_backend(FakeBridge::failing());
        let err = detector
            .process_image(&input, &dir.path().join("out.png"))
            .unwrap_err();
        assert!(matches!(err, PoseError::InferenceFailed(_)));
    }
}
