// MediaPipe integration bridge
// Provides an abstraction over MediaPipe solutions for pose/face/hand landmarks
// Implemented with PyO3 (Python mediapipe); a dummy backend keeps the crate buildable without it

use crate::models::pose::{HolisticResult, PoseConfig, PoseResult};
use image::RgbImage;

/// MediaPipe bridge trait
/// Implement this for each inference backend
pub trait MediaPipeBridge {
    /// Initialize the MediaPipe models
    fn new(config: &PoseConfig) -> PoseResult<Self>
    where
        Self: Sized;

    /// Run inference on an RGB frame. Parts that were not found are `None`.
    fn process_frame(&self, image: &RgbImage) -> PoseResult<HolisticResult>;

    /// Check if models are loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::pose::{Landmark, LandmarkSet, MediaPipeModel, PoseError};
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};
    use tracing::{debug, info, warn};

    fn load_err(e: PyErr) -> PoseError {
        PoseError::ModelLoadFailed(e.to_string())
    }

    fn infer_err(e: PyErr) -> PoseError {
        PoseError::InferenceFailed(e.to_string())
    }

    pub struct PyO3MediaPipe {
        // mediapipe.solutions.pose.Pose or mediapipe.solutions.holistic.Holistic
        solution: PyObject,
        config: PoseConfig,
    }

    impl MediaPipeBridge for PyO3MediaPipe {
        fn new(config: &PoseConfig) -> PoseResult<Self> {
            config.validate()?;

            Python::with_gil(|py| {
                let mediapipe = py.import_bound("mediapipe").map_err(|e| {
                    PoseError::ModelLoadFailed(format!(
                        "Failed to import mediapipe: {}. Install it with: pip install mediapipe",
                        e
                    ))
                })?;
                let solutions = mediapipe.getattr("solutions").map_err(load_err)?;

                let kwargs = PyDict::new_bound(py);
                kwargs.set_item("static_image_mode", true).map_err(load_err)?;
                kwargs
                    .set_item("model_complexity", config.model_complexity as u8)
                    .map_err(load_err)?;
                kwargs.set_item("enable_segmentation", false).map_err(load_err)?;
                kwargs
                    .set_item("min_detection_confidence", config.min_detection_confidence)
                    .map_err(load_err)?;

                let solution = match config.model {
                    MediaPipeModel::Pose => solutions
                        .getattr("pose")
                        .and_then(|m| m.getattr("Pose"))
                        .and_then(|cls| cls.call((), Some(&kwargs)))
                        .map_err(load_err)?,
                    MediaPipeModel::Holistic => {
                        kwargs
                            .set_item("refine_face_landmarks", config.enable_face_tracking)
                            .map_err(load_err)?;
                        kwargs
                            .set_item("min_tracking_confidence", config.min_tracking_confidence)
                            .map_err(load_err)?;
                        solutions
                            .getattr("holistic")
                            .and_then(|m| m.getattr("Holistic"))
                            .and_then(|cls| cls.call((), Some(&kwargs)))
                            .map_err(load_err)?
                    }
                };

                info!(
                    "PyO3MediaPipe initialized: model={:?}, complexity={:?}",
                    config.model, config.model_complexity
                );

                Ok(Self {
                    solution: solution.unbind(),
                    config: config.clone(),
                })
            })
        }

        fn process_frame(&self, image: &RgbImage) -> PoseResult<HolisticResult> {
            let start_time = std::time::Instant::now();
            let (width, height) = image.dimensions();

            Python::with_gil(|py| {
                // numpy.frombuffer(bytes, uint8).reshape(h, w, 3), already RGB
                let numpy = py.import_bound("numpy").map_err(infer_err)?;
                let buffer = PyBytes::new_bound(py, image.as_raw());
                let frame = numpy
                    .call_method1("frombuffer", (buffer, "uint8"))
                    .and_then(|arr| arr.call_method1("reshape", ((height, width, 3),)))
                    .map_err(infer_err)?;

                let results = self
                    .solution
                    .bind(py)
                    .call_method1("process", (frame,))
                    .map_err(|e| PoseError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))?;

                let pose = if self.config.enable_body_tracking {
                    Self::read_landmarks(&results, "pose_landmarks", true)?
                } else {
                    None
                };
                let (left_hand, right_hand) = if self.config.enable_hand_tracking {
                    (
                        Self::read_landmarks(&results, "left_hand_landmarks", false)?,
                        Self::read_landmarks(&results, "right_hand_landmarks", false)?,
                    )
                } else {
                    (None, None)
                };
                let face = if self.config.enable_face_tracking {
                    Self::read_landmarks(&results, "face_landmarks", false)?
                } else {
                    None
                };

                let processing_time_ms = start_time.elapsed().as_millis() as u64;
                debug!("MediaPipe processed {}x{} frame in {} ms", width, height, processing_time_ms);

                Ok(HolisticResult {
                    pose,
                    left_hand,
                    right_hand,
                    face,
                    processing_time_ms,
                })
            })
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe Bridge (Python backend) - Model: {:?}, Body: {}, Face: {}, Hands: {}",
                self.config.model,
                self.config.enable_body_tracking,
                self.config.enable_face_tracking,
                self.config.enable_hand_tracking
            )
        }
    }

    impl PyO3MediaPipe {
        /// Read `results.<attr>.landmark` into a landmark set. Solutions that do not
        /// produce the attribute, or produced `None`, yield `None`.
        fn read_landmarks(
            results: &Bound<'_, PyAny>,
            attr: &str,
            with_scores: bool,
        ) -> PoseResult<Option<LandmarkSet>> {
            if !results.hasattr(attr).map_err(infer_err)? {
                return Ok(None);
            }
            let list = results.getattr(attr).map_err(infer_err)?;
            if list.is_none() {
                return Ok(None);
            }

            let mut landmarks = Vec::new();
            for item in list.getattr("landmark").and_then(|l| l.iter()).map_err(infer_err)? {
                let lm = item.map_err(infer_err)?;
                let read = |name: &str| -> PoseResult<f32> {
                    lm.getattr(name)
                        .and_then(|v| v.extract::<f32>())
                        .map_err(infer_err)
                };
                // Unset proto fields read as 0.0; only set scores are kept
                let score = |name: &str| -> PoseResult<Option<f32>> {
                    let set = lm
                        .call_method1("HasField", (name,))
                        .and_then(|v| v.extract::<bool>())
                        .map_err(infer_err)?;
                    if set {
                        read(name).map(Some)
                    } else {
                        Ok(None)
                    }
                };
                let mut landmark = Landmark::new(read("x")?, read("y")?, read("z")?);
                if with_scores {
                    landmark.visibility = score("visibility")?;
                    landmark.presence = score("presence")?;
                }
                landmarks.push(landmark);
            }
            Ok(Some(landmarks))
        }
    }

    impl Drop for PyO3MediaPipe {
        fn drop(&mut self) {
            Python::with_gil(|py| {
                if let Err(e) = self.solution.bind(py).call_method0("close") {
                    warn!("Failed to close MediaPipe solution: {}", e);
                }
            });
        }
    }
}

// ==============================================================================
// Dummy Implementation (for compilation without features)
// ==============================================================================

#[cfg(not(feature = "ml-pyo3"))]
pub struct DummyMediaPipe {
    config: PoseConfig,
}

#[cfg(not(feature = "ml-pyo3"))]
impl MediaPipeBridge for DummyMediaPipe {
    fn new(config: &PoseConfig) -> PoseResult<Self> {
        config.validate()?;
        tracing::warn!("Using dummy MediaPipe implementation (no inference); enable the 'ml-pyo3' feature");
        Ok(Self {
            config: config.clone(),
        })
    }

    fn process_frame(&self, _image: &RgbImage) -> PoseResult<HolisticResult> {
        Err(crate::models::pose::PoseError::InferenceFailed(format!(
            "no inference backend compiled in for {:?} (rebuild with --features ml-pyo3)",
            self.config.model
        )))
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        "Dummy MediaPipe (no ML inference - enable 'ml-pyo3' feature)".to_string()
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub type DefaultMediaPipe = pyo3_backend::PyO3MediaPipe;

#[cfg(not(feature = "ml-pyo3"))]
pub type DefaultMediaPipe = DummyMediaPipe;
