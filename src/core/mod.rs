pub mod config;
pub mod frame_io;
pub mod ml_models;

// Pose estimation and skeleton rendering
pub mod advanced_pose_detector;
pub mod pose_detector;
pub mod pose_quality;
pub mod skeleton_renderer;

// Remote generation services
pub mod image_generator;
pub mod tts_service;
