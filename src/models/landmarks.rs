// MediaPipe landmark indices and the connection topology used to draw skeletons

/// MediaPipe Pose Landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

pub const BODY_LANDMARK_COUNT: usize = 33;

/// Which half of the body a landmark belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    Left,
    Right,
    Center,
}

impl BodyLandmark {
    /// Side of the body for a raw landmark index. Odd indices are left, even are right,
    /// except the nose.
    pub fn side_of(index: usize) -> BodySide {
        if index == BodyLandmark::Nose as usize || index >= BODY_LANDMARK_COUNT {
            BodySide::Center
        } else if index % 2 == 1 {
            BodySide::Left
        } else {
            BodySide::Right
        }
    }
}

/// MediaPipe Hand Landmark indices (21 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

// ==============================================================================
// Connections
// ==============================================================================

use BodyLandmark as B;
use HandLandmark as H;

const POSE_EDGES: [(BodyLandmark, BodyLandmark); 35] = [
    (B::Nose, B::LeftEyeInner),
    (B::LeftEyeInner, B::LeftEye),
    (B::LeftEye, B::LeftEyeOuter),
    (B::LeftEyeOuter, B::LeftEar),
    (B::Nose, B::RightEyeInner),
    (B::RightEyeInner, B::RightEye),
    (B::RightEye, B::RightEyeOuter),
    (B::RightEyeOuter, B::RightEar),
    (B::MouthLeft, B::MouthRight),
    (B::LeftShoulder, B::RightShoulder),
    (B::LeftShoulder, B::LeftElbow),
    (B::LeftElbow, B::LeftWrist),
    (B::LeftWrist, B::LeftPinky),
    (B::LeftWrist, B::LeftIndex),
    (B::LeftWrist, B::LeftThumb),
    (B::LeftPinky, B::LeftIndex),
    (B::RightShoulder, B::RightElbow),
    (B::RightElbow, B::RightWrist),
    (B::RightWrist, B::RightPinky),
    (B::RightWrist, B::RightIndex),
    (B::RightWrist, B::RightThumb),
    (B::RightPinky, B::RightIndex),
    (B::LeftShoulder, B::LeftHip),
    (B::RightShoulder, B::RightHip),
    (B::LeftHip, B::RightHip),
    (B::LeftHip, B::LeftKnee),
    (B::RightHip, B::RightKnee),
    (B::LeftKnee, B::LeftAnkle),
    (B::RightKnee, B::RightAnkle),
    (B::LeftAnkle, B::LeftHeel),
    (B::RightAnkle, B::RightHeel),
    (B::LeftHeel, B::LeftFootIndex),
    (B::RightHeel, B::RightFootIndex),
    (B::LeftAnkle, B::LeftFootIndex),
    (B::RightAnkle, B::RightFootIndex),
];

const HAND_EDGES: [(HandLandmark, HandLandmark); 21] = [
    // Palm
    (H::Wrist, H::ThumbCmc),
    (H::Wrist, H::IndexFingerMcp),
    (H::MiddleFingerMcp, H::RingFingerMcp),
    (H::RingFingerMcp, H::PinkyMcp),
    (H::IndexFingerMcp, H::MiddleFingerMcp),
    (H::Wrist, H::PinkyMcp),
    // Thumb
    (H::ThumbCmc, H::ThumbMcp),
    (H::ThumbMcp, H::ThumbIp),
    (H::ThumbIp, H::ThumbTip),
    // Index
    (H::IndexFingerMcp, H::IndexFingerPip),
    (H::IndexFingerPip, H::IndexFingerDip),
    (H::IndexFingerDip, H::IndexFingerTip),
    // Middle
    (H::MiddleFingerMcp, H::MiddleFingerPip),
    (H::MiddleFingerPip, H::MiddleFingerDip),
    (H::MiddleFingerDip, H::MiddleFingerTip),
    // Ring
    (H::RingFingerMcp, H::RingFingerPip),
    (H::RingFingerPip, H::RingFingerDip),
    (H::RingFingerDip, H::RingFingerTip),
    // Pinky
    (H::PinkyMcp, H::PinkyPip),
    (H::PinkyPip, H::PinkyDip),
    (H::PinkyDip, H::PinkyTip),
];

// Face mesh contours as polylines over the 468-point mesh
const FACE_OVAL: &[u16] = &[
    10, 338, 297, 332, 284, 251, 389, 356, 454, 323, 361, 288, 397, 365, 379, 378, 400, 377, 152,
    148, 176, 149, 150, 136, 172, 58, 132, 93, 234, 127, 162, 21, 54, 103, 67, 109, 10,
];
const LIPS_OUTER_LOWER: &[u16] = &[61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291];
const LIPS_OUTER_UPPER: &[u16] = &[61, 185, 40, 39, 37, 0, 267, 269, 270, 409, 291];
const LIPS_INNER_LOWER: &[u16] = &[78, 95, 88, 178, 87, 14, 317, 402, 318, 324, 308];
const LIPS_INNER_UPPER: &[u16] = &[78, 191, 80, 81, 82, 13, 312, 311, 310, 415, 308];
const LEFT_EYE_LOWER: &[u16] = &[263, 249, 390, 373, 374, 380, 381, 382, 362];
const LEFT_EYE_UPPER: &[u16] = &[263, 466, 388, 387, 386, 385, 384, 398, 362];
const LEFT_EYEBROW_LOWER: &[u16] = &[276, 283, 282, 295, 285];
const LEFT_EYEBROW_UPPER: &[u16] = &[300, 293, 334, 296, 336];
const RIGHT_EYE_LOWER: &[u16] = &[33, 7, 163, 144, 145, 153, 154, 155, 133];
const RIGHT_EYE_UPPER: &[u16] = &[33, 246, 161, 160, 159, 158, 157, 173, 133];
const RIGHT_EYEBROW_LOWER: &[u16] = &[46, 53, 52, 65, 55];
const RIGHT_EYEBROW_UPPER: &[u16] = &[70, 63, 105, 66, 107];

const FACE_CONTOUR_POLYLINES: [&[u16]; 13] = [
    FACE_OVAL,
    LIPS_OUTER_LOWER,
    LIPS_OUTER_UPPER,
    LIPS_INNER_LOWER,
    LIPS_INNER_UPPER,
    LEFT_EYE_LOWER,
    LEFT_EYE_UPPER,
    LEFT_EYEBROW_LOWER,
    LEFT_EYEBROW_UPPER,
    RIGHT_EYE_LOWER,
    RIGHT_EYE_UPPER,
    RIGHT_EYEBROW_LOWER,
    RIGHT_EYEBROW_UPPER,
];

/// Index pairs to connect for a body pose
pub fn pose_connections() -> Vec<(usize, usize)> {
    POSE_EDGES
        .iter()
        .map(|&(a, b)| (a as usize, b as usize))
        .collect()
}

/// Index pairs to connect for one hand
pub fn hand_connections() -> Vec<(usize, usize)> {
    HAND_EDGES
        .iter()
        .map(|&(a, b)| (a as usize, b as usize))
        .collect()
}

/// Index pairs outlining the face: oval, lips, eyes and eyebrows
pub fn face_contour_connections() -> Vec<(usize, usize)> {
    FACE_CONTOUR_POLYLINES
        .iter()
        .flat_map(|line| line.windows(2).map(|w| (w[0] as usize, w[1] as usize)))
        .collect()
}
