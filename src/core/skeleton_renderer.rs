// Skeleton rendering - draws landmark sets onto a black canvas
//
// Follows the MediaPipe drawing conventions: landmarks whose visibility or presence is
// below 0.5, or that fall outside the frame, are skipped together with their connections.
// Each drawn landmark gets a light border ring under its colored ring.

use crate::models::landmarks::{
    face_contour_connections, hand_connections, pose_connections, BodyLandmark, BodySide,
};
use crate::models::pose::{HolisticResult, Landmark};
use image::{Rgb, RgbImage};
use serde::Deserialize;
use std::collections::HashMap;

const VISIBILITY_THRESHOLD: f32 = 0.5;
const PRESENCE_THRESHOLD: f32 = 0.5;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
/// MediaPipe's default "white" for borders and connections
pub const LIGHT_GRAY: Rgb<u8> = Rgb([224, 224, 224]);

const POSE_LEFT: Rgb<u8> = Rgb([255, 138, 0]);
const POSE_RIGHT: Rgb<u8> = Rgb([0, 217, 231]);
const LEFT_HAND: Rgb<u8> = Rgb([0, 0, 255]);
const LEFT_HAND_CONNECTION: Rgb<u8> = Rgb([100, 100, 255]);
const RIGHT_HAND: Rgb<u8> = Rgb([0, 255, 0]);
const RIGHT_HAND_CONNECTION: Rgb<u8> = Rgb([100, 255, 100]);
const FACE_CONTOUR: Rgb<u8> = Rgb([255, 110, 80]);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingSpec {
    pub color: Rgb<u8>,
    pub thickness: u32,
    pub circle_radius: u32,
}

impl DrawingSpec {
    pub const fn new(color: Rgb<u8>, thickness: u32, circle_radius: u32) -> Self {
        Self {
            color,
            thickness,
            circle_radius,
        }
    }
}

impl Default for DrawingSpec {
    fn default() -> Self {
        Self::new(LIGHT_GRAY, 2, 2)
    }
}

/// How landmark rings are styled
#[derive(Debug, Clone, Copy)]
pub enum LandmarkStyle {
    /// Connections only
    Hidden,
    Uniform(DrawingSpec),
    /// Orange left side, cyan right side, gray nose
    BodySides,
}

impl LandmarkStyle {
    fn spec_for(&self, index: usize) -> Option<DrawingSpec> {
        match self {
            LandmarkStyle::Hidden => None,
            LandmarkStyle::Uniform(spec) => Some(*spec),
            LandmarkStyle::BodySides => {
                let color = match BodyLandmark::side_of(index) {
                    BodySide::Left => POSE_LEFT,
                    BodySide::Right => POSE_RIGHT,
                    BodySide::Center => LIGHT_GRAY,
                };
                Some(DrawingSpec::new(color, 2, 2))
            }
        }
    }
}

/// Which parts of a holistic result to draw, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    pub draw_pose: bool,
    pub draw_hands: bool,
    pub draw_face: bool,
    /// Color by body part instead of the white ControlNet style
    pub colorful: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            draw_pose: true,
            draw_hands: true,
            draw_face: true,
            colorful: false,
        }
    }
}

/// Black canvas with the given dimensions
pub fn blank_canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::new(width, height)
}

/// Draw one landmark set: connections first, then landmark rings on top.
pub fn draw_landmarks(
    canvas: &mut RgbImage,
    landmarks: &[Landmark],
    connections: &[(usize, usize)],
    landmark_style: LandmarkStyle,
    connection_spec: DrawingSpec,
) {
    let (width, height) = canvas.dimensions();
    if width == 0 || height == 0 {
        return;
    }

    let mut pixels: HashMap<usize, (i64, i64)> = HashMap::new();
    for (idx, landmark) in landmarks.iter().enumerate() {
        if landmark.visibility.is_some_and(|v| v < VISIBILITY_THRESHOLD)
            || landmark.presence.is_some_and(|p| p < PRESENCE_THRESHOLD)
        {
            continue;
        }
        if let Some(px) = normalized_to_pixel(landmark.x, landmark.y, width, height) {
            pixels.insert(idx, px);
        }
    }

    for &(start, end) in connections {
        if let (Some(&a), Some(&b)) = (pixels.get(&start), pixels.get(&end)) {
            draw_line(canvas, a, b, connection_spec.color, connection_spec.thickness);
        }
    }

    for (&idx, &center) in &pixels {
        if let Some(spec) = landmark_style.spec_for(idx) {
            let border_radius =
                (spec.circle_radius + 1).max((spec.circle_radius as f32 * 1.2) as u32);
            draw_ring(canvas, center, border_radius, LIGHT_GRAY, spec.thickness);
            draw_ring(canvas, center, spec.circle_radius, spec.color, spec.thickness);
        }
    }
}

/// White body skeleton on black, as used for pose conditioning
pub fn render_pose(canvas: &mut RgbImage, pose: &[Landmark], thickness: u32, circle_radius: u32) {
    draw_landmarks(
        canvas,
        pose,
        &pose_connections(),
        LandmarkStyle::Uniform(DrawingSpec::new(WHITE, thickness, circle_radius)),
        DrawingSpec::new(WHITE, thickness, 0),
    );
}

/// Draw the requested parts of a holistic result
pub fn render_holistic(canvas: &mut RgbImage, result: &HolisticResult, options: &DrawOptions) {
    if options.colorful {
        render_colorful(canvas, result, options);
    } else {
        render_monochrome(canvas, result, options);
    }
}

fn render_monochrome(canvas: &mut RgbImage, result: &HolisticResult, options: &DrawOptions) {
    let landmark_spec = LandmarkStyle::Uniform(DrawingSpec::new(WHITE, 3, 3));
    let connection_spec = DrawingSpec::new(WHITE, 2, 0);

    if options.draw_pose {
        if let Some(pose) = &result.pose {
            draw_landmarks(canvas, pose, &pose_connections(), landmark_spec, connection_spec);
        }
    }

    if options.draw_hands {
        for hand in [&result.left_hand, &result.right_hand].into_iter().flatten() {
            draw_landmarks(canvas, hand, &hand_connections(), landmark_spec, connection_spec);
        }
    }

    // Face outline only, the full mesh is too dense
    if options.draw_face {
        if let Some(face) = &result.face {
            draw_landmarks(
                canvas,
                face,
                &face_contour_connections(),
                LandmarkStyle::Hidden,
                DrawingSpec::new(WHITE, 1, 0),
            );
        }
    }
}

fn render_colorful(canvas: &mut RgbImage, result: &HolisticResult, options: &DrawOptions) {
    if options.draw_pose {
        if let Some(pose) = &result.pose {
            draw_landmarks(
                canvas,
                pose,
                &pose_connections(),
                LandmarkStyle::BodySides,
                DrawingSpec::default(),
            );
        }
    }

    if options.draw_hands {
        let hands = [
            (&result.left_hand, LEFT_HAND, LEFT_HAND_CONNECTION),
            (&result.right_hand, RIGHT_HAND, RIGHT_HAND_CONNECTION),
        ];
        for (hand, color, connection_color) in hands {
            if let Some(hand) = hand {
                draw_landmarks(
                    canvas,
                    hand,
                    &hand_connections(),
                    LandmarkStyle::Uniform(DrawingSpec::new(color, 2, 2)),
                    DrawingSpec::new(connection_color, 2, 0),
                );
            }
        }
    }

    if options.draw_face {
        if let Some(face) = &result.face {
            draw_landmarks(
                canvas,
                face,
                &face_contour_connections(),
                LandmarkStyle::Hidden,
                DrawingSpec::new(FACE_CONTOUR, 1, 0),
            );
        }
    }
}

// ==============================================================================
// Rasterization
// ==============================================================================

/// Normalized coordinates to pixels; `None` when the point is outside [0, 1]
fn normalized_to_pixel(x: f32, y: f32, width: u32, height: u32) -> Option<(i64, i64)> {
    let valid = |v: f32| (v > 0.0 || v.abs() < 1e-6) && (v < 1.0 || (v - 1.0).abs() < 1e-6);
    if !valid(x) || !valid(y) {
        return None;
    }
    let px = ((x * width as f32).floor() as i64).min(width as i64 - 1);
    let py = ((y * height as f32).floor() as i64).min(height as i64 - 1);
    Some((px.max(0), py.max(0)))
}

fn put_pixel_checked(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

/// Stamp a filled disc; thickness 1 is a single pixel
fn stamp(canvas: &mut RgbImage, cx: i64, cy: i64, thickness: u32, color: Rgb<u8>) {
    let radius = thickness as f32 / 2.0;
    let reach = radius.ceil() as i64;
    if thickness <= 1 {
        put_pixel_checked(canvas, cx, cy, color);
        return;
    }
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if ((dx * dx + dy * dy) as f32) <= radius * radius {
                put_pixel_checked(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line with a round pen of the given thickness
fn draw_line(canvas: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, thickness: u32) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(canvas, x0, y0, thickness, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Circle outline of the given stroke thickness centred on `radius`
fn draw_ring(canvas: &mut RgbImage, center: (i64, i64), radius: u32, color: Rgb<u8>, thickness: u32) {
    let (cx, cy) = center;
    let half = thickness.max(1) as f32 / 2.0;
    let outer = radius as f32 + half;
    let inner = (radius as f32 - half).max(0.0);
    let reach = outer.ceil() as i64;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let dist = ((dx * dx + dy * dy) as f32).sqrt();
            if dist <= outer && dist >= inner {
                put_pixel_checked(canvas, cx + dx, cy + dy, color);
            }
        }
    }
}
