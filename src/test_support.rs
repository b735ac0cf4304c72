// Shared fixtures for unit tests: a scripted MediaPipe backend, test images and a
// one-shot HTTP server

use crate::core::frame_io::encode_png;
use crate::models::pose::{HolisticResult, Landmark, PoseConfig, PoseError, PoseResult};
use crate::platform::pose::MediaPipeBridge;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{Rgb, RgbImage};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

/// Backend that returns a fixed result, or fails
pub struct FakeBridge {
    result: Option<HolisticResult>,
}

impl FakeBridge {
    pub fn returning(result: HolisticResult) -> Self {
        Self { result: Some(result) }
    }

    pub fn failing() -> Self {
        Self { result: None }
    }
}

impl MediaPipeBridge for FakeBridge {
    fn new(_config: &PoseConfig) -> PoseResult<Self> {
        Ok(Self::returning(HolisticResult::default()))
    }

    fn process_frame(&self, _image: &RgbImage) -> PoseResult<HolisticResult> {
        self.result
            .clone()
            .ok_or_else(|| PoseError::InferenceFailed("scripted failure".to_string()))
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        "fake".to_string()
    }
}

/// 33 body landmarks laid out as a standing figure, all with the given scores
pub fn standing_pose(score: f32) -> Vec<Landmark> {
    (0..33)
        .map(|i| {
            let column = (i % 5) as f32;
            let row = (i / 5) as f32;
            Landmark::with_scores(0.2 + column * 0.15, 0.1 + row * 0.12, 0.0, score, score)
        })
        .collect()
}

/// 21 hand landmarks fanned out around `(x, y)`
pub fn open_hand(x: f32, y: f32) -> Vec<Landmark> {
    (0..21)
        .map(|i| Landmark::new(x + (i % 5) as f32 * 0.02, y + (i / 5) as f32 * 0.02, 0.0))
        .collect()
}

fn test_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 5) as u8, 90]))
}

/// Write a PNG photo stand-in and return its path
pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    test_image(width, height).save(&path).unwrap();
    path
}

/// PNG bytes of a test image, base64-encoded like a camera frame
pub fn png_base64(width: u32, height: u32) -> String {
    STANDARD.encode(encode_png(&test_image(width, height)).unwrap())
}

// ==============================================================================
// Canned HTTP server
// ==============================================================================

/// What the canned server saw
pub struct RecordedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Serves exactly one request with a canned response. `head` is the status line plus
/// headers without the terminating blank line.
pub fn serve_once(head: &str, body: Vec<u8>) -> (String, JoinHandle<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let head = head.to_string();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(b"\r\nConnection: close\r\n\r\n").unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
        request
    });

    (base_url, handle)
}

/// `serve_once` with a JSON body and matching content-length
pub fn serve_json(status: &str, body: &serde_json::Value) -> (String, JoinHandle<RecordedRequest>) {
    let body = serde_json::to_vec(body).unwrap();
    let head = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}",
        status,
        body.len()
    );
    serve_once(&head, body)
}

fn read_request(stream: &mut impl Read) -> RecordedRequest {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break data.len();
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(&data[..head_end]).to_string();

    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = data.get(head_end + 4..).unwrap_or_default().to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }

    RecordedRequest { head, body }
}
