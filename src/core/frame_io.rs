// Frame I/O - image decoding from files or camera frames, PNG encoding and base64

use crate::models::pose::{PoseError, PoseResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Load an image file as RGB
pub fn load_image_file(path: &Path) -> PoseResult<RgbImage> {
    let img = image::open(path)
        .map_err(|e| PoseError::Decode(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded {}: {}x{}", path.display(), img.width(), img.height());
    Ok(img.to_rgb8())
}

/// Decode a base64 camera frame. A `data:image/...;base64,` prefix is stripped.
pub fn decode_base64_frame(frame: &str) -> PoseResult<RgbImage> {
    let payload = match frame.split_once(',') {
        Some((_, data)) => data,
        None => frame,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| PoseError::Decode(format!("invalid base64 frame: {}", e)))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| PoseError::Decode(format!("invalid frame image: {}", e)))?;
    Ok(img.to_rgb8())
}

/// Encode to PNG bytes
pub fn encode_png(image: &RgbImage) -> PoseResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PoseError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Write the skeleton as PNG and return its base64 encoding
pub fn save_png_base64(image: &RgbImage, output: &Path) -> PoseResult<String> {
    let png = encode_png(image)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, &png)?;
    debug!("Wrote {} ({} bytes)", output.display(), png.len());
    Ok(STANDARD.encode(&png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample_png() -> Vec<u8> {
        let mut img = RgbImage::new(6, 4);
        img.put_pixel(1, 2, Rgb([10, 20, 30]));
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_load_missing_file_is_decode_error() {
        let result = load_image_file(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(PoseError::Decode(_))));
    }

    #[test]
    fn test_load_non_image_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"not an image").unwrap();
        assert!(matches!(load_image_file(&path), Err(PoseError::Decode(_))));
    }

    #[test]
    fn test_decode_plain_and_data_url_frames() {
        let encoded = STANDARD.encode(sample_png());

        let plain = decode_base64_frame(&encoded).unwrap();
        assert_eq!(plain.dimensions(), (6, 4));
        assert_eq!(plain.get_pixel(1, 2).0, [10, 20, 30]);

        let data_url = format!("data:image/png;base64,{}", encoded);
        let from_url = decode_base64_frame(&data_url).unwrap();
        assert_eq!(from_url, plain);
    }

    #[test]
    fn test_decode_garbage_frame() {
        assert!(matches!(decode_base64_frame("data:image/png;base64,@@@"), Err(PoseError::Decode(_))));
        let not_image = STANDARD.encode(b"hello");
        assert!(matches!(decode_base64_frame(&not_image), Err(PoseError::Decode(_))));
    }

    #[test]
    fn test_save_png_base64_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("skeleton.png");
        let img = RgbImage::new(3, 3);

        let encoded = save_png_base64(&img, &output).unwrap();
        let on_disk = std::fs::read(&output).unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), on_disk);
        assert_eq!(image::load_from_memory(&on_disk).unwrap().width(), 3);
    }
}
