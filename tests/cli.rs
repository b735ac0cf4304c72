// Integration tests: run the helper binaries and check the stdout JSON contract

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Output};

fn run(bin: &str, home: &Path, args: &[&str]) -> Output {
    Command::new(bin)
        .args(args)
        .env("KIOSK_AI_HOME", home)
        .env_remove("ELEVENLABS_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

/// The single stdout line, parsed
fn stdout_json(out: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(out.stdout.clone()).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1, "stdout: {}", stdout);
    assert!(lines[0].is_ascii());
    assert!(lines[0].starts_with('{'));
    serde_json::from_str(lines[0]).unwrap()
}

#[test]
fn pose_detect_missing_args_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(env!("CARGO_BIN_EXE_pose_detect"), dir.path(), &["file"]);
    assert_eq!(out.status.code(), Some(1));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("Usage:"));
}

#[test]
fn pose_detect_unknown_mode_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        env!("CARGO_BIN_EXE_pose_detect"),
        dir.path(),
        &["camera", "in.png", "out.png"],
    );
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_json(&out)["success"], false);
}

#[test]
fn pose_detect_unreadable_image() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("skeleton.png");
    let missing = dir.path().join("missing.jpg");

    let out = run(
        env!("CARGO_BIN_EXE_pose_detect"),
        dir.path(),
        &["file", missing.to_str().unwrap(), output.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Could not read image"));
    assert!(!output.exists());
}

#[test]
fn pose_detect_advanced_ignores_bad_options() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("skeleton.png");

    let out = run(
        env!("CARGO_BIN_EXE_pose_detect_advanced"),
        dir.path(),
        &["webcam", "data:image/png;base64,@@@", output.to_str().unwrap(), "{not json"],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Could not read image"));
    assert!(!output.exists());
}

#[test]
fn tts_without_key_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(env!("CARGO_BIN_EXE_tts_service"), dir.path(), &["hello"]);

    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("API key"));
    assert_eq!(json["message"], json["error"]);
    assert!(dir.path().join("outputs").join("tts").is_dir());
}

#[test]
fn tts_missing_text_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(env!("CARGO_BIN_EXE_tts_service"), dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_json(&out)["success"], false);
}

#[test]
fn image_generate_controlnet_needs_skeleton() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated.png");
    let out = run(
        env!("CARGO_BIN_EXE_image_generate"),
        dir.path(),
        &["controlnet", "a dancer", "missing.png", output.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout_json(&out)["success"], false);
    assert!(!output.exists());
}

#[test]
fn image_generate_simple_against_local_server() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let api_url = format!("http://{}", listener.local_addr().unwrap());
    let server = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        // Headers plus a small JSON body
        loop {
            let text = String::from_utf8_lossy(&request);
            if text.contains("\"sampler_name\"") && text.trim_end().ends_with('}') {
                break;
            }
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        // "hello" in base64
        let body = r#"{"images":["aGVsbG8="]}"#;
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("config.json"),
        format!(r#"{{"sd_api_url": "{}"}}"#, api_url),
    )
    .unwrap();
    let output = dir.path().join("generated.png");

    let out = run(
        env!("CARGO_BIN_EXE_image_generate"),
        dir.path(),
        &["simple", "a lighthouse", output.to_str().unwrap()],
    );
    server.join().unwrap();

    let json = stdout_json(&out);
    assert_eq!(json["success"], true, "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(json["message"], "Image generated");
    assert_eq!(fs::read(&output).unwrap(), b"hello");
}

#[test]
fn download_skip_existing_keeps_cached_files() {
    let dir = tempfile::tempdir().unwrap();
    let model_dir = dir.path().join("models").join("tts");
    fs::create_dir_all(&model_dir).unwrap();
    fs::write(model_dir.join("en_US-lessac-medium.onnx"), b"weights").unwrap();
    fs::write(model_dir.join("en_US-lessac-medium.onnx.json"), b"{}").unwrap();

    let out = run(
        env!("CARGO_BIN_EXE_download_tts_model"),
        dir.path(),
        &["--skip-existing"],
    );
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(model_dir.join("en_US-lessac-medium.onnx")).unwrap(), b"weights");
}

#[test]
fn tts_text_may_start_with_hyphen() {
    let dir = tempfile::tempdir().unwrap();
    let out = run(
        env!("CARGO_BIN_EXE_tts_service"),
        dir.path(),
        &["- Welcome to the kiosk", "hi.mp3"],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("API key"));
}

#[test]
fn image_generate_prompt_may_start_with_hyphen() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated.png");
    let out = run(
        env!("CARGO_BIN_EXE_image_generate"),
        dir.path(),
        &["controlnet", "-a dancer", "missing.png", output.to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert_eq!(json["success"], false);
    assert!(!json["error"].as_str().unwrap().starts_with("Usage:"));
}

#[test]
fn extra_trailing_arguments_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("skeleton.png");
    let missing = dir.path().join("missing.jpg");

    let out = run(
        env!("CARGO_BIN_EXE_pose_detect"),
        dir.path(),
        &["file", missing.to_str().unwrap(), output.to_str().unwrap(), "extra"],
    );
    assert_eq!(out.status.code(), Some(0));
    let json = stdout_json(&out);
    assert!(json["error"].as_str().unwrap().contains("Could not read image"));

    let out = run(
        env!("CARGO_BIN_EXE_tts_service"),
        dir.path(),
        &["hello", "hi.mp3", "unused"],
    );
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout_json(&out)["error"].as_str().unwrap().contains("API key"));
}
