// Shared plumbing for the command-line helpers
//
// Every helper prints exactly one ASCII JSON object on stdout. Logs go to stderr so the
// web caller, which keeps only lines starting with `{`, never sees them.

use crate::models::pose::{DetectedFeatures, PoseError, PoseQuality, SkeletonOutput};
use clap::error::ErrorKind;
use clap::Parser;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

// ==============================================================================
// JSON output
// ==============================================================================

/// Escapes every non-ASCII character as `\uXXXX`
struct AsciiFormatter;

impl serde_json::ser::Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize to a single line of ASCII-only JSON
pub fn to_ascii_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Print the single stdout line
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match to_ascii_json(value) {
        Ok(line) => println!("{}", line),
        Err(e) => println!(r#"{{"success":false,"error":"failed to serialize result: {}"}}"#, e),
    }
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
}

impl Failure {
    pub fn new(error: impl Display) -> Self {
        Self {
            success: false,
            error: error.to_string(),
        }
    }
}

/// Report a usage problem: failure JSON on stdout, exit code 1
pub fn usage_error(usage: &str) -> ExitCode {
    print_json(&Failure::new(usage));
    ExitCode::from(1)
}

/// Parse arguments, turning any parse failure into a usage error
pub fn parse_args<T: Parser>(usage: &str) -> Result<T, ExitCode> {
    T::try_parse().map_err(|e| match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = e.print();
            ExitCode::SUCCESS
        }
        _ => {
            warn!("{}", e.to_string().trim_end());
            usage_error(usage)
        }
    })
}

// ==============================================================================
// Reports
// ==============================================================================

/// Stdout shape of both pose detectors
#[derive(Debug, Serialize)]
pub struct DetectionReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skeleton_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pose_quality: Option<PoseQuality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_features: Option<DetectedFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionReport {
    pub fn success(output: SkeletonOutput) -> Self {
        Self {
            success: true,
            skeleton_path: Some(output.skeleton_path),
            skeleton_base64: Some(output.skeleton_base64),
            pose_quality: output.pose_quality,
            detected_features: output.detected_features,
            message: Some(output.message),
            error: None,
        }
    }

    /// Rejected detections keep their quality score
    pub fn failure(err: &PoseError) -> Self {
        Self {
            success: false,
            skeleton_path: None,
            skeleton_base64: None,
            pose_quality: err.pose_quality().cloned(),
            detected_features: None,
            message: None,
            error: Some(err.to_string()),
        }
    }
}

impl From<Result<SkeletonOutput, PoseError>> for DetectionReport {
    fn from(result: Result<SkeletonOutput, PoseError>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(err) => {
                warn!("Detection failed: {}", err);
                Self::failure(&err)
            }
        }
    }
}
