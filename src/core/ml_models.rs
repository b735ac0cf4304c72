// ML Model loader and manager utilities
// Handles model downloading and caching

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

const HUGGING_FACE_URL: &str = "https://huggingface.co";
const CHUNK_SIZE: usize = 8192;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Download request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        DownloadError::Request(e.to_string())
    }
}

pub type DownloadResult<T> = Result<T, DownloadError>;

/// Model source configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    /// Local file path
    LocalFile(PathBuf),
    /// Hugging Face model hub
    HuggingFace { repo: String, filename: String },
    /// Direct URL
    Url(String),
}

impl ModelSource {
    /// Download URL for remote sources, resolving hub files against `hub_url`
    pub fn url(&self, hub_url: &str) -> Option<String> {
        match self {
            ModelSource::LocalFile(_) => None,
            ModelSource::HuggingFace { repo, filename } => Some(format!(
                "{}/{}/resolve/main/{}",
                hub_url.trim_end_matches('/'),
                repo,
                filename
            )),
            ModelSource::Url(url) => Some(url.clone()),
        }
    }
}

/// ML model metadata
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// File name inside the cache directory
    pub name: String,
    pub version: String,
    pub source: ModelSource,
    pub size_bytes: Option<u64>,
}

/// Receives transfer progress
pub trait ProgressSink {
    fn on_start(&mut self, model: &ModelInfo, url: &str);

    /// Only called when the server announced a content length
    fn on_progress(&mut self, downloaded: u64, total: u64);

    fn on_finish(&mut self, path: &Path);
}

const PROGRESS_TEMPLATE: &str = "Progress: {percent}% [{bar:40.cyan/blue}] {bytes}/{total_bytes}";

/// Terminal progress bar, shown only once the content length is known
#[derive(Default)]
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    fn bar(&mut self, total: u64) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            ProgressBar::new(total).with_style(style)
        })
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_start(&mut self, _model: &ModelInfo, url: &str) {
        self.bar = None;
        println!("Downloading: {}", url);
    }

    fn on_progress(&mut self, downloaded: u64, total: u64) {
        let bar = self.bar(total);
        bar.set_length(total);
        bar.set_position(downloaded);
    }

    fn on_finish(&mut self, path: &Path) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
        println!("Download complete: {}", path.display());
    }
}

/// Model manager for caching and downloading ML models
pub struct ModelManager {
    cache_dir: PathBuf,
    hub_url: String,
    client: reqwest::blocking::Client,
}

impl ModelManager {
    /// Create a new model manager with cache directory
    pub fn new(cache_dir: PathBuf) -> DownloadResult<Self> {
        fs::create_dir_all(&cache_dir)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;
        Ok(Self {
            cache_dir,
            hub_url: HUGGING_FACE_URL.to_string(),
            client,
        })
    }

    /// Resolve Hugging Face sources against a different hub or mirror
    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into();
        self
    }

    /// Get the cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Check if a model is cached
    pub fn is_cached(&self, model: &ModelInfo) -> bool {
        self.get_model_path(&model.name).exists()
    }

    /// Get the local path for a model
    pub fn get_model_path(&self, model_name: &str) -> PathBuf {
        self.cache_dir.join(model_name)
    }

    /// Download a model if not cached
    pub fn ensure_model(&self, model: &ModelInfo, progress: &mut dyn ProgressSink) -> DownloadResult<PathBuf> {
        let model_path = self.get_model_path(&model.name);
        if self.is_cached(model) {
            info!("Model {} already cached at {}", model.name, model_path.display());
            return Ok(model_path);
        }
        self.download(model, progress)
    }

    /// Fetch a model into the cache, replacing any cached copy
    pub fn download(&self, model: &ModelInfo, progress: &mut dyn ProgressSink) -> DownloadResult<PathBuf> {
        let model_path = self.get_model_path(&model.name);
        fs::create_dir_all(&self.cache_dir)?;

        if let ModelSource::LocalFile(path) = &model.source {
            info!("Copying model {} from {}", model.name, path.display());
            fs::copy(path, &model_path)?;
        } else if let Some(url) = model.source.url(&self.hub_url) {
            progress.on_start(model, &url);
            self.fetch(&url, &model_path, progress)?;
        }

        progress.on_finish(&model_path);
        Ok(model_path)
    }

    /// Stream `url` to `destination` through a `.part` file. The partial file is removed
    /// on any failure, so an interrupted download never looks cached.
    fn fetch(&self, url: &str, destination: &Path, progress: &mut dyn ProgressSink) -> DownloadResult<()> {
        info!("Downloading {}", url);
        let mut response = self.client.get(url).send()?.error_for_status()?;
        let total = response.content_length().filter(|&len| len > 0);

        let partial = destination.with_extension(match destination.extension() {
            Some(ext) => format!("{}.part", ext.to_string_lossy()),
            None => "part".to_string(),
        });

        let downloaded = match write_body(&mut response, &partial, total, progress) {
            Ok(downloaded) => downloaded,
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&partial) {
                    debug!("Could not remove {}: {}", partial.display(), cleanup);
                }
                return Err(e);
            }
        };

        fs::rename(&partial, destination)?;
        debug!("Saved {} bytes to {}", downloaded, destination.display());
        Ok(())
    }

    /// Clear the model cache
    pub fn clear_cache(&self) -> DownloadResult<()> {
        if self.cache_dir.exists() {
            fs::remove_dir_all(&self.cache_dir)?;
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Get cache size in bytes
    pub fn get_cache_size(&self) -> DownloadResult<u64> {
        let mut total_size = 0u64;
        if self.cache_dir.exists() {
            for entry in fs::read_dir(&self.cache_dir)? {
                let metadata = entry?.metadata()?;
                if metadata.is_file() {
                    total_size += metadata.len();
                }
            }
        }
        Ok(total_size)
    }
}

/// Copy the response body into `path` in fixed-size chunks
fn write_body(
    body: &mut impl Read,
    path: &Path,
    total: Option<u64>,
    progress: &mut dyn ProgressSink,
) -> DownloadResult<u64> {
    let mut file = fs::File::create(path)?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => return Err(DownloadError::Request(e.to_string())),
        };
        file.write_all(&buf[..n])?;
        downloaded += n as u64;
        if let Some(total) = total {
            progress.on_progress(downloaded, total);
        }
    }

    file.flush()?;
    Ok(downloaded)
}

// ==============================================================================
// Predefined Model Configurations
// ==============================================================================

/// Piper TTS voices
pub mod piper {
    use super::*;

    const VOICES_REPO: &str = "rhasspy/piper-voices";

    fn voice_file(filename: &str, size_bytes: Option<u64>) -> ModelInfo {
        ModelInfo {
            name: filename.to_string(),
            version: "v1.0.0".to_string(),
            source: ModelSource::HuggingFace {
                repo: VOICES_REPO.to_string(),
                filename: format!("en/en_US/lessac/medium/{}", filename),
            },
            size_bytes,
        }
    }

    /// `en_US-lessac-medium` weights and config, in download order
    pub fn lessac_medium() -> Vec<ModelInfo> {
        vec![
            voice_file("en_US-lessac-medium.onnx", Some(63_000_000)), // ~63 MB
            voice_file("en_US-lessac-medium.onnx.json", None),
        ]
    }
}
