use crate::core::image_generator::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the kiosk root directory
pub const HOME_ENV: &str = "KIOSK_AI_HOME";
/// Fallback when config.json has no ElevenLabs key
pub const ELEVENLABS_KEY_ENV: &str = "ELEVENLABS_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Kiosk configuration (`<root>/config.json`). Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// ElevenLabs API key for speech synthesis
    pub elevenlabs_api_key: Option<String>,
    /// Base URL of the Stable Diffusion WebUI server
    pub sd_api_url: String,
    /// Public URL prefix under which synthesized audio is served
    pub tts_public_url_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            elevenlabs_api_key: None,
            sd_api_url: DEFAULT_API_URL.to_string(),
            tts_public_url_prefix: "/ai_test_sec/outputs/tts".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults if it doesn't exist
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.sd_api_url.starts_with("http://") || self.sd_api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "Invalid sd_api_url: {}. Must start with http:// or https://",
                self.sd_api_url
            )));
        }
        Ok(())
    }

    /// ElevenLabs key: config file first, then the environment. Empty values count as missing.
    pub fn resolve_elevenlabs_key(&self) -> Option<String> {
        self.elevenlabs_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(ELEVENLABS_KEY_ENV)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

/// Directory layout under the kiosk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub config_file: PathBuf,
    pub tts_output_dir: PathBuf,
    pub tts_model_dir: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_file: root.join("config.json"),
            tts_output_dir: root.join("outputs").join("tts"),
            tts_model_dir: root.join("models").join("tts"),
            root,
        }
    }

    /// `$KIOSK_AI_HOME`, or the current directory
    pub fn from_env() -> Self {
        let root = std::env::var_os(HOME_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sd_api_url, "http://localhost:7861");
        assert_eq!(config.tts_public_url_prefix, "/ai_test_sec/outputs/tts");
        assert!(config.elevenlabs_api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"elevenlabs_api_key": "sk-test", "unrelated": 1}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.sd_api_url, "http://localhost:7861");
    }

    #[test]
    fn test_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));

        std::fs::write(&path, r#"{"sd_api_url": "localhost:7861"}"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            sd_api_url: "https://sd.internal:7860".to_string(),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_config_key_takes_precedence() {
        let config = Config {
            elevenlabs_api_key: Some("from-file".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_elevenlabs_key().as_deref(), Some("from-file"));
    }

    #[test]
    fn test_paths_layout() {
        let paths = Paths::new("/srv/kiosk");
        assert_eq!(paths.config_file, PathBuf::from("/srv/kiosk/config.json"));
        assert_eq!(paths.tts_output_dir, PathBuf::from("/srv/kiosk/outputs/tts"));
        assert_eq!(paths.tts_model_dir, PathBuf::from("/srv/kiosk/models/tts"));
    }
}
