//! Application configuration
//!
//! Precedence, highest first: command line, `SHORTSMIX_*` environment
//! variables, TOML file, built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::model::{OutputFormat, TargetDuration, MAX_OUTPUT_COUNT};
use crate::error::{ShortsError, ShortsResult};
use crate::utils::logging::LogLevel;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "shortsmix.toml";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub encoder: EncoderConfig,
    pub logging: LoggingConfig,
}

/// Defaults for generation runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub target_duration: TargetDuration,
    pub count: u32,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_duration: TargetDuration::Seconds30,
            count: 3,
            format: OutputFormat::Mp4,
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Settings for the ffmpeg-backed encoder and probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    /// Parent directory for the encoder's scratch space; system temp dir if unset
    pub scratch_dir: Option<PathBuf>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> ShortsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ShortsError::ConfigNotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ShortsError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve file and environment layers
    ///
    /// An explicit path must exist; otherwise `shortsmix.toml` is used when present.
    pub fn load(explicit: Option<&Path>) -> ShortsResult<Self> {
        let mut config = match explicit {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::from_file(path)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                info!("Loading configuration from: {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SHORTSMIX_*` environment variables
    pub fn apply_env_overrides(&mut self) -> ShortsResult<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> ShortsResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("SHORTSMIX_TARGET_DURATION") {
            let seconds: u32 = parse_value("SHORTSMIX_TARGET_DURATION", &value)?;
            self.generation.target_duration =
                TargetDuration::try_from(seconds).map_err(|_| invalid("SHORTSMIX_TARGET_DURATION", &value))?;
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_COUNT") {
            self.generation.count = parse_value("SHORTSMIX_COUNT", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_FORMAT") {
            self.generation.format =
                OutputFormat::parse(&value).map_err(|_| invalid("SHORTSMIX_FORMAT", &value))?;
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_OUTPUT_DIR") {
            self.generation.output_dir = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_FFMPEG") {
            self.encoder.ffmpeg_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_FFPROBE") {
            self.encoder.ffprobe_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_CRF") {
            self.encoder.crf = parse_value("SHORTSMIX_CRF", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("SHORTSMIX_LOG_LEVEL") {
            self.logging.level = value;
            applied += 1;
        }

        if applied > 0 {
            info!("Applied {} environment variable overrides", applied);
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ShortsResult<()> {
        if self.generation.count == 0 || self.generation.count > MAX_OUTPUT_COUNT {
            return Err(invalid("generation.count", &self.generation.count.to_string()));
        }
        if self.encoder.crf > 51 {
            return Err(invalid("encoder.crf", &self.encoder.crf.to_string()));
        }
        if self.encoder.video_codec.trim().is_empty() {
            return Err(invalid("encoder.video_codec", &self.encoder.video_codec));
        }
        if self.encoder.audio_codec.trim().is_empty() {
            return Err(invalid("encoder.audio_codec", &self.encoder.audio_codec));
        }
        LogLevel::parse(&self.logging.level).map_err(|_| invalid("logging.level", &self.logging.level))?;
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ShortsError {
    ShortsError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ShortsResult<T> {
    value.trim().parse().map_err(|_| invalid(key, value))
}
