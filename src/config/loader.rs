//! Configuration structures and loading logic.

use crate::config::modes::{DownloadLocation, DownloadMode};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub post_processing: PostProcessingConfig,
}

/// Session credentials for the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Session ID of a logged-in TIDAL session.
    #[serde(default)]
    pub session_id: String,

    /// Two-letter country code the session is registered in.
    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Base URL of the catalog API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

/// Download target and concurrency options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// What the CLI downloads when no mode is given on the command line.
    #[serde(default)]
    pub mode: DownloadMode,

    /// Which user directory files are written under.
    #[serde(default)]
    pub location: DownloadLocation,

    /// Overrides the platform downloads directory.
    #[serde(default)]
    pub downloads_directory: Option<PathBuf>,

    /// Overrides the platform music directory.
    #[serde(default)]
    pub music_directory: Option<PathBuf>,

    /// Maximum number of tracks transferred at the same time.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Whether to show progress bars.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            mode: DownloadMode::default(),
            location: DownloadLocation::default(),
            downloads_directory: None,
            music_directory: None,
            max_concurrent_downloads: default_max_concurrent(),
            show_progress: true,
        }
    }
}

/// Retry behaviour for transient transfer failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on the delay between retries, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Stretch each delay by a random 0-100% to spread out retries.
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl RetryConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Conversion and tagging after a track has been downloaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostProcessingConfig {
    /// Re-encode downloaded tracks into ALAC (16 bit, 44.1 kHz, stereo).
    #[serde(default = "default_true")]
    pub convert_to_lossless: bool,

    /// Write title, artist, album etc. into downloaded tracks.
    #[serde(default = "default_true")]
    pub write_metadata: bool,

    /// ffmpeg binary to use, looked up on PATH by default.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
}

impl Default for PostProcessingConfig {
    fn default() -> Self {
        Self {
            convert_to_lossless: true,
            write_metadata: true,
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

fn default_country_code() -> String {
    "US".to_string()
}

fn default_api_base() -> String {
    "https://api.tidalhifi.com/v1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent() -> usize {
    4
}

fn default_max_retries() -> u32 {
    10
}

fn default_initial_delay_ms() -> u64 {
    250
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            session_id: String::new(),
            country_code: default_country_code(),
            api_base: default_api_base(),
        }
    }
}
