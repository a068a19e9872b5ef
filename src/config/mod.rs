//! Configuration module for the tidal-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Download modes and locations
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, DownloadConfig, PostProcessingConfig, RetryConfig};
pub use modes::{DownloadLocation, DownloadMode};
pub use validation::{parse_catalog_id, validate_config};
