//! TIDAL Downloader - bulk download of tracks, albums and playlists from TIDAL
//!
//! This library turns a request for a track, a batch of tracks, a video, an
//! album, an artist's discography or a playlist into files on disk.
//!
//! # Features
//!
//! - Concurrent track downloads with a global concurrency limit
//! - Bounded retry with exponential backoff for transient failures
//! - ALAC conversion via ffmpeg and metadata tagging via lofty
//! - Aggregated failure reports per track, album, artist and playlist
//! - In-flight download tracking for progress display
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tidal_downloader::{Catalog, Config, Downloader, TidalApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = Arc::new(TidalApi::new(&config.account).await?);
//!     let album = api.get_album(17927863).await?;
//!
//!     let downloader = Downloader::from_config(api, &config)?;
//!     let errors = downloader.download_album(&album, None).await;
//!     println!("{} failed", errors.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;

// Re-exports for convenience
pub use api::{Catalog, TidalApi};
pub use config::{Config, DownloadLocation, DownloadMode};
pub use download::{DownloadErrors, DownloadStatus, Downloader, ErrorReporter};
pub use error::{Error, Result};
pub use media::{Album, Artist, Playlist, Track, Video};
