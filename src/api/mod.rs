//! TIDAL catalog API module.
//!
//! This module provides:
//! - The `Catalog` trait the downloader resolves items through
//! - HTTP client for the TIDAL REST API
//! - API response types
//! - Release discovery over the session's favorites

pub mod catalog;
pub mod client;
pub mod releases;
pub mod types;

pub use catalog::Catalog;
pub use client::{TidalApi, PAGE_SIZE};
pub use releases::new_releases_from_favorite_artists;
pub use types::*;
