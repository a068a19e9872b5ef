//! Filesystem module.
//!
//! Provides:
//! - Destination path resolution
//! - File and folder name generation

pub mod naming;
pub mod paths;

pub use naming::{
    album_folder_name, artist_string, nest_folder, sanitize_segment, track_file_name,
    video_file_name,
};
pub use paths::PathResolver;
