//! Destination path resolution.

use std::path::{Component, Path, PathBuf};

use directories::UserDirs;

use crate::config::{DownloadConfig, DownloadLocation};
use crate::error::{Error, Result};
use crate::fs::naming::sanitize_segment;

/// Maps a location, an optional parent folder and a file name to a destination path.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    downloads_dir: Option<PathBuf>,
    music_dir: Option<PathBuf>,
}

impl PathResolver {
    /// Create a resolver. `None` falls back to the platform directory.
    pub fn new(downloads_dir: Option<PathBuf>, music_dir: Option<PathBuf>) -> Self {
        Self {
            downloads_dir,
            music_dir,
        }
    }

    pub fn from_config(config: &DownloadConfig) -> Self {
        Self::new(
            config.downloads_directory.clone(),
            config.music_directory.clone(),
        )
    }

    /// Get the base directory for a location.
    pub fn base_directory(&self, location: DownloadLocation) -> Result<PathBuf> {
        let overridden = match location {
            DownloadLocation::Downloads => self.downloads_dir.as_ref(),
            DownloadLocation::Music => self.music_dir.as_ref(),
        };
        if let Some(dir) = overridden {
            return Ok(dir.clone());
        }

        let dirs = UserDirs::new()
            .ok_or_else(|| Error::PathBuild("Couldn't determine the home directory".into()))?;

        let dir = match location {
            DownloadLocation::Downloads => dirs.download_dir(),
            DownloadLocation::Music => dirs.audio_dir(),
        };

        dir.map(Path::to_path_buf)
            .ok_or_else(|| Error::PathBuild(format!("No {} directory on this system", location)))
    }

    /// Resolve the destination path of a file.
    ///
    /// The parent folder is appended as given and may contain `/` to nest
    /// folders. Inside the file name `/` is replaced by `:`.
    pub fn resolve(
        &self,
        location: DownloadLocation,
        parent_folder: Option<&str>,
        file_name: &str,
    ) -> Result<PathBuf> {
        let mut path = self.base_directory(location)?;

        if let Some(parent) = parent_folder.filter(|p| !p.is_empty()) {
            let escapes = Path::new(parent).components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            });
            if escapes {
                return Err(Error::PathBuild(format!(
                    "Parent folder leaves the download directory: '{}'",
                    parent
                )));
            }
            path.push(parent);
        }

        let name = sanitize_segment(file_name);
        if name.trim().is_empty() || name == "." || name == ".." {
            return Err(Error::PathBuild(format!("Invalid file name: '{}'", file_name)));
        }
        path.push(name);

        Ok(path)
    }
}
