//! Download mode and location definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a single run downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DownloadMode {
    /// A single track.
    #[default]
    Track,
    /// Several tracks as one batch.
    Tracks,
    /// A single music video.
    Video,
    /// Every track of an album.
    Album,
    /// Every album of an artist.
    Artist,
    /// Every track of a playlist.
    Playlist,
    /// Latest albums of the session's favorite artists.
    NewReleases,
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadMode::Track => write!(f, "track"),
            DownloadMode::Tracks => write!(f, "tracks"),
            DownloadMode::Video => write!(f, "video"),
            DownloadMode::Album => write!(f, "album"),
            DownloadMode::Artist => write!(f, "artist"),
            DownloadMode::Playlist => write!(f, "playlist"),
            DownloadMode::NewReleases => write!(f, "new-releases"),
        }
    }
}

impl FromStr for DownloadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "track" => Ok(DownloadMode::Track),
            "tracks" => Ok(DownloadMode::Tracks),
            "video" => Ok(DownloadMode::Video),
            "album" => Ok(DownloadMode::Album),
            "artist" => Ok(DownloadMode::Artist),
            "playlist" => Ok(DownloadMode::Playlist),
            "new-releases" => Ok(DownloadMode::NewReleases),
            _ => Err(format!("Unknown download mode: {}", s)),
        }
    }
}

/// Base directory files are written under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadLocation {
    #[default]
    Downloads,
    Music,
}

impl fmt::Display for DownloadLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadLocation::Downloads => write!(f, "downloads"),
            DownloadLocation::Music => write!(f, "music"),
        }
    }
}
