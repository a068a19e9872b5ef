//! Downloadable item representation.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::media::collection::Artist;

/// The album a track or video belongs to, as embedded in item responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRef {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// An audio track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Catalog ID.
    pub id: u64,

    pub title: String,

    /// Version suffix such as "Remastered" or "Live".
    #[serde(default)]
    pub version: Option<String>,

    /// Position on the album (or in the playlist).
    #[serde(default)]
    pub track_number: u32,

    #[serde(default)]
    pub volume_number: Option<u32>,

    #[serde(default)]
    pub artists: Vec<Artist>,

    #[serde(default)]
    pub album: Option<AlbumRef>,

    /// Duration in seconds.
    #[serde(default)]
    pub duration: u64,

    #[serde(default)]
    pub isrc: Option<String>,

    #[serde(default)]
    pub copyright: Option<String>,
}

impl Track {
    /// Title with the version appended in parentheses, if any.
    pub fn full_title(&self) -> String {
        match self.version.as_deref() {
            Some(version) if !version.is_empty() => format!("{} ({})", self.title, version),
            _ => self.title.clone(),
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A music video.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub track_number: u32,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration: u64,
}

impl PartialEq for Video {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Video {}

impl Hash for Video {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
