//! Albums, artists and playlists.

use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An artist, either standalone or as credited on an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artist {
    pub id: u64,
    pub name: String,
    /// Credit type ("MAIN", "FEATURED"), only present on item credits.
    #[serde(default, rename = "type")]
    pub artist_type: Option<String>,
}

impl PartialEq for Artist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Artist {}

impl Hash for Artist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// An album.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub artists: Option<Vec<Artist>>,
    /// Release date as `YYYY-MM-DD`.
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub number_of_volumes: Option<u32>,
    #[serde(default)]
    pub copyright: Option<String>,
}

impl Album {
    /// Parsed release date, if present and well formed.
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

impl PartialEq for Album {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Album {}

impl Hash for Album {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A user or editorial playlist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Playlist {}

impl Hash for Playlist {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_date() {
        let mut album = Album {
            release_date: Some("1969-12-05".into()),
            ..Default::default()
        };
        assert_eq!(
            album.release_date(),
            NaiveDate::from_ymd_opt(1969, 12, 5)
        );

        album.release_date = Some("sometime".into());
        assert_eq!(album.release_date(), None);
    }

    #[test]
    fn test_deserialize_playlist() {
        let json = r#"{"uuid": "36ea71a8-445e-41a4-82ab-6628c581535d", "title": "Road Trip", "numberOfTracks": 42}"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.title, "Road Trip");
        assert_eq!(playlist.number_of_tracks, Some(42));
    }
}
