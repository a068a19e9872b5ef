//! Failure aggregation and error reporting.

use std::collections::HashSet;

use crate::media::{Album, Artist, Playlist, Track};

/// Items that failed during one download call, by granularity.
///
/// Each set holds an item at most once no matter how often it failed.
/// Empty on full success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadErrors {
    pub affected_tracks: HashSet<Track>,
    pub affected_albums: HashSet<Album>,
    pub affected_artists: HashSet<Artist>,
    pub affected_playlists: HashSet<Playlist>,
}

impl DownloadErrors {
    pub fn track(track: Track) -> Self {
        Self {
            affected_tracks: HashSet::from([track]),
            ..Default::default()
        }
    }

    pub fn album(album: Album) -> Self {
        Self {
            affected_albums: HashSet::from([album]),
            ..Default::default()
        }
    }

    pub fn artist(artist: Artist) -> Self {
        Self {
            affected_artists: HashSet::from([artist]),
            ..Default::default()
        }
    }

    pub fn playlist(playlist: Playlist) -> Self {
        Self {
            affected_playlists: HashSet::from([playlist]),
            ..Default::default()
        }
    }

    /// Union another report into this one.
    pub fn merge(&mut self, other: DownloadErrors) {
        self.affected_tracks.extend(other.affected_tracks);
        self.affected_albums.extend(other.affected_albums);
        self.affected_artists.extend(other.affected_artists);
        self.affected_playlists.extend(other.affected_playlists);
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of failed items across all granularities.
    pub fn len(&self) -> usize {
        self.affected_tracks.len()
            + self.affected_albums.len()
            + self.affected_artists.len()
            + self.affected_playlists.len()
    }
}

/// Sink for human-readable failure descriptions.
///
/// Reports are observational: they never change what a download call returns.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, title: &str, content: &str);
}

/// Reporter that writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, title: &str, content: &str) {
        tracing::warn!("{}: {}", title, content);
    }
}
