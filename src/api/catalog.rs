//! Catalog lookups the downloader depends on.

use async_trait::async_trait;

use crate::error::Result;
use crate::media::{Album, Artist, Playlist, Track, Video};

/// Read access to the streaming service's catalog.
///
/// Any `Err` is a hard failure for the granularity that asked for it: the
/// downloader reports the containing item as failed and does no further work
/// for it.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_track(&self, track_id: u64) -> Result<Track>;

    async fn get_video(&self, video_id: u64) -> Result<Video>;

    async fn get_album(&self, album_id: u64) -> Result<Album>;

    async fn get_artist(&self, artist_id: u64) -> Result<Artist>;

    async fn get_playlist(&self, playlist_uuid: &str) -> Result<Playlist>;

    /// All tracks of an album, in album order.
    async fn get_album_tracks(&self, album_id: u64) -> Result<Vec<Track>>;

    /// Albums of an artist, at most `limit` if given.
    async fn get_artist_albums(&self, artist_id: u64, limit: Option<usize>)
        -> Result<Vec<Album>>;

    /// All tracks of a playlist, in playlist order.
    async fn get_playlist_tracks(&self, playlist_uuid: &str) -> Result<Vec<Track>>;

    /// A URL the audio of a track can be fetched from.
    async fn get_audio_url(&self, track: &Track) -> Result<String>;

    /// A URL the video can be fetched from.
    async fn get_video_url(&self, video: &Video) -> Result<String>;

    /// Artists the session's user marked as favorite.
    async fn get_favorite_artists(&self) -> Result<Vec<Artist>>;
}
