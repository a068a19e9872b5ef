//! In-memory collaborators for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::Catalog;
use crate::download::postprocess::{Tagger, Transcoder};
use crate::download::report::ErrorReporter;
use crate::download::transfer::{TransferOutcome, Transport};
use crate::error::{Error, Result};
use crate::media::{Album, Artist, Playlist, Track, Video};

/// Catalog answering from maps. Anything not registered is "not found".
#[derive(Default)]
pub struct StubCatalog {
    tracks: HashMap<u64, Track>,
    albums: HashMap<u64, Album>,
    album_tracks: HashMap<u64, Vec<Track>>,
    artist_albums: HashMap<u64, Vec<Album>>,
    playlist_tracks: HashMap<String, Vec<Track>>,
    favorites: Vec<Artist>,
    unplayable: HashSet<u64>,
    lookups: AtomicUsize,
}

impl StubCatalog {
    pub fn with_track(mut self, track: Track) -> Self {
        self.tracks.insert(track.id, track);
        self
    }

    pub fn with_album(mut self, album: Album) -> Self {
        self.albums.insert(album.id, album);
        self
    }

    pub fn with_album_tracks(mut self, album_id: u64, tracks: Vec<Track>) -> Self {
        self.album_tracks.insert(album_id, tracks);
        self
    }

    pub fn with_artist_albums(mut self, artist_id: u64, albums: Vec<Album>) -> Self {
        self.artist_albums.insert(artist_id, albums);
        self
    }

    pub fn with_playlist_tracks(mut self, uuid: &str, tracks: Vec<Track>) -> Self {
        self.playlist_tracks.insert(uuid.to_string(), tracks);
        self
    }

    pub fn with_favorites(mut self, artists: Vec<Artist>) -> Self {
        self.favorites = artists;
        self
    }

    /// The track resolves but has no stream URL.
    pub fn with_unplayable(mut self, track_id: u64) -> Self {
        self.unplayable.insert(track_id);
        self
    }

    /// Number of lookups answered so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn count(&self) {
        self.lookups.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn track_url(track_id: u64) -> String {
    format!("https://stub.invalid/track/{}", track_id)
}

pub fn video_url(video_id: u64) -> String {
    format!("https://stub.invalid/video/{}", video_id)
}

#[async_trait]
impl Catalog for StubCatalog {
    async fn get_track(&self, track_id: u64) -> Result<Track> {
        self.count();
        self.tracks
            .get(&track_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("track {}", track_id)))
    }

    async fn get_video(&self, video_id: u64) -> Result<Video> {
        self.count();
        Err(Error::NotFound(format!("video {}", video_id)))
    }

    async fn get_album(&self, album_id: u64) -> Result<Album> {
        self.count();
        self.albums
            .get(&album_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("album {}", album_id)))
    }

    async fn get_artist(&self, artist_id: u64) -> Result<Artist> {
        self.count();
        Err(Error::NotFound(format!("artist {}", artist_id)))
    }

    async fn get_playlist(&self, playlist_uuid: &str) -> Result<Playlist> {
        self.count();
        Err(Error::NotFound(format!("playlist {}", playlist_uuid)))
    }

    async fn get_album_tracks(&self, album_id: u64) -> Result<Vec<Track>> {
        self.count();
        self.album_tracks
            .get(&album_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("album {}", album_id)))
    }

    async fn get_artist_albums(
        &self,
        artist_id: u64,
        limit: Option<usize>,
    ) -> Result<Vec<Album>> {
        self.count();
        let mut albums = self
            .artist_albums
            .get(&artist_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("artist {}", artist_id)))?;
        if let Some(limit) = limit {
            albums.truncate(limit);
        }
        Ok(albums)
    }

    async fn get_playlist_tracks(&self, playlist_uuid: &str) -> Result<Vec<Track>> {
        self.count();
        self.playlist_tracks
            .get(playlist_uuid)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("playlist {}", playlist_uuid)))
    }

    async fn get_audio_url(&self, track: &Track) -> Result<String> {
        self.count();
        if self.unplayable.contains(&track.id) {
            return Err(Error::NoStreamUrl(format!("track {}", track.id)));
        }
        Ok(track_url(track.id))
    }

    async fn get_video_url(&self, video: &Video) -> Result<String> {
        self.count();
        Ok(video_url(video.id))
    }

    async fn get_favorite_artists(&self) -> Result<Vec<Artist>> {
        self.count();
        Ok(self.favorites.clone())
    }
}

/// Transport that plays back scripted outcomes and writes the URL into the
/// file on success.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<TransferOutcome>>,
    fallback: TransferOutcome,
    failing_urls: HashSet<String>,
    delay: Duration,
    attempts: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    /// Play `script` in order, then complete every further attempt.
    pub fn new(script: Vec<TransferOutcome>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: TransferOutcome::completed(),
            failing_urls: HashSet::new(),
            delay: Duration::ZERO,
            attempts: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn always(outcome: TransferOutcome) -> Self {
        Self {
            fallback: outcome,
            ..Self::new(Vec::new())
        }
    }

    /// Every attempt for `url` fails terminally.
    pub fn with_failing_url(mut self, url: String) -> Self {
        self.failing_urls.insert(url);
        self
    }

    /// Hold each attempt open for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Highest number of attempts that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn download(&self, url: &str, path: &Path, overwrite: bool) -> TransferOutcome {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let outcome = if self.failing_urls.contains(url) {
            TransferOutcome::failed(None)
        } else {
            let scripted = self.script.lock().unwrap().pop_front();
            scripted.unwrap_or(self.fallback)
        };

        let outcome = if outcome.ok {
            if !overwrite && path.exists() {
                TransferOutcome::failed(None)
            } else {
                std::fs::create_dir_all(path.parent().unwrap()).unwrap();
                std::fs::write(path, url).unwrap();
                outcome
            }
        } else {
            outcome
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }
}

/// Reporter that keeps every report.
#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<(String, String)>>,
}

impl RecordingReporter {
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, title: &str, content: &str) {
        self.reports
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
    }
}

/// Tagger that only records which tracks it was asked to tag.
#[derive(Default)]
pub struct RecordingTagger {
    tagged: Mutex<Vec<u64>>,
}

impl RecordingTagger {
    pub fn tagged(&self) -> Vec<u64> {
        self.tagged.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tagger for RecordingTagger {
    async fn set_metadata(&self, track: &Track, _path: &Path) -> Result<()> {
        self.tagged.lock().unwrap().push(track.id);
        Ok(())
    }
}

/// Transcoder that copies the file unchanged.
pub struct CopyTranscoder;

#[async_trait]
impl Transcoder for CopyTranscoder {
    async fn to_lossless(&self, source: &Path, destination: &Path) -> Result<()> {
        tokio::fs::copy(source, destination).await?;
        Ok(())
    }
}

/// Transcoder that always fails, leaving a partial output behind.
pub struct FailingTranscoder;

#[async_trait]
impl Transcoder for FailingTranscoder {
    async fn to_lossless(&self, _source: &Path, destination: &Path) -> Result<()> {
        tokio::fs::write(destination, b"partial").await?;
        Err(Error::FFmpeg("ffmpeg exited with status 1".into()))
    }
}
