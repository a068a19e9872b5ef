//! Download orchestration.
//!
//! Every public operation resolves its request into a flat batch of tracks
//! (or a single item), runs the batch through a bounded pool of concurrent
//! transfers and returns what failed. Operations never return `Err`: expected
//! failures end up in the returned value, everything else is reported through
//! the [`ErrorReporter`] and logged.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;

use crate::api::Catalog;
use crate::config::{Config, DownloadLocation, RetryConfig};
use crate::download::postprocess::PostProcessor;
use crate::download::report::{DownloadErrors, ErrorReporter, TracingReporter};
use crate::download::retry::fetch_with_retry;
use crate::download::status::DownloadStatus;
use crate::download::transfer::{HttpTransport, Transport};
use crate::error::Result;
use crate::fs::{
    album_folder_name, artist_string, nest_folder, track_file_name, video_file_name, PathResolver,
};
use crate::media::{Album, Artist, Playlist, Track, Video};
use crate::output::{create_item_bar, ConsoleReporter};

/// Downloads tracks, videos, albums, discographies and playlists.
pub struct Downloader {
    catalog: Arc<dyn Catalog>,
    transport: Arc<dyn Transport>,
    post_processor: PostProcessor,
    reporter: Arc<dyn ErrorReporter>,
    paths: PathResolver,
    location: DownloadLocation,
    retry: RetryConfig,
    status: Arc<DownloadStatus>,
    /// Shared by every batch of this downloader.
    slots: Arc<Semaphore>,
    max_concurrent: usize,
    show_progress: bool,
}

impl Downloader {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        transport: Arc<dyn Transport>,
        post_processor: PostProcessor,
        reporter: Arc<dyn ErrorReporter>,
        config: &Config,
    ) -> Self {
        let max_concurrent = config.download.max_concurrent_downloads.max(1);

        Self {
            catalog,
            transport,
            post_processor,
            reporter,
            paths: PathResolver::from_config(&config.download),
            location: config.download.location,
            retry: config.retry.clone(),
            status: Arc::new(DownloadStatus::new()),
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            show_progress: config.download.show_progress,
        }
    }

    /// Downloader with HTTP transfers and ffmpeg/lofty post-processing.
    ///
    /// Errors are printed to the console, or only logged when progress
    /// output is turned off.
    pub fn from_config(catalog: Arc<dyn Catalog>, config: &Config) -> Result<Self> {
        let reporter: Arc<dyn ErrorReporter> = if config.download.show_progress {
            Arc::new(ConsoleReporter)
        } else {
            Arc::new(TracingReporter)
        };
        let transport = Arc::new(HttpTransport::new(config.download.show_progress)?);
        let post_processor = PostProcessor::from_config(&config.post_processing, reporter.clone());

        Ok(Self::new(catalog, transport, post_processor, reporter, config))
    }

    pub fn status(&self) -> Arc<DownloadStatus> {
        Arc::clone(&self.status)
    }

    /// Download one track. Returns whether the transfer succeeded.
    ///
    /// Conversion and tagging run afterwards but don't affect the result.
    pub async fn download_track(&self, track: &Track, parent_folder: Option<&str>) -> bool {
        let _task = self.status.start_task();

        let url = match self.catalog.get_audio_url(track).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("No stream for {} ({}): {}", track.title, track.id, e);
                return false;
            }
        };

        let file_name = track_file_name(track);
        tracing::info!("Downloading: {}", file_name);

        let path = match self.paths.resolve(self.location, parent_folder, &file_name) {
            Ok(path) => path,
            Err(e) => {
                self.reporter.report(
                    "Error while downloading track",
                    &format!(
                        "Couldn't build path for track: {} - {}: {}",
                        track.title,
                        artist_string(&track.artists),
                        e
                    ),
                );
                return false;
            }
        };

        let result = fetch_with_retry(self.transport.as_ref(), &self.retry, &url, &path).await;
        if !result.outcome.ok {
            tracing::warn!(
                attempts = result.attempts,
                code = result.outcome.status_code(),
                "Download failed: {}",
                file_name
            );
            return false;
        }

        let enrichment = self.post_processor.normalize_and_tag(&path, track).await;
        tracing::debug!(
            converted = enrichment.converted,
            tagged = enrichment.tagged,
            "Post-processing done for {}",
            file_name
        );

        tracing::info!("Download finished: {}", file_name);
        true
    }

    /// Download tracks concurrently and wait for all of them.
    ///
    /// The result holds exactly the tracks whose download failed.
    pub async fn download_tracks(
        &self,
        tracks: &[Track],
        parent_folder: Option<&str>,
    ) -> DownloadErrors {
        let _task = self.status.start_task();

        // Copies of one track share a destination path and would race on it
        let mut seen = HashSet::new();
        let unique: Vec<&Track> = tracks.iter().filter(|t| seen.insert(t.id)).collect();
        let progress = self.batch_progress(unique.len(), "Tracks");

        let errors = stream::iter(unique)
            .map(|track| async move {
                // Never closed, so a permit is always granted
                let _slot = self.slots.acquire().await.ok();
                let ok = self.download_track(track, parent_folder).await;
                (track, ok)
            })
            .buffer_unordered(self.max_concurrent)
            .fold(DownloadErrors::default(), |mut errors, (track, ok)| {
                if let Some(pb) = &progress {
                    pb.inc(1);
                }
                if !ok {
                    errors.affected_tracks.insert(track.clone());
                }
                async move { errors }
            })
            .await;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        tracing::info!(
            "Track download done: {} of {} failed",
            errors.affected_tracks.len(),
            seen.len()
        );
        errors
    }

    /// Download one video. Videos are not post-processed.
    pub async fn download_video(&self, video: &Video, parent_folder: Option<&str>) -> bool {
        let _task = self.status.start_task();

        let url = match self.catalog.get_video_url(video).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("No stream for video {} ({}): {}", video.title, video.id, e);
                return false;
            }
        };

        let file_name = video_file_name(video);
        tracing::info!("Downloading video: {}", file_name);

        let path = match self.paths.resolve(self.location, parent_folder, &file_name) {
            Ok(path) => path,
            Err(e) => {
                self.reporter.report(
                    "Error while downloading video",
                    &format!("Couldn't build path for video: {}: {}", video.title, e),
                );
                return false;
            }
        };

        let result = fetch_with_retry(self.transport.as_ref(), &self.retry, &url, &path).await;
        if !result.outcome.ok {
            tracing::warn!(
                attempts = result.attempts,
                code = result.outcome.status_code(),
                "Video download failed: {}",
                file_name
            );
        }
        result.outcome.ok
    }

    /// Download videos concurrently. Returns the videos that failed.
    pub async fn download_videos(
        &self,
        videos: &[Video],
        parent_folder: Option<&str>,
    ) -> HashSet<Video> {
        let _task = self.status.start_task();

        let mut seen = HashSet::new();
        let unique: Vec<&Video> = videos.iter().filter(|v| seen.insert(v.id)).collect();

        stream::iter(unique)
            .map(|video| async move {
                let _slot = self.slots.acquire().await.ok();
                let ok = self.download_video(video, parent_folder).await;
                (video, ok)
            })
            .buffer_unordered(self.max_concurrent)
            .filter_map(|(video, ok)| async move { (!ok).then(|| video.clone()) })
            .collect()
            .await
    }

    /// Download every track of an album into `"{artists} - {title}"`.
    pub async fn download_album(&self, album: &Album, parent_folder: Option<&str>) -> DownloadErrors {
        let _task = self.status.start_task();

        let tracks = match self.catalog.get_album_tracks(album.id).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Couldn't get tracks of album {}: {}", album.title, e);
                return DownloadErrors::album(album.clone());
            }
        };

        let folder = nest_folder(parent_folder, &album_folder_name(album));
        tracing::info!(
            "Downloading album {} ({} tracks) into {}",
            album.title,
            tracks.len(),
            folder
        );

        self.download_tracks(&tracks, Some(&folder)).await
    }

    /// Download every album of an artist, one album at a time.
    pub async fn download_all_albums(
        &self,
        artist: &Artist,
        parent_folder: Option<&str>,
    ) -> DownloadErrors {
        let _task = self.status.start_task();

        let albums = match self.catalog.get_artist_albums(artist.id, None).await {
            Ok(albums) => albums,
            Err(e) => {
                tracing::warn!("Couldn't get albums of {}: {}", artist.name, e);
                return DownloadErrors::artist(artist.clone());
            }
        };

        tracing::info!("Downloading {} albums of {}", albums.len(), artist.name);

        let folder = nest_folder(parent_folder, &artist.name);
        let mut errors = DownloadErrors::default();
        for album in &albums {
            errors.merge(self.download_album(album, Some(&folder)).await);
        }
        errors
    }

    /// Download every track of a playlist into a folder named after it.
    pub async fn download_playlist(
        &self,
        playlist: &Playlist,
        parent_folder: Option<&str>,
    ) -> DownloadErrors {
        let _task = self.status.start_task();

        let tracks = match self.catalog.get_playlist_tracks(&playlist.uuid).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Couldn't get tracks of playlist {}: {}", playlist.title, e);
                return DownloadErrors::playlist(playlist.clone());
            }
        };

        let folder = nest_folder(parent_folder, &playlist.title);
        tracing::info!(
            "Downloading playlist {} ({} tracks) into {}",
            playlist.title,
            tracks.len(),
            folder
        );

        self.download_tracks(&tracks, Some(&folder)).await
    }

    fn batch_progress(&self, total: usize, message: &str) -> Option<indicatif::ProgressBar> {
        (self.show_progress && total > 1).then(|| create_item_bar(total as u64, message))
    }
}
