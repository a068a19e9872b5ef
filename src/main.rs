//! TIDAL Downloader - CLI entry point.

use std::collections::HashSet;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tidal_downloader::{
    api::{new_releases_from_favorite_artists, Catalog, TidalApi},
    cli::Args,
    config::{parse_catalog_id, validate_config, Config, DownloadMode},
    download::{DownloadErrors, Downloader},
    error::{exit_codes, Error, Result},
    fs::PathResolver,
    media::{Track, Video},
    output::{
        create_spinner, print_banner, print_config_summary, print_error, print_info,
        print_run_summary, print_success, print_warning, RunSummary,
    },
};

/// Everything that went wrong in a run that didn't abort.
#[derive(Default)]
struct RunReport {
    errors: DownloadErrors,
    failed_videos: HashSet<Video>,
    /// Ids that couldn't be looked up in the catalog.
    unresolved: Vec<String>,
}

impl RunReport {
    fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            errors: Some(&self.errors),
            failed_videos: Some(&self.failed_videos),
            unresolved: &self.unresolved,
        }
    }

    fn is_clean(&self) -> bool {
        self.summary().is_clean()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(report) if report.is_clean() => ExitCode::from(exit_codes::SUCCESS as u8),
        Ok(_) => ExitCode::from(exit_codes::SOME_DOWNLOADS_FAILED as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::MissingConfig(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::Authentication(_)
                | Error::Api(_)
                | Error::RateLimited(_)
                | Error::NotFound(_)
                | Error::NoStreamUrl(_) => ExitCode::from(exit_codes::API_ERROR as u8),
                Error::Download(_)
                | Error::PathBuild(_)
                | Error::FFmpeg(_)
                | Error::FFmpegNotFound => ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8),
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<RunReport> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        print_warning(&format!(
            "Configuration file not found: {}",
            args.config.display()
        ));
        print_info("Using default configuration with CLI arguments");
        Config::default()
    };

    args.merge_into_config(&mut config);
    validate_config(&config)?;

    let mode = config.download.mode;
    if mode != DownloadMode::NewReleases && args.ids.is_empty() {
        return Err(Error::Config(format!("Mode '{}' needs at least one id", mode)));
    }

    let directory = PathResolver::from_config(&config.download)
        .base_directory(config.download.location)?;
    print_config_summary(
        &mode.to_string(),
        &args.ids,
        &directory.display().to_string(),
    );

    print_info("Connecting to TIDAL...");
    let api = Arc::new(TidalApi::new(&config.account).await?);
    print_info(&format!("Logged in as user {}", api.user_id()));

    let catalog: Arc<dyn Catalog> = api;
    let downloader = Downloader::from_config(catalog.clone(), &config)?;

    let status = downloader.status();
    let mut active = status.subscribe();
    tokio::spawn(async move {
        while active.changed().await.is_ok() {
            if status.is_downloading() {
                tracing::debug!(active = *active.borrow(), "In-flight downloads changed");
            } else {
                tracing::debug!("All downloads idle");
            }
        }
    });

    let parent = args.parent_folder.as_deref();
    let mut report = RunReport::default();

    match mode {
        DownloadMode::Track => {
            for input in &args.ids {
                match lookup_track(catalog.as_ref(), input).await {
                    Ok(track) => {
                        if !downloader.download_track(&track, parent).await {
                            report.errors.affected_tracks.insert(track);
                        }
                    }
                    Err(e) => unresolved(&mut report, input, e),
                }
            }
        }
        DownloadMode::Tracks => {
            let spinner = create_spinner("Looking up tracks...");
            let mut tracks = Vec::with_capacity(args.ids.len());
            for input in &args.ids {
                match lookup_track(catalog.as_ref(), input).await {
                    Ok(track) => tracks.push(track),
                    Err(e) => unresolved(&mut report, input, e),
                }
            }
            spinner.finish_and_clear();

            report
                .errors
                .merge(downloader.download_tracks(&tracks, parent).await);
        }
        DownloadMode::Video => {
            let mut videos = Vec::with_capacity(args.ids.len());
            for input in &args.ids {
                let video = match numeric_id(input, "video") {
                    Ok(id) => catalog.get_video(id).await,
                    Err(e) => Err(e),
                };
                match video {
                    Ok(video) => videos.push(video),
                    Err(e) => unresolved(&mut report, input, e),
                }
            }

            report.failed_videos = downloader.download_videos(&videos, parent).await;
        }
        DownloadMode::Album => {
            for input in &args.ids {
                let album = match numeric_id(input, "album") {
                    Ok(id) => catalog.get_album(id).await,
                    Err(e) => Err(e),
                };
                match album {
                    Ok(album) => report
                        .errors
                        .merge(downloader.download_album(&album, parent).await),
                    Err(e) => unresolved(&mut report, input, e),
                }
            }
        }
        DownloadMode::Artist => {
            for input in &args.ids {
                let artist = match numeric_id(input, "artist") {
                    Ok(id) => catalog.get_artist(id).await,
                    Err(e) => Err(e),
                };
                match artist {
                    Ok(artist) => report
                        .errors
                        .merge(downloader.download_all_albums(&artist, parent).await),
                    Err(e) => unresolved(&mut report, input, e),
                }
            }
        }
        DownloadMode::Playlist => {
            for input in &args.ids {
                let playlist = match parse_catalog_id(input, "playlist") {
                    Ok(uuid) => catalog.get_playlist(&uuid).await,
                    Err(e) => Err(e),
                };
                match playlist {
                    Ok(playlist) => report
                        .errors
                        .merge(downloader.download_playlist(&playlist, parent).await),
                    Err(e) => unresolved(&mut report, input, e),
                }
            }
        }
        DownloadMode::NewReleases => {
            let spinner = create_spinner("Collecting new releases...");
            let albums = new_releases_from_favorite_artists(catalog.as_ref(), args.number).await;
            spinner.finish_and_clear();

            let albums = albums?;
            print_info(&format!("Found {} new releases", albums.len()));
            for album in &albums {
                report
                    .errors
                    .merge(downloader.download_album(album, parent).await);
            }
        }
    }

    let summary = report.summary();
    print_run_summary(&summary);
    if summary.is_clean() {
        print_success("Done");
    }

    Ok(report)
}

fn numeric_id(input: &str, kind: &str) -> Result<u64> {
    parse_catalog_id(input, kind)?
        .parse()
        .map_err(|_| Error::ConfigValidation {
            field: kind.to_string(),
            message: format!("{} id out of range: '{}'", kind, input),
        })
}

async fn lookup_track(catalog: &dyn Catalog, input: &str) -> Result<Track> {
    let id = numeric_id(input, "track")?;
    catalog.get_track(id).await
}

fn unresolved(report: &mut RunReport, input: &str, error: Error) {
    print_error(&format!("Couldn't look up {}: {}", input, error));
    report.unresolved.push(input.to_string());
}
