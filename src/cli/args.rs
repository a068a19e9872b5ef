//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{Config, DownloadLocation, DownloadMode};

/// Number of albums `new-releases` downloads unless told otherwise.
pub const DEFAULT_NEW_RELEASES: usize = 30;

/// TIDAL downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "tidal-downloader",
    version,
    about = "Download tracks, albums and playlists from TIDAL",
    long_about = "A CLI tool to download tracks, videos, albums, whole discographies and \
                  playlists from TIDAL.\n\n\
                  Tracks are converted to ALAC and tagged after downloading."
)]
pub struct Args {
    /// What to download. Falls back to the mode in the config file.
    #[arg(value_enum)]
    pub mode: Option<ModeArg>,

    /// Catalog ids or share URLs of the items to download.
    pub ids: Vec<String>,

    /// Folder under the download directory to put everything in.
    #[arg(short, long)]
    pub parent_folder: Option<String>,

    /// Base directory to download into.
    #[arg(short, long, value_enum)]
    pub location: Option<LocationArg>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Session ID of a logged-in TIDAL session.
    #[arg(short, long, env = "TIDAL_SESSION_ID")]
    pub session_id: Option<String>,

    /// Country code the session is registered in.
    #[arg(long, env = "TIDAL_COUNTRY_CODE")]
    pub country_code: Option<String>,

    /// Maximum number of tracks downloaded at the same time.
    #[arg(short = 'j', long)]
    pub max_concurrent: Option<usize>,

    /// How many albums `new-releases` downloads.
    #[arg(short, long, default_value_t = DEFAULT_NEW_RELEASES)]
    pub number: usize,

    /// Keep tracks as downloaded instead of converting them to ALAC.
    #[arg(long)]
    pub no_convert: bool,

    /// Don't write metadata into downloaded tracks.
    #[arg(long)]
    pub no_tags: bool,

    /// Hide progress bars.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI download mode argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Download a single track.
    Track,
    /// Download several tracks as one batch.
    Tracks,
    /// Download music videos.
    Video,
    /// Download every track of an album.
    Album,
    /// Download every album of an artist.
    Artist,
    /// Download every track of a playlist.
    Playlist,
    /// Download the latest albums of your favorite artists.
    NewReleases,
}

impl From<ModeArg> for DownloadMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Track => DownloadMode::Track,
            ModeArg::Tracks => DownloadMode::Tracks,
            ModeArg::Video => DownloadMode::Video,
            ModeArg::Album => DownloadMode::Album,
            ModeArg::Artist => DownloadMode::Artist,
            ModeArg::Playlist => DownloadMode::Playlist,
            ModeArg::NewReleases => DownloadMode::NewReleases,
        }
    }
}

/// CLI download location argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocationArg {
    Downloads,
    Music,
}

impl From<LocationArg> for DownloadLocation {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Downloads => DownloadLocation::Downloads,
            LocationArg::Music => DownloadLocation::Music,
        }
    }
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.download.mode = mode.into();
        }

        if let Some(location) = self.location {
            config.download.location = location.into();
        }

        if let Some(session_id) = &self.session_id {
            config.account.session_id = session_id.clone();
        }

        if let Some(country_code) = &self.country_code {
            config.account.country_code = country_code.to_uppercase();
        }

        if let Some(max_concurrent) = self.max_concurrent {
            config.download.max_concurrent_downloads = max_concurrent;
        }

        // Boolean flags (only override if set to non-default)
        if self.no_convert {
            config.post_processing.convert_to_lossless = false;
        }

        if self.no_tags {
            config.post_processing.write_metadata = false;
        }

        if self.quiet {
            config.download.show_progress = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_and_ids() {
        let args = Args::parse_from([
            "tidal-downloader",
            "album",
            "123",
            "https://tidal.com/browse/album/456",
            "--parent-folder",
            "Library",
        ]);

        assert_eq!(args.mode, Some(ModeArg::Album));
        assert_eq!(args.ids, vec!["123", "https://tidal.com/browse/album/456"]);
        assert_eq!(args.parent_folder.as_deref(), Some("Library"));
        assert_eq!(args.number, DEFAULT_NEW_RELEASES);
    }

    #[test]
    fn test_kebab_case_mode() {
        let args = Args::parse_from(["tidal-downloader", "new-releases", "-n", "5"]);
        assert_eq!(args.mode, Some(ModeArg::NewReleases));
        assert_eq!(args.number, 5);
    }

    #[test]
    fn test_merge_overrides_config() {
        let args = Args::parse_from([
            "tidal-downloader",
            "playlist",
            "--location",
            "music",
            "--session-id",
            "0123456789abcdef",
            "--country-code",
            "de",
            "-j",
            "8",
            "--no-convert",
            "--quiet",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.download.mode, DownloadMode::Playlist);
        assert_eq!(config.download.location, DownloadLocation::Music);
        assert_eq!(config.account.session_id, "0123456789abcdef");
        assert_eq!(config.account.country_code, "DE");
        assert_eq!(config.download.max_concurrent_downloads, 8);
        assert!(!config.post_processing.convert_to_lossless);
        assert!(config.post_processing.write_metadata);
        assert!(!config.download.show_progress);
    }

    #[test]
    fn test_merge_keeps_config_when_unset() {
        let args = Args::parse_from(["tidal-downloader"]);

        let mut config = Config::default();
        config.download.mode = DownloadMode::Artist;
        config.account.session_id = "from-file-session".into();
        args.merge_into_config(&mut config);

        assert_eq!(config.download.mode, DownloadMode::Artist);
        assert_eq!(config.account.session_id, "from-file-session");
        assert!(config.download.show_progress);
    }
}
