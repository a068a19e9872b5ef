//! Failure summary after a run.

use std::collections::HashSet;

use console::style;

use crate::download::DownloadErrors;
use crate::fs::artist_string;
use crate::media::Video;

/// Everything that failed in one run.
#[derive(Debug, Default)]
pub struct RunSummary<'a> {
    pub errors: Option<&'a DownloadErrors>,
    pub failed_videos: Option<&'a HashSet<Video>>,
    /// Ids that couldn't be looked up in the catalog.
    pub unresolved: &'a [String],
}

impl RunSummary<'_> {
    pub fn is_clean(&self) -> bool {
        self.errors.map_or(true, DownloadErrors::is_empty)
            && self.failed_videos.map_or(true, HashSet::is_empty)
            && self.unresolved.is_empty()
    }

    /// One line per failed item, sorted within each kind.
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        for input in self.unresolved {
            lines.push(format!("Lookup:   {}", input));
        }

        if let Some(errors) = self.errors {
            let mut artists: Vec<_> = errors.affected_artists.iter().collect();
            artists.sort_by_key(|a| a.id);
            for artist in artists {
                lines.push(format!("Artist:   {} ({})", artist.name, artist.id));
            }

            let mut albums: Vec<_> = errors.affected_albums.iter().collect();
            albums.sort_by_key(|a| a.id);
            for album in albums {
                lines.push(format!("Album:    {} ({})", album.title, album.id));
            }

            let mut playlists: Vec<_> = errors.affected_playlists.iter().collect();
            playlists.sort_by(|a, b| a.uuid.cmp(&b.uuid));
            for playlist in playlists {
                lines.push(format!("Playlist: {} ({})", playlist.title, playlist.uuid));
            }

            let mut tracks: Vec<_> = errors.affected_tracks.iter().collect();
            tracks.sort_by_key(|t| t.id);
            for track in tracks {
                lines.push(format!(
                    "Track:    {} - {} ({})",
                    track.full_title(),
                    artist_string(&track.artists),
                    track.id
                ));
            }
        }

        if let Some(videos) = self.failed_videos {
            let mut videos: Vec<_> = videos.iter().collect();
            videos.sort_by_key(|v| v.id);
            for video in videos {
                lines.push(format!("Video:    {} ({})", video.title, video.id));
            }
        }

        lines
    }
}

/// Print what failed in a run, or a success line when nothing did.
pub fn print_run_summary(summary: &RunSummary<'_>) {
    println!();
    println!("{}", style("═".repeat(50)).dim());

    let lines = summary.failure_lines();
    if lines.is_empty() {
        println!("{}", style("All downloads finished").green().bold());
    } else {
        println!(
            "{}",
            style(format!("{} item(s) failed:", lines.len())).red().bold()
        );
        for line in lines {
            println!("  {}", line);
        }
    }

    println!("{}", style("═".repeat(50)).dim());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{Album, Track};

    #[test]
    fn test_empty_summary_is_clean() {
        let errors = DownloadErrors::default();
        let summary = RunSummary {
            errors: Some(&errors),
            ..Default::default()
        };

        assert!(summary.is_clean());
        assert!(summary.failure_lines().is_empty());
    }

    #[test]
    fn test_failed_videos_and_lookups_are_not_clean() {
        let errors = DownloadErrors::default();
        let videos = HashSet::from([Video {
            id: 5,
            title: "Clip".into(),
            ..Default::default()
        }]);
        let unresolved = vec!["12345".to_string()];

        let summary = RunSummary {
            errors: Some(&errors),
            failed_videos: Some(&videos),
            unresolved: &unresolved,
        };

        assert!(!summary.is_clean());
        assert_eq!(
            summary.failure_lines(),
            vec!["Lookup:   12345".to_string(), "Video:    Clip (5)".to_string()]
        );
    }

    #[test]
    fn test_lines_are_sorted_by_kind_and_id() {
        let mut errors = DownloadErrors::album(Album {
            id: 3,
            title: "X".into(),
            ..Default::default()
        });
        for id in [9, 2] {
            errors.affected_tracks.insert(Track {
                id,
                title: format!("T{}", id),
                ..Default::default()
            });
        }

        let summary = RunSummary {
            errors: Some(&errors),
            ..Default::default()
        };

        assert_eq!(
            summary.failure_lines(),
            vec![
                "Album:    X (3)".to_string(),
                "Track:    T2 -  (2)".to_string(),
                "Track:    T9 -  (9)".to_string(),
            ]
        );
    }
}
