//! File and folder name generation.

use crate::media::{Album, Artist, Track, Video};

/// Separator between artist names.
const ARTIST_SEPARATOR: &str = ", ";

/// Join artist names into a single credit string.
pub fn artist_string(artists: &[Artist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(ARTIST_SEPARATOR)
}

/// Replace path separators inside a single name segment.
///
/// A title like "AC/DC" must stay one segment instead of becoming a folder.
pub fn sanitize_segment(name: &str) -> String {
    name.replace('/', ":")
}

/// File name for a track: `"{n} {title}{ (version)} - {artists}.m4a"`.
pub fn track_file_name(track: &Track) -> String {
    format!(
        "{} {} - {}.m4a",
        track.track_number,
        track.full_title(),
        artist_string(&track.artists)
    )
}

/// File name for a video: `"{n} {title} - {artists}.mp4"`.
pub fn video_file_name(video: &Video) -> String {
    format!(
        "{} {} - {}.mp4",
        video.track_number,
        video.title,
        artist_string(&video.artists)
    )
}

/// Folder name for an album: `"{artists} - {title}"`.
pub fn album_folder_name(album: &Album) -> String {
    let title = sanitize_segment(&album.title);
    match album.artists.as_deref() {
        Some(artists) if !artists.is_empty() => {
            format!("{} - {}", artist_string(artists), title)
        }
        _ => title,
    }
}

/// Nest `child` under `parent`, or return `child` alone when there is no parent.
pub fn nest_folder(parent: Option<&str>, child: &str) -> String {
    match parent {
        Some(parent) if !parent.is_empty() => format!("{}/{}", parent, child),
        _ => child.to_string(),
    }
}
