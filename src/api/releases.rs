//! Release discovery across the session's favorite artists.

use std::collections::HashSet;

use crate::api::catalog::Catalog;
use crate::error::Result;
use crate::media::Album;

/// The `number` most recent albums of all favorite artists, newest first.
///
/// Artists whose albums can't be fetched are skipped.
pub async fn new_releases_from_favorite_artists(
    catalog: &dyn Catalog,
    number: usize,
) -> Result<Vec<Album>> {
    let artists = catalog.get_favorite_artists().await?;
    tracing::info!("Checking {} favorite artists for new releases", artists.len());

    let mut releases = Vec::new();
    for artist in &artists {
        match catalog.get_artist_albums(artist.id, Some(number)).await {
            Ok(albums) => releases.extend(albums),
            Err(e) => {
                tracing::warn!("Skipping albums of {}: {}", artist.name, e);
            }
        }
    }

    // Collaborations show up once per credited favorite
    let mut seen = HashSet::new();
    releases.retain(|album| seen.insert(album.id));

    releases.sort_by(|a, b| b.release_date().cmp(&a.release_date()));
    releases.truncate(number);

    Ok(releases)
}
