//! TIDAL API HTTP client.

use async_trait::async_trait;
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::catalog::Catalog;
use crate::api::types::*;
use crate::config::AccountConfig;
use crate::error::{Error, Result};
use crate::media::{Album, Artist, Playlist, Track, Video};

/// Maximum items requested per page from list endpoints.
pub const PAGE_SIZE: usize = 100;

/// Seconds to wait when the API rate limits without a Retry-After header.
const DEFAULT_RETRY_AFTER: u64 = 60;

/// Session header expected by the API.
const SESSION_HEADER: &str = "X-Tidal-SessionId";

/// TIDAL API client bound to a logged-in session.
pub struct TidalApi {
    client: Client,
    api_base: String,
    session_id: String,
    country_code: String,
    user_id: u64,
}

impl TidalApi {
    /// Create a new API client and check the session is valid.
    pub async fn new(account: &AccountConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        let mut api = Self {
            client,
            api_base: account.api_base.trim_end_matches('/').to_string(),
            session_id: account.session_id.clone(),
            country_code: account.country_code.clone(),
            user_id: 0,
        };

        let session = api.get_session_info().await?;
        if session.country_code != api.country_code {
            tracing::warn!(
                "Session country {} differs from configured {}, using the session's",
                session.country_code,
                api.country_code
            );
            api.country_code = session.country_code;
        }
        api.user_id = session.user_id;

        Ok(api)
    }

    /// ID of the user the session belongs to.
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// Make an authenticated GET request.
    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}/{}", self.api_base, path);

        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(SESSION_HEADER, &self.session_id)
            .query(&[("countryCode", self.country_code.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(Error::RateLimited(retry_after));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Auth error response: {}", body);
            return Err(Error::Authentication(format!(
                "HTTP {}: {}",
                status,
                if body.is_empty() {
                    "Session rejected"
                } else {
                    &body
                }
            )));
        }

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {} for {}", status, path)));
        }

        Ok(response)
    }

    /// GET a path and parse the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let response = self.get(path, query).await?;
        let text = response.text().await?;
        tracing::debug!("Response for {}: {} bytes", path, text.len());

        serde_json::from_str(&text).map_err(|e| {
            Error::Api(format!(
                "Failed to parse {}: {} - Response: {}",
                path,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Collect every item of a paginated list endpoint, up to `limit`.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>> {
        let wanted = limit.unwrap_or(usize::MAX);
        let mut items = Vec::new();
        let mut offset = 0;

        while items.len() < wanted {
            let page_size = PAGE_SIZE.min(wanted - items.len());
            let page: Page<T> = self
                .get_json(
                    path,
                    &[("limit", page_size.to_string()), ("offset", offset.to_string())],
                )
                .await?;

            let received = page.items.len();
            items.extend(page.items);
            offset += received;

            if received == 0 || offset >= page.total_number_of_items {
                break;
            }
        }

        items.truncate(wanted);
        Ok(items)
    }

    async fn get_session_info(&self) -> Result<SessionInfo> {
        self.get_json(&format!("sessions/{}", self.session_id), &[])
            .await
    }
}

#[async_trait]
impl Catalog for TidalApi {
    async fn get_track(&self, track_id: u64) -> Result<Track> {
        self.get_json(&format!("tracks/{}", track_id), &[]).await
    }

    async fn get_video(&self, video_id: u64) -> Result<Video> {
        self.get_json(&format!("videos/{}", video_id), &[]).await
    }

    async fn get_album(&self, album_id: u64) -> Result<Album> {
        self.get_json(&format!("albums/{}", album_id), &[]).await
    }

    async fn get_artist(&self, artist_id: u64) -> Result<Artist> {
        self.get_json(&format!("artists/{}", artist_id), &[]).await
    }

    async fn get_playlist(&self, playlist_uuid: &str) -> Result<Playlist> {
        self.get_json(&format!("playlists/{}", playlist_uuid), &[])
            .await
    }

    async fn get_album_tracks(&self, album_id: u64) -> Result<Vec<Track>> {
        self.get_all_pages(&format!("albums/{}/tracks", album_id), None)
            .await
    }

    async fn get_artist_albums(
        &self,
        artist_id: u64,
        limit: Option<usize>,
    ) -> Result<Vec<Album>> {
        self.get_all_pages(&format!("artists/{}/albums", artist_id), limit)
            .await
    }

    async fn get_playlist_tracks(&self, playlist_uuid: &str) -> Result<Vec<Track>> {
        self.get_all_pages(&format!("playlists/{}/tracks", playlist_uuid), None)
            .await
    }

    async fn get_audio_url(&self, track: &Track) -> Result<String> {
        let response: TrackUrlResponse = self
            .get_json(
                &format!("tracks/{}/urlpostpaywall", track.id),
                &[
                    ("urlusagemode", "STREAM".to_string()),
                    ("audioquality", "LOSSLESS".to_string()),
                    ("assetpresentation", "FULL".to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            "Stream quality for track {}: {}",
            track.id,
            response.audio_quality.as_deref().unwrap_or("unknown")
        );

        response
            .urls
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoStreamUrl(format!("track {}", track.id)))
    }

    async fn get_video_url(&self, video: &Video) -> Result<String> {
        let response: VideoUrlResponse = self
            .get_json(&format!("videos/{}/streamurl", video.id), &[])
            .await?;

        if response.url.is_empty() {
            return Err(Error::NoStreamUrl(format!("video {}", video.id)));
        }
        Ok(response.url)
    }

    async fn get_favorite_artists(&self) -> Result<Vec<Artist>> {
        let favorites: Vec<Favorite<Artist>> = self
            .get_all_pages(&format!("users/{}/favorites/artists", self.user_id), None)
            .await?;
        Ok(favorites.into_iter().map(|f| f.item).collect())
    }
}
