//! API response type definitions.

use serde::Deserialize;

/// One page of a list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub total_number_of_items: usize,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Session info for the /sessions/{id} endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    pub user_id: u64,
    pub country_code: String,
}

/// Favorite entry wrapping the favorited item.
#[derive(Debug, Deserialize)]
pub struct Favorite<T> {
    #[serde(default)]
    pub created: Option<String>,
    pub item: T,
}

/// Response of the track stream URL endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackUrlResponse {
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(default)]
    pub audio_quality: Option<String>,
}

/// Response of the video stream URL endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUrlResponse {
    pub url: String,
    #[serde(default)]
    pub video_quality: Option<String>,
}
