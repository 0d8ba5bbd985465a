//! Response bodies shared by the handlers.

use serde::Serialize;
use soundshelf_db::models::album::AlbumWithTracks;
use soundshelf_db::models::track::{Track, TrackSummary};

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Body of a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub audio: Track,
}

/// Body of a play-count increment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayCountResponse {
    pub play_count: i64,
}

/// One page of a track listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackListResponse {
    pub page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items: Vec<TrackSummary>,
}

/// Album listing with expanded tracks.
#[derive(Debug, Serialize)]
pub struct AlbumListResponse {
    pub albums: Vec<AlbumWithTracks>,
}
