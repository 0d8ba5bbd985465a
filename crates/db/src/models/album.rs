//! Album entity model and DTOs.

use serde::Serialize;
use soundshelf_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::track::TrackRef;

/// A row from the `albums` table.
///
/// `tracks` holds the ordered track ids.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub artist_avatar: String,
    pub genre: String,
    pub release_date: Timestamp,
    pub cover: Option<String>,
    #[sqlx(rename = "track_ids")]
    pub tracks: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An album with its track ids expanded to [`TrackRef`]s.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumWithTracks {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub artist_avatar: String,
    pub genre: String,
    pub release_date: Timestamp,
    pub cover: Option<String>,
    pub tracks: Vec<TrackRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AlbumWithTracks {
    /// Expand `album.tracks` using `lookup`, keeping album order. Ids with
    /// no matching ref are dropped.
    pub fn expand(album: Album, lookup: &std::collections::HashMap<DbId, TrackRef>) -> Self {
        let tracks = album
            .tracks
            .iter()
            .filter_map(|id| lookup.get(id).cloned())
            .collect();
        Self {
            id: album.id,
            title: album.title,
            artist: album.artist,
            artist_avatar: album.artist_avatar,
            genre: album.genre,
            release_date: album.release_date,
            cover: album.cover,
            tracks,
            created_at: album.created_at,
            updated_at: album.updated_at,
        }
    }
}

/// DTO for inserting an album. `artist` is the caller's identity.
#[derive(Debug, Clone)]
pub struct CreateAlbum {
    pub title: String,
    pub artist: String,
    pub artist_avatar: String,
    pub genre: String,
    pub release_date: Option<Timestamp>,
    pub cover: Option<String>,
    pub track_ids: Vec<DbId>,
}

/// DTO for updating an album. `None` leaves a field unchanged; no field can
/// be cleared.
#[derive(Debug, Clone, Default)]
pub struct UpdateAlbum {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<Timestamp>,
    pub cover: Option<String>,
    pub track_ids: Option<Vec<DbId>>,
}

/// Exact-match filters for album listings.
#[derive(Debug, Clone, Default)]
pub struct AlbumFilter {
    pub artist: Option<String>,
}
