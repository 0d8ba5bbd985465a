//! Track entity model and DTOs.

use serde::Serialize;
use soundshelf_core::category::Category;
use soundshelf_core::track::{Collaborator, TrackMetadata};
use soundshelf_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub artist: String,
    pub artist_avatar: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub duration: f64,
    pub release_date: Timestamp,
    pub copyright: Option<String>,
    pub collaborators: Json<Vec<Collaborator>>,
    pub track_number: Option<i32>,
    pub total_tracks: Option<i32>,
    pub url: String,
    pub cover: Option<String>,
    pub producer: Option<String>,
    pub composer: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub play_count: i64,
    pub created_at: Timestamp,
}

/// The listing projection of a track.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub play_count: i64,
    pub url: String,
    pub cover: Option<String>,
    pub composer: Option<String>,
}

impl From<&Track> for TrackSummary {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            genre: track.genre.clone(),
            play_count: track.play_count,
            url: track.url.clone(),
            cover: track.cover.clone(),
            composer: track.composer.clone(),
        }
    }
}

/// The projection of a track embedded in an album listing.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct TrackRef {
    pub id: DbId,
    pub title: String,
    pub artist: String,
    pub duration: f64,
}

impl From<&Track> for TrackRef {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration: track.duration,
        }
    }
}

/// DTO for inserting a track once its audio has been stored.
#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub metadata: TrackMetadata,
    pub url: String,
}

/// Exact-match filters for track listings. `None` means "any".
///
/// `category` is compared as text, so a value outside the known set simply
/// matches nothing.
#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub category: Option<String>,
}

impl TrackFilter {
    /// Whether `track` satisfies every set filter.
    pub fn matches(&self, track: &Track) -> bool {
        self.artist.as_ref().map_or(true, |a| *a == track.artist)
            && self
                .genre
                .as_ref()
                .map_or(true, |g| track.genre.as_ref() == Some(g))
            && self
                .album
                .as_ref()
                .map_or(true, |a| track.album.as_ref() == Some(a))
            && self
                .category
                .as_ref()
                .map_or(true, |c| c == track.category.as_str())
    }
}

/// One page of a filtered listing plus the total number of matches.
#[derive(Debug, Clone)]
pub struct TrackPage {
    pub items: Vec<TrackSummary>,
    pub total: i64,
}
