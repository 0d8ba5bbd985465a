//! Query parameter types for list endpoints.
//!
//! Everything is taken as text so that malformed values degrade to defaults
//! instead of rejecting the request.

use serde::Deserialize;
use soundshelf_core::pagination::PageRequest;
use soundshelf_db::models::album::AlbumFilter;
use soundshelf_db::models::track::TrackFilter;

/// `GET /audios?artist=&genre=&album=&category=&page=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct TrackListParams {
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl TrackListParams {
    /// Blank filter values count as absent.
    pub fn filter(&self) -> TrackFilter {
        TrackFilter {
            artist: non_blank(&self.artist),
            genre: non_blank(&self.genre),
            album: non_blank(&self.album),
            category: non_blank(&self.category),
        }
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::from_raw(self.page.as_deref(), self.limit.as_deref())
    }
}

/// `GET /albums?artist=`
#[derive(Debug, Default, Deserialize)]
pub struct AlbumListParams {
    pub artist: Option<String>,
}

impl AlbumListParams {
    pub fn filter(&self) -> AlbumFilter {
        AlbumFilter {
            artist: non_blank(&self.artist),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
