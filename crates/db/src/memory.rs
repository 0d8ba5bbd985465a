//! In-process catalog backend.
//!
//! Keeps both collections in a single `tokio::sync::Mutex`, so every
//! operation (including the play-count increment) is atomic with respect to
//! the others. Used for local development (`METADATA_BACKEND=memory`) and
//! by the HTTP tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use soundshelf_core::pagination::PageRequest;
use soundshelf_core::types::DbId;
use sqlx::types::Json;
use tokio::sync::Mutex;

use crate::models::album::{Album, AlbumFilter, CreateAlbum, UpdateAlbum};
use crate::models::track::{
    CreateTrack, Track, TrackFilter, TrackPage, TrackRef, TrackSummary,
};
use crate::store::{AlbumStore, CatalogStore, StoreError, TrackStore};

#[derive(Default)]
struct Collections {
    next_id: DbId,
    tracks: BTreeMap<DbId, Track>,
    albums: BTreeMap<DbId, Album>,
}

impl Collections {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Catalog held entirely in memory. Ids are shared across both collections
/// and never reused.
#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<Collections>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tracks.
    pub async fn track_count(&self) -> usize {
        self.inner.lock().await.tracks.len()
    }

    /// Number of stored albums.
    pub async fn album_count(&self) -> usize {
        self.inner.lock().await.albums.len()
    }
}

/// Newest first; the id breaks ties between equal timestamps.
fn newest_first(a: &Track, b: &Track) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

#[async_trait]
impl TrackStore for MemoryCatalogStore {
    async fn create_track(&self, input: &CreateTrack) -> Result<Track, StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.allocate_id();
        let meta = input.metadata.clone();
        let track = Track {
            id,
            title: meta.title,
            description: meta.description,
            artist: meta.artist,
            artist_avatar: meta.artist_avatar,
            album: meta.album,
            genre: meta.genre,
            duration: meta.duration,
            release_date: meta.release_date,
            copyright: meta.copyright,
            collaborators: Json(meta.collaborators),
            track_number: meta.track_number,
            total_tracks: meta.total_tracks,
            url: input.url.clone(),
            cover: meta.cover,
            producer: meta.producer,
            composer: meta.composer,
            category: meta.category,
            play_count: 0,
            created_at: Utc::now(),
        };
        inner.tracks.insert(id, track.clone());
        Ok(track)
    }

    async fn find_track(&self, id: DbId) -> Result<Option<Track>, StoreError> {
        Ok(self.inner.lock().await.tracks.get(&id).cloned())
    }

    async fn list_tracks(
        &self,
        filter: &TrackFilter,
        page: PageRequest,
    ) -> Result<TrackPage, StoreError> {
        let inner = self.inner.lock().await;
        let mut matching: Vec<&Track> =
            inner.tracks.values().filter(|t| filter.matches(t)).collect();
        matching.sort_by(|a, b| newest_first(a, b));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(0))
            .map(TrackSummary::from)
            .collect();
        Ok(TrackPage { items, total })
    }

    async fn increment_play_count(&self, id: DbId) -> Result<Option<i64>, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.tracks.get_mut(&id).map(|track| {
            track.play_count += 1;
            track.play_count
        }))
    }

    async fn existing_track_ids(&self, ids: &[DbId]) -> Result<Vec<DbId>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| inner.tracks.contains_key(id))
            .collect())
    }

    async fn track_refs(&self, ids: &[DbId]) -> Result<Vec<TrackRef>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.tracks.get(id))
            .map(TrackRef::from)
            .collect())
    }
}

#[async_trait]
impl AlbumStore for MemoryCatalogStore {
    async fn create_album(&self, input: &CreateAlbum) -> Result<Album, StoreError> {
        let mut inner = self.inner.lock().await;
        let id = inner.allocate_id();
        let now = Utc::now();
        let album = Album {
            id,
            title: input.title.clone(),
            artist: input.artist.clone(),
            artist_avatar: input.artist_avatar.clone(),
            genre: input.genre.clone(),
            release_date: input.release_date.unwrap_or(now),
            cover: input.cover.clone(),
            tracks: input.track_ids.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.albums.insert(id, album.clone());
        Ok(album)
    }

    async fn find_album(&self, id: DbId) -> Result<Option<Album>, StoreError> {
        Ok(self.inner.lock().await.albums.get(&id).cloned())
    }

    async fn list_albums(&self, filter: &AlbumFilter) -> Result<Vec<Album>, StoreError> {
        let inner = self.inner.lock().await;
        let mut albums: Vec<Album> = inner
            .albums
            .values()
            .filter(|a| filter.artist.as_ref().map_or(true, |artist| *artist == a.artist))
            .cloned()
            .collect();
        albums.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(albums)
    }

    async fn update_album(
        &self,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(album) = inner.albums.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(ref title) = input.title {
            album.title = title.clone();
        }
        if let Some(ref genre) = input.genre {
            album.genre = genre.clone();
        }
        if let Some(release_date) = input.release_date {
            album.release_date = release_date;
        }
        if let Some(ref cover) = input.cover {
            album.cover = Some(cover.clone());
        }
        if let Some(ref track_ids) = input.track_ids {
            album.tracks = track_ids.clone();
        }
        album.updated_at = Utc::now();
        Ok(Some(album.clone()))
    }

    async fn delete_album(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().await.albums.remove(&id).is_some())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
