//! The metadata-store seam used by the HTTP layer.
//!
//! [`TrackStore`] and [`AlbumStore`] cover the two collections;
//! [`CatalogStore`] bundles them with a health check. Handlers only see
//! `Arc<dyn CatalogStore>`.

use async_trait::async_trait;
use soundshelf_core::pagination::PageRequest;
use soundshelf_core::types::DbId;

use crate::models::album::{Album, AlbumFilter, CreateAlbum, UpdateAlbum};
use crate::models::track::{CreateTrack, Track, TrackFilter, TrackPage, TrackRef};
use crate::repositories::{AlbumRepo, TrackRepo};
use crate::DbPool;

/// Failures surfaced by a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Persist a new track and return it with its generated id.
    async fn create_track(&self, input: &CreateTrack) -> Result<Track, StoreError>;

    /// Returns `Ok(None)` if the track does not exist.
    async fn find_track(&self, id: DbId) -> Result<Option<Track>, StoreError>;

    /// One page of tracks matching `filter`, newest first.
    async fn list_tracks(
        &self,
        filter: &TrackFilter,
        page: PageRequest,
    ) -> Result<TrackPage, StoreError>;

    /// Atomically add one play. Returns the new count, or `Ok(None)` if the
    /// track does not exist.
    async fn increment_play_count(&self, id: DbId) -> Result<Option<i64>, StoreError>;

    /// The subset of `ids` that exist, in any order.
    async fn existing_track_ids(&self, ids: &[DbId]) -> Result<Vec<DbId>, StoreError>;

    /// Album-embedding projections for the subset of `ids` that exist.
    async fn track_refs(&self, ids: &[DbId]) -> Result<Vec<TrackRef>, StoreError>;
}

#[async_trait]
pub trait AlbumStore: Send + Sync {
    async fn create_album(&self, input: &CreateAlbum) -> Result<Album, StoreError>;

    /// Returns `Ok(None)` if the album does not exist.
    async fn find_album(&self, id: DbId) -> Result<Option<Album>, StoreError>;

    async fn list_albums(&self, filter: &AlbumFilter) -> Result<Vec<Album>, StoreError>;

    /// Apply a partial update and refresh `updated_at`. Returns `Ok(None)`
    /// if the album does not exist.
    async fn update_album(
        &self,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, StoreError>;

    /// Returns `true` if an album was removed.
    async fn delete_album(&self, id: DbId) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait CatalogStore: TrackStore + AlbumStore + Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend_name(&self) -> &'static str;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Postgres-backed catalog delegating to the repositories.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrackStore for PgCatalogStore {
    async fn create_track(&self, input: &CreateTrack) -> Result<Track, StoreError> {
        Ok(TrackRepo::create(&self.pool, input).await?)
    }

    async fn find_track(&self, id: DbId) -> Result<Option<Track>, StoreError> {
        Ok(TrackRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_tracks(
        &self,
        filter: &TrackFilter,
        page: PageRequest,
    ) -> Result<TrackPage, StoreError> {
        Ok(TrackRepo::list(&self.pool, filter, page).await?)
    }

    async fn increment_play_count(&self, id: DbId) -> Result<Option<i64>, StoreError> {
        Ok(TrackRepo::increment_play_count(&self.pool, id).await?)
    }

    async fn existing_track_ids(&self, ids: &[DbId]) -> Result<Vec<DbId>, StoreError> {
        Ok(TrackRepo::existing_ids(&self.pool, ids).await?)
    }

    async fn track_refs(&self, ids: &[DbId]) -> Result<Vec<TrackRef>, StoreError> {
        Ok(TrackRepo::find_refs(&self.pool, ids).await?)
    }
}

#[async_trait]
impl AlbumStore for PgCatalogStore {
    async fn create_album(&self, input: &CreateAlbum) -> Result<Album, StoreError> {
        Ok(AlbumRepo::create(&self.pool, input).await?)
    }

    async fn find_album(&self, id: DbId) -> Result<Option<Album>, StoreError> {
        Ok(AlbumRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_albums(&self, filter: &AlbumFilter) -> Result<Vec<Album>, StoreError> {
        Ok(AlbumRepo::list(&self.pool, filter).await?)
    }

    async fn update_album(
        &self,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, StoreError> {
        Ok(AlbumRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_album(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AlbumRepo::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
