//! Repository for the `albums` table.

use soundshelf_core::types::DbId;
use sqlx::PgPool;

use crate::models::album::{Album, AlbumFilter, CreateAlbum, UpdateAlbum};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, artist, artist_avatar, genre, release_date, cover, \
    track_ids, created_at, updated_at";

/// Provides CRUD operations for albums.
pub struct AlbumRepo;

impl AlbumRepo {
    /// Insert a new album, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAlbum) -> Result<Album, sqlx::Error> {
        let query = format!(
            "INSERT INTO albums (title, artist, artist_avatar, genre, release_date, cover, track_ids) \
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()), $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(&input.title)
            .bind(&input.artist)
            .bind(&input.artist_avatar)
            .bind(&input.genre)
            .bind(input.release_date)
            .bind(&input.cover)
            .bind(&input.track_ids)
            .fetch_one(pool)
            .await
    }

    /// Find an album by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Album>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM albums WHERE id = $1");
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List albums, optionally restricted to one artist. Newest first.
    pub async fn list(pool: &PgPool, filter: &AlbumFilter) -> Result<Vec<Album>, sqlx::Error> {
        match filter.artist {
            Some(ref artist) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM albums WHERE artist = $1 \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query_as::<_, Album>(&query)
                    .bind(artist)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM albums ORDER BY created_at DESC, id DESC");
                sqlx::query_as::<_, Album>(&query).fetch_all(pool).await
            }
        }
    }

    /// Update an album. Only non-`None` fields are applied; `track_ids`
    /// replaces the whole list.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, sqlx::Error> {
        let query = format!(
            "UPDATE albums SET \
                title = COALESCE($2, title), \
                genre = COALESCE($3, genre), \
                release_date = COALESCE($4, release_date), \
                cover = COALESCE($5, cover), \
                track_ids = COALESCE($6, track_ids), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Album>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(input.release_date)
            .bind(&input.cover)
            .bind(&input.track_ids)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an album. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
