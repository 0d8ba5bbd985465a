//! Repository for the `tracks` table.

use soundshelf_core::pagination::PageRequest;
use soundshelf_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::track::{CreateTrack, Track, TrackFilter, TrackPage, TrackRef, TrackSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, artist, artist_avatar, album, genre, duration, \
    release_date, copyright, collaborators, track_number, total_tracks, url, cover, \
    producer, composer, category, play_count, created_at";

/// Columns of the listing projection.
const SUMMARY_COLUMNS: &str = "id, title, artist, album, genre, play_count, url, cover, composer";

/// Provides CRUD operations for tracks.
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row. `play_count` starts at 0.
    pub async fn create(pool: &PgPool, input: &CreateTrack) -> Result<Track, sqlx::Error> {
        let meta = &input.metadata;
        let query = format!(
            "INSERT INTO tracks \
                (title, description, artist, artist_avatar, album, genre, duration, \
                 release_date, copyright, collaborators, track_number, total_tracks, \
                 url, cover, producer, composer, category) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Track>(&query)
            .bind(&meta.title)
            .bind(&meta.description)
            .bind(&meta.artist)
            .bind(&meta.artist_avatar)
            .bind(&meta.album)
            .bind(&meta.genre)
            .bind(meta.duration)
            .bind(meta.release_date)
            .bind(&meta.copyright)
            .bind(Json(&meta.collaborators))
            .bind(meta.track_number)
            .bind(meta.total_tracks)
            .bind(&input.url)
            .bind(&meta.cover)
            .bind(&meta.producer)
            .bind(&meta.composer)
            .bind(meta.category.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a track by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Track>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tracks WHERE id = $1");
        sqlx::query_as::<_, Track>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of tracks matching `filter`, newest first, with the
    /// total match count.
    pub async fn list(
        pool: &PgPool,
        filter: &TrackFilter,
        page: PageRequest,
    ) -> Result<TrackPage, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut param_idx: usize = 0;

        if filter.artist.is_some() {
            param_idx += 1;
            conditions.push(format!("artist = ${param_idx}"));
        }
        if filter.genre.is_some() {
            param_idx += 1;
            conditions.push(format!("genre = ${param_idx}"));
        }
        if filter.album.is_some() {
            param_idx += 1;
            conditions.push(format!("album = ${param_idx}"));
        }
        if filter.category.is_some() {
            param_idx += 1;
            conditions.push(format!("category = ${param_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM tracks {where_clause}");
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_query);

        let limit_idx = param_idx + 1;
        let offset_idx = param_idx + 2;
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM tracks {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );
        let mut q = sqlx::query_as::<_, TrackSummary>(&query);

        if let Some(ref artist) = filter.artist {
            count_q = count_q.bind(artist);
            q = q.bind(artist);
        }
        if let Some(ref genre) = filter.genre {
            count_q = count_q.bind(genre);
            q = q.bind(genre);
        }
        if let Some(ref album) = filter.album {
            count_q = count_q.bind(album);
            q = q.bind(album);
        }
        if let Some(ref category) = filter.category {
            count_q = count_q.bind(category);
            q = q.bind(category);
        }

        let total = count_q.fetch_one(pool).await?;
        let items = q
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        Ok(TrackPage { items, total })
    }

    /// Add one play in a single statement. Returns the new count, or `None`
    /// if no row with the given `id` exists.
    pub async fn increment_play_count(pool: &PgPool, id: DbId) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE tracks SET play_count = play_count + 1 WHERE id = $1 RETURNING play_count",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Return which of `ids` exist.
    pub async fn existing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT id FROM tracks WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Fetch the album-embedding projection for the given ids. Order is
    /// unspecified; unknown ids are skipped.
    pub async fn find_refs(pool: &PgPool, ids: &[DbId]) -> Result<Vec<TrackRef>, sqlx::Error> {
        sqlx::query_as::<_, TrackRef>(
            "SELECT id, title, artist, duration FROM tracks WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
