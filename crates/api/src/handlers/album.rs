//! Handlers for the `/albums` resource.
//!
//! Writes are restricted to the authenticated caller: the caller becomes the
//! album's `artist` on create, and only that same identity may update or
//! delete it afterwards.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use soundshelf_core::album::{
    ensure_owner, ensure_tracks_resolved, require_text, validate_track_ids,
};
use soundshelf_core::error::CoreError;
use soundshelf_core::track::parse_release_date;
use soundshelf_core::types::{DbId, Timestamp};
use soundshelf_db::models::album::{Album, AlbumWithTracks, CreateAlbum, UpdateAlbum};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::AlbumListParams;
use crate::response::{AlbumListResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /albums`. Every field is optional at the serde level so
/// that a missing field is reported as a validation error, not a rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlbumRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub artist_avatar: Option<String>,
    pub track_ids: Option<Vec<DbId>>,
    pub release_date: Option<String>,
    pub cover: Option<String>,
}

/// Body of `PUT /albums/{id}`.
///
/// Absent, `null` and blank values all leave the field unchanged, so no
/// field can be cleared through this endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlbumRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub cover: Option<String>,
    pub track_ids: Option<Vec<DbId>>,
}

impl UpdateAlbumRequest {
    fn into_update(self) -> Result<UpdateAlbum, CoreError> {
        let release_date = optional_release_date(self.release_date.as_deref())?;
        if let Some(ref ids) = self.track_ids {
            validate_track_ids(ids)?;
        }

        Ok(UpdateAlbum {
            title: non_blank(self.title),
            genre: non_blank(self.genre),
            release_date,
            cover: non_blank(self.cover),
            track_ids: self.track_ids,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /albums
///
/// Create an album owned by the caller. Every track id must exist.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;

    let title = require_text("title", input.title.as_deref())?;
    let genre = require_text("genre", input.genre.as_deref())?;
    let artist_avatar = require_text("artistAvatar", input.artist_avatar.as_deref())?;
    let track_ids = input.track_ids.unwrap_or_default();
    validate_track_ids(&track_ids)?;
    let release_date = optional_release_date(input.release_date.as_deref())?;
    let cover = non_blank(input.cover);

    resolve_tracks(&state, &track_ids).await?;

    let album = state
        .store
        .create_album(&CreateAlbum {
            title,
            artist: user.identity.into_inner(),
            artist_avatar,
            genre,
            release_date,
            cover,
            track_ids,
        })
        .await?;
    tracing::info!(album_id = album.id, artist = %album.artist, "Album created");

    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /albums?artist=
///
/// List albums with their tracks expanded to `{id, title, artist, duration}`.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<AlbumListParams>, QueryRejection>,
) -> AppResult<Json<AlbumListResponse>> {
    let Query(params) = params?;
    let albums = state.store.list_albums(&params.filter()).await?;

    let mut ids: Vec<DbId> = albums.iter().flat_map(|a| a.tracks.iter().copied()).collect();
    ids.sort_unstable();
    ids.dedup();

    let lookup: HashMap<DbId, _> = if ids.is_empty() {
        HashMap::new()
    } else {
        state
            .store
            .track_refs(&ids)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect()
    };

    let albums = albums
        .into_iter()
        .map(|album| AlbumWithTracks::expand(album, &lookup))
        .collect();
    Ok(Json(AlbumListResponse { albums }))
}

/// PUT /albums/{id}
///
/// Partial update by the album's artist. `trackIds`, when present, replaces
/// the whole track list.
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<DbId>, PathRejection>,
    payload: Result<Json<UpdateAlbumRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let album = find_album(&state, id).await?;
    ensure_owner(&album.artist, user.identity.as_str())?;

    let Json(input) = payload?;
    let update = input.into_update()?;
    if let Some(ref track_ids) = update.track_ids {
        resolve_tracks(&state, track_ids).await?;
    }

    let album = state
        .store
        .update_album(id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Album",
            id,
        }))?;
    tracing::info!(album_id = id, "Album updated");

    Ok(Json(album))
}

/// DELETE /albums/{id}
///
/// Delete an album owned by the caller. Referenced tracks are kept.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let album = find_album(&state, id).await?;
    ensure_owner(&album.artist, user.identity.as_str())?;

    if !state.store.delete_album(id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Album",
            id,
        }));
    }
    tracing::info!(album_id = id, "Album deleted");

    Ok(Json(MessageResponse {
        message: "Album deleted successfully",
    }))
}

// ── Private helpers ──────────────────────────────────────────────────────

async fn find_album(state: &AppState, id: DbId) -> AppResult<Album> {
    state
        .store
        .find_album(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Album",
            id,
        }))
}

/// Every id must name an existing track.
async fn resolve_tracks(state: &AppState, track_ids: &[DbId]) -> AppResult<()> {
    let found = state.store.existing_track_ids(track_ids).await?;
    ensure_tracks_resolved(track_ids, &found)?;
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_release_date(raw: Option<&str>) -> Result<Option<Timestamp>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_release_date(raw).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn parse(body: &str) -> UpdateAlbumRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn blank_fields_leave_album_unchanged() {
        let update = parse(r#"{"title": "", "genre": "  ", "releaseDate": "", "cover": ""}"#)
            .into_update()
            .unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.genre, None);
        assert_eq!(update.release_date, None);
        assert_eq!(update.cover, None);
        assert_eq!(update.track_ids, None);
    }

    #[test]
    fn null_cover_leaves_album_unchanged() {
        assert_eq!(parse(r#"{"cover": null}"#).into_update().unwrap().cover, None);
        assert_eq!(
            parse(r#"{"cover": "http://c"}"#).into_update().unwrap().cover,
            Some("http://c".to_string())
        );
    }

    #[test]
    fn empty_track_list_is_rejected() {
        assert_matches!(
            parse(r#"{"trackIds": []}"#).into_update(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn unparseable_release_date_is_rejected() {
        assert_matches!(
            parse(r#"{"releaseDate": "someday"}"#).into_update(),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn present_fields_are_carried() {
        let update = parse(r#"{"genre": "Jazz", "releaseDate": "2024-02-01", "trackIds": [3, 1]}"#)
            .into_update()
            .unwrap();
        assert_eq!(update.title, None);
        assert_eq!(update.genre.as_deref(), Some("Jazz"));
        assert!(update.release_date.is_some());
        assert_eq!(update.track_ids, Some(vec![3, 1]));
        assert_eq!(update.cover, None);
    }
}
