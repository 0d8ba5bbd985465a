//! Handlers for uploads and the `/audios` resource.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use soundshelf_core::error::CoreError;
use soundshelf_core::naming::audio_object_key;
use soundshelf_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::handlers::upload::{persist_track, UploadForm};
use crate::query::TrackListParams;
use crate::response::{PlayCountResponse, TrackListResponse, UploadResponse};
use crate::state::AppState;

/// POST /upload
///
/// Multipart form with the track metadata and one audio part. The audio is
/// stored before the track row is written.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = UploadForm::read(&mut multipart).await?;
    let (metadata, audio) = form.into_parts()?;

    let key = audio_object_key(
        &metadata.title,
        audio.file_name.as_deref(),
        Utc::now().timestamp_millis(),
    );
    let stored = state
        .objects
        .put_object(&key, audio.data, &audio.content_type)
        .await?;

    let track = persist_track(&state, metadata, &stored).await?;
    tracing::info!(
        track_id = track.id,
        key = %stored.key,
        backend = state.objects.backend_name(),
        "Track uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "Audio uploaded successfully",
            audio: track,
        }),
    ))
}

/// GET /audios?artist=&genre=&album=&category=&page=&limit=
///
/// Newest first, exact-match filters, listing projection only.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<TrackListParams>, QueryRejection>,
) -> AppResult<Json<TrackListResponse>> {
    let Query(params) = params?;
    let filter = params.filter();
    let page = params.page();
    let result = state.store.list_tracks(&filter, page).await?;

    Ok(Json(TrackListResponse {
        page: page.page,
        total_pages: page.total_pages(result.total),
        total_items: result.total,
        items: result.items,
    }))
}

/// POST /audios/{id}/play
///
/// Add one play and return the new count.
pub async fn play(
    State(state): State<AppState>,
    id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<PlayCountResponse>> {
    let Path(id) = id?;
    let play_count = state
        .store
        .increment_play_count(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Track",
            id,
        }))?;
    tracing::debug!(track_id = id, play_count, "Play recorded");
    Ok(Json(PlayCountResponse { play_count }))
}
