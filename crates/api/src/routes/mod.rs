pub mod album;
pub mod health;
pub mod track;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// Route hierarchy:
///
/// ```text
/// /upload                 upload a track (multipart)
/// /audios                 list tracks
/// /audios/{id}/play       record a play
/// /albums                 list, create (create requires identity)
/// /albums/{id}            update, delete (requires identity, owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(track::router())
        .merge(album::router())
}
