//! Route definitions for uploads and tracks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// ```text
/// POST /upload             -> upload
/// GET  /audios             -> list
/// POST /audios/{id}/play   -> play
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(track::upload))
        .route("/audios", get(track::list))
        .route("/audios/{id}/play", post(track::play))
}
