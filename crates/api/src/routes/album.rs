//! Route definitions for albums.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::album;
use crate::state::AppState;

/// ```text
/// GET    /albums        -> list
/// POST   /albums        -> create
/// PUT    /albums/{id}   -> update
/// DELETE /albums/{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/albums", get(album::list).post(album::create))
        .route("/albums/{id}", put(album::update).delete(album::delete))
}
