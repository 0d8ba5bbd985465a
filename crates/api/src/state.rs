use std::sync::Arc;

use soundshelf_db::CatalogStore;
use soundshelf_storage::ObjectStore;

use crate::auth::identity::IdentityVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Track and album metadata.
    pub store: Arc<dyn CatalogStore>,
    /// Audio blob storage.
    pub objects: Arc<dyn ObjectStore>,
    /// Resolves the caller on authenticated routes.
    pub identity: Arc<dyn IdentityVerifier>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
