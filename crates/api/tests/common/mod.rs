#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use soundshelf_core::pagination::PageRequest;
use soundshelf_core::types::DbId;
use soundshelf_db::memory::MemoryCatalogStore;
use soundshelf_db::models::album::{Album, AlbumFilter, CreateAlbum, UpdateAlbum};
use soundshelf_db::models::track::{CreateTrack, Track, TrackFilter, TrackPage, TrackRef};
use soundshelf_db::store::{AlbumStore, TrackStore};
use soundshelf_db::{CatalogStore, StoreError};
use soundshelf_storage::{join_url, ObjectStore, StorageError, StoredObject};
use tower::ServiceExt;

use soundshelf_api::auth::identity::HeaderIdentityVerifier;
use soundshelf_api::config::{LogFormat, MetadataBackend, ObjectStoreConfig, ServerConfig};
use soundshelf_api::router::build_app_router;
use soundshelf_api::state::AppState;

/// Header carrying the caller identity in tests.
pub const USER_HEADER: &str = "user-id";

/// Base URL the recording object store hands out.
pub const MEDIA_BASE: &str = "http://media.test";

/// Build a test `ServerConfig` with safe defaults.
///
/// In-memory metadata, an S3-style object store config (so nothing is
/// mounted under `/media`) and the default `user-id` identity header.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        identity_header: HeaderName::from_static(USER_HEADER),
        compensate_orphaned_blobs: false,
        log_format: LogFormat::Pretty,
        metadata: MetadataBackend::Memory,
        object_store: ObjectStoreConfig::S3 {
            bucket: "test-bucket".to_string(),
            public_base_url: MEDIA_BASE.to_string(),
        },
    }
}

/// Handles on the backends behind a test app, for asserting side effects.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryCatalogStore>,
    pub objects: Arc<RecordingObjectStore>,
}

/// Build the full application router over fresh in-memory backends.
pub fn build_test_app() -> TestApp {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> TestApp {
    let store = Arc::new(MemoryCatalogStore::new());
    let objects = Arc::new(RecordingObjectStore::default());
    let router = router_over(config, store.clone(), objects.clone());
    TestApp {
        router,
        store,
        objects,
    }
}

/// Build the router over caller-supplied backends.
pub fn router_over(
    config: ServerConfig,
    store: Arc<dyn CatalogStore>,
    objects: Arc<dyn ObjectStore>,
) -> Router {
    let state = AppState {
        store,
        objects,
        identity: Arc::new(HeaderIdentityVerifier::new(config.identity_header.clone())),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Test backends
// ---------------------------------------------------------------------------

/// Object store that keeps blobs in memory and records deletions.
#[derive(Default)]
pub struct RecordingObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingObjectStore {
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    fn backend_name(&self) -> &'static str {
        "recording"
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(StoredObject {
            key: key.to_string(),
            url: self.public_url(key),
        })
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.objects.lock().unwrap().remove(key);
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(MEDIA_BASE, key)
    }
}

/// Catalog that delegates to [`MemoryCatalogStore`] but fails every track
/// insert.
#[derive(Default)]
pub struct FailingInsertStore {
    pub inner: MemoryCatalogStore,
}

#[async_trait]
impl TrackStore for FailingInsertStore {
    async fn create_track(&self, _input: &CreateTrack) -> Result<Track, StoreError> {
        Err(StoreError::Unavailable("insert rejected".into()))
    }

    async fn find_track(&self, id: DbId) -> Result<Option<Track>, StoreError> {
        self.inner.find_track(id).await
    }

    async fn list_tracks(
        &self,
        filter: &TrackFilter,
        page: PageRequest,
    ) -> Result<TrackPage, StoreError> {
        self.inner.list_tracks(filter, page).await
    }

    async fn increment_play_count(&self, id: DbId) -> Result<Option<i64>, StoreError> {
        self.inner.increment_play_count(id).await
    }

    async fn existing_track_ids(&self, ids: &[DbId]) -> Result<Vec<DbId>, StoreError> {
        self.inner.existing_track_ids(ids).await
    }

    async fn track_refs(&self, ids: &[DbId]) -> Result<Vec<TrackRef>, StoreError> {
        self.inner.track_refs(ids).await
    }
}

#[async_trait]
impl AlbumStore for FailingInsertStore {
    async fn create_album(&self, input: &CreateAlbum) -> Result<Album, StoreError> {
        self.inner.create_album(input).await
    }

    async fn find_album(&self, id: DbId) -> Result<Option<Album>, StoreError> {
        self.inner.find_album(id).await
    }

    async fn list_albums(&self, filter: &AlbumFilter) -> Result<Vec<Album>, StoreError> {
        self.inner.list_albums(filter).await
    }

    async fn update_album(
        &self,
        id: DbId,
        input: &UpdateAlbum,
    ) -> Result<Option<Album>, StoreError> {
        self.inner.update_album(id, input).await
    }

    async fn delete_album(&self, id: DbId) -> Result<bool, StoreError> {
        self.inner.delete_album(id).await
    }
}

#[async_trait]
impl CatalogStore for FailingInsertStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("down".into()))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// POST with an empty body.
pub async fn post(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str, user: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(
    app: Router,
    uri: &str,
    user: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::POST, uri, user, &body)).await
}

pub async fn put_json(
    app: Router,
    uri: &str,
    user: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::PUT, uri, user, &body)).await
}

pub async fn delete(app: Router, uri: &str, user: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::DELETE).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "soundshelf-test-boundary";

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

/// The required metadata fields, without an audio part.
pub fn track_fields(title: &str, artist: &str) -> MultipartForm {
    MultipartForm::new()
        .text("title", title)
        .text("artist", artist)
        .text("artistAvatar", "http://img.test/avatar.png")
        .text("duration", "215.5")
}

/// A complete upload form with a small fake mp3.
pub fn track_form(title: &str, artist: &str) -> MultipartForm {
    track_fields(title, artist).file("audio", "song.mp3", "audio/mpeg", b"ID3fake-audio")
}

pub async fn upload(app: Router, form: MultipartForm) -> Response {
    send(app, form.into_request("/upload")).await
}

/// Upload a track and return its id.
pub async fn seed_track(app: &Router, form: MultipartForm) -> DbId {
    let response = upload(app.clone(), form).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["audio"]["id"].as_i64().unwrap()
}

/// A scratch directory for tests that need a real filesystem.
pub fn temp_media_dir() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_path_buf();
    (dir, path)
}
