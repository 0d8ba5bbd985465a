//! Object storage for uploaded audio.
//!
//! [`ObjectStore`] is the seam the upload handler talks to. Two backends are
//! provided:
//!
//! - [`s3::S3ObjectStore`] -- any S3-compatible bucket, public URLs built from
//!   a configured base URL.
//! - [`local::LocalObjectStore`] -- a directory on disk, served by the API
//!   under `/media`.

pub mod error;
pub mod local;
pub mod s3;

use async_trait::async_trait;

pub use error::StorageError;

/// Where an object ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Store `body` under `key`, overwriting any existing object, and return
    /// the key with its public URL.
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;

    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// The publicly resolvable URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Join a base URL and an object key with exactly one `/` between them.
pub fn join_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}

/// Reject empty keys, absolute keys and keys that climb out of the root.
pub fn validate_key(key: &str) -> Result<(), StorageError> {
    let bad = key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        Err(StorageError::InvalidKey(key.to_string()))
    } else {
        Ok(())
    }
}
