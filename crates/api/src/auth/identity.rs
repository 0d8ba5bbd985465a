//! Identity verification seam.
//!
//! Handlers never read credentials themselves; they go through an
//! [`IdentityVerifier`] held in the application state. The only shipped
//! implementation, [`HeaderIdentityVerifier`], trusts whatever an upstream
//! gateway put in a header and performs no cryptographic check. Deployments
//! that are not behind such a gateway must supply their own verifier.

use std::fmt;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use soundshelf_core::error::CoreError;

/// A verified caller. Compared verbatim against an album's `artist`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns request headers into an [`Identity`] or an `Unauthorized` error.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify_identity(&self, headers: &HeaderMap) -> Result<Identity, CoreError>;
}

/// Reads the identity from a single header, `user-id` by default.
#[derive(Debug, Clone)]
pub struct HeaderIdentityVerifier {
    header: HeaderName,
}

impl HeaderIdentityVerifier {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

#[async_trait]
impl IdentityVerifier for HeaderIdentityVerifier {
    async fn verify_identity(&self, headers: &HeaderMap) -> Result<Identity, CoreError> {
        let value = headers
            .get(&self.header)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CoreError::Unauthorized(format!("Missing {} header", self.header))
            })?;
        Ok(Identity::new(value))
    }
}
