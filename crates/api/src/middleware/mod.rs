//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller identity through the configured verifier.

pub mod auth;
