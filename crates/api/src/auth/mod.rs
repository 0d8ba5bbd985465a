//! Caller identity.
//!
//! - [`identity::IdentityVerifier`] -- pluggable verification capability.
//! - [`identity::HeaderIdentityVerifier`] -- trusts a raw request header.

pub mod identity;
