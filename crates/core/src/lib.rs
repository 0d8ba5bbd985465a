//! Domain types and pure validation logic shared by the store, storage and
//! HTTP crates. Nothing in here performs I/O.

pub mod album;
pub mod category;
pub mod error;
pub mod naming;
pub mod pagination;
pub mod track;
pub mod types;
