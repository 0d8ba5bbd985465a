//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod album_repo;
pub mod track_repo;

pub use album_repo::AlbumRepo;
pub use track_repo::TrackRepo;
