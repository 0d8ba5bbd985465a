pub mod album;
pub mod track;
pub mod upload;
