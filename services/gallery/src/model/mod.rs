//! Gallery data model.
//!
//! # Purpose
//! Re-exports the album/photo records and the persisted document shared by the
//! store, service, and HTTP layers.
mod album;
mod photo;

pub use album::{Album, AlbumSummary, GalleryDocument};
pub use photo::Photo;
