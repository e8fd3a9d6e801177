//! Album records and the persisted gallery document.
//!
//! # Purpose
//! Defines the album shape and the whole-file document the store loads and
//! saves, plus the lookups the service performs on it.
use super::Photo;
use gallery_common::{AlbumId, PhotoId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub event_date: String,
    pub description: String,
    /// Newest first.
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// Album grid projection: the album fields plus a derived cover image.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: AlbumId,
    pub name: String,
    pub event_date: String,
    pub description: String,
    pub cover_image: String,
}

impl Album {
    /// Project to a summary, using the newest photo as the cover.
    pub fn summary(&self, default_cover: &str) -> AlbumSummary {
        AlbumSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            event_date: self.event_date.clone(),
            description: self.description.clone(),
            cover_image: self
                .photos
                .first()
                .map(|photo| photo.src.clone())
                .unwrap_or_else(|| default_cover.to_string()),
        }
    }
}

/// The complete persisted state: `{"albums": [...]}`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GalleryDocument {
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl GalleryDocument {
    pub fn album_mut(&mut self, id: &AlbumId) -> Option<&mut Album> {
        self.albums.iter_mut().find(|album| &album.id == id)
    }

    /// Remove a photo from whichever album holds it.
    pub fn remove_photo(&mut self, id: &PhotoId) -> Option<Photo> {
        self.albums.iter_mut().find_map(|album| {
            let index = album.photos.iter().position(|photo| &photo.id == id)?;
            Some(album.photos.remove(index))
        })
    }
}
