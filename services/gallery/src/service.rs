//! Album and photo operations.
//!
//! # Purpose
//! Implements the gallery use cases over an injected `GalleryStore` and the
//! upload directory. HTTP handlers stay thin and translate `ServiceError` into
//! responses.
//!
//! # Key invariants
//! - Every mutation requires an administrator `Session` and fails before
//!   touching the store otherwise.
//! - Mutations run load, modify, save under one process-wide lock.
//! - Uploaded files that do not end up referenced by a saved photo are removed
//!   before the error is returned.
//! - Deletion saves the document before unlinking the file, so a crash leaves
//!   at worst an unreferenced file, never a record without its file.
use crate::auth::Session;
use crate::model::{Album, AlbumSummary, Photo};
use crate::observability;
use crate::sanitize::sanitize_text;
use crate::store::{GalleryStore, StoreError};
use crate::uploads::{StoredFile, UploadDir};
use chrono::Utc;
use gallery_common::{AlbumId, PhotoId};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub const DEFAULT_COVER_IMAGE: &str = "/default-cover.png";
pub const DEFAULT_FEATURED_LIMIT: usize = 5;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("administrator access required")]
    Forbidden,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone)]
pub struct GallerySettings {
    pub default_cover: String,
    pub featured_limit: usize,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            default_cover: DEFAULT_COVER_IMAGE.to_string(),
            featured_limit: DEFAULT_FEATURED_LIMIT,
        }
    }
}

/// Unsanitized album fields as submitted by the client.
#[derive(Debug, Clone)]
pub struct NewAlbum {
    pub name: String,
    pub event_date: String,
    pub description: String,
}

pub struct GalleryService {
    store: Arc<dyn GalleryStore>,
    uploads: UploadDir,
    settings: GallerySettings,
    write_lock: Mutex<()>,
}

impl GalleryService {
    pub fn new(store: Arc<dyn GalleryStore>, uploads: UploadDir, settings: GallerySettings) -> Self {
        Self {
            store,
            uploads,
            settings,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<dyn GalleryStore> {
        &self.store
    }

    pub fn uploads(&self) -> &UploadDir {
        &self.uploads
    }

    pub async fn list_albums(&self) -> ServiceResult<Vec<AlbumSummary>> {
        let document = self.store.load().await?;
        Ok(document
            .albums
            .iter()
            .map(|album| album.summary(&self.settings.default_cover))
            .collect())
    }

    pub async fn get_album(&self, id: &AlbumId) -> ServiceResult<Album> {
        let mut document = self.store.load().await?;
        let index = document
            .albums
            .iter()
            .position(|album| &album.id == id)
            .ok_or(ServiceError::NotFound("album not found"))?;
        Ok(document.albums.swap_remove(index))
    }

    pub async fn create_album(&self, session: &Session, request: NewAlbum) -> ServiceResult<Album> {
        session.require_admin()?;
        let name = sanitize_text(&request.name);
        if name.trim().is_empty() {
            return Err(ServiceError::Validation("album name is required".to_string()));
        }
        let album = Album {
            id: AlbumId::new(),
            name,
            event_date: sanitize_text(&request.event_date),
            description: sanitize_text(&request.description),
            photos: Vec::new(),
        };

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        document.albums.insert(0, album.clone());
        self.store.save(&document).await?;

        metrics::counter!(observability::ALBUMS_CREATED_TOTAL).increment(1);
        metrics::gauge!(observability::ALBUMS_TOTAL).set(document.albums.len() as f64);
        tracing::info!(album_id = %album.id, "album created");
        Ok(album)
    }

    /// Attach already-written files to an album. On any failure the files are
    /// removed before returning.
    pub async fn add_photos(
        &self,
        session: &Session,
        album_id: &AlbumId,
        files: Vec<StoredFile>,
        caption: Option<&str>,
    ) -> ServiceResult<Vec<Photo>> {
        match self.attach_photos(session, album_id, &files, caption).await {
            Ok(photos) => Ok(photos),
            Err(err) => {
                self.uploads.discard(&files).await;
                Err(err)
            }
        }
    }

    async fn attach_photos(
        &self,
        session: &Session,
        album_id: &AlbumId,
        files: &[StoredFile],
        caption: Option<&str>,
    ) -> ServiceResult<Vec<Photo>> {
        session.require_admin()?;
        if files.is_empty() {
            return Err(ServiceError::Validation("no files were uploaded".to_string()));
        }
        let caption = caption
            .map(sanitize_text)
            .filter(|caption| !caption.trim().is_empty());

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        let album = document
            .album_mut(album_id)
            .ok_or(ServiceError::NotFound("album not found"))?;

        let created_at = Utc::now();
        let photos: Vec<Photo> = files
            .iter()
            .map(|file| Photo {
                id: PhotoId::new(),
                src: file.src(),
                caption: caption
                    .clone()
                    .unwrap_or_else(|| sanitize_text(&file.original_name)),
                created_at: Some(created_at),
            })
            .collect();
        album.photos.splice(0..0, photos.iter().cloned());
        self.store.save(&document).await?;

        metrics::counter!(observability::PHOTOS_UPLOADED_TOTAL).increment(photos.len() as u64);
        tracing::info!(album_id = %album_id, count = photos.len(), "photos added");
        Ok(photos)
    }

    pub async fn delete_photo(&self, session: &Session, photo_id: &PhotoId) -> ServiceResult<Photo> {
        session.require_admin()?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.store.load().await?;
        let photo = document
            .remove_photo(photo_id)
            .ok_or(ServiceError::NotFound("photo not found"))?;
        self.store.save(&document).await?;

        match self.uploads.remove_src(&photo.src).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!(src = %photo.src, "photo file already absent"),
            Err(err) => tracing::warn!(error = %err, src = %photo.src, "failed to remove photo file"),
        }
        metrics::counter!(observability::PHOTOS_DELETED_TOTAL).increment(1);
        tracing::info!(photo_id = %photo_id, "photo deleted");
        Ok(photo)
    }

    /// Most recently added photos across all albums.
    pub async fn list_featured_photos(&self) -> ServiceResult<Vec<Photo>> {
        let document = self.store.load().await?;
        let mut photos: Vec<Photo> = document
            .albums
            .into_iter()
            .flat_map(|album| album.photos)
            .collect();
        // Stable: photos with no known add time sink to the end, list order
        // breaks ties.
        photos.sort_by(|a, b| match (a.added_at_millis(), b.added_at_millis()) {
            (Some(a), Some(b)) => b.total_cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        photos.truncate(self.settings.featured_limit);
        Ok(photos)
    }

    /// Confirm the gallery document can be read.
    pub async fn health_check(&self) -> ServiceResult<()> {
        Ok(self.store.health_check().await?)
    }
}
