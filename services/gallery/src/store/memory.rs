//! In-memory gallery store.
//!
//! # Purpose
//! Holds the gallery document behind a `tokio::sync::RwLock`. Used by tests and
//! for throwaway deployments where durability is not required.
//!
//! # Durability
//! Not durable: all albums are lost on restart. Uploaded files still land on
//! disk, so an ephemeral store can leave files nothing references.
use super::{GalleryStore, StoreResult};
use crate::model::GalleryDocument;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    document: Arc<RwLock<GalleryDocument>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing document.
    pub fn with_document(document: GalleryDocument) -> Self {
        Self {
            document: Arc::new(RwLock::new(document)),
        }
    }
}

#[async_trait]
impl GalleryStore for InMemoryStore {
    async fn load(&self) -> StoreResult<GalleryDocument> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, document: &GalleryDocument) -> StoreResult<()> {
        *self.document.write().await = document.clone();
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
