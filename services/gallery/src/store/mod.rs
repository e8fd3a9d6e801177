//! Gallery document repository.
//!
//! # Purpose
//! Abstracts the whole-document `load`/`save` cycle so the service can run
//! against the JSON file in production and an in-memory document in tests.
//!
//! # Notes
//! There is no transaction boundary narrower than the whole document. Callers
//! that mutate must load, modify, and save; the service serializes those cycles
//! within one process.
use crate::model::GalleryDocument;
use async_trait::async_trait;
use thiserror::Error;

pub mod json_file;
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store document: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait GalleryStore: Send + Sync {
    async fn load(&self) -> StoreResult<GalleryDocument>;
    async fn save(&self, document: &GalleryDocument) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()> {
        self.load().await.map(|_| ())
    }

    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
