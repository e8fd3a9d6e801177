//! JSON file gallery store.
//!
//! # Purpose
//! Persists the gallery document as a single pretty-printed JSON file, the
//! format the school site has always used:
//! `{"albums": [{"id", "name", "eventDate", "description", "photos": [...]}]}`.
//!
//! # Durability and consistency
//! - A missing file is created with an empty album list on first load.
//! - Saves write a sibling temp file and rename it over the target, so readers
//!   never observe a half-written document.
//! - No cross-process locking: two processes sharing a file race and the last
//!   save wins.
use super::{GalleryStore, StoreResult};
use crate::model::GalleryDocument;
use anyhow::Context;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "gallery-data.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl GalleryStore for JsonFileStore {
    async fn load(&self) -> StoreResult<GalleryDocument> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "creating empty gallery data file");
                let document = GalleryDocument::default();
                self.save(&document).await?;
                Ok(document)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, document: &GalleryDocument) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create data directory {}", parent.display()))?;
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("replace {}", self.path.display()))?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "json-file"
    }
}
