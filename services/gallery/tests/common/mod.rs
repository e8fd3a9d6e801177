#![allow(dead_code)]

use axum::body::Body;
use gallery::app::{AppState, build_router};
use gallery::auth::Session;
use gallery::service::{GallerySettings, GalleryService};
use gallery::store::GalleryStore;
use gallery::store::memory::InMemoryStore;
use gallery::uploads::{UploadDir, UploadLimits};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub type App = axum::routing::RouterIntoService<Body, ()>;

pub struct TestApp {
    pub app: App,
    pub store: Arc<dyn GalleryStore>,
    pub upload_dir: PathBuf,
    _tmp: TempDir,
}

impl TestApp {
    pub fn uploaded_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(&self.upload_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok().map(|entry| entry.path()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

pub fn test_app(admin: bool) -> TestApp {
    test_app_with(admin, UploadLimits::default(), Arc::new(InMemoryStore::new()))
}

pub fn test_app_with(admin: bool, limits: UploadLimits, store: Arc<dyn GalleryStore>) -> TestApp {
    let tmp = tempfile::tempdir().expect("tempdir");
    let upload_dir = tmp.path().join("uploads");
    let service = GalleryService::new(
        store.clone(),
        UploadDir::new(&upload_dir),
        GallerySettings::default(),
    );
    let state = AppState::new(service, Session { is_admin: admin }, limits);
    TestApp {
        app: build_router(state).into_service(),
        store,
        upload_dir,
        _tmp: tmp,
    }
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}
