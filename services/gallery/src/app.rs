//! Gallery HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! Route composition lives here to keep `main` small and testable.
use crate::api;
use crate::auth::Session;
use crate::config::{GalleryConfig, StorageBackend};
use crate::observability;
use crate::service::{GallerySettings, GalleryService};
use crate::store::GalleryStore;
use crate::store::json_file::JsonFileStore;
use crate::store::memory::InMemoryStore;
use crate::uploads::{UPLOAD_URL_PREFIX, UploadDir, UploadLimits};
use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GalleryService>,
    pub session: Session,
    pub limits: UploadLimits,
}

impl AppState {
    pub fn new(service: GalleryService, session: Session, limits: UploadLimits) -> Self {
        Self {
            service: Arc::new(service),
            session,
            limits,
        }
    }
}

/// Build application state from configuration: pick the store backend and
/// make sure the upload directory exists.
pub async fn build_state(config: &GalleryConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn GalleryStore> = match config.storage {
        StorageBackend::Json => Arc::new(JsonFileStore::new(&config.data_file)),
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
    };
    // Create a missing data file now rather than on the first request.
    store
        .health_check()
        .await
        .with_context(|| format!("open gallery store ({})", store.backend_name()))?;

    let uploads = UploadDir::new(&config.upload_dir);
    uploads
        .ensure()
        .await
        .with_context(|| format!("create upload dir {}", config.upload_dir.display()))?;

    let service = GalleryService::new(
        store,
        uploads,
        GallerySettings {
            default_cover: config.default_cover.clone(),
            featured_limit: config.featured_limit,
        },
    );
    Ok(AppState::new(
        service,
        Session {
            is_admin: config.admin,
        },
        UploadLimits {
            max_files: config.max_files,
            max_file_bytes: config.max_file_bytes,
            allowed_content_types: config.allowed_content_types.clone(),
        },
    ))
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });
    let upload_body_limit = DefaultBodyLimit::max(state.limits.request_body_limit());
    let uploads = ServeDir::new(state.service.uploads().root());

    Router::new()
        .route("/api/session", get(api::session::get_session))
        .route(
            "/api/albums",
            get(api::albums::list_albums).post(api::albums::create_album),
        )
        .route("/api/albums/:id", get(api::albums::get_album))
        .route(
            "/api/albums/:id/photos",
            post(api::photos::upload_photos).layer(upload_body_limit),
        )
        .route("/api/photos/:photo_id", delete(api::photos::delete_photo))
        .route("/api/featured-photos", get(api::photos::featured_photos))
        .route("/api/health", get(api::system::health))
        .route("/api/openapi.json", get(api::openapi::openapi_json))
        .nest_service(UPLOAD_URL_PREFIX, uploads)
        .layer(trace_layer)
        .with_state(state)
}
