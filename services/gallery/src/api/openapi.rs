//! OpenAPI schema aggregation for the gallery API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document served
//! at `/api/openapi.json`.
use crate::api::{
    albums, photos, session, system,
    types::{AlbumCreateRequest, ErrorResponse, HealthStatus, MessageResponse, SessionResponse},
};
use crate::model::{Album, AlbumSummary, Photo};
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "school-gallery",
        version = "v1",
        description = "School website photo gallery API"
    ),
    paths(
        session::get_session,
        albums::list_albums,
        albums::get_album,
        albums::create_album,
        photos::upload_photos,
        photos::delete_photo,
        photos::featured_photos,
        system::health,
    ),
    components(schemas(
        Album,
        AlbumSummary,
        Photo,
        AlbumCreateRequest,
        SessionResponse,
        MessageResponse,
        HealthStatus,
        ErrorResponse,
    )),
    tags(
        (name = "session", description = "Caller session"),
        (name = "albums", description = "Album management"),
        (name = "photos", description = "Photo upload and removal"),
        (name = "system", description = "Health checks")
    )
)]
pub struct ApiDoc;

pub(crate) async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
