//! Album API handlers.
//!
//! # Purpose
//! Lists albums for the grid, returns one album with its photos, and creates
//! albums for administrators.
use crate::api::error::{ApiError, api_not_found, api_validation_error};
use crate::api::types::AlbumCreateRequest;
use crate::app::AppState;
use crate::auth::Session;
use crate::model::{Album, AlbumSummary};
use crate::service::NewAlbum;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gallery_common::AlbumId;

#[utoipa::path(
    get,
    path = "/api/albums",
    tag = "albums",
    responses(
        (status = 200, description = "Album summaries, newest first", body = [AlbumSummary])
    )
)]
pub(crate) async fn list_albums(
    State(state): State<AppState>,
) -> Result<Json<Vec<AlbumSummary>>, ApiError> {
    Ok(Json(state.service.list_albums().await?))
}

#[utoipa::path(
    get,
    path = "/api/albums/{id}",
    tag = "albums",
    params(
        ("id" = String, Path, description = "Album identifier")
    ),
    responses(
        (status = 200, description = "Album with photos", body = Album),
        (status = 404, description = "Album not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_album(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Album>, ApiError> {
    let id: AlbumId = id.parse().map_err(|_| api_not_found("album not found"))?;
    Ok(Json(state.service.get_album(&id).await?))
}

#[utoipa::path(
    post,
    path = "/api/albums",
    tag = "albums",
    request_body = AlbumCreateRequest,
    responses(
        (status = 201, description = "Album created", body = Album),
        (status = 400, description = "Missing or invalid fields", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_album(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<AlbumCreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    let Json(body) = payload.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    let album = state
        .service
        .create_album(
            &session,
            NewAlbum {
                name: body.name,
                event_date: body.event_date,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(album)))
}
