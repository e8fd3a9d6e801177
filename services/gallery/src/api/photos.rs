//! Photo API handlers.
//!
//! # Purpose
//! Receives multipart photo uploads, deletes photos, and serves the featured
//! photo list for the homepage slideshow.
//!
//! # Key invariants
//! - The administrator check runs before any multipart part is read.
//! - Files are streamed to disk as parts arrive. If a later part is rejected
//!   or the album turns out to be missing, every file written for the request
//!   is removed before the error response is sent.
use crate::api::error::{ApiError, api_not_found, api_upload_error, api_validation_error};
use crate::api::types::MessageResponse;
use crate::app::AppState;
use crate::auth::Session;
use crate::model::Photo;
use crate::uploads::{StoredFile, UploadError};
use axum::Json;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use gallery_common::{AlbumId, PhotoId};

const PHOTO_FIELDS: [&str; 2] = ["photos", "photos[]"];
const CAPTION_FIELD: &str = "caption";

#[derive(Debug, Default)]
struct ReceivedPhotos {
    files: Vec<StoredFile>,
    caption: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/albums/{id}/photos",
    tag = "photos",
    params(
        ("id" = String, Path, description = "Album identifier")
    ),
    responses(
        (status = 201, description = "Photos added", body = MessageResponse),
        (status = 400, description = "No files, too many files, or a rejected file", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Album not found", body = crate::api::types::ErrorResponse)
    )
)]
/// Upload photos into an album.
///
/// Expects `multipart/form-data` with one or more `photos` (or `photos[]`)
/// file parts and an optional `caption` text part.
pub(crate) async fn upload_photos(
    Path(album_id): Path<String>,
    State(state): State<AppState>,
    session: Session,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    session.require_admin()?;
    let mut multipart =
        multipart.map_err(|rejection| api_validation_error(&rejection.body_text()))?;
    let received = receive_photos(&state, &mut multipart).await?;

    let Ok(album_id) = album_id.parse::<AlbumId>() else {
        state.service.uploads().discard(&received.files).await;
        return Err(api_not_found("album not found"));
    };
    let photos = state
        .service
        .add_photos(
            &session,
            &album_id,
            received.files,
            received.caption.as_deref(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("{} photos added successfully.", photos.len()),
        }),
    ))
}

async fn receive_photos(
    state: &AppState,
    multipart: &mut Multipart,
) -> Result<ReceivedPhotos, ApiError> {
    let mut received = ReceivedPhotos::default();
    match read_parts(state, multipart, &mut received).await {
        Ok(()) => Ok(received),
        Err(err) => {
            state.service.uploads().discard(&received.files).await;
            tracing::info!(reason = err.reason(), error = %err, "upload rejected");
            Err(api_upload_error(&err))
        }
    }
}

async fn read_parts(
    state: &AppState,
    multipart: &mut Multipart,
    received: &mut ReceivedPhotos,
) -> Result<(), UploadError> {
    let limits = &state.limits;
    while let Some(mut field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        // Browsers send an empty file name for an untouched file input.
        let file_name = field
            .file_name()
            .filter(|file_name| !file_name.is_empty())
            .map(str::to_string);
        let Some(file_name) = file_name else {
            if name == CAPTION_FIELD {
                received.caption = Some(field.text().await.map_err(malformed)?);
            }
            continue;
        };
        if !PHOTO_FIELDS.contains(&name.as_str()) {
            return Err(UploadError::UnexpectedField(name));
        }
        limits.check_count(received.files.len())?;
        limits.check_content_type(field.content_type())?;

        let mut pending = state
            .service
            .uploads()
            .begin(&file_name, limits.max_file_bytes)
            .await?;
        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    pending.abort().await;
                    return Err(malformed(err));
                }
            };
            if let Err(err) = pending.write_chunk(&chunk).await {
                pending.abort().await;
                return Err(err);
            }
        }
        received.files.push(pending.finish().await?);
    }
    Ok(())
}

fn malformed(err: MultipartError) -> UploadError {
    UploadError::Malformed(err.body_text())
}

#[utoipa::path(
    delete,
    path = "/api/photos/{photo_id}",
    tag = "photos",
    params(
        ("photo_id" = String, Path, description = "Photo identifier")
    ),
    responses(
        (status = 200, description = "Photo deleted", body = MessageResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Photo not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_photo(
    Path(photo_id): Path<String>,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<MessageResponse>, ApiError> {
    session.require_admin()?;
    let photo_id: PhotoId = photo_id
        .parse()
        .map_err(|_| api_not_found("photo not found"))?;
    state.service.delete_photo(&session, &photo_id).await?;
    Ok(Json(MessageResponse {
        message: "Photo deleted.".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/featured-photos",
    tag = "photos",
    responses(
        (status = 200, description = "Most recently added photos, newest first", body = [Photo])
    )
)]
pub(crate) async fn featured_photos(
    State(state): State<AppState>,
) -> Result<Json<Vec<Photo>>, ApiError> {
    Ok(Json(state.service.list_featured_photos().await?))
}
