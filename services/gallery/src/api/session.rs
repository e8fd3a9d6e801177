//! Session API handler.
use crate::api::types::SessionResponse;
use crate::auth::Session;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/session",
    tag = "session",
    responses(
        (status = 200, description = "Whether the caller may manage albums", body = SessionResponse)
    )
)]
pub(crate) async fn get_session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse {
        is_admin: session.is_admin,
    })
}
