//! System/health API handlers.
//!
//! # Purpose and responsibility
//! Lightweight endpoint for health checks: confirms the gallery document can be read.
//!
//! # Key invariants and assumptions
//! - Health checks must be side-effect free apart from the first-load creation
//!   of a missing data file.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::HealthStatus;
use crate::app::AppState;
use crate::service::ServiceError;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "system",
    responses(
        (status = 200, description = "Gallery health", body = HealthStatus),
        (status = 500, description = "Store unreadable", body = crate::api::types::ErrorResponse)
    )
)]
/// Return gallery health status.
///
/// # Errors
/// - Returns 500 if the backing store cannot be loaded.
pub(crate) async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, ApiError> {
    match state.service.health_check().await {
        Ok(()) => {}
        Err(ServiceError::Store(err)) => return Err(api_internal("storage unavailable", &err)),
        Err(err) => return Err(err.into()),
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
