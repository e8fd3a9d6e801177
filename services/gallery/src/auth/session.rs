//! Caller session.
//!
//! # Purpose
//! Answers "is this caller an administrator" for the mutating endpoints. The
//! answer comes from configuration; there are no credentials, identities, or
//! expiry. Handlers receive the session through an axum extractor and pass it
//! to the service, which enforces the gate.
use crate::app::AppState;
use crate::service::ServiceError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub is_admin: bool,
}

impl Session {
    pub fn admin() -> Self {
        Self { is_admin: true }
    }

    pub fn visitor() -> Self {
        Self { is_admin: false }
    }

    /// Fail with `Forbidden` unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden)
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(state.session)
    }
}
