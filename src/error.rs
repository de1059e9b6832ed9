//! Application-wide error type.
//!
//! Responsibility:
//! - One `AppError` enum for request-level failures.
//! - `IntoResponse` mapping (HTTP status + JSON error body).
//! - Conversions from service-layer errors.
//!
//! The authentication failure kinds are deliberately distinct so that logs
//! (and callers) can tell "bad token" from "dependency down".

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::identity::IdentityError;

#[derive(Debug, Error)]
pub enum AppError {
    /// No `Authorization` header, or not a `Bearer <token>` shape.
    #[error("missing bearer credential")]
    MissingCredential,

    /// The identity provider rejected the presented token.
    #[error("invalid bearer credential")]
    InvalidCredential,

    /// Token verified, but its subject no longer resolves to a user.
    #[error("credential subject no longer exists")]
    StaleIdentity,

    /// The identity provider could not be reached (or misbehaved).
    #[error("identity provider unavailable")]
    ProviderUnavailable,
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL"),
            AppError::InvalidCredential => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIAL"),
            AppError::StaleIdentity => (StatusCode::UNAUTHORIZED, "STALE_IDENTITY"),
            AppError::ProviderUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "PROVIDER_UNAVAILABLE")
            }
        };

        let body = ErrorResponseBody {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<IdentityError> for AppError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Rejected(_) => AppError::InvalidCredential,
            IdentityError::UserNotFound => AppError::StaleIdentity,
            // Transport failures and provider 5xx are an outage, not a bad
            // credential; surface them as 503 so operators can tell the two apart.
            IdentityError::Transport(_) | IdentityError::Upstream(_) => {
                AppError::ProviderUnavailable
            }
        }
    }
}
