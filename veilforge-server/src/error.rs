//! API error taxonomy and HTTP mapping.
//!
//! Everything is caught at the request boundary and translated to a status
//! code plus a `{"error": "..."}` body. Internal failures are logged with
//! detail but never echoed to the client.

use crate::auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use veilforge_entitlement::EntitlementError;

/// Request-boundary errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credential.
    #[error("unauthorized")]
    Unauthorized,

    /// The request named a feature this core does not gate.
    #[error("invalid feature: {0}")]
    InvalidFeature(String),

    /// The request named an unknown plan.
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Access check resolved to locked, or the admin key was wrong/absent.
    #[error("forbidden")]
    Forbidden,

    /// Store or other internal failure.
    #[error("internal error")]
    Internal(#[source] EntitlementError),
}

impl From<AuthError> for ApiError {
    fn from(_: AuthError) -> Self {
        // Never leak why verification failed.
        Self::Unauthorized
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        Self::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid_token"),
            Self::InvalidFeature(_) => (StatusCode::BAD_REQUEST, "invalid_feature"),
            Self::InvalidPlan(_) => (StatusCode::BAD_REQUEST, "invalid_plan"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            Self::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            }
        };
        (status, Json(json!({ "error": body }))).into_response()
    }
}
