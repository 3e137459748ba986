use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::ApiResponse;
use service::{auth::AuthError, ServiceError};
use thiserror::Error;
use tracing::{error, warn};

/// Handler error rendered as the JSON envelope.
///
/// Only auth failures change the status code; data-operation failures are
/// reported as `success: false` with HTTP 200.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("malformed request body: {0}")]
    BadBody(String),
    #[error("malformed query: {0}")]
    BadQuery(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(AuthError::Missing) => {
                warn!(code = AuthError::Missing.code(), "request without bearer token");
                (StatusCode::UNAUTHORIZED, Json(ApiResponse::denied("unauthorized access"))).into_response()
            }
            ApiError::Auth(e @ (AuthError::Invalid(_) | AuthError::Mismatch)) => {
                warn!(code = e.code(), reason = %e, "request forbidden");
                (StatusCode::FORBIDDEN, Json(ApiResponse::denied("forbidden access"))).into_response()
            }
            ApiError::Auth(e) => {
                error!(code = e.code(), error = %e, "token issuing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
            }
            ApiError::Service(e) => {
                if matches!(e, ServiceError::Store(_)) {
                    error!(error = %e, "store failure");
                }
                (StatusCode::OK, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
            }
            ApiError::BadBody(msg) => {
                warn!(error = %msg, "rejected request body");
                (StatusCode::OK, Json(ApiResponse::<()>::error(format!("malformed request body: {msg}"))))
                    .into_response()
            }
            ApiError::BadQuery(msg) => {
                warn!(error = %msg, "rejected query string");
                (StatusCode::OK, Json(ApiResponse::<()>::error(format!("malformed query: {msg}")))).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("document store unavailable: {0}")]
    Store(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
