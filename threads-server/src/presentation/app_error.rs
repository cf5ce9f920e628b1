use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => {
                let status = match err {
                    DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                    DomainError::AlreadyExists(_) => StatusCode::CONFLICT,
                    DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                    DomainError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            AppError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = self.status_and_message();
        if status.is_server_error() {
            error!(error = %msg, "request failed");
        }

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}
