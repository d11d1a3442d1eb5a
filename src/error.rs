use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No active browser session")]
    NoSession,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    ValidationError(String),

    #[error("Browser automation error: {0}")]
    BrowserError(String),

    #[error("Storage error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NoSession => (StatusCode::CONFLICT, "No Session"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::BrowserError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Browser Error"),
            AppError::StoreError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage Error"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Error"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
