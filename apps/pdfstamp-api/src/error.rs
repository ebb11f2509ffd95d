//! Error types for the stamping API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfstamp_core::StampError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("Failed to fetch file_url: {0}")]
    Fetch(String),

    #[error("Please upload a PDF")]
    UnsupportedMediaType,

    #[error("Upload exceeds the {0} byte limit")]
    TooLarge(usize),

    #[error("PDF processing failed: {0}")]
    Processing(#[from] StampError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    status: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Fetch(_)
            | ApiError::UnsupportedMediaType
            | ApiError::TooLarge(_)
            | ApiError::Processing(_)
            | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!(status = status.as_u16(), "{}", self);
        }

        let body = ErrorResponse {
            detail: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
