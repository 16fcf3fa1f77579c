//! Error types for the Pagemill API
//!
//! The wire contract is deliberately narrow: a missing file is the only
//! client error this service names, and every conversion failure collapses
//! into one generic 500 whose body never carries filesystem paths or tool
//! output. The detail lands in the server log instead.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagemill_core::PagemillError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no file uploaded")]
    MissingFile,

    #[error("upload failed: {0}")]
    Upload(#[from] MultipartError),

    #[error("conversion failed: {0}")]
    Convert(#[from] PagemillError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "No file uploaded.".to_string()),
            ApiError::Upload(err) => {
                tracing::warn!("Upload failed: {}", err);
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Convert(err) => {
                tracing::error!("Conversion failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error processing PDF.".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
