//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror, and
//! maps every error onto the `{"detail": ...}` JSON body returned to clients.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Message returned when the upload's declared content type is not accepted.
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Formats autorisés : JPEG, PNG, GIF, WEBP.";

/// Message returned when the multipart body carries no `file` field.
pub const MISSING_FILE_MESSAGE: &str = "Aucun fichier reçu (champ « file »).";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{}", MISSING_FILE_MESSAGE)]
    MissingFile,

    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] MultipartRejection),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn unsupported_format() -> Self {
        Error::InvalidInput(UNSUPPORTED_FORMAT_MESSAGE.to_string())
    }

    /// HTTP status surfaced to the caller for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::MissingFile | Error::Multipart(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Upload(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            Error::Upload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
