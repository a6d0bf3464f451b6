use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing URL parameter")]
    MissingUrl,
    #[error("Invalid URL: must be a xiaohongshu.com link")]
    InvalidUrl,
    #[error("Failed to fetch images: {0}")]
    FetchFailed(String),
    #[error("No PDF file uploaded")]
    MissingPdf,
    #[error("Malformed upload: {0}")]
    BadUpload(String),
    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),
    #[error("Invalid filename")]
    InvalidFilename,
    #[error("Image not found")]
    ImageNotFound,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingUrl | Self::InvalidUrl | Self::MissingPdf | Self::InvalidFilename => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            Self::BadUpload(_) => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            Self::FetchFailed(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Failed to fetch images",
                    "detail": detail,
                }),
            ),
            Self::ConversionFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "PDF conversion failed" }),
            ),
            Self::ImageNotFound => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal server error" }),
            ),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(body)).into_response()
    }
}
