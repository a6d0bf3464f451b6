use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    #[error("No images found at {0}")]
    NoImages(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Import server returned {status}: {message}")]
    Server { status: u16, message: String },
}
