//! Pattern Import Server
//!
//! HTTP backend for the knitting app's import screens: scrapes pattern
//! images from share links and renders uploaded PDFs to PNG pages.

pub mod config;
pub mod error;
pub mod handlers;
pub mod pdf;
pub mod scrape;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use pdf::PdfConverter;
use scrape::PageFetcher;

/// Largest accepted PDF upload
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    /// Tried when the first fetch finds no content images
    pub fallback: Option<Arc<dyn PageFetcher>>,
    pub converter: Arc<dyn PdfConverter>,
    pub output_dir: PathBuf,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/xhs/images", post(handlers::fetch_images))
        .route("/api/convert-pdf", post(handlers::convert_pdf))
        .route("/api/images/{filename}", get(handlers::serve_image))
        .route("/api/test", get(handlers::test))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
