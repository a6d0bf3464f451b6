//! HTTP handlers

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ServiceError, ServiceResult};
use crate::scrape::{extract_image_urls, SOURCE_HOST};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ImagesRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// `POST /api/xhs/images`. A body that is missing or not JSON counts as a
/// missing URL.
pub async fn fetch_images(
    State(state): State<AppState>,
    request: Result<Json<ImagesRequest>, JsonRejection>,
) -> ServiceResult<Json<Value>> {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(%rejection, "unreadable images request");
            ImagesRequest::default()
        }
    };
    let url = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(ServiceError::MissingUrl)?;
    if !url.contains(SOURCE_HOST) {
        return Err(ServiceError::InvalidUrl);
    }

    tracing::info!(%url, "fetching images");
    let html = state.fetcher.fetch(&url).await?;
    let mut images = extract_image_urls(&html);

    if images.is_empty() {
        if let Some(fallback) = &state.fallback {
            tracing::info!(%url, "no images on first fetch, trying fallback");
            match fallback.fetch(&url).await {
                Ok(html) => images = extract_image_urls(&html),
                Err(e) => tracing::warn!(error = %e, "fallback fetch failed"),
            }
        }
    }
    tracing::info!(count = images.len(), "found content images");

    Ok(Json(json!({
        "success": true,
        "count": images.len(),
        "images": images,
    })))
}

/// `POST /api/convert-pdf`, multipart field `pdf`
pub async fn convert_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServiceResult<Json<Value>> {
    let mut pdf = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadUpload(e.to_string()))?
    {
        if field.name() == Some("pdf") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::BadUpload(e.to_string()))?;
            pdf = Some(bytes);
        }
    }

    let pdf = pdf.filter(|b| !b.is_empty()).ok_or(ServiceError::MissingPdf)?;
    let images = state.converter.convert(&pdf, &state.output_dir).await?;
    Ok(Json(json!({ "images": images })))
}

/// `GET /api/images/{filename}`
pub async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ServiceResult<impl IntoResponse> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ServiceError::InvalidFilename);
    }

    let path = state.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ServiceError::ImageNotFound)
        }
        Err(e) => return Err(e.into()),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes))
}

/// `GET /api/test`
pub async fn test() -> Json<Value> {
    Json(json!({ "message": "Pattern import API is running!" }))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
