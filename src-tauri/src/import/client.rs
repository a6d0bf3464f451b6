//! Import Client
//!
//! Thin `reqwest` wrapper. Requests are never retried.

use reqwest::{multipart, Client, Response};
use std::time::Duration;

use super::error::{ImportError, ImportResult};
use super::types::{ConvertedPage, ErrorBody, LinkImagesRequest, LinkImagesResponse, PdfPagesResponse};

/// Host a shared post link must point at
pub const SOURCE_HOST: &str = "xiaohongshu.com";

/// Check a pasted link before sending it anywhere. Returns the trimmed link.
pub fn validate_link(url: &str) -> ImportResult<&str> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ImportError::InvalidLink("link is empty".to_string()));
    }
    if !url.contains(SOURCE_HOST) {
        return Err(ImportError::InvalidLink(format!("{} is not a {} link", url, SOURCE_HOST)));
    }
    Ok(url)
}

pub struct ImportClient {
    client: Client,
    base_url: String,
}

impl ImportClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ImportResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Content image URLs found on a shared post
    pub async fn fetch_link_images(&self, url: &str) -> ImportResult<Vec<String>> {
        let url = validate_link(url)?;
        let endpoint = format!("{}/api/xhs/images", self.base_url);

        let resp = self
            .client
            .post(&endpoint)
            .json(&LinkImagesRequest { url: url.to_string() })
            .send()
            .await?;
        let body: LinkImagesResponse = check_status(resp).await?.json().await?;

        if !body.success || body.images.is_empty() {
            log::warn!("No images returned for {}", url);
            return Err(ImportError::NoImages(url.to_string()));
        }
        log::info!("Fetched {} images from {}", body.images.len(), url);
        Ok(body.images)
    }

    /// Upload a PDF and get one PNG per page back
    pub async fn convert_pdf(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<Vec<ConvertedPage>> {
        let endpoint = format!("{}/api/convert-pdf", self.base_url);
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("pdf", part);

        let resp = self.client.post(&endpoint).multipart(form).send().await?;
        let body: PdfPagesResponse = check_status(resp).await?.json().await?;
        log::info!("Converted {} into {} pages", file_name, body.images.len());
        Ok(body.images)
    }

    /// URL a converted page is served from. Accepts a server path or a bare
    /// file name.
    pub fn image_url(&self, path_or_filename: &str) -> String {
        let filename = path_or_filename
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(path_or_filename);
        format!("{}/api/images/{}", self.base_url, filename)
    }
}

async fn check_status(resp: Response) -> ImportResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);
    log::error!("Import server returned {}: {}", status, message);
    Err(ImportError::Server {
        status: status.as_u16(),
        message,
    })
}
