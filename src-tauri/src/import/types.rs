//! Import server wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkImagesRequest {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkImagesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One rendered PDF page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedPage {
    pub page_number: u32,
    /// Server-side path; only the file name is meaningful to clients
    pub path: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfPagesResponse {
    #[serde(default)]
    pub images: Vec<ConvertedPage>,
}

/// Error body the server sends with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
