//! PDF to PNG conversion
//!
//! Pages are rendered by the external `pdftoppm` tool at 144 dpi (twice the
//! PDF's 72 dpi user space). Each upload gets its own batch prefix so
//! concurrent conversions never overwrite each other's pages.

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::{ServiceError, ServiceResult};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Signature plus the IHDR chunk up to the height field
const PNG_HEADER_LEN: usize = 24;

/// One rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageImage {
    pub page_number: u32,
    pub path: String,
    pub width: u32,
    pub height: u32,
}

#[async_trait]
pub trait PdfConverter: Send + Sync {
    /// Render every page of `pdf` into `output_dir`, in page order
    async fn convert(&self, pdf: &[u8], output_dir: &Path) -> ServiceResult<Vec<PageImage>>;
}

pub struct PdftoppmConverter {
    binary: PathBuf,
}

impl PdftoppmConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfConverter for PdftoppmConverter {
    async fn convert(&self, pdf: &[u8], output_dir: &Path) -> ServiceResult<Vec<PageImage>> {
        let input = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        tokio::fs::write(input.path(), pdf).await?;

        let batch = uuid::Uuid::new_v4().simple().to_string();
        let output = Command::new(&self.binary)
            .args(["-png", "-r", "144"])
            .arg(input.path())
            .arg(output_dir.join(&batch))
            .output()
            .await
            .map_err(|e| {
                ServiceError::ConversionFailed(format!("{}: {}", self.binary.display(), e))
            })?;

        if !output.status.success() {
            return Err(ServiceError::ConversionFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        collect_pages(output_dir, &batch).await
    }
}

/// Rename `pdftoppm` output (`{batch}-01.png`) to `{batch}_page_1.png` and
/// read each page's size
pub async fn collect_pages(output_dir: &Path, batch: &str) -> ServiceResult<Vec<PageImage>> {
    let mut numbered = Vec::new();
    let mut entries = tokio::fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(page) = raw_page_number(&name, batch) {
            numbered.push((page, entry.path()));
        }
    }
    numbered.sort_by_key(|(page, _)| *page);

    let mut pages = Vec::with_capacity(numbered.len());
    for (page_number, raw_path) in numbered {
        let path = output_dir.join(page_file_name(batch, page_number));
        tokio::fs::rename(&raw_path, &path).await?;

        let (width, height) = read_png_dimensions(&path).await?.ok_or_else(|| {
            ServiceError::ConversionFailed(format!("{} is not a PNG", path.display()))
        })?;

        pages.push(PageImage {
            page_number,
            path: path.to_string_lossy().into_owned(),
            width,
            height,
        });
    }

    if pages.is_empty() {
        return Err(ServiceError::ConversionFailed("no pages rendered".to_string()));
    }
    tracing::info!(batch, pages = pages.len(), "converted PDF");
    Ok(pages)
}

pub fn page_file_name(batch: &str, page_number: u32) -> String {
    format!("{}_page_{}.png", batch, page_number)
}

/// Page number of a raw `pdftoppm` output file belonging to `batch`
fn raw_page_number(file_name: &str, batch: &str) -> Option<u32> {
    file_name
        .strip_prefix(batch)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Read only the header of the file at `path`. A file shorter than the
/// header is not a PNG.
async fn read_png_dimensions(path: &Path) -> ServiceResult<Option<(u32, u32)>> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut header = [0u8; PNG_HEADER_LEN];
    match file.read_exact(&mut header).await {
        Ok(_) => Ok(png_dimensions(&header)),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Width and height from a PNG's IHDR chunk
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < PNG_HEADER_LEN || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}
