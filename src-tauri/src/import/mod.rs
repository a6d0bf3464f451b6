//! Pattern Import
//!
//! Client for the pattern import server: page images from a shared post
//! link, or rendered pages from an uploaded PDF.

mod client;
mod error;
mod types;

pub use client::{validate_link, ImportClient, SOURCE_HOST};
pub use error::{ImportError, ImportResult};
pub use types::{ConvertedPage, LinkImagesRequest, LinkImagesResponse, PdfPagesResponse};
