//! Remote extraction service
//!
//! The service does the actual work: it pulls images out of a PDF and packs
//! images into ZIP archives. This module defines the seam and its HTTP
//! implementation.

mod http;

pub use http::HttpExtractionService;

use crate::error::{Error, Result};
use crate::session::ImageRecord;
use crate::source::PdfUpload;
use serde::Deserialize;
use std::future::Future;

/// Operations the pipeline needs from the extraction service
pub trait ExtractionService: Send + Sync + 'static {
    /// Extract every image of the uploaded PDF, in service order
    fn extract(&self, upload: PdfUpload) -> impl Future<Output = Result<Vec<ImageRecord>>> + Send;

    /// Build a ZIP archive from `<name>|<base64>` entries
    fn download_zip(&self, entries: Vec<String>) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Success body of the extraction endpoint
#[derive(Debug, Deserialize)]
struct ExtractionResponse {
    images: Vec<ImageRecord>,
}

/// Error body of both endpoints
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Parse and validate an extraction response body
pub fn parse_extraction_response(body: &[u8]) -> Result<Vec<ImageRecord>> {
    serde_json::from_slice::<ExtractionResponse>(body)
        .map(|response| response.images)
        .map_err(|e| Error::InvalidResponse {
            reason: e.to_string(),
        })
}

/// Pull a human-readable `detail` string out of an error body.
/// Non-string details (e.g. validation error lists) are ignored.
pub fn parse_error_detail(body: &[u8]) -> Option<String> {
    let body: ErrorBody = serde_json::from_slice(body).ok()?;
    match body.detail? {
        serde_json::Value::String(detail) if !detail.trim().is_empty() => Some(detail),
        _ => None,
    }
}
