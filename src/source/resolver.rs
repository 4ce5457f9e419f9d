//! File picker: turns a path or base64 payload into an upload

use crate::error::{Error, Result};
use base64::Engine;
use std::path::Path;

/// A PDF accepted by the picker, ready to submit
#[derive(Debug, Clone)]
pub struct PdfUpload {
    /// File name sent with the multipart part
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Check size and PDF header
fn validate(data: &[u8], max_bytes: u64) -> Result<()> {
    if data.len() as u64 > max_bytes {
        return Err(Error::UploadTooLarge {
            size: data.len() as u64,
            max_size: max_bytes,
        });
    }

    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }

    Ok(())
}

/// Resolve a file path to an upload
pub fn resolve_path<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<PdfUpload> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(Error::PdfNotFound {
            path: path.display().to_string(),
        });
    }

    // Reject oversized files before reading them
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(Error::UploadTooLarge {
            size,
            max_size: max_bytes,
        });
    }

    let data = std::fs::read(path).map_err(Error::Io)?;
    validate(&data, max_bytes)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string());

    Ok(PdfUpload { file_name, data })
}

/// Resolve base64 encoded data to an upload
pub fn resolve_base64(base64_data: &str, file_name: Option<&str>, max_bytes: u64) -> Result<PdfUpload> {
    let engine = base64::engine::general_purpose::STANDARD;
    let data = engine.decode(base64_data.trim())?;
    validate(&data, max_bytes)?;

    Ok(PdfUpload {
        file_name: file_name.unwrap_or("document.pdf").to_string(),
        data,
    })
}
