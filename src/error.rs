//! Error types for the PDF image extractor

use crate::export::ExportScope;
use thiserror::Error;

/// Result type alias for the PDF image extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Banner text used when an extraction fails without a better message
pub const DEFAULT_EXTRACTION_ERROR: &str = "Error processing PDF";

/// Notice shown when an export request fails
pub const EXPORT_FAILED_NOTICE: &str = "Error downloading ZIP";

/// Notice shown when an export resolves to no images
pub const NOTHING_SELECTED_NOTICE: &str = "No images selected!";

/// Error types for the PDF image extractor
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Input is not a PDF document
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// Upload exceeds the picker's size limit
    #[error("Upload too large: {size} bytes (max: {max_size} bytes)")]
    UploadTooLarge { size: u64, max_size: u64 },

    /// Base64 decode error
    #[error("Invalid base64 data: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Transport-level HTTP failure (unreachable service, timeout, broken body)
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Service returned status {status} (detail: {detail:?})")]
    ServiceRejected { status: u16, detail: Option<String> },

    /// Service answered with a body that does not match the expected schema
    #[error("Invalid service response: {reason}")]
    InvalidResponse { reason: String },

    /// Configured endpoint cannot be turned into a URL
    #[error("Invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    /// Archive body larger than allowed
    #[error("Download too large: {size} bytes (max: {max_size} bytes)")]
    DownloadTooLarge { size: u64, max_size: u64 },

    /// An extraction is already pending
    #[error("An extraction is already in progress")]
    ExtractionInProgress,

    /// An export of the same scope is already pending
    #[error("Export of {scope} images already in progress")]
    ExportInProgress { scope: ExportScope },

    /// Export resolved to an empty list
    #[error("Nothing to export for scope {scope}")]
    NothingToExport { scope: ExportScope },

    /// No image with this name in the current session
    #[error("Image not found: {name}")]
    ImageNotFound { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path access denied (outside allowed resource directories)
    #[error("Path access denied: {path}")]
    PathAccessDenied { path: String },
}

impl Error {
    /// Return a sanitized error message safe to send to clients.
    /// Internal details (paths, library errors, file sizes) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::PdfNotFound { .. } => "PDF not found".to_string(),
            Error::InvalidPdf { .. } => "Invalid PDF file".to_string(),
            Error::UploadTooLarge { max_size, .. } => {
                format!("File exceeds maximum size of {} bytes", max_size)
            }
            Error::Base64Decode(_) => "Invalid base64 data".to_string(),
            Error::HttpRequest(_) => "Could not reach the extraction service".to_string(),
            Error::ServiceRejected { status, detail } => match detail {
                Some(detail) if !detail.trim().is_empty() => detail.clone(),
                _ => format!("Request failed with status code {}", status),
            },
            Error::InvalidResponse { .. } => "Invalid response from the service".to_string(),
            Error::InvalidEndpoint { .. } => "Service endpoint is misconfigured".to_string(),
            Error::DownloadTooLarge { max_size, .. } => {
                format!("Download exceeds maximum size of {} bytes", max_size)
            }
            Error::ExtractionInProgress => "A PDF is already being processed".to_string(),
            Error::ExportInProgress { .. } => "A ZIP archive is already being prepared".to_string(),
            Error::NothingToExport { .. } => NOTHING_SELECTED_NOTICE.to_string(),
            Error::ImageNotFound { name } => format!("Image not found: {}", name),
            Error::Io(_) => "I/O error".to_string(),
            Error::PathAccessDenied { .. } => "Access denied".to_string(),
        }
    }

    /// Message for the extraction error banner.
    ///
    /// Prefers the service's `detail`, then a generic transport message, then
    /// [`DEFAULT_EXTRACTION_ERROR`].
    pub fn extraction_message(&self) -> String {
        match self {
            Error::ServiceRejected { .. } | Error::HttpRequest(_) => self.client_message(),
            _ => DEFAULT_EXTRACTION_ERROR.to_string(),
        }
    }

    /// Message for the blocking notice shown when an export fails.
    pub fn export_notice(&self) -> String {
        match self {
            Error::NothingToExport { .. } => NOTHING_SELECTED_NOTICE.to_string(),
            Error::ExportInProgress { .. } => self.client_message(),
            _ => EXPORT_FAILED_NOTICE.to_string(),
        }
    }
}
