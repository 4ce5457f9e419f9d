//! PDF Image Extractor Library
//!
//! This crate drives a remote PDF image extraction service and exposes the
//! workflow as MCP tools:
//! - `upload_pdf`: Send a PDF for extraction and load the returned images
//! - `get_session`: Images grouped by page, selection and progress
//! - `toggle_selection`: Pick images for a targeted export
//! - `export_zip`: Save a ZIP of all or selected images
//! - `save_image`: Save a single image
//! - `reset_session`: Start over

pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod server;
pub mod service;
pub mod session;
pub mod shell;
pub mod source;
pub mod uploader;

#[cfg(test)]
mod test_support;

pub use config::{ApiConfig, ApiMode, ServerConfig};
pub use error::{Error, Result};
pub use export::{ExportManager, ExportScope, ExportState};
pub use server::{run_server_with_config, ImageServer, PdfSource};
pub use service::{ExtractionService, HttpExtractionService};
pub use session::{ImageRecord, SelectionSet, SessionState, SessionStore};
pub use shell::{Shell, ShellSnapshot, View};
