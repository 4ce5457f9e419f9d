//! PDF source resolution for uploads

pub mod resolver;

pub use resolver::{resolve_base64, resolve_path, PdfUpload};
