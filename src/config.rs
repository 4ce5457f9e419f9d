//! Server and extraction service configuration

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Which deployment of the extraction service to talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMode {
    /// Service run locally, endpoints at the root
    Development,
    /// Service behind a reverse proxy, extraction under `/api`
    Production,
}

impl ApiMode {
    /// Mode selected at build time: debug builds target development
    pub fn from_build() -> Self {
        if cfg!(debug_assertions) {
            ApiMode::Development
        } else {
            ApiMode::Production
        }
    }
}

/// Location of the extraction service endpoints
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Scheme, host and optional path prefix
    pub base_url: String,
    pub extract_path: String,
    pub download_zip_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn for_mode(mode: ApiMode) -> Self {
        let extract_path = match mode {
            ApiMode::Development => "/extract",
            ApiMode::Production => "/api/extract",
        };
        Self {
            base_url: "http://localhost:8000".to_string(),
            extract_path: extract_path.to_string(),
            download_zip_path: "/download-zip".to_string(),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn extract_url(&self) -> Result<Url> {
        self.endpoint(&self.extract_path)
    }

    pub fn download_zip_url(&self) -> Result<Url> {
        self.endpoint(&self.download_zip_path)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| Error::InvalidEndpoint {
            reason: format!("{}: {}", joined, e),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::for_mode(ApiMode::from_build())
    }
}

/// Security and resource configuration for the server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub api: ApiConfig,
    /// Directories PDFs may be read from and files written to.
    /// Empty means unrestricted.
    pub resource_dirs: Vec<String>,
    /// Where archives and single images are saved by default
    pub download_dir: PathBuf,
    /// Largest PDF accepted by the picker (default: 200MB)
    pub max_upload_bytes: u64,
    /// Largest response body (extraction JSON or ZIP) accepted from the service (default: 1GB)
    pub max_response_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            resource_dirs: Vec::new(),
            download_dir: PathBuf::from("."),
            max_upload_bytes: 200 * 1024 * 1024,   // 200MB
            max_response_bytes: 1024 * 1024 * 1024, // 1GB
        }
    }
}

impl ServerConfig {
    /// Default configuration with environment overrides:
    /// `PDF_IMAGE_EXTRACTOR_API_URL`, `PDF_IMAGE_EXTRACTOR_DOWNLOAD_DIR` and
    /// `PDF_IMAGE_EXTRACTOR_RESOURCE_DIRS` (a path list).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PDF_IMAGE_EXTRACTOR_API_URL") {
            config.api.base_url = url;
        }
        if let Some(dir) = std::env::var_os("PDF_IMAGE_EXTRACTOR_DOWNLOAD_DIR") {
            config.download_dir = PathBuf::from(dir);
        }
        if let Some(dirs) = std::env::var_os("PDF_IMAGE_EXTRACTOR_RESOURCE_DIRS") {
            config.resource_dirs = std::env::split_paths(&dirs)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.display().to_string())
                .collect();
        }

        config
    }
}
