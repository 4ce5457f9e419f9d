//! MCP Server implementation using rmcp

use crate::config::ServerConfig;
use crate::error::Error;
use crate::export::ExportScope;
use crate::service::HttpExtractionService;
use crate::shell::{Shell, ShellSnapshot, View};
use crate::source::{resolve_base64, resolve_path, PdfUpload};
use crate::uploader::ExtractionOutcome;
use anyhow::Result;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// PDF source specification
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum PdfSource {
    /// File path (absolute or relative)
    Path {
        /// Path to the PDF file
        path: String,
    },
    /// Base64 encoded PDF data
    Base64 {
        /// Base64 encoded PDF content
        base64: String,
        /// File name to send along with the content
        #[serde(skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
}

impl<'de> serde::Deserialize<'de> for PdfSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if let Some(obj) = value.as_object() {
            if let Some(v) = obj.get("path") {
                if let Some(s) = v.as_str() {
                    return Ok(PdfSource::Path {
                        path: s.to_string(),
                    });
                }
                return Err(serde::de::Error::custom("\"path\" must be a string"));
            }
            if let Some(v) = obj.get("base64") {
                let base64 = v
                    .as_str()
                    .ok_or_else(|| serde::de::Error::custom("\"base64\" must be a string"))?;
                let file_name = match obj.get("file_name") {
                    None | Some(serde_json::Value::Null) => None,
                    Some(serde_json::Value::String(s)) => Some(s.clone()),
                    Some(_) => {
                        return Err(serde::de::Error::custom("\"file_name\" must be a string"))
                    }
                };
                return Ok(PdfSource::Base64 {
                    base64: base64.to_string(),
                    file_name,
                });
            }
            let keys: Vec<&String> = obj.keys().collect();
            Err(serde::de::Error::custom(format!(
                "Invalid source: expected an object with \"path\" or \"base64\", but got keys: {:?}",
                keys
            )))
        } else {
            Err(serde::de::Error::custom(format!(
                "Invalid source: expected an object with \"path\" or \"base64\", but got {}",
                match &value {
                    serde_json::Value::Array(_) => "an array",
                    serde_json::Value::String(_) => "a string",
                    serde_json::Value::Number(_) => "a number",
                    serde_json::Value::Bool(_) => "a boolean",
                    serde_json::Value::Null => "null",
                    _ => "unknown type",
                }
            )))
        }
    }
}

/// PDF image extractor MCP server
#[derive(Clone)]
pub struct ImageServer {
    shell: Arc<Shell<HttpExtractionService>>,
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request/Response types for upload_pdf
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadPdfParams {
    /// PDF to extract images from
    pub source: PdfSource,
}

#[derive(Debug, Serialize)]
pub struct UploadResult {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ExtractionOutcome>,
    pub view: View,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Request/Response types for get_session
// ============================================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct GetSessionParams {
    /// Include each image's data URI (large)
    #[serde(default)]
    pub include_data: bool,
}

// ============================================================================
// Request/Response types for toggle_selection
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ToggleSelectionParams {
    /// Image name as listed by get_session
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleSelectionResult {
    pub name: String,
    pub selected: bool,
    pub selected_count: usize,
    pub image_count: usize,
}

// ============================================================================
// Request/Response types for export_zip
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExportZipParams {
    /// "all" or "selected"
    pub scope: ExportScope,
    /// Directory to save the archive in (default: configured download directory)
    #[serde(default)]
    pub output_dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExportZipResult {
    pub scope: ExportScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Blocking notice when nothing was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

// ============================================================================
// Request/Response types for save_image
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SaveImageParams {
    /// Image name as listed by get_session
    pub name: String,
    /// Where to write the image (default: its name inside the download directory)
    #[serde(default)]
    pub output_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveImageResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl ImageServer {
    /// Create a new ImageServer with full configuration
    pub fn with_config(config: ServerConfig) -> crate::error::Result<Self> {
        let service = HttpExtractionService::new(config.api.clone(), config.max_response_bytes)?;
        Ok(Self {
            shell: Arc::new(Shell::new(service)),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        })
    }

    /// Upload a PDF and load its images
    #[tool(
        description = "Upload a PDF to the extraction service and load the images it contains, replacing any previously loaded images and clearing the selection.

Source format: {\"path\": \"/absolute/path.pdf\"} or {\"base64\": \"...\", \"file_name\": \"doc.pdf\"}. PDFs up to 200MB."
    )]
    async fn upload_pdf(&self, Parameters(params): Parameters<UploadPdfParams>) -> String {
        let result = self.process_upload(&params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "upload_pdf failed");
            UploadResult {
                source: Self::source_name(&params.source),
                outcome: None,
                view: self.shell.view(),
                error: Some(e.client_message()),
            }
        });

        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Show the current session
    #[tool(
        description = "Show the current session: active view (upload or gallery), loading flag, error banner, images grouped by page in ascending page order, the selection, export progress and which controls are enabled."
    )]
    async fn get_session(&self, Parameters(params): Parameters<GetSessionParams>) -> String {
        let snapshot = self.process_get_session(&params);
        serde_json::to_string_pretty(&snapshot).unwrap_or_default()
    }

    /// Toggle an image in or out of the selection
    #[tool(description = "Select an image by name, or unselect it if it is already selected.")]
    async fn toggle_selection(
        &self,
        Parameters(params): Parameters<ToggleSelectionParams>,
    ) -> String {
        let result = self.process_toggle_selection(&params);
        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Download a ZIP of all or selected images
    #[tool(
        description = "Ask the extraction service for a ZIP archive of all images (scope \"all\", saved as todas_imagens.zip) or of the selected images (scope \"selected\", saved as selecionadas.zip). Returns the saved path, or a notice when nothing was exported."
    )]
    async fn export_zip(&self, Parameters(params): Parameters<ExportZipParams>) -> String {
        let result = self.process_export_zip(&params).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, scope = %params.scope, "export_zip failed");
            ExportZipResult {
                scope: params.scope,
                path: None,
                notice: Some(e.export_notice()),
            }
        });

        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Save a single image
    #[tool(description = "Save one loaded image to disk under its own name.")]
    async fn save_image(&self, Parameters(params): Parameters<SaveImageParams>) -> String {
        let result = self.process_save_image(&params).unwrap_or_else(|e| {
            tracing::warn!(error = %e, name = %params.name, "save_image failed");
            SaveImageResult {
                name: params.name.clone(),
                path: None,
                bytes: 0,
                error: Some(e.client_message()),
            }
        });

        serde_json::to_string_pretty(&result).unwrap_or_default()
    }

    /// Go back to the upload view
    #[tool(
        description = "Discard the loaded images, the selection and the error banner, and go back to the upload view. Running exports are not cancelled."
    )]
    async fn reset_session(&self) -> String {
        let snapshot = self.process_reset();
        serde_json::to_string_pretty(&snapshot).unwrap_or_default()
    }
}

impl ImageServer {
    fn source_name(source: &PdfSource) -> String {
        match source {
            PdfSource::Path { path } => path.clone(),
            PdfSource::Base64 { file_name, .. } => file_name
                .clone()
                .unwrap_or_else(|| "<base64>".to_string()),
        }
    }

    /// Run the file picker checks on `source`
    fn resolve_source(&self, source: &PdfSource) -> crate::error::Result<PdfUpload> {
        match source {
            PdfSource::Path { path } => {
                let path = self.validate_path_access(path)?;
                resolve_path(path, self.config.max_upload_bytes)
            }
            PdfSource::Base64 { base64, file_name } => {
                resolve_base64(base64, file_name.as_deref(), self.config.max_upload_bytes)
            }
        }
    }

    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| Error::PathAccessDenied {
            path: path.to_string(),
        })?;

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical.starts_with(&canonical_dir) {
                    return Ok(canonical);
                }
            }
        }

        Err(Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Validate that an output path is within allowed resource directories.
    /// The file and some of its parent directories may not exist yet, so the
    /// nearest existing ancestor is canonicalized and the rest re-appended.
    fn validate_output_path_access(&self, path: &Path) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(path.to_path_buf());
        }

        let denied = || Error::PathAccessDenied {
            path: path.display().to_string(),
        };
        // Missing components are appended unresolved, so they must not climb
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(denied());
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_err(|_| denied())?.join(path)
        };

        let mut existing = absolute.as_path();
        let mut missing = Vec::new();
        let canonical_target = loop {
            match std::fs::canonicalize(existing) {
                Ok(mut canonical) => {
                    canonical.extend(missing.iter().rev());
                    break canonical;
                }
                Err(_) => {
                    missing.push(existing.file_name().ok_or_else(denied)?);
                    existing = existing.parent().ok_or_else(denied)?;
                }
            }
        };

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical_target.starts_with(&canonical_dir) {
                    return Ok(canonical_target);
                }
            }
        }

        Err(denied())
    }

    /// Write output data to a file path, with sandbox validation.
    fn write_output(&self, path: &Path, data: &[u8]) -> crate::error::Result<PathBuf> {
        let path = self.validate_output_path_access(path)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(&path, data)?;
        Ok(path)
    }

    pub async fn process_upload(
        &self,
        params: &UploadPdfParams,
    ) -> crate::error::Result<UploadResult> {
        if !self.shell.controls().upload {
            return Err(Error::ExtractionInProgress);
        }

        let upload = self.resolve_source(&params.source)?;
        let source = Self::source_name(&params.source);

        match self.shell.uploader().submit(upload).await {
            Ok(outcome) => Ok(UploadResult {
                source,
                outcome: Some(outcome),
                view: self.shell.view(),
                error: None,
            }),
            Err(Error::ExtractionInProgress) => Err(Error::ExtractionInProgress),
            Err(e) => Ok(UploadResult {
                source,
                outcome: None,
                view: self.shell.view(),
                error: Some(e.extraction_message()),
            }),
        }
    }

    pub fn process_get_session(&self, params: &GetSessionParams) -> ShellSnapshot {
        self.shell.snapshot(params.include_data)
    }

    pub fn process_toggle_selection(&self, params: &ToggleSelectionParams) -> ToggleSelectionResult {
        let selected = self.shell.grid().toggle(&params.name);
        let (selected_count, image_count) = self
            .shell
            .store()
            .with(|state| (state.selection.len(), state.images.len()));

        ToggleSelectionResult {
            name: params.name.clone(),
            selected,
            selected_count,
            image_count,
        }
    }

    pub async fn process_export_zip(
        &self,
        params: &ExportZipParams,
    ) -> crate::error::Result<ExportZipResult> {
        // Both export controls are disabled while either export runs
        if self.shell.exporter().state().any() {
            return Err(Error::ExportInProgress {
                scope: params.scope,
            });
        }

        let dir = params
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.config.download_dir.clone());
        let target = self.validate_output_path_access(&dir.join(params.scope.file_name()))?;
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let path = self
            .shell
            .exporter()
            .export_zip(params.scope, &dir)
            .await?;

        Ok(ExportZipResult {
            scope: params.scope,
            path: Some(path.display().to_string()),
            notice: None,
        })
    }

    pub fn process_save_image(
        &self,
        params: &SaveImageParams,
    ) -> crate::error::Result<SaveImageResult> {
        let bytes = self.shell.grid().image_bytes(&params.name)?;

        let path = match &params.output_path {
            Some(path) => PathBuf::from(path),
            None => {
                // Service-provided names must not escape the download directory
                let file_name = Path::new(&params.name)
                    .file_name()
                    .ok_or_else(|| Error::ImageNotFound {
                        name: params.name.clone(),
                    })?;
                self.config.download_dir.join(file_name)
            }
        };
        let written = self.write_output(&path, &bytes)?;
        tracing::info!(name = %params.name, path = %written.display(), "Image saved");

        Ok(SaveImageResult {
            name: params.name.clone(),
            path: Some(written.display().to_string()),
            bytes: bytes.len(),
            error: None,
        })
    }

    pub fn process_reset(&self) -> ShellSnapshot {
        self.shell.reset();
        self.shell.snapshot(false)
    }
}

#[tool_handler]
impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF image extractor: upload a PDF with upload_pdf, browse the images grouped by \
                 page with get_session, pick images with toggle_selection, and save a ZIP of all \
                 or selected images with export_zip. reset_session starts over."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    tracing::info!(
        extract = %config.api.extract_path,
        base_url = %config.api.base_url,
        "Using extraction service"
    );
    let server = ImageServer::with_config(config)?;

    tracing::info!("PDF Image Extractor ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, ApiMode};
    use crate::session::ImageRecord;
    use pretty_assertions::assert_eq;

    /// Server pointing at a port nothing listens on
    fn offline_server(config: ServerConfig) -> ImageServer {
        ImageServer::with_config(ServerConfig {
            api: ApiConfig::for_mode(ApiMode::Development).with_base_url("http://127.0.0.1:9"),
            ..config
        })
        .unwrap()
    }

    #[test]
    fn test_source_name() {
        assert_eq!(
            ImageServer::source_name(&PdfSource::Path {
                path: "/test.pdf".to_string()
            }),
            "/test.pdf"
        );
        assert_eq!(
            ImageServer::source_name(&PdfSource::Base64 {
                base64: "...".to_string(),
                file_name: None,
            }),
            "<base64>"
        );
        assert_eq!(
            ImageServer::source_name(&PdfSource::Base64 {
                base64: "...".to_string(),
                file_name: Some("scan.pdf".to_string()),
            }),
            "scan.pdf"
        );
    }

    #[test]
    fn test_pdf_source_deserialization() {
        let source: PdfSource = serde_json::from_str(r#"{"path": "/test.pdf"}"#).unwrap();
        assert!(matches!(source, PdfSource::Path { .. }));

        let source: PdfSource = serde_json::from_str(r#"{"base64": "JVBERi0xLjQ="}"#).unwrap();
        assert!(matches!(source, PdfSource::Base64 { file_name: None, .. }));

        let source: PdfSource =
            serde_json::from_str(r#"{"base64": "JVBERi0xLjQ=", "file_name": "a.pdf"}"#).unwrap();
        assert!(matches!(source, PdfSource::Base64 { file_name: Some(_), .. }));

        assert!(serde_json::from_str::<PdfSource>(r#"{"url": "https://x"}"#).is_err());
        assert!(serde_json::from_str::<PdfSource>(r#""/test.pdf""#).is_err());
        assert!(serde_json::from_str::<PdfSource>(r#"{"path": 1}"#).is_err());
    }

    #[test]
    fn test_params_deserialization() {
        let params: ExportZipParams = serde_json::from_str(r#"{"scope": "selected"}"#).unwrap();
        assert_eq!(params.scope, ExportScope::Selected);
        assert!(params.output_dir.is_none());

        let params: GetSessionParams = serde_json::from_str("{}").unwrap();
        assert!(!params.include_data);

        assert!(serde_json::from_str::<ExportZipParams>(r#"{"scope": "some"}"#).is_err());
    }

    #[test]
    fn test_empty_session() {
        let server = offline_server(ServerConfig::default());
        let snapshot = server.process_get_session(&GetSessionParams::default());
        assert_eq!(snapshot.view, View::Upload);
        assert!(!snapshot.loading);
        assert!(snapshot.controls.upload);
        assert!(!snapshot.controls.export_selected);
    }

    #[tokio::test]
    async fn test_export_selected_without_selection_is_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let server = offline_server(ServerConfig::default());
        let params = ExportZipParams {
            scope: ExportScope::Selected,
            output_dir: Some(dir.path().display().to_string()),
        };

        let err = server.process_export_zip(&params).await.unwrap_err();
        assert!(matches!(err, Error::NothingToExport { .. }));
        assert_eq!(err.export_notice(), crate::error::NOTHING_SELECTED_NOTICE);
        assert!(!server.shell.exporter().state().any());
    }

    #[tokio::test]
    async fn test_upload_missing_file() {
        let server = offline_server(ServerConfig::default());
        let params = UploadPdfParams {
            source: PdfSource::Path {
                path: "/nonexistent/path/file.pdf".to_string(),
            },
        };
        let err = server.process_upload(&params).await.unwrap_err();
        assert!(matches!(err, Error::PdfNotFound { .. }));
        assert!(!server.shell.store().loading());
    }

    #[tokio::test]
    async fn test_upload_unreachable_service_sets_banner() {
        let server = offline_server(ServerConfig::default());
        let params = UploadPdfParams {
            source: PdfSource::Base64 {
                base64: "JVBERi0xLjQ=".to_string(), // "%PDF-1.4"
                file_name: None,
            },
        };

        let result = server.process_upload(&params).await.unwrap();
        assert!(result.outcome.is_none());
        assert_eq!(result.view, View::Upload);
        assert_eq!(
            result.error.as_deref(),
            Some("Could not reach the extraction service")
        );

        let snapshot = server.process_get_session(&GetSessionParams::default());
        assert_eq!(snapshot.error, result.error);
        assert!(!snapshot.loading);
    }

    #[test]
    fn test_toggle_and_reset() {
        let server = offline_server(ServerConfig::default());
        let params = ToggleSelectionParams {
            name: "a.png".to_string(),
        };

        let result = server.process_toggle_selection(&params);
        assert!(result.selected);
        assert_eq!(result.selected_count, 1);

        let snapshot = server.process_reset();
        assert_eq!(snapshot.view, View::Upload);
        assert_eq!(snapshot.selected_count, 0);
    }

    #[test]
    fn test_save_image_unknown_name() {
        let server = offline_server(ServerConfig::default());
        let params = SaveImageParams {
            name: "missing.png".to_string(),
            output_path: None,
        };
        assert!(matches!(
            server.process_save_image(&params),
            Err(Error::ImageNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_path_no_resource_dirs_allows_all() {
        let server = offline_server(ServerConfig::default());
        assert!(server.validate_path_access("/any/where.pdf").is_ok());
    }

    #[test]
    fn test_validate_path_within_resource_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("doc.pdf");
        std::fs::write(&file, b"%PDF-1.4").unwrap();
        let server = offline_server(ServerConfig {
            resource_dirs: vec![dir.path().display().to_string()],
            ..ServerConfig::default()
        });

        assert!(server
            .validate_path_access(&file.display().to_string())
            .is_ok());
        assert!(matches!(
            server.validate_path_access("/etc/hosts"),
            Err(Error::PathAccessDenied { .. })
        ));
    }

    #[test]
    fn test_validate_output_path_outside_resource_dir() {
        let dir = tempfile::tempdir().unwrap();
        let server = offline_server(ServerConfig {
            resource_dirs: vec![dir.path().display().to_string()],
            ..ServerConfig::default()
        });

        assert!(server
            .validate_output_path_access(&dir.path().join("out.zip"))
            .is_ok());
        let outside = tempfile::tempdir().unwrap();
        assert!(matches!(
            server.validate_output_path_access(&outside.path().join("out.zip")),
            Err(Error::PathAccessDenied { .. })
        ));
    }

    #[test]
    fn test_validate_output_path_in_missing_subdir() {
        let dir = tempfile::tempdir().unwrap();
        let server = offline_server(ServerConfig {
            resource_dirs: vec![dir.path().display().to_string()],
            ..ServerConfig::default()
        });

        let target = dir.path().join("new_sub").join("todas_imagens.zip");
        let validated = server.validate_output_path_access(&target).unwrap();
        assert_eq!(
            validated,
            std::fs::canonicalize(dir.path())
                .unwrap()
                .join("new_sub")
                .join("todas_imagens.zip")
        );

        let escape = dir.path().join("new_sub").join("..").join("..").join("out.zip");
        assert!(matches!(
            server.validate_output_path_access(&escape),
            Err(Error::PathAccessDenied { .. })
        ));
    }

    #[test]
    fn test_save_image_into_missing_subdir_within_sandbox() {
        let dir = tempfile::tempdir().unwrap();
        let server = offline_server(ServerConfig {
            resource_dirs: vec![dir.path().display().to_string()],
            ..ServerConfig::default()
        });
        let pending = server.shell.store().begin_extraction().unwrap();
        assert!(pending.succeed(vec![ImageRecord::from_bytes(
            "a.png",
            "image/png",
            b"png-bytes",
            1
        )]));

        let output = dir.path().join("images").join("page_1").join("a.png");
        let result = server
            .process_save_image(&SaveImageParams {
                name: "a.png".to_string(),
                output_path: Some(output.display().to_string()),
            })
            .unwrap();
        assert_eq!(result.bytes, 9);
        assert_eq!(std::fs::read(&output).unwrap(), b"png-bytes");
    }
}
