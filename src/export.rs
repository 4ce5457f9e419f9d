//! Export manager: ZIP archives of all or selected images

use crate::error::{Error, Result};
use crate::service::ExtractionService;
use crate::session::{ImageRecord, SelectionSet, SessionStore};
use parking_lot::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Which images an export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Every image of the session
    All,
    /// Only images whose name is selected
    Selected,
}

impl ExportScope {
    /// File name of the saved archive
    pub fn file_name(self) -> &'static str {
        match self {
            ExportScope::All => "todas_imagens.zip",
            ExportScope::Selected => "selecionadas.zip",
        }
    }
}

impl fmt::Display for ExportScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportScope::All => f.write_str("all"),
            ExportScope::Selected => f.write_str("selected"),
        }
    }
}

/// In-flight flags, one per scope
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportState {
    pub exporting_all: bool,
    pub exporting_selected: bool,
}

impl ExportState {
    fn flag(&mut self, scope: ExportScope) -> &mut bool {
        match scope {
            ExportScope::All => &mut self.exporting_all,
            ExportScope::Selected => &mut self.exporting_selected,
        }
    }

    pub fn is_exporting(&self, scope: ExportScope) -> bool {
        match scope {
            ExportScope::All => self.exporting_all,
            ExportScope::Selected => self.exporting_selected,
        }
    }

    pub fn any(&self) -> bool {
        self.exporting_all || self.exporting_selected
    }
}

/// Images `scope` resolves to, in list order
pub fn resolve(images: &[ImageRecord], selection: &SelectionSet, scope: ExportScope) -> Vec<ImageRecord> {
    match scope {
        ExportScope::All => images.to_vec(),
        ExportScope::Selected => images
            .iter()
            .filter(|img| selection.contains(&img.name))
            .cloned()
            .collect(),
    }
}

/// Request body for the ZIP endpoint: one `<name>|<payload>` per image
pub fn build_payload(images: &[ImageRecord]) -> Vec<String> {
    images.iter().map(ImageRecord::zip_entry).collect()
}

/// Write `bytes` to `dir/file_name` through a temporary file in `dir`.
/// The temporary file is removed if anything fails before it is persisted.
pub fn save_archive(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }

    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.flush()?;

    let target = dir.join(file_name);
    temp.persist(&target).map_err(|e| Error::Io(e.error))?;
    Ok(target)
}

/// Clears the scope's flag when dropped
struct InFlight {
    state: Arc<Mutex<ExportState>>,
    scope: ExportScope,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        *self.state.lock().flag(self.scope) = false;
    }
}

/// Builds ZIP requests from the session and saves the archives
#[derive(Debug)]
pub struct ExportManager<S> {
    service: Arc<S>,
    store: SessionStore,
    state: Arc<Mutex<ExportState>>,
}

impl<S: ExtractionService> ExportManager<S> {
    pub fn new(service: Arc<S>, store: SessionStore) -> Self {
        Self {
            service,
            store,
            state: Arc::new(Mutex::new(ExportState::default())),
        }
    }

    /// Current in-flight flags
    pub fn state(&self) -> ExportState {
        *self.state.lock()
    }

    fn begin(&self, scope: ExportScope) -> Result<InFlight> {
        let mut state = self.state.lock();
        let flag = state.flag(scope);
        if *flag {
            return Err(Error::ExportInProgress { scope });
        }
        *flag = true;

        Ok(InFlight {
            state: self.state.clone(),
            scope,
        })
    }

    /// Request an archive of `scope` and save it into `dir`.
    ///
    /// Fails with `NothingToExport` without contacting the service when the
    /// scope resolves to no images, and with `ExportInProgress` when an
    /// export of the same scope is still pending. The session is never
    /// modified.
    pub async fn export_zip(&self, scope: ExportScope, dir: &Path) -> Result<PathBuf> {
        let _in_flight = self.begin(scope)?;

        let images = self
            .store
            .with(|state| resolve(&state.images, &state.selection, scope));
        if images.is_empty() {
            tracing::warn!(%scope, "Nothing to export");
            return Err(Error::NothingToExport { scope });
        }

        let payload = build_payload(&images);
        tracing::info!(%scope, images = payload.len(), "Requesting ZIP archive");

        let bytes = self.service.download_zip(payload).await.map_err(|e| {
            tracing::warn!(%scope, error = %e, "ZIP request failed");
            e
        })?;

        let path = save_archive(dir, scope.file_name(), &bytes)?;
        tracing::info!(%scope, path = %path.display(), bytes = bytes.len(), "ZIP archive saved");
        Ok(path)
    }
}
