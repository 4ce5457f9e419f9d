//! Shell: composes the pipeline and decides what is on screen

use crate::export::{ExportManager, ExportScope, ExportState};
use crate::grid::{GridPresenter, PageView};
use crate::service::ExtractionService;
use crate::session::SessionStore;
use crate::uploader::Uploader;
use serde::Serialize;
use std::sync::Arc;

/// Active view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// No images loaded: the PDF picker is shown
    Upload,
    /// Image grid plus export controls
    Gallery,
}

/// Which controls accept input right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    /// Picker is disabled while an extraction is in flight
    pub upload: bool,
    /// Both export buttons are disabled while either export runs
    pub export_all: bool,
    /// Additionally disabled while nothing is selected
    pub export_selected: bool,
}

impl Controls {
    pub fn export_enabled(&self, scope: ExportScope) -> bool {
        match scope {
            ExportScope::All => self.export_all,
            ExportScope::Selected => self.export_selected,
        }
    }
}

/// Everything a client needs to draw the page
#[derive(Debug, Serialize)]
pub struct ShellSnapshot {
    pub view: View,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub image_count: usize,
    pub selected_count: usize,
    pub selection: Vec<String>,
    pub pages: Vec<PageView>,
    pub export: ExportState,
    pub controls: Controls,
}

/// Owns the session store and wires the components to it
#[derive(Debug)]
pub struct Shell<S> {
    store: SessionStore,
    uploader: Uploader<S>,
    grid: GridPresenter,
    exporter: ExportManager<S>,
}

impl<S: ExtractionService> Shell<S> {
    pub fn new(service: S) -> Self {
        let service = Arc::new(service);
        let store = SessionStore::new();
        Self {
            uploader: Uploader::new(service.clone(), store.clone()),
            grid: GridPresenter::new(store.clone()),
            exporter: ExportManager::new(service, store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn uploader(&self) -> &Uploader<S> {
        &self.uploader
    }

    pub fn grid(&self) -> &GridPresenter {
        &self.grid
    }

    pub fn exporter(&self) -> &ExportManager<S> {
        &self.exporter
    }

    /// Upload view iff no images are loaded
    pub fn view(&self) -> View {
        if self.store.is_empty() {
            View::Upload
        } else {
            View::Gallery
        }
    }

    pub fn controls(&self) -> Controls {
        let (loading, has_selection) = self
            .store
            .with(|state| (state.loading(), !state.selection.is_empty()));
        let exporting = self.exporter.state().any();

        Controls {
            upload: !loading,
            export_all: !exporting,
            export_selected: has_selection && !exporting,
        }
    }

    /// Back to the upload view. In-flight exports are left running.
    pub fn reset(&self) {
        self.store.reset();
        tracing::info!("Session reset");
    }

    pub fn snapshot(&self, include_data: bool) -> ShellSnapshot {
        let state = self.store.snapshot();
        let view = if state.images.is_empty() {
            View::Upload
        } else {
            View::Gallery
        };

        ShellSnapshot {
            view,
            loading: state.loading(),
            error: state.error.clone(),
            image_count: state.images.len(),
            selected_count: state.selection.len(),
            selection: state.selection.sorted(),
            pages: crate::grid::render(&state.images, &state.selection, include_data),
            export: self.exporter.state(),
            controls: self.controls(),
        }
    }
}
