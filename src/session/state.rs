//! Shared session state

use super::ImageRecord;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Names of the images picked for a targeted export.
///
/// Independent of list membership: unknown names may be toggled in and are
/// only cross-referenced against the image list at export time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    names: HashSet<String>,
}

impl SelectionSet {
    /// Flip membership of `name`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.names.remove(name) {
            false
        } else {
            self.names.insert(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Selected names in lexical order
    pub fn sorted(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.iter().cloned().collect();
        names.sort();
        names
    }
}

/// Everything the shell knows about the current session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Images of the last successful extraction, in service order
    pub images: Vec<ImageRecord>,
    pub selection: SelectionSet,
    /// Banner text of the last failed extraction
    pub error: Option<String>,
    /// Bumped on every submission and every reset
    generation: u64,
    /// Ticket of the extraction currently in flight
    pending: Option<u64>,
}

impl SessionState {
    /// True while an extraction request is in flight
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// First image carrying `name`
    pub fn image(&self, name: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|img| img.name == name)
    }
}

/// Handle to the session state shared by the shell's components.
///
/// All mutations go through the methods below; the lock is never held
/// across an await point.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().clone()
    }

    /// Read the state under the lock
    pub fn with<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn loading(&self) -> bool {
        self.inner.lock().loading()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().images.is_empty()
    }

    /// Start an extraction: sets loading and clears the error banner.
    ///
    /// Fails with [`Error::ExtractionInProgress`] while another extraction is
    /// pending.
    pub fn begin_extraction(&self) -> Result<PendingExtraction> {
        let mut state = self.inner.lock();
        if state.pending.is_some() {
            return Err(Error::ExtractionInProgress);
        }
        state.generation += 1;
        let ticket = state.generation;
        state.pending = Some(ticket);
        state.error = None;

        Ok(PendingExtraction {
            store: self.clone(),
            ticket,
            settled: false,
        })
    }

    /// Flip selection membership of `name`
    pub fn toggle(&self, name: &str) -> bool {
        self.inner.lock().selection.toggle(name)
    }

    /// Drop images, selection and error. A pending extraction is left to
    /// settle but its result will be discarded.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.images.clear();
        state.selection.clear();
        state.error = None;
    }

    /// Clears `pending` if it still belongs to `ticket`, and reports whether
    /// the session is still on the generation that issued it.
    fn settle(&self, ticket: u64, apply: impl FnOnce(&mut SessionState)) -> bool {
        let mut state = self.inner.lock();
        if state.pending == Some(ticket) {
            state.pending = None;
        }
        let current = state.generation == ticket;
        if current {
            apply(&mut state);
        }
        current
    }
}

/// An extraction in flight.
///
/// Settling applies the outcome unless the session was reset in the
/// meantime. Dropping it unsettled (a cancelled request) only clears the
/// loading flag.
#[derive(Debug)]
#[must_use = "an unsettled extraction only clears the loading flag"]
pub struct PendingExtraction {
    store: SessionStore,
    ticket: u64,
    settled: bool,
}

impl PendingExtraction {
    /// Replace the image list and clear the selection.
    /// Returns false if the result was stale and discarded.
    pub fn succeed(mut self, images: Vec<ImageRecord>) -> bool {
        self.settled = true;
        self.store.settle(self.ticket, |state| {
            state.images = images;
            state.selection.clear();
        })
    }

    /// Record the error banner, leaving images untouched.
    /// Returns false if the result was stale and discarded.
    pub fn fail(mut self, message: String) -> bool {
        self.settled = true;
        self.store.settle(self.ticket, |state| {
            state.error = Some(message);
        })
    }
}

impl Drop for PendingExtraction {
    fn drop(&mut self) {
        if !self.settled {
            self.store.settle(self.ticket, |_| {});
        }
    }
}
