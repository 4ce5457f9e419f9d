//! In-memory extraction service for unit tests

use crate::error::{Error, Result};
use crate::service::ExtractionService;
use crate::session::ImageRecord;
use crate::source::PdfUpload;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Scripted service: returns canned images and archives, records requests,
/// and can hold requests in flight until released.
pub struct FakeService {
    images: Mutex<Vec<ImageRecord>>,
    extract_error: Mutex<Option<Error>>,
    extract_gate: Mutex<Option<Arc<Notify>>>,
    extract_calls: AtomicUsize,
    archive: Vec<u8>,
    zip_error: Mutex<Option<Error>>,
    zip_gates: Mutex<HashMap<usize, Arc<Notify>>>,
    zip_requests: Mutex<Vec<Vec<String>>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            images: Mutex::new(Vec::new()),
            extract_error: Mutex::new(None),
            extract_gate: Mutex::new(None),
            extract_calls: AtomicUsize::new(0),
            archive: b"PK\x05\x06fake-archive".to_vec(),
            zip_error: Mutex::new(None),
            zip_gates: Mutex::new(HashMap::new()),
            zip_requests: Mutex::new(Vec::new()),
        }
    }
}

impl FakeService {
    pub fn with_images(images: Vec<ImageRecord>) -> Self {
        let service = Self::default();
        service.set_images(images);
        service
    }

    pub fn set_images(&self, images: Vec<ImageRecord>) {
        *self.images.lock() = images;
    }

    pub fn archive(&self) -> &[u8] {
        &self.archive
    }

    /// Make the next extraction fail with `error`
    pub fn fail_extract(&self, error: Error) {
        *self.extract_error.lock() = Some(error);
    }

    /// Make the next zip request fail with `error`
    pub fn fail_zip(&self, error: Error) {
        *self.zip_error.lock() = Some(error);
    }

    /// Hold extractions until the returned gate is notified
    pub fn hold_extract(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.extract_gate.lock() = Some(gate.clone());
        gate
    }

    /// Hold zip requests carrying `entries` entries until the gate is notified
    pub fn hold_zip(&self, entries: usize) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.zip_gates.lock().insert(entries, gate.clone());
        gate
    }

    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }

    pub fn zip_requests(&self) -> Vec<Vec<String>> {
        self.zip_requests.lock().clone()
    }

    pub async fn wait_for_extract_calls(&self, n: usize) {
        while self.extract_calls() < n {
            tokio::task::yield_now().await;
        }
    }

    pub async fn wait_for_zip_requests(&self, n: usize) {
        while self.zip_requests.lock().len() < n {
            tokio::task::yield_now().await;
        }
    }
}

impl ExtractionService for FakeService {
    async fn extract(&self, _upload: PdfUpload) -> Result<Vec<ImageRecord>> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.extract_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let error = self.extract_error.lock().take();
        match error {
            Some(error) => Err(error),
            None => Ok(self.images.lock().clone()),
        }
    }

    async fn download_zip(&self, entries: Vec<String>) -> Result<Vec<u8>> {
        let count = entries.len();
        self.zip_requests.lock().push(entries);

        let gate = self.zip_gates.lock().get(&count).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let error = self.zip_error.lock().take();
        match error {
            Some(error) => Err(error),
            None => Ok(self.archive.clone()),
        }
    }
}
