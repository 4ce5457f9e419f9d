//! Uploader: submits a PDF and loads the extracted images

use crate::error::Result;
use crate::service::ExtractionService;
use crate::session::SessionStore;
use crate::source::PdfUpload;
use serde::Serialize;
use std::sync::Arc;

/// What happened to a settled extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// The image list was replaced
    Loaded { images: usize },
    /// The session was reset while the request was in flight
    Discarded,
}

/// Sends uploads to the extraction service and writes results to the store
#[derive(Debug)]
pub struct Uploader<S> {
    service: Arc<S>,
    store: SessionStore,
}

impl<S: ExtractionService> Uploader<S> {
    pub fn new(service: Arc<S>, store: SessionStore) -> Self {
        Self { service, store }
    }

    /// Submit `upload` for extraction.
    ///
    /// Sets loading and clears the error banner before the request. On
    /// success the image list is replaced and the selection emptied; on
    /// failure the banner is set and the images are left alone. Loading is
    /// cleared whatever happens. A result that settles after a reset, success
    /// or failure, is reported as `Discarded` and leaves the session untouched. Fails immediately with
    /// `ExtractionInProgress` if another extraction is pending.
    pub async fn submit(&self, upload: PdfUpload) -> Result<ExtractionOutcome> {
        let pending = self.store.begin_extraction()?;
        let file_name = upload.file_name.clone();
        tracing::info!(file = %file_name, bytes = upload.data.len(), "Submitting PDF for extraction");

        match self.service.extract(upload).await {
            Ok(images) => {
                let count = images.len();
                if pending.succeed(images) {
                    tracing::info!(file = %file_name, images = count, "Extraction loaded");
                    Ok(ExtractionOutcome::Loaded { images: count })
                } else {
                    tracing::info!(file = %file_name, "Session reset during extraction, result discarded");
                    Ok(ExtractionOutcome::Discarded)
                }
            }
            Err(e) => {
                if pending.fail(e.extraction_message()) {
                    tracing::warn!(file = %file_name, error = %e, "Extraction failed");
                    Err(e)
                } else {
                    tracing::info!(file = %file_name, error = %e, "Session reset during extraction, failure discarded");
                    Ok(ExtractionOutcome::Discarded)
                }
            }
        }
    }
}
