//! HTTP client for the extraction service

use super::{parse_error_detail, parse_extraction_response, ExtractionService};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::ImageRecord;
use crate::source::PdfUpload;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};

/// Talks to the extraction service over HTTP
#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: reqwest::Client,
    api: ApiConfig,
    max_body_bytes: u64,
}

impl HttpExtractionService {
    /// `max_body_bytes` caps both the extraction response and the archive
    pub fn new(api: ApiConfig, max_body_bytes: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout)
            .build()
            .map_err(Error::HttpRequest)?;

        Ok(Self {
            client,
            api,
            max_body_bytes,
        })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// Turn a non-success response into [`Error::ServiceRejected`]
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        Err(Error::ServiceRejected {
            status: status.as_u16(),
            detail: parse_error_detail(&body),
        })
    }

    /// Read a response body, refusing anything over `max_body_bytes`
    async fn read_capped(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        // Check Content-Length header for early rejection
        if let Some(content_length) = response.content_length() {
            if content_length > self.max_body_bytes {
                return Err(Error::DownloadTooLarge {
                    size: content_length,
                    max_size: self.max_body_bytes,
                });
            }
        }

        // Stream the body with incremental size checking
        let mut data = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(Error::HttpRequest)?;
            data.extend_from_slice(&chunk);
            if data.len() as u64 > self.max_body_bytes {
                return Err(Error::DownloadTooLarge {
                    size: data.len() as u64,
                    max_size: self.max_body_bytes,
                });
            }
        }

        Ok(data)
    }
}

impl ExtractionService for HttpExtractionService {
    async fn extract(&self, upload: PdfUpload) -> Result<Vec<ImageRecord>> {
        let url = self.api.extract_url()?;
        tracing::debug!(%url, file = %upload.file_name, "POST extraction request");

        let part = Part::bytes(upload.data)
            .file_name(upload.file_name)
            .mime_str("application/pdf")?;
        let form = Form::new().part("file", part);

        let response = self.client.post(url).multipart(form).send().await?;
        let response = Self::check_status(response).await?;
        let body = self.read_capped(response).await?;

        parse_extraction_response(&body)
    }

    async fn download_zip(&self, entries: Vec<String>) -> Result<Vec<u8>> {
        let url = self.api.download_zip_url()?;
        tracing::debug!(%url, entries = entries.len(), "POST zip request");

        let response = self.client.post(url).json(&entries).send().await?;
        let response = Self::check_status(response).await?;

        self.read_capped(response).await
    }
}
