// src/transport/http.rs
// HTTP transport for the transcription server (multipart upload + JSON polling)

use super::{
    JobTicket, ProgressCallback, StatusReport, TranscriptionTransport, TransferProgress,
    TransportError,
};
use crate::audio::AudioFile;
use crate::config::ClientConfig;
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{multipart, Body, Response};
use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::ReaderStream;

const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;
const FALLBACK_MIME: &str = "application/octet-stream";

pub struct HttpTransport {
    server_url: String,
    client: reqwest::Client,
    upload_timeout: Duration,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        server_url: impl Into<String>,
        upload_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let server_url = server_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .connect_timeout(request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("HTTP transport initialized for {}", server_url);

        Ok(Self {
            server_url,
            client,
            upload_timeout,
            request_timeout,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        Self::new(
            config.server_url.clone(),
            config.job_timeout(),
            config.request_timeout(),
        )
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.server_url, path)
    }

    /// Stream `reader` in 64 KiB chunks, reporting progress as each chunk
    /// is pulled by the connection.
    fn progress_body<R>(reader: R, total_bytes: u64, on_progress: ProgressCallback) -> Body
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        let mut bytes_sent = 0u64;

        let chunks = ReaderStream::with_capacity(reader, UPLOAD_CHUNK_BYTES).map(move |chunk| {
            if let Ok(chunk) = &chunk {
                bytes_sent += chunk.len() as u64;
                on_progress(TransferProgress {
                    bytes_sent,
                    total_bytes,
                });
            }
            chunk
        });

        Body::wrap_stream(chunks)
    }

    /// Open the file for upload. The length on disk must still be the one
    /// that was validated at selection time.
    async fn open_validated(file: &AudioFile) -> Result<tokio::fs::File, TransportError> {
        let io_error =
            |e: std::io::Error| TransportError::Io(format!("{}: {}", file.path.display(), e));

        let source = tokio::fs::File::open(&file.path).await.map_err(io_error)?;
        let current_len = source.metadata().await.map_err(io_error)?.len();
        if current_len != file.size_bytes {
            return Err(TransportError::Io(format!(
                "{} changed since it was selected ({} bytes, now {} bytes)",
                file.path.display(),
                file.size_bytes,
                current_len
            )));
        }
        Ok(source)
    }

    async fn ensure_success(response: Response) -> Result<Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let mut message = error_detail(&body);
        if message.is_empty() {
            message = status.canonical_reason().unwrap_or("unknown error").to_string();
        }

        Err(TransportError::Http {
            status: status.as_u16(),
            message,
        })
    }
}

/// FastAPI reports errors as `{"detail": ...}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl TranscriptionTransport for HttpTransport {
    async fn submit(
        &self,
        file: &AudioFile,
        on_progress: ProgressCallback,
    ) -> Result<JobTicket, TransportError> {
        let source = Self::open_validated(file).await?;
        let total_bytes = file.size_bytes;

        tracing::info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            total_bytes,
            self.server_url
        );

        let mime = file
            .format()
            .map(|format| format.mime_type())
            .unwrap_or(FALLBACK_MIME);

        let file_part = multipart::Part::stream_with_length(
            Self::progress_body(source.take(total_bytes), total_bytes, on_progress),
            total_bytes,
        )
        .file_name(file.name.clone())
        .mime_str(mime)?;

        let form = multipart::Form::new().part("file", file_part);

        let response = self
            .client
            .post(self.endpoint("transcribe"))
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let ticket = Self::ensure_success(response)
            .await?
            .json::<JobTicket>()
            .await?;

        tracing::info!("Upload accepted, job_id={}", ticket.job_id);
        Ok(ticket)
    }

    async fn query_status(&self, job_id: &str) -> Result<StatusReport, TransportError> {
        let response = self
            .client
            .get(self.endpoint(&format!("status/{}", job_id)))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let report = Self::ensure_success(response)
            .await?
            .json::<StatusReport>()
            .await?;

        tracing::debug!("Status for {}: {}", job_id, report.status);
        Ok(report)
    }

    async fn fetch_result(&self, job_id: &str) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(self.endpoint(&format!("download/{}", job_id)))
            .timeout(self.request_timeout)
            .send()
            .await?;

        let bytes = Self::ensure_success(response).await?.bytes().await?;

        tracing::info!("Downloaded {} bytes for job {}", bytes.len(), job_id);
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &str {
        "HTTP"
    }
}
