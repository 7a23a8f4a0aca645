// src/transport/mod.rs
// Transport - the three calls made against the transcription server

mod http;
mod types;

pub use http::HttpTransport;
pub use types::{
    JobStatus, JobTicket, ServerProgress, StatusReport, TransferProgress, TransportError,
};

use crate::audio::AudioFile;
use async_trait::async_trait;

/// Invoked as upload bytes are handed to the connection.
pub type ProgressCallback = Box<dyn Fn(TransferProgress) + Send + Sync>;

/// Unified transport trait. Implementations never retry and never interpret
/// job status; that belongs to the tracker.
#[async_trait]
pub trait TranscriptionTransport: Send + Sync {
    /// Upload the file and start a job
    async fn submit(
        &self,
        file: &AudioFile,
        on_progress: ProgressCallback,
    ) -> Result<JobTicket, TransportError>;

    /// Single status query
    async fn query_status(&self, job_id: &str) -> Result<StatusReport, TransportError>;

    /// Download the finished document
    async fn fetch_result(&self, job_id: &str) -> Result<Vec<u8>, TransportError>;

    /// Transport name for logs
    fn name(&self) -> &str;
}
