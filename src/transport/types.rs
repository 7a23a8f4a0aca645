// src/transport/types.rs
// Wire types for the transcription server and transport error definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Server-side job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Detailed progress reported while a job is processing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerProgress {
    /// Pipeline stage (e.g. "splitting_audio", "transcribing")
    pub stage: String,
    pub current_chunk: u32,
    pub total_chunks: u32,
    /// Free-text message meant for the user
    pub message: String,
}

impl ServerProgress {
    pub fn is_transcribing(&self) -> bool {
        self.stage == "transcribing"
    }

    /// Chunk counters are only meaningful with a non-zero total.
    pub fn has_chunks(&self) -> bool {
        self.total_chunks > 0
    }
}

/// Response of `POST /transcribe`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTicket {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Response of `GET /status/{job_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: JobStatus,
    #[serde(default)]
    pub progress: Option<ServerProgress>,
    #[serde(default)]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn processing(progress: Option<ServerProgress>) -> Self {
        Self {
            status: JobStatus::Processing,
            progress,
            error: None,
        }
    }
}

/// Bytes handed to the connection so far during an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_sent: u64,
    pub total_bytes: u64,
}

impl TransferProgress {
    /// Rounded percentage, 0..=100. An empty body counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 100;
        }
        let sent = self.bytes_sent.min(self.total_bytes) as f64;
        ((sent * 100.0) / self.total_bytes as f64).round() as u8
    }
}

/// Transport error types. Messages are kept as strings so tracker state
/// stays comparable and cloneable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Server returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read upload: {0}")]
    Io(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_decode() {
            TransportError::InvalidResponse(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}
