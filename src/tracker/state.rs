use crate::audio::ValidationError;
use crate::transport::{JobStatus, ServerProgress, TransportError};
use std::fmt;
use thiserror::Error;

/// Shown when the server marks a job failed without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Transcription failed";

/// Identifies one submit attempt, before the server has assigned a job id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmissionId(pub(crate) u64);

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The finished artifact returned by the server
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    /// Name of the uploaded audio file
    pub source_name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    /// The server produces a Word document named after the audio file.
    pub fn file_name(&self) -> String {
        format!("{}.docx", self.source_name)
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("source_name", &self.source_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Why a job ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Upload failed: {0}")]
    Upload(TransportError),

    #[error("Error checking job status: {0}")]
    StatusCheck(TransportError),

    #[error("Error downloading the transcript: {0}")]
    Download(TransportError),

    #[error("{0}")]
    ServerReported(String),

    #[error("Transcription did not finish within {0} seconds")]
    TimedOut(u64),
}

/// What the UI renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrackerState {
    #[default]
    Idle,
    Uploading {
        percent: u8,
    },
    Polling {
        status: JobStatus,
        progress: Option<ServerProgress>,
    },
    Succeeded(Document),
    Failed(JobFailure),
}

impl TrackerState {
    /// Uploading or Polling
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TrackerState::Uploading { .. } | TrackerState::Polling { .. }
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackerState::Succeeded(_) | TrackerState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrackerState::Idle => "idle",
            TrackerState::Uploading { .. } => "uploading",
            TrackerState::Polling { .. } => "polling",
            TrackerState::Succeeded(_) => "succeeded",
            TrackerState::Failed(_) => "failed",
        }
    }
}

/// Client-side view of the upload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadState {
    pub percent: u8,
}

/// Intents the tracker refuses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error("A transcription job is already running")]
    JobActive,

    #[error("Acknowledge the previous result before submitting again")]
    Unacknowledged,
}
