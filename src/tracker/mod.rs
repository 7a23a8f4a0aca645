// src/tracker/mod.rs
// Job tracker - owns the lifecycle of one transcription job

use crate::audio::{AudioFile, ValidationError};
use crate::config::ClientConfig;
use crate::transport::{JobStatus, JobTicket, ServerProgress, StatusReport, TransportError};
use std::time::Duration;

pub mod cadence;
pub mod metrics;
pub mod progress;
pub mod runner;
pub mod scheduler;
pub mod state;

pub use cadence::PollCadence;
pub use metrics::{CallMetrics, Operation};
pub use progress::ProgressView;
pub use runner::{JobRunner, TrackerSnapshot};
pub use scheduler::{Scheduler, TokioScheduler};
pub use state::{
    Document, JobFailure, SubmissionId, TrackerError, TrackerState, UploadState,
    DEFAULT_FAILURE_MESSAGE,
};

/// Results of work the tracker asked for, fed back in by the runner.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    UploadProgress {
        submission: SubmissionId,
        percent: u8,
    },
    UploadFinished {
        submission: SubmissionId,
        result: Result<JobTicket, TransportError>,
    },
    StatusReceived {
        job_id: String,
        result: Result<StatusReport, TransportError>,
    },
    ResultFetched {
        job_id: String,
        result: Result<Vec<u8>, TransportError>,
    },
}

/// Work the runner must carry out on the tracker's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCommand {
    Upload {
        submission: SubmissionId,
        file: AudioFile,
    },
    /// Wait `delay`, then query the job status once.
    Poll { job_id: String, delay: Duration },
    Fetch { job_id: String },
}

/// State machine `Idle -> Uploading -> Polling -> {Succeeded | Failed} -> Idle`.
///
/// Transitions are synchronous; network calls and timers are expressed as
/// [`TrackerCommand`]s and their outcomes come back as [`TrackerEvent`]s.
/// Events that do not belong to the current submission or job are dropped.
pub struct JobTracker {
    state: TrackerState,
    selected: Option<AudioFile>,
    max_upload_bytes: u64,
    cadence: PollCadence,
    next_submission: u64,
    submission: Option<SubmissionId>,
    job_id: Option<String>,
    source_name: String,
    upload: UploadState,
    last_progress: Option<ServerProgress>,
    poll_in_flight: bool,
    fetch_in_flight: bool,
}

impl JobTracker {
    pub fn new(max_upload_bytes: u64, cadence: PollCadence) -> Self {
        Self {
            state: TrackerState::Idle,
            selected: None,
            max_upload_bytes,
            cadence,
            next_submission: 1,
            submission: None,
            job_id: None,
            source_name: String::new(),
            upload: UploadState::default(),
            last_progress: None,
            poll_in_flight: false,
            fetch_in_flight: false,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.max_upload_bytes, PollCadence::from_config(config))
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Set only between a successful upload and the terminal state.
    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn selected_file(&self) -> Option<&AudioFile> {
        self.selected.as_ref()
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    pub fn last_progress(&self) -> Option<&ServerProgress> {
        self.last_progress.as_ref()
    }

    /// `None` unless a job is uploading or polling.
    pub fn progress_view(&self) -> Option<ProgressView> {
        match &self.state {
            TrackerState::Uploading { percent } => {
                Some(ProgressView::compute(*percent, None, true))
            }
            TrackerState::Polling { progress, .. } => Some(ProgressView::compute(
                self.upload.percent,
                progress.as_ref(),
                false,
            )),
            _ => None,
        }
    }

    /// The choice only matters for the next submit; a running job keeps its file.
    pub fn select_file(&mut self, file: AudioFile) {
        tracing::debug!("Selected {} ({} bytes)", file.name, file.size_bytes);
        self.selected = Some(file);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Start a job for the selected file.
    ///
    /// Refused with no side effects while a job is active or a terminal
    /// result is waiting to be acknowledged. Validation failures move the
    /// tracker straight to `Failed` and produce no commands.
    pub fn submit(&mut self) -> Result<Vec<TrackerCommand>, TrackerError> {
        if self.state.is_active() {
            tracing::warn!("Submit ignored: job already {}", self.state.name());
            return Err(TrackerError::JobActive);
        }
        if self.state.is_terminal() {
            return Err(TrackerError::Unacknowledged);
        }

        let Some(file) = self.selected.clone() else {
            self.enter_failed(ValidationError::NoFileSelected.into());
            return Ok(Vec::new());
        };

        if let Err(e) = file.validate(self.max_upload_bytes) {
            self.enter_failed(e.into());
            return Ok(Vec::new());
        }

        let submission = SubmissionId(self.next_submission);
        self.next_submission += 1;
        self.submission = Some(submission);
        self.source_name = file.name.clone();
        self.upload = UploadState::default();
        self.last_progress = None;
        self.state = TrackerState::Uploading { percent: 0 };

        tracing::info!("Submission {} started for {}", submission, file.name);
        Ok(vec![TrackerCommand::Upload { submission, file }])
    }

    pub fn handle(&mut self, event: TrackerEvent) -> Vec<TrackerCommand> {
        match event {
            TrackerEvent::UploadProgress {
                submission,
                percent,
            } => {
                self.on_upload_progress(submission, percent);
                Vec::new()
            }
            TrackerEvent::UploadFinished { submission, result } => {
                self.on_upload_finished(submission, result)
            }
            TrackerEvent::StatusReceived { job_id, result } => {
                self.on_status_received(&job_id, result)
            }
            TrackerEvent::ResultFetched { job_id, result } => {
                self.on_result_fetched(&job_id, result);
                Vec::new()
            }
        }
    }

    /// Fail the active job from outside (e.g. the overall timeout). Returns
    /// false when nothing was active.
    pub fn fail(&mut self, failure: JobFailure) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.enter_failed(failure);
        true
    }

    /// Leave a terminal state. Returns false when there was nothing to
    /// acknowledge.
    pub fn acknowledge(&mut self) -> bool {
        if !self.state.is_terminal() {
            return false;
        }
        self.state = TrackerState::Idle;
        self.job_id = None;
        self.submission = None;
        self.upload = UploadState::default();
        self.last_progress = None;
        self.source_name.clear();
        true
    }

    fn is_current_submission(&self, submission: SubmissionId) -> bool {
        self.submission == Some(submission) && matches!(self.state, TrackerState::Uploading { .. })
    }

    fn is_current_job(&self, job_id: &str) -> bool {
        self.job_id.as_deref() == Some(job_id)
            && matches!(self.state, TrackerState::Polling { .. })
    }

    fn on_upload_progress(&mut self, submission: SubmissionId, percent: u8) {
        if !self.is_current_submission(submission) {
            tracing::debug!("Dropping progress for stale submission {}", submission);
            return;
        }
        let percent = percent.min(100);
        self.upload.percent = percent;
        self.state = TrackerState::Uploading { percent };
    }

    fn on_upload_finished(
        &mut self,
        submission: SubmissionId,
        result: Result<JobTicket, TransportError>,
    ) -> Vec<TrackerCommand> {
        if !self.is_current_submission(submission) {
            tracing::debug!("Dropping upload result for stale submission {}", submission);
            return Vec::new();
        }
        self.submission = None;

        match result {
            Ok(ticket) => {
                tracing::info!(
                    "Submission {} accepted as job {} (upload {}%)",
                    submission,
                    ticket.job_id,
                    self.upload.percent
                );
                self.job_id = Some(ticket.job_id.clone());
                self.state = TrackerState::Polling {
                    status: ticket.status.unwrap_or(JobStatus::Pending),
                    progress: None,
                };
                self.poll_in_flight = true;
                vec![TrackerCommand::Poll {
                    job_id: ticket.job_id,
                    delay: Duration::ZERO,
                }]
            }
            Err(e) => {
                self.enter_failed(JobFailure::Upload(e));
                Vec::new()
            }
        }
    }

    fn on_status_received(
        &mut self,
        job_id: &str,
        result: Result<StatusReport, TransportError>,
    ) -> Vec<TrackerCommand> {
        if !self.is_current_job(job_id) || !self.poll_in_flight {
            tracing::debug!("Dropping status response for inactive job {}", job_id);
            return Vec::new();
        }
        self.poll_in_flight = false;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                // A failed poll ends the job; there is no retry.
                self.enter_failed(JobFailure::StatusCheck(e));
                return Vec::new();
            }
        };

        let delay = self.cadence.next_delay(report.progress.as_ref());
        if let Some(progress) = report.progress {
            self.last_progress = Some(progress);
        }

        match report.status {
            JobStatus::Pending | JobStatus::Processing => {
                self.state = TrackerState::Polling {
                    status: report.status,
                    progress: self.last_progress.clone(),
                };
                self.poll_in_flight = true;
                tracing::debug!("Job {} {}, next poll in {:?}", job_id, report.status, delay);
                vec![TrackerCommand::Poll {
                    job_id: job_id.to_string(),
                    delay,
                }]
            }
            JobStatus::Completed => {
                self.state = TrackerState::Polling {
                    status: JobStatus::Completed,
                    progress: self.last_progress.clone(),
                };
                self.fetch_in_flight = true;
                tracing::info!("Job {} completed, fetching result", job_id);
                vec![TrackerCommand::Fetch {
                    job_id: job_id.to_string(),
                }]
            }
            JobStatus::Failed => {
                let reason = report
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
                self.enter_failed(JobFailure::ServerReported(reason));
                Vec::new()
            }
        }
    }

    fn on_result_fetched(&mut self, job_id: &str, result: Result<Vec<u8>, TransportError>) {
        if !self.is_current_job(job_id) || !self.fetch_in_flight {
            tracing::debug!("Dropping download for inactive job {}", job_id);
            return;
        }

        match result {
            Ok(bytes) => {
                let document = Document {
                    source_name: self.source_name.clone(),
                    bytes,
                };
                tracing::info!(
                    "Job {} finished: {} ({} bytes)",
                    job_id,
                    document.file_name(),
                    document.bytes.len()
                );
                self.end_job();
                self.state = TrackerState::Succeeded(document);
            }
            Err(e) => self.enter_failed(JobFailure::Download(e)),
        }
    }

    fn enter_failed(&mut self, failure: JobFailure) {
        tracing::warn!("Job failed: {}", failure);
        self.end_job();
        self.state = TrackerState::Failed(failure);
    }

    fn end_job(&mut self) {
        self.job_id = None;
        self.submission = None;
        self.poll_in_flight = false;
        self.fetch_in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MAX_UPLOAD_BYTES;

    fn tracker() -> JobTracker {
        JobTracker::new(MAX_UPLOAD_BYTES, PollCadence::default())
    }

    fn processing(stage: &str, current: u32, total: u32) -> StatusReport {
        StatusReport::processing(Some(ServerProgress {
            stage: stage.to_string(),
            current_chunk: current,
            total_chunks: total,
            message: String::new(),
        }))
    }

    fn status(status: JobStatus, error: Option<&str>) -> StatusReport {
        StatusReport {
            status,
            progress: None,
            error: error.map(str::to_string),
        }
    }

    /// Select + submit + upload success; returns the submission and the
    /// first poll command.
    fn start_polling(tracker: &mut JobTracker, job_id: &str) -> (SubmissionId, TrackerCommand) {
        tracker.select_file(AudioFile::new("/tmp/call.mp3", 4096));
        let commands = tracker.submit().unwrap();
        let submission = match commands.as_slice() {
            [TrackerCommand::Upload { submission, .. }] => *submission,
            other => panic!("expected upload, got {:?}", other),
        };
        let mut next = tracker.handle(TrackerEvent::UploadFinished {
            submission,
            result: Ok(JobTicket {
                job_id: job_id.to_string(),
                status: Some(JobStatus::Processing),
            }),
        });
        assert_eq!(next.len(), 1);
        (submission, next.remove(0))
    }

    fn respond(tracker: &mut JobTracker, job_id: &str, report: StatusReport) -> Vec<TrackerCommand> {
        tracker.handle(TrackerEvent::StatusReceived {
            job_id: job_id.to_string(),
            result: Ok(report),
        })
    }

    #[test]
    fn test_oversized_file_fails_without_commands() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/long.wav", MAX_UPLOAD_BYTES + 1));

        let commands = tracker.submit().unwrap();

        assert!(commands.is_empty(), "no transport call may be issued");
        assert!(matches!(
            tracker.state(),
            TrackerState::Failed(JobFailure::Validation(ValidationError::FileTooLarge { .. }))
        ));
        assert_eq!(tracker.job_id(), None);
    }

    #[test]
    fn test_submit_without_file() {
        let mut tracker = tracker();
        assert!(tracker.submit().unwrap().is_empty());
        assert_eq!(
            tracker.state(),
            &TrackerState::Failed(JobFailure::Validation(ValidationError::NoFileSelected))
        );
    }

    #[test]
    fn test_unsupported_extension_fails_locally() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/slides.pdf", 10));
        assert!(tracker.submit().unwrap().is_empty());
        assert!(matches!(
            tracker.state(),
            TrackerState::Failed(JobFailure::Validation(ValidationError::UnsupportedFormat { .. }))
        ));
    }

    #[test]
    fn test_upload_success_polls_immediately() {
        let mut tracker = tracker();
        let (_, first_poll) = start_polling(&mut tracker, "job-1");

        assert_eq!(
            first_poll,
            TrackerCommand::Poll {
                job_id: "job-1".to_string(),
                delay: Duration::ZERO
            }
        );
        assert_eq!(tracker.job_id(), Some("job-1"));
        assert_eq!(
            tracker.state(),
            &TrackerState::Polling {
                status: JobStatus::Processing,
                progress: None
            }
        );
    }

    #[test]
    fn test_upload_progress_updates_state() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/call.ogg", 100));
        let submission = match tracker.submit().unwrap().remove(0) {
            TrackerCommand::Upload { submission, .. } => submission,
            other => panic!("unexpected {:?}", other),
        };

        tracker.handle(TrackerEvent::UploadProgress {
            submission,
            percent: 42,
        });

        assert_eq!(tracker.state(), &TrackerState::Uploading { percent: 42 });
        assert_eq!(tracker.progress_view().unwrap().detail, "Uploading: 42%");
    }

    #[test]
    fn test_upload_failure_is_terminal() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/call.ogg", 100));
        let submission = match tracker.submit().unwrap().remove(0) {
            TrackerCommand::Upload { submission, .. } => submission,
            other => panic!("unexpected {:?}", other),
        };

        let commands = tracker.handle(TrackerEvent::UploadFinished {
            submission,
            result: Err(TransportError::Http {
                status: 400,
                message: "Unsupported format".to_string(),
            }),
        });

        assert!(commands.is_empty());
        assert_eq!(
            tracker.state().clone(),
            TrackerState::Failed(JobFailure::Upload(TransportError::Http {
                status: 400,
                message: "Unsupported format".to_string()
            }))
        );
        assert_eq!(tracker.job_id(), None);
    }

    #[test]
    fn test_cadence_follows_stage() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");

        let next = respond(&mut tracker, "job-1", processing("transcribing", 1, 4));
        assert_eq!(
            next,
            vec![TrackerCommand::Poll {
                job_id: "job-1".to_string(),
                delay: Duration::from_millis(500)
            }]
        );

        let next = respond(&mut tracker, "job-1", processing("formatting", 4, 4));
        assert_eq!(
            next,
            vec![TrackerCommand::Poll {
                job_id: "job-1".to_string(),
                delay: Duration::from_millis(1000)
            }]
        );
    }

    #[test]
    fn test_processing_without_progress_keeps_last_known() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", processing("transcribing", 2, 4));

        let next = respond(&mut tracker, "job-1", StatusReport::processing(None));

        assert_eq!(
            next,
            vec![TrackerCommand::Poll {
                job_id: "job-1".to_string(),
                delay: Duration::from_millis(1000)
            }]
        );
        assert_eq!(tracker.last_progress().unwrap().current_chunk, 2);
        assert_eq!(tracker.progress_view().unwrap().percent, 50);
    }

    #[test]
    fn test_pending_keeps_polling() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        let next = respond(&mut tracker, "job-1", status(JobStatus::Pending, None));
        assert!(matches!(next.as_slice(), [TrackerCommand::Poll { .. }]));
    }

    #[test]
    fn test_zero_total_chunks_uses_upload_percent() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/call.mp3", 4096));
        let submission = match tracker.submit().unwrap().remove(0) {
            TrackerCommand::Upload { submission, .. } => submission,
            other => panic!("unexpected {:?}", other),
        };
        tracker.handle(TrackerEvent::UploadProgress {
            submission,
            percent: 88,
        });
        tracker.handle(TrackerEvent::UploadFinished {
            submission,
            result: Ok(JobTicket {
                job_id: "job-1".to_string(),
                status: None,
            }),
        });

        respond(&mut tracker, "job-1", processing("initializing", 3, 0));

        assert_eq!(tracker.upload_state().percent, 88);
        assert_eq!(tracker.progress_view().unwrap().percent, 88);
    }

    #[test]
    fn test_chunk_progress_percent() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", processing("transcribing", 2, 5));
        assert_eq!(tracker.progress_view().unwrap().percent, 40);
    }

    #[test]
    fn test_completed_fetches_exactly_once() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", processing("splitting_audio", 2, 4));

        let next = respond(&mut tracker, "job-1", status(JobStatus::Completed, None));
        assert_eq!(
            next,
            vec![TrackerCommand::Fetch {
                job_id: "job-1".to_string()
            }]
        );

        // A duplicate completed response must not trigger a second fetch.
        let again = respond(&mut tracker, "job-1", status(JobStatus::Completed, None));
        assert!(again.is_empty());

        tracker.handle(TrackerEvent::ResultFetched {
            job_id: "job-1".to_string(),
            result: Ok(b"PK\x03\x04".to_vec()),
        });

        match tracker.state() {
            TrackerState::Succeeded(doc) => {
                assert_eq!(doc.file_name(), "call.mp3.docx");
                assert_eq!(doc.bytes, b"PK\x03\x04".to_vec());
            }
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(tracker.job_id(), None, "job id cleared on terminal state");

        // Late duplicate download is ignored, state unchanged.
        tracker.handle(TrackerEvent::ResultFetched {
            job_id: "job-1".to_string(),
            result: Err(TransportError::Timeout),
        });
        assert!(matches!(tracker.state(), TrackerState::Succeeded(_)));
    }

    #[test]
    fn test_fetch_failure_is_terminal_without_repoll() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", status(JobStatus::Completed, None));

        let next = tracker.handle(TrackerEvent::ResultFetched {
            job_id: "job-1".to_string(),
            result: Err(TransportError::Http {
                status: 400,
                message: "File not ready".to_string(),
            }),
        });

        assert!(next.is_empty());
        assert!(matches!(
            tracker.state(),
            TrackerState::Failed(JobFailure::Download(_))
        ));
    }

    #[test]
    fn test_server_failure_uses_reported_error() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", status(JobStatus::Failed, Some("decode error")));

        match tracker.state() {
            TrackerState::Failed(failure) => assert_eq!(failure.to_string(), "decode error"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_server_failure_without_error_uses_default() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", status(JobStatus::Failed, None));

        assert_eq!(
            tracker.state(),
            &TrackerState::Failed(JobFailure::ServerReported(
                DEFAULT_FAILURE_MESSAGE.to_string()
            ))
        );
    }

    #[test]
    fn test_poll_transport_error_is_fatal() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");

        let next = tracker.handle(TrackerEvent::StatusReceived {
            job_id: "job-1".to_string(),
            result: Err(TransportError::Network("connection reset".to_string())),
        });

        assert!(next.is_empty(), "poll errors are not retried");
        assert!(matches!(
            tracker.state(),
            TrackerState::Failed(JobFailure::StatusCheck(TransportError::Network(_)))
        ));
    }

    #[test]
    fn test_second_submit_rejected_while_active() {
        let mut tracker = tracker();
        tracker.select_file(AudioFile::new("/tmp/call.mp3", 4096));
        tracker.submit().unwrap();
        let uploading = tracker.state().clone();

        assert_eq!(tracker.submit(), Err(TrackerError::JobActive));
        assert_eq!(tracker.state(), &uploading);

        let mut tracker = self::tracker();
        start_polling(&mut tracker, "job-1");
        let polling = tracker.state().clone();

        assert_eq!(tracker.submit(), Err(TrackerError::JobActive));
        assert_eq!(tracker.state(), &polling);
        assert_eq!(tracker.job_id(), Some("job-1"));
    }

    #[test]
    fn test_submit_after_terminal_requires_acknowledge() {
        let mut tracker = tracker();
        assert!(tracker.submit().unwrap().is_empty());
        assert_eq!(tracker.submit(), Err(TrackerError::Unacknowledged));

        assert!(tracker.acknowledge());
        assert_eq!(tracker.state(), &TrackerState::Idle);
        assert!(!tracker.acknowledge(), "idle has nothing to acknowledge");
    }

    #[test]
    fn test_stale_status_after_fail_is_ignored() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");

        assert!(tracker.fail(JobFailure::TimedOut(3600)));
        let next = respond(&mut tracker, "job-1", processing("transcribing", 1, 2));

        assert!(next.is_empty());
        assert_eq!(tracker.state(), &TrackerState::Failed(JobFailure::TimedOut(3600)));
    }

    #[test]
    fn test_old_job_events_ignored_after_new_submit() {
        let mut tracker = tracker();
        let (old_submission, _) = start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", status(JobStatus::Failed, None));
        tracker.acknowledge();

        let (_, _) = start_polling(&mut tracker, "job-2");

        assert!(respond(&mut tracker, "job-1", status(JobStatus::Completed, None)).is_empty());
        assert!(tracker
            .handle(TrackerEvent::UploadProgress {
                submission: old_submission,
                percent: 5
            })
            .is_empty());
        assert_eq!(tracker.job_id(), Some("job-2"));
        assert!(matches!(tracker.state(), TrackerState::Polling { .. }));
    }

    #[test]
    fn test_acknowledge_clears_progress() {
        let mut tracker = tracker();
        start_polling(&mut tracker, "job-1");
        respond(&mut tracker, "job-1", processing("transcribing", 1, 2));
        respond(&mut tracker, "job-1", status(JobStatus::Failed, Some("boom")));

        assert!(tracker.acknowledge());
        assert!(tracker.last_progress().is_none());
        assert_eq!(tracker.upload_state(), UploadState::default());
        assert!(tracker.progress_view().is_none());
        assert!(tracker.selected_file().is_some(), "selection survives reset");
    }

    #[test]
    fn test_fail_when_idle_is_noop() {
        let mut tracker = tracker();
        assert!(!tracker.fail(JobFailure::TimedOut(1)));
        assert_eq!(tracker.state(), &TrackerState::Idle);
    }
}
