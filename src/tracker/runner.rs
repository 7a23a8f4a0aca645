use super::{
    CallMetrics, JobFailure, JobTracker, Operation, ProgressView, Scheduler, SubmissionId,
    TokioScheduler, TrackerCommand, TrackerError, TrackerEvent, TrackerState,
};
use crate::audio::AudioFile;
use crate::transport::{ProgressCallback, TranscriptionTransport, TransferProgress};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// What the UI shell observes after every transition
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSnapshot {
    pub state: TrackerState,
    pub progress: Option<ProgressView>,
}

impl TrackerSnapshot {
    pub fn of(tracker: &JobTracker) -> Self {
        Self {
            state: tracker.state().clone(),
            progress: tracker.progress_view(),
        }
    }
}

/// Executes tracker commands against a transport and a scheduler, one at a
/// time, feeding each outcome back into the tracker.
pub struct JobRunner<S = TokioScheduler> {
    tracker: JobTracker,
    transport: Arc<dyn TranscriptionTransport>,
    scheduler: S,
    metrics: CallMetrics,
    job_timeout: Duration,
    snapshots: watch::Sender<TrackerSnapshot>,
}

impl<S: Scheduler> JobRunner<S> {
    pub fn new(
        tracker: JobTracker,
        transport: Arc<dyn TranscriptionTransport>,
        scheduler: S,
        job_timeout: Duration,
    ) -> Self {
        let (snapshots, _) = watch::channel(TrackerSnapshot::of(&tracker));

        tracing::info!(
            "Job runner ready: transport={}, timeout={}s",
            transport.name(),
            job_timeout.as_secs()
        );

        Self {
            tracker,
            transport,
            scheduler,
            metrics: CallMetrics::new(),
            job_timeout,
            snapshots,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    pub fn state(&self) -> &TrackerState {
        self.tracker.state()
    }

    pub fn metrics(&self) -> &CallMetrics {
        &self.metrics
    }

    pub fn select_file(&mut self, file: AudioFile) {
        self.tracker.select_file(file);
        self.publish();
    }

    /// Submit the selected file and drive the job to a terminal state.
    ///
    /// The whole run, upload included, is bounded by the job timeout.
    pub async fn submit(&mut self) -> Result<&TrackerState, TrackerError> {
        let commands = self.tracker.submit()?;
        self.publish();

        if !commands.is_empty() {
            let timeout = self.job_timeout;
            if tokio::time::timeout(timeout, self.execute(commands))
                .await
                .is_err()
            {
                tracing::error!("Job did not finish within {}s", timeout.as_secs());
                self.tracker.fail(JobFailure::TimedOut(timeout.as_secs()));
                self.publish();
            }
        }

        Ok(self.tracker.state())
    }

    pub fn acknowledge(&mut self) -> bool {
        let reset = self.tracker.acknowledge();
        if reset {
            self.publish();
        }
        reset
    }

    async fn execute(&mut self, commands: Vec<TrackerCommand>) {
        let mut queue: VecDeque<TrackerCommand> = commands.into();

        while let Some(command) = queue.pop_front() {
            let follow_up = match command {
                TrackerCommand::Upload { submission, file } => {
                    self.run_upload(submission, file).await
                }
                TrackerCommand::Poll { job_id, delay } => {
                    self.scheduler.sleep(delay).await;
                    let result = self.transport.query_status(&job_id).await;
                    self.metrics.record(Operation::Status, result.is_ok());
                    self.apply(TrackerEvent::StatusReceived { job_id, result })
                }
                TrackerCommand::Fetch { job_id } => {
                    let result = self.transport.fetch_result(&job_id).await;
                    self.metrics.record(Operation::Fetch, result.is_ok());
                    self.apply(TrackerEvent::ResultFetched { job_id, result })
                }
            };
            queue.extend(follow_up);
        }
    }

    /// Upload while applying progress events as they arrive.
    async fn run_upload(
        &mut self,
        submission: SubmissionId,
        file: AudioFile,
    ) -> Vec<TrackerCommand> {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        let on_progress: ProgressCallback = Box::new(move |progress: TransferProgress| {
            let _ = tx.send(progress.percent());
        });

        let transport = Arc::clone(&self.transport);
        let upload = transport.submit(&file, on_progress);
        tokio::pin!(upload);

        let mut commands = Vec::new();
        let result = loop {
            tokio::select! {
                result = &mut upload => break result,
                Some(percent) = rx.recv() => {
                    commands.extend(self.apply(TrackerEvent::UploadProgress { submission, percent }));
                }
            }
        };

        while let Ok(percent) = rx.try_recv() {
            commands.extend(self.apply(TrackerEvent::UploadProgress {
                submission,
                percent,
            }));
        }

        self.metrics.record(Operation::Submit, result.is_ok());
        commands.extend(self.apply(TrackerEvent::UploadFinished { submission, result }));
        commands
    }

    fn apply(&mut self, event: TrackerEvent) -> Vec<TrackerCommand> {
        let commands = self.tracker.handle(event);
        self.publish();
        commands
    }

    fn publish(&self) {
        self.snapshots.send_replace(TrackerSnapshot::of(&self.tracker));
    }
}
