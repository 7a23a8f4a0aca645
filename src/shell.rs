// src/shell.rs
// Terminal UI shell: forwards intents to the runner and prints what it observes

use crate::audio::AudioFile;
use crate::delivery::ArtifactSink;
use crate::tracker::{CallMetrics, JobRunner, ProgressView, Scheduler, TrackerSnapshot, TrackerState};
use anyhow::Context;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Turns snapshots into output lines, skipping repeats and the idle state.
pub struct SnapshotRenderer {
    json: bool,
    last: Option<String>,
}

impl SnapshotRenderer {
    pub fn new(json: bool) -> Self {
        Self { json, last: None }
    }

    pub fn render(&mut self, snapshot: &TrackerSnapshot) -> Option<String> {
        if matches!(snapshot.state, TrackerState::Idle) {
            return None;
        }

        let line = if self.json {
            json_line(snapshot)
        } else {
            text_line(snapshot)
        };

        if self.last.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last = Some(line.clone());
        Some(line)
    }
}

pub fn text_line(snapshot: &TrackerSnapshot) -> String {
    match (&snapshot.state, &snapshot.progress) {
        (TrackerState::Succeeded(document), _) => format!(
            "Transcript ready: {} ({} bytes)",
            document.file_name(),
            document.bytes.len()
        ),
        (TrackerState::Failed(failure), _) => format!("Error: {}", failure),
        (_, Some(view)) => {
            let mut line = format!(
                "[{:>3}%] {} - {} ({})",
                view.percent, view.headline, view.label, view.detail
            );
            if let Some(caption) = &view.chunk_caption {
                line.push_str(" | ");
                line.push_str(caption);
            }
            line
        }
        (state, None) => state.name().to_string(),
    }
}

#[derive(Serialize)]
struct SnapshotLine<'a> {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    progress: Option<&'a ProgressView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn json_line(snapshot: &TrackerSnapshot) -> String {
    let line = SnapshotLine {
        state: snapshot.state.name(),
        progress: snapshot.progress.as_ref(),
        document: match &snapshot.state {
            TrackerState::Succeeded(document) => Some(document.file_name()),
            _ => None,
        },
        error: match &snapshot.state {
            TrackerState::Failed(failure) => Some(failure.to_string()),
            _ => None,
        },
    };
    serde_json::to_string(&line).unwrap_or_default()
}

pub struct Shell<S: Scheduler> {
    runner: JobRunner<S>,
    sink: Box<dyn ArtifactSink>,
    json: bool,
}

impl<S: Scheduler> Shell<S> {
    pub fn new(runner: JobRunner<S>, sink: Box<dyn ArtifactSink>, json: bool) -> Self {
        Self { runner, sink, json }
    }

    pub fn metrics(&self) -> &CallMetrics {
        self.runner.metrics()
    }

    /// Select the file, submit it, render progress until the job ends,
    /// deliver the document and reset the tracker.
    pub async fn transcribe(&mut self, path: &Path) -> anyhow::Result<PathBuf> {
        let file = AudioFile::open(path)
            .await
            .with_context(|| format!("Cannot open {}", path.display()))?;
        self.runner.select_file(file);

        let mut rx = self.runner.subscribe();
        let json = self.json;
        let renderer = tokio::spawn(async move {
            let mut renderer = SnapshotRenderer::new(json);
            loop {
                let snapshot = rx.borrow_and_update().clone();
                if let Some(line) = renderer.render(&snapshot) {
                    println!("{}", line);
                }
                if snapshot.state.is_terminal() || rx.changed().await.is_err() {
                    break;
                }
            }
        });

        let outcome = match self.runner.submit().await {
            Ok(state) => state.clone(),
            Err(e) => {
                renderer.abort();
                return Err(e.into());
            }
        };

        if let Err(e) = renderer.await {
            tracing::warn!("Progress renderer stopped: {}", e);
        }

        let result: anyhow::Result<PathBuf> = match outcome {
            TrackerState::Succeeded(document) => {
                self.sink.deliver(&document).await.map_err(Into::into)
            }
            TrackerState::Failed(failure) => Err(anyhow::Error::new(failure)),
            other => Err(anyhow::anyhow!("Job stopped in state {}", other.name())),
        };
        self.runner.acknowledge();

        if let Ok(path) = &result {
            println!("Saved transcript to {}", path.display());
        }
        result
    }
}
