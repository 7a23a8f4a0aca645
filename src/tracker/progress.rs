use crate::transport::ServerProgress;
use serde::Serialize;

pub const INITIALIZING_LABEL: &str = "Initializing...";

/// Progress as the UI should draw it: one percentage and a few lines of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    pub percent: u8,
    pub headline: String,
    pub label: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_caption: Option<String>,
}

impl ProgressView {
    /// Chunk counters win when the server reports a non-zero total; the
    /// upload percentage is used otherwise.
    pub fn compute(
        upload_percent: u8,
        progress: Option<&ServerProgress>,
        uploading: bool,
    ) -> Self {
        let chunk_percent = progress.filter(|p| p.has_chunks()).map(chunk_percent);
        let percent = chunk_percent.unwrap_or(upload_percent);

        let headline = if uploading {
            "Uploading"
        } else if progress.is_some_and(ServerProgress::is_transcribing) {
            "Transcribing"
        } else {
            "Preparing"
        };

        let label = progress
            .and_then(|p| {
                let message = p.message.trim();
                if !message.is_empty() {
                    Some(message.to_string())
                } else if !p.stage.trim().is_empty() {
                    Some(stage_label(p.stage.trim()).to_string())
                } else {
                    None
                }
            })
            .unwrap_or_else(|| INITIALIZING_LABEL.to_string());

        let detail = match chunk_percent {
            Some(percent) => format!("{}%", percent),
            None if upload_percent >= 100 => "Processing...".to_string(),
            None => format!("Uploading: {}%", upload_percent),
        };

        let chunk_caption = progress
            .filter(|p| p.has_chunks() && p.is_transcribing())
            .map(|p| format!("Segment {} of {}", p.current_chunk, p.total_chunks));

        Self {
            percent,
            headline: headline.to_string(),
            label,
            detail,
            chunk_caption,
        }
    }
}

fn chunk_percent(progress: &ServerProgress) -> u8 {
    let ratio = progress.current_chunk as f64 / progress.total_chunks as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Default text for the stages the server is known to report.
pub fn stage_label(stage: &str) -> &'static str {
    match stage {
        "initializing" => "Initializing the process...",
        "loading_model" => "Loading the transcription model...",
        "splitting_audio" => "Splitting the audio into segments...",
        "transcribing" => "Transcribing audio...",
        "formatting" => "Formatting the final document...",
        "creating_document" => "Creating the Word document...",
        _ => "Processing...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(stage: &str, current: u32, total: u32, message: &str) -> ServerProgress {
        ServerProgress {
            stage: stage.to_string(),
            current_chunk: current,
            total_chunks: total,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_chunk_percent() {
        let p = progress("transcribing", 2, 5, "");
        let view = ProgressView::compute(100, Some(&p), false);
        assert_eq!(view.percent, 40);
        assert_eq!(view.detail, "40%");
        assert_eq!(view.chunk_caption.as_deref(), Some("Segment 2 of 5"));
        assert_eq!(view.headline, "Transcribing");
    }

    #[test]
    fn test_chunk_percent_rounds_to_nearest() {
        let p = progress("transcribing", 1, 3, "");
        assert_eq!(ProgressView::compute(0, Some(&p), false).percent, 33);
        let p = progress("transcribing", 2, 3, "");
        assert_eq!(ProgressView::compute(0, Some(&p), false).percent, 67);
    }

    #[test]
    fn test_zero_total_falls_back_to_upload_percent() {
        let p = progress("creating_document", 7, 0, "");
        let view = ProgressView::compute(73, Some(&p), false);
        assert_eq!(view.percent, 73);
        assert_eq!(view.detail, "Uploading: 73%");
        assert!(view.chunk_caption.is_none());
    }

    #[test]
    fn test_chunk_overflow_is_clamped() {
        let p = progress("transcribing", 6, 4, "");
        assert_eq!(ProgressView::compute(0, Some(&p), false).percent, 100);
    }

    #[test]
    fn test_label_prefers_server_message() {
        let p = progress("splitting_audio", 0, 0, "Phase 2/4: splitting");
        let view = ProgressView::compute(100, Some(&p), false);
        assert_eq!(view.label, "Phase 2/4: splitting");
        assert_eq!(view.detail, "Processing...");
        assert_eq!(view.headline, "Preparing");
    }

    #[test]
    fn test_label_falls_back_to_stage_then_placeholder() {
        let p = progress("loading_model", 1, 4, "   ");
        let view = ProgressView::compute(100, Some(&p), false);
        assert_eq!(view.label, "Loading the transcription model...");
        assert!(view.chunk_caption.is_none(), "only transcribing shows segments");

        let p = progress("", 0, 0, "");
        assert_eq!(
            ProgressView::compute(100, Some(&p), false).label,
            INITIALIZING_LABEL
        );
        assert_eq!(ProgressView::compute(12, None, true).label, INITIALIZING_LABEL);
    }

    #[test]
    fn test_uploading_view() {
        let view = ProgressView::compute(12, None, true);
        assert_eq!(view.percent, 12);
        assert_eq!(view.headline, "Uploading");
        assert_eq!(view.detail, "Uploading: 12%");
    }

    #[test]
    fn test_serialized_shape() {
        let view = ProgressView::compute(12, None, true);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["percent"], 12);
        assert!(json.get("chunk_caption").is_none());
    }
}
