use crate::config::ClientConfig;
use crate::transport::ServerProgress;
use std::time::Duration;

/// Delay between status queries. Polls faster while chunks are being
/// transcribed, slower otherwise. No backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollCadence {
    default_interval: Duration,
    transcribing_interval: Duration,
}

impl PollCadence {
    pub fn new(default_interval: Duration, transcribing_interval: Duration) -> Self {
        Self {
            default_interval,
            transcribing_interval,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.poll_interval(), config.transcribing_poll_interval())
    }

    /// `progress` is the one carried by the response just received.
    pub fn next_delay(&self, progress: Option<&ServerProgress>) -> Duration {
        match progress {
            Some(p) if p.is_transcribing() => self.transcribing_interval,
            _ => self.default_interval,
        }
    }
}

impl Default for PollCadence {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000), Duration::from_millis(500))
    }
}
