use crate::audio::MAX_UPLOAD_BYTES;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TRANSCRIBING_POLL_INTERVAL_MS: u64 = 500;

pub const ENV_SERVER_URL: &str = "SCRIBE_SERVER_URL";
pub const ENV_OUTPUT_DIR: &str = "SCRIBE_OUTPUT_DIR";
pub const ENV_JOB_TIMEOUT_SECS: &str = "SCRIBE_JOB_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SCRIBE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub max_upload_bytes: u64,
    pub job_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub transcribing_poll_interval_ms: u64,
    pub output_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            job_timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            transcribing_poll_interval_ms: DEFAULT_TRANSCRIBING_POLL_INTERVAL_MS,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Defaults, then the JSON file (if any), then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        normalize_config(&mut config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config =
            serde_json::from_str::<ClientConfig>(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        normalize_config(&mut config);
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_SERVER_URL) {
            self.server_url = url;
        }

        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir.trim());
            }
        }

        if let Some(secs) = parse_env_u64(&lookup, ENV_JOB_TIMEOUT_SECS)? {
            self.job_timeout_secs = secs;
        }

        if let Some(secs) = parse_env_u64(&lookup, ENV_REQUEST_TIMEOUT_SECS)? {
            self.request_timeout_secs = secs;
        }

        normalize_config(self);
        Ok(())
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn transcribing_poll_interval(&self) -> Duration {
        Duration::from_millis(self.transcribing_poll_interval_ms)
    }
}

pub fn normalize_server_url(input: &str) -> String {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_SERVER_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_env_u64<F>(lookup: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value }),
    }
}

fn normalize_config(config: &mut ClientConfig) {
    config.server_url = normalize_server_url(&config.server_url);
    if config.max_upload_bytes == 0 {
        config.max_upload_bytes = MAX_UPLOAD_BYTES;
    }
    if config.job_timeout_secs == 0 {
        config.job_timeout_secs = DEFAULT_JOB_TIMEOUT_SECS;
    }
    if config.request_timeout_secs == 0 {
        config.request_timeout_secs = DEFAULT_REQUEST_TIMEOUT_SECS;
    }
    if config.poll_interval_ms == 0 {
        config.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
    }
    if config.transcribing_poll_interval_ms == 0 {
        config.transcribing_poll_interval_ms = DEFAULT_TRANSCRIBING_POLL_INTERVAL_MS;
    }
    if config.output_dir.as_os_str().is_empty() {
        config.output_dir = PathBuf::from(".");
    }
}
