pub mod audio;
pub mod config;
pub mod delivery;
pub mod shell;
pub mod tracker;
pub mod transport;

use clap::Parser;
use config::{normalize_server_url, ClientConfig};
use delivery::FileSink;
use shell::Shell;
use std::path::PathBuf;
use std::sync::Arc;
use tracker::{JobRunner, JobTracker, TokioScheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::HttpTransport;

#[derive(Debug, Parser)]
#[command(
    name = "scribe",
    version,
    about = "Send an audio file to a transcription server and save the Word document"
)]
pub struct Cli {
    /// Audio file to transcribe (.m4a, .mp3, .wav, .aac, .wma, .ogg)
    pub file: PathBuf,

    /// Base URL of the transcription server
    #[arg(long)]
    pub server: Option<String>,

    /// Directory the .docx is written to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON config file
    #[arg(long, env = "SCRIBE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print one JSON object per progress update
    #[arg(long)]
    pub json: bool,
}

/// Logs go to stderr so stdout carries only progress lines.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run(cli: Cli) -> anyhow::Result<PathBuf> {
    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(server) = cli.server.as_deref() {
        config.server_url = normalize_server_url(server);
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    tracing::info!(
        "Using server {} (max upload {} bytes)",
        config.server_url,
        config.max_upload_bytes
    );

    let transport = HttpTransport::from_config(&config)?;
    let runner = JobRunner::new(
        JobTracker::from_config(&config),
        Arc::new(transport),
        TokioScheduler,
        config.job_timeout(),
    );
    let sink = FileSink::new(config.output_dir.clone());
    let mut shell = Shell::new(runner, Box::new(sink), cli.json);

    let result = shell.transcribe(&cli.file).await;
    tracing::info!("Transport calls: {}", shell.metrics());
    result
}
