use crate::tracker::Document;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to save {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Hands a finished document to the environment.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Returns where the document ended up.
    async fn deliver(&self, document: &Document) -> Result<PathBuf, DeliveryError>;
}

/// Saves documents as `<audio file name>.docx` in a directory.
pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl ArtifactSink for FileSink {
    async fn deliver(&self, document: &Document) -> Result<PathBuf, DeliveryError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| DeliveryError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(document.file_name());
        fs::write(&path, &document.bytes)
            .await
            .map_err(|source| DeliveryError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Saved {} bytes to {}", document.bytes.len(), path.display());
        Ok(path)
    }
}
