use super::AudioFormat;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Local checks run before anything is sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Select an audio file before continuing")]
    NoFileSelected,

    #[error("The file cannot exceed {}MB ({} bytes given)", .max_bytes / (1024 * 1024), .size_bytes)]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("Unsupported file format '{extension}'. Supported formats: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },
}

/// An audio file chosen by the user. Only metadata is held; the bytes are
/// read by the transport when the upload starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl AudioFile {
    pub fn new(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        Self {
            path,
            name,
            size_bytes,
        }
    }

    /// Stat a file on disk.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }

        Ok(Self::new(path, metadata.len()))
    }

    pub fn format(&self) -> Option<AudioFormat> {
        AudioFormat::from_path(&self.path)
    }

    /// Size limit first, then the extension whitelist.
    pub fn validate(&self, max_bytes: u64) -> Result<AudioFormat, ValidationError> {
        if self.size_bytes > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size_bytes: self.size_bytes,
                max_bytes,
            });
        }

        self.format().ok_or_else(|| ValidationError::UnsupportedFormat {
            extension: self
                .path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
            supported: AudioFormat::supported_list(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::MAX_UPLOAD_BYTES;

    #[test]
    fn test_name_comes_from_path() {
        let file = AudioFile::new("/data/interview.mp3", 10);
        assert_eq!(file.name, "interview.mp3");
        assert_eq!(file.format(), Some(AudioFormat::Mp3));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let at_limit = AudioFile::new("a.wav", MAX_UPLOAD_BYTES);
        assert_eq!(at_limit.validate(MAX_UPLOAD_BYTES), Ok(AudioFormat::Wav));

        let over = AudioFile::new("a.wav", MAX_UPLOAD_BYTES + 1);
        assert!(matches!(
            over.validate(MAX_UPLOAD_BYTES),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = AudioFile::new("notes.flac", 1024);
        let err = file.validate(MAX_UPLOAD_BYTES).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file format '.flac'. Supported formats: .m4a, .mp3, .wav, .aac, .wma, .ogg"
        );
    }

    #[test]
    fn test_too_large_message() {
        let err = ValidationError::FileTooLarge {
            size_bytes: MAX_UPLOAD_BYTES + 1,
            max_bytes: MAX_UPLOAD_BYTES,
        };
        assert_eq!(
            err.to_string(),
            "The file cannot exceed 100MB (104857601 bytes given)"
        );
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let path = std::env::temp_dir().join("scribe-client-missing-file.mp3");
        assert!(AudioFile::open(&path).await.is_err());
    }
}
