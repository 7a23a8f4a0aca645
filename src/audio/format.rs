// src/audio/format.rs
// Audio container formats accepted by the transcription server

use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    M4a,
    Mp3,
    Wav,
    Aac,
    Wma,
    Ogg,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::M4a,
        AudioFormat::Mp3,
        AudioFormat::Wav,
        AudioFormat::Aac,
        AudioFormat::Wma,
        AudioFormat::Ogg,
    ];

    /// Resolve a format from a file extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == ext)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::M4a => "m4a",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
            AudioFormat::Aac => "aac",
            AudioFormat::Wma => "wma",
            AudioFormat::Ogg => "ogg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Aac => "audio/aac",
            AudioFormat::Wma => "audio/x-ms-wma",
            AudioFormat::Ogg => "audio/ogg",
        }
    }

    /// ".m4a, .mp3, .wav, .aac, .wma, .ogg"
    pub fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|format| format!(".{}", format.extension()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}
