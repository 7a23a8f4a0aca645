pub mod file;
pub mod format;

pub use file::{AudioFile, ValidationError};
pub use format::AudioFormat;

/// Largest upload the server accepts (100 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;
