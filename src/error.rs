use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the file-facing canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to open {}: {source}", path.display())]
    IoOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Point list is truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: u64, found: u64 },

    #[error("Invalid point record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: &'static str },

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Unsupported image format: {0:?}")]
    UnsupportedFormat(String),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

impl CanvasError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoOpen {
            path: path.into(),
            source,
        }
    }
}

/// Result type for operations that touch the file system
pub type CanvasResult<T> = Result<T, CanvasError>;
