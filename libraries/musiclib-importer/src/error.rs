//! Error types for the importer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] musiclib_core::LibraryError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_yaml::Error),

    #[error("Invalid file path: {0}")]
    InvalidPath(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl From<ImportError> for musiclib_core::LibraryError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::Storage(inner) => inner,
            ImportError::Io(io) => musiclib_core::LibraryError::Io(io),
            other => musiclib_core::LibraryError::Other(other.to_string()),
        }
    }
}
