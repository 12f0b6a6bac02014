/// Tag extraction errors
use thiserror::Error;

/// Result type alias using `TagError`
pub type Result<T> = std::result::Result<T, TagError>;

/// Errors raised while decoding a file's embedded metadata
#[derive(Error, Debug)]
pub enum TagError {
    /// The leading magic bytes do not match the expected format
    #[error("Bad magic for {format}: expected {expected:?}, found {found:?}")]
    BadMagic {
        format: &'static str,
        expected: &'static [u8],
        found: Vec<u8>,
    },

    /// A read ran past the end of the region
    #[error("Read of {requested} bytes at offset {offset} exceeds region ({remaining} remaining)")]
    OutOfBounds {
        offset: usize,
        requested: usize,
        remaining: usize,
    },

    /// A structurally valid but unsupported encoding (only duration is lost)
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TagError {
    /// True for errors that mean the file's tags could not be read at all.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnsupportedVariant(_))
    }
}

impl From<TagError> for musiclib_core::LibraryError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Io(io) => musiclib_core::LibraryError::Io(io),
            other => musiclib_core::LibraryError::metadata(other.to_string()),
        }
    }
}
