//! Extension-based decoder dispatch

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::raw::RawTags;
use crate::{flac, m4a, mp3};
use std::path::Path;
use tracing::debug;

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Flac,
    Mp3,
    M4a,
}

impl AudioFormat {
    /// Every supported format
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Flac, AudioFormat::Mp3, AudioFormat::M4a];

    /// Select a format by file extension (case-insensitive, with or without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        Self::ALL
            .into_iter()
            .find(|format| format.extension()[1..].eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn mime(self) -> &'static str {
        match self {
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::M4a => "audio/mp4",
        }
    }

    /// Canonical extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Flac => ".flac",
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::M4a => ".m4a",
        }
    }

    /// Lossy formats are already encoded and are copied rather than transcoded.
    pub fn is_encoded(self) -> bool {
        !matches!(self, AudioFormat::Flac)
    }

    /// Extension of the encoded copy produced for this format.
    pub fn encoded_extension(self) -> &'static str {
        match self {
            AudioFormat::Flac => ".mp3",
            other => other.extension(),
        }
    }

    /// Run this format's decoder over the full file contents.
    pub fn decode(self, data: &[u8]) -> Result<RawTags> {
        match self {
            AudioFormat::Flac => flac::decode(&mut ByteCursor::new(data)),
            AudioFormat::Mp3 => mp3::decode(data),
            AudioFormat::M4a => m4a::decode(&mut ByteCursor::new(data)),
        }
    }
}

/// Decode `data` with the decoder selected by `path`'s extension.
///
/// Unknown extensions yield an empty record rather than an error.
pub fn extract(path: &Path, data: &[u8]) -> Result<RawTags> {
    match AudioFormat::from_path(path) {
        Some(format) => format.decode(data),
        None => {
            debug!("no decoder for {}", path.display());
            Ok(RawTags::new())
        }
    }
}

/// Read `path` into memory and decode it.
pub fn read_file(path: &Path) -> Result<RawTags> {
    if AudioFormat::from_path(path).is_none() {
        return Ok(RawTags::new());
    }
    let data = std::fs::read(path)?;
    extract(path, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_by_extension() {
        assert_eq!(AudioFormat::from_extension("flac"), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::from_extension(".MP3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::from_path(Path::new("a/b.M4a")), Some(AudioFormat::M4a));
        assert_eq!(AudioFormat::from_extension("ogg"), None);
        assert_eq!(AudioFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn format_properties() {
        assert_eq!(AudioFormat::Flac.mime(), "audio/flac");
        assert!(!AudioFormat::Flac.is_encoded());
        assert_eq!(AudioFormat::Flac.encoded_extension(), ".mp3");
        assert!(AudioFormat::M4a.is_encoded());
        assert_eq!(AudioFormat::M4a.encoded_extension(), ".m4a");
        assert_eq!(AudioFormat::Mp3.encoded_extension(), ".mp3");
    }

    #[test]
    fn unknown_extension_is_empty_not_error() {
        let tags = extract(Path::new("cover.jpg"), b"\xFF\xD8\xFF").unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn known_extension_with_wrong_content_fails() {
        assert!(extract(Path::new("x.flac"), b"not a flac").is_err());
    }
}
