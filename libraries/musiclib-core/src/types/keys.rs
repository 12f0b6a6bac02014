//! Canonical metadata keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed, normalized field names every decoder maps into.
///
/// The serialized form is the camelCase name used in snapshots and logs
/// (`trackNumber`, `relativePath`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalKey {
    Title,
    Artist,
    Album,
    TrackNumber,
    DiscNumber,
    ArtistSort,
    AlbumSort,
    RelativePath,
    BasePath,
    Mime,
    Extension,
    EncodedExtension,
    IsEncoded,
    Flags,
    Duration,
    Fingerprint,
}

impl CanonicalKey {
    /// Every canonical key, in schema order.
    pub const ALL: [CanonicalKey; 16] = [
        CanonicalKey::Title,
        CanonicalKey::Artist,
        CanonicalKey::Album,
        CanonicalKey::TrackNumber,
        CanonicalKey::DiscNumber,
        CanonicalKey::ArtistSort,
        CanonicalKey::AlbumSort,
        CanonicalKey::RelativePath,
        CanonicalKey::BasePath,
        CanonicalKey::Mime,
        CanonicalKey::Extension,
        CanonicalKey::EncodedExtension,
        CanonicalKey::IsEncoded,
        CanonicalKey::Flags,
        CanonicalKey::Duration,
        CanonicalKey::Fingerprint,
    ];

    /// Keys whose absence is reported after normalization.
    ///
    /// Every canonical key is required; the list exists so callers do not
    /// depend on that equivalence.
    pub const REQUIRED: [CanonicalKey; 16] = Self::ALL;

    /// The camelCase name of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalKey::Title => "title",
            CanonicalKey::Artist => "artist",
            CanonicalKey::Album => "album",
            CanonicalKey::TrackNumber => "trackNumber",
            CanonicalKey::DiscNumber => "discNumber",
            CanonicalKey::ArtistSort => "artistSort",
            CanonicalKey::AlbumSort => "albumSort",
            CanonicalKey::RelativePath => "relativePath",
            CanonicalKey::BasePath => "basePath",
            CanonicalKey::Mime => "mime",
            CanonicalKey::Extension => "extension",
            CanonicalKey::EncodedExtension => "encodedExtension",
            CanonicalKey::IsEncoded => "isEncoded",
            CanonicalKey::Flags => "flags",
            CanonicalKey::Duration => "duration",
            CanonicalKey::Fingerprint => "fingerprint",
        }
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalKey {
    type Err = crate::LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| crate::LibraryError::invalid_input(format!("unknown key '{}'", s)))
    }
}
