//! File identity used to match disk files against persisted songs

use crate::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// How a file's fingerprint is computed.
///
/// One strategy is chosen per run and applied to both the disk scan and the
/// persisted side; mixing strategies makes every file look added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintStrategy {
    /// SHA-256 of the file contents, hex encoded
    #[default]
    ContentHash,
    /// `"<size>-<mtime seconds>"`, no content read
    SizeAndTime,
}

impl FingerprintStrategy {
    /// Fingerprint for `path`, whose full contents are `data`.
    pub fn fingerprint(self, path: &Path, data: &[u8]) -> Result<String> {
        match self {
            FingerprintStrategy::ContentHash => Ok(hash_bytes(data)),
            FingerprintStrategy::SizeAndTime => size_and_time(path),
        }
    }
}

/// SHA-256 of `data`, hex encoded
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// `"<size>-<mtime seconds since epoch>"` from file metadata
pub fn size_and_time(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    Ok(format!("{}-{}", meta.len(), mtime))
}
