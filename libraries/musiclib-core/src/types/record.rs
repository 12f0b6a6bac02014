//! Flat, canonical tag records

use super::{CanonicalKey, SongId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from canonical key to string value for one audio file.
///
/// Records produced by a disk scan have no `id`; records flattened out of a
/// persisted catalog carry the song id they were read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SongId>,

    #[serde(flatten)]
    fields: BTreeMap<CanonicalKey, String>,
}

impl TagRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `key`, or `""` when absent.
    pub fn get(&self, key: CanonicalKey) -> &str {
        self.fields.get(&key).map(String::as_str).unwrap_or("")
    }

    /// Value for `key` if present (an empty value still counts as present).
    pub fn get_opt(&self, key: CanonicalKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn set(&mut self, key: CanonicalKey, value: impl Into<String>) {
        self.fields.insert(key, value.into());
    }

    pub fn contains(&self, key: CanonicalKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn remove(&mut self, key: CanonicalKey) -> Option<String> {
        self.fields.remove(&key)
    }

    /// Required keys not present in the record.
    pub fn missing_keys(&self) -> Vec<CanonicalKey> {
        CanonicalKey::REQUIRED
            .iter()
            .copied()
            .filter(|key| !self.fields.contains_key(key))
            .collect()
    }

    /// Insert an empty value for every canonical key that is absent.
    pub fn fill_missing(&mut self) {
        for key in CanonicalKey::ALL {
            self.fields.entry(key).or_default();
        }
    }

    /// Iterate over `(key, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn fingerprint(&self) -> &str {
        self.get(CanonicalKey::Fingerprint)
    }

    pub fn relative_path(&self) -> &str {
        self.get(CanonicalKey::RelativePath)
    }

    /// Parsed track number; `0` when the value is absent or not a number.
    pub fn track_number(&self) -> u32 {
        self.get(CanonicalKey::TrackNumber).trim().parse().unwrap_or(0)
    }

    /// Parsed disc number; `1` when the value is absent or not a number.
    pub fn disc_number(&self) -> u32 {
        self.get(CanonicalKey::DiscNumber).trim().parse().unwrap_or(1)
    }

    pub fn is_encoded(&self) -> bool {
        self.get(CanonicalKey::IsEncoded) == "true"
    }
}

/// Sort a record collection into its canonical order (relative path, then
/// fingerprint), so two scans of the same tree compare equal.
pub fn sort_records(records: &mut [TagRecord]) {
    records.sort_by(|a, b| {
        a.relative_path()
            .cmp(b.relative_path())
            .then_with(|| a.fingerprint().cmp(b.fingerprint()))
    });
}
