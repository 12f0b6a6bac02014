//! Decoder output

use std::collections::BTreeMap;

/// Source-keyed tags and derived duration for one file, before normalization.
///
/// Keys are exactly as they appear in the file (`ARTIST`, `TPE1`, `©ART`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTags {
    pub tags: BTreeMap<String, String>,
    /// `m:ss`, when the format's duration could be derived
    pub duration: Option<String>,
    /// Non-fatal problems met while decoding
    pub warnings: Vec<String>,
}

impl RawTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.duration.is_none()
    }
}
