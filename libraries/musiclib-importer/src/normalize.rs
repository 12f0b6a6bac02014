//! Source tag keys → canonical keys

use musiclib_core::{CanonicalKey, TagRecord};
use musiclib_tags::RawTags;

/// Source keys per canonical key, in priority order; matching ignores ASCII case.
const TRANSLATIONS: &[(&str, CanonicalKey)] = &[
    ("TITLE", CanonicalKey::Title),
    ("\u{a9}nam", CanonicalKey::Title),
    ("TIT2", CanonicalKey::Title),
    ("ARTIST", CanonicalKey::Artist),
    ("\u{a9}ART", CanonicalKey::Artist),
    ("TPE1", CanonicalKey::Artist),
    ("TPE2", CanonicalKey::Artist),
    ("ALBUM", CanonicalKey::Album),
    ("\u{a9}alb", CanonicalKey::Album),
    ("TALB", CanonicalKey::Album),
    ("TRACKNUMBER", CanonicalKey::TrackNumber),
    ("trkn", CanonicalKey::TrackNumber),
    ("DISCNUMBER", CanonicalKey::DiscNumber),
    ("DISKNUMBER", CanonicalKey::DiscNumber),
    ("disk", CanonicalKey::DiscNumber),
    ("ARTISTSORT", CanonicalKey::ArtistSort),
    ("soar", CanonicalKey::ArtistSort),
    ("TSO2", CanonicalKey::ArtistSort),
    ("ALBUMSORT", CanonicalKey::AlbumSort),
    ("soal", CanonicalKey::AlbumSort),
    ("TSOA", CanonicalKey::AlbumSort),
];

/// Combined `number/total` fields used when the plain number is absent
const TRACK_TOTAL_KEY: &str = "TRCK";
const DISC_TOTAL_KEY: &str = "TPOS";

/// Leading articles stripped for sort keys, checked in order
const ARTICLES: [&str; 6] = ["A ", "a ", "An ", "an ", "The ", "the "];

/// Maps decoder output onto the canonical schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyNormalizer;

impl KeyNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Translate source keys and derive track/disc numbers and sort keys.
    ///
    /// Paths, format properties and fingerprint are attached by the caller; use
    /// [`KeyNormalizer::check_required`] once the record is otherwise complete.
    pub fn normalize(&self, raw: &RawTags) -> TagRecord {
        let mut record = TagRecord::new();

        for (source, key) in TRANSLATIONS {
            if record.contains(*key) {
                continue;
            }
            if let Some(value) = lookup(raw, source) {
                record.set(*key, value);
            }
        }

        let track = record
            .get_opt(CanonicalKey::TrackNumber)
            .or_else(|| lookup(raw, TRACK_TOTAL_KEY))
            .map(leading_number);
        if let Some(track) = track {
            record.set(CanonicalKey::TrackNumber, track);
        }

        let disc = record
            .get_opt(CanonicalKey::DiscNumber)
            .or_else(|| lookup(raw, DISC_TOTAL_KEY))
            .map(leading_number)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "1".to_string());
        record.set(CanonicalKey::DiscNumber, disc);

        derive_sort_key(&mut record, CanonicalKey::Artist, CanonicalKey::ArtistSort);
        derive_sort_key(&mut record, CanonicalKey::Album, CanonicalKey::AlbumSort);

        if let Some(duration) = &raw.duration {
            record.set(CanonicalKey::Duration, duration.as_str());
        }

        record
    }

    /// Report absent required keys, then fill them with empty values.
    pub fn check_required(&self, record: &mut TagRecord) -> Vec<CanonicalKey> {
        let missing = record.missing_keys();
        record.fill_missing();
        missing
    }
}

fn lookup<'a>(raw: &'a RawTags, source: &str) -> Option<&'a str> {
    raw.get(source).or_else(|| {
        raw.tags
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(source))
            .map(|(_, v)| v.as_str())
    })
}

/// Part before the first `/` of a `number/total` field, trimmed.
fn leading_number(value: &str) -> String {
    value.split('/').next().unwrap_or("").trim().to_string()
}

fn derive_sort_key(record: &mut TagRecord, pure: CanonicalKey, sort: CanonicalKey) {
    if record.contains(sort) {
        return;
    }
    if let Some(value) = record.get_opt(pure) {
        let sorted = sort_value(value).to_string();
        record.set(sort, sorted);
    }
}

/// Strip one leading article (case-sensitive, first match wins).
pub fn sort_value(value: &str) -> &str {
    ARTICLES
        .iter()
        .find_map(|article| value.strip_prefix(article))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawTags {
        let mut raw = RawTags::new();
        for (k, v) in pairs {
            raw.insert(*k, *v);
        }
        raw
    }

    #[test]
    fn test_sort_value_strips_articles() {
        assert_eq!(sort_value("The Beatles"), "Beatles");
        assert_eq!(sort_value("A Tribe"), "Tribe");
        assert_eq!(sort_value("Anomaly"), "Anomaly");
        assert_eq!(sort_value("an Evening"), "Evening");
        assert_eq!(sort_value("THE END"), "THE END");
        assert_eq!(sort_value("Theory"), "Theory");
    }

    #[test]
    fn test_flac_keys() {
        let record = KeyNormalizer::new().normalize(&raw(&[("ARTIST", "Foo"), ("TITLE", "Bar")]));
        assert_eq!(record.get(CanonicalKey::Artist), "Foo");
        assert_eq!(record.get(CanonicalKey::Title), "Bar");
        assert_eq!(record.get(CanonicalKey::ArtistSort), "Foo");
        assert_eq!(record.get(CanonicalKey::DiscNumber), "1");
        assert!(!record.contains(CanonicalKey::TrackNumber));
    }

    #[test]
    fn test_vorbis_keys_ignore_case() {
        let record = KeyNormalizer::new().normalize(&raw(&[
            ("artist", "Foo"),
            ("tracknumber", "4/10"),
            ("discnumber", "2"),
        ]));
        assert_eq!(record.get(CanonicalKey::Artist), "Foo");
        assert_eq!(record.get(CanonicalKey::TrackNumber), "4");
        assert_eq!(record.get(CanonicalKey::DiscNumber), "2");
    }

    #[test]
    fn test_id3_combined_fields() {
        let record = KeyNormalizer::new().normalize(&raw(&[
            ("TPE1", "The Who"),
            ("TALB", "Tommy"),
            ("TRCK", "7/24"),
            ("TPOS", "2/2"),
        ]));
        assert_eq!(record.get(CanonicalKey::TrackNumber), "7");
        assert_eq!(record.get(CanonicalKey::DiscNumber), "2");
        assert_eq!(record.get(CanonicalKey::ArtistSort), "Who");
        assert_eq!(record.get(CanonicalKey::AlbumSort), "Tommy");
    }

    #[test]
    fn test_lead_artist_wins_over_band() {
        let record =
            KeyNormalizer::new().normalize(&raw(&[("TPE2", "Band"), ("TPE1", "Lead")]));
        assert_eq!(record.get(CanonicalKey::Artist), "Lead");
    }

    #[test]
    fn test_native_sort_tag_used_verbatim() {
        let record = KeyNormalizer::new().normalize(&raw(&[
            ("\u{a9}ART", "The The"),
            ("soar", "The The"),
        ]));
        assert_eq!(record.get(CanonicalKey::ArtistSort), "The The");
    }

    #[test]
    fn test_m4a_track_number() {
        let record = KeyNormalizer::new().normalize(&raw(&[("trkn", "5")]));
        assert_eq!(record.get(CanonicalKey::TrackNumber), "5");
    }

    #[test]
    fn test_check_required_reports_and_fills() {
        let normalizer = KeyNormalizer::new();
        let mut record = normalizer.normalize(&raw(&[("TITLE", "Only")]));
        let missing = normalizer.check_required(&mut record);

        assert!(missing.contains(&CanonicalKey::Artist));
        assert!(missing.contains(&CanonicalKey::TrackNumber));
        assert!(!missing.contains(&CanonicalKey::Title));
        assert!(record.missing_keys().is_empty());
        assert_eq!(record.get(CanonicalKey::Artist), "");
    }
}
