//! Artist → Album → Song catalog tree

use super::{CanonicalKey, TagRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type ArtistId = i64;
pub type AlbumId = i64;
pub type SongId = i64;

/// The whole library, keyed by artist name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub artists: BTreeMap<String, Artist>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Total number of songs across every artist and album.
    pub fn song_count(&self) -> usize {
        self.songs().count()
    }

    pub fn album_count(&self) -> usize {
        self.artists.values().map(|a| a.albums.len()).sum()
    }

    /// Iterate over every song together with its owning artist and album.
    pub fn songs(&self) -> impl Iterator<Item = (&Artist, &Album, &Song)> {
        self.artists.values().flat_map(|artist| {
            artist
                .albums
                .values()
                .flat_map(move |album| album.songs.iter().map(move |song| (artist, album, song)))
        })
    }
}

/// An artist and the albums it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<ArtistId>,
    pub name: String,
    pub sort_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub albums: BTreeMap<String, Album>,
}

impl Artist {
    pub fn new(name: impl Into<String>, sort_name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            sort_name: sort_name.into(),
            albums: BTreeMap::new(),
        }
    }
}

/// An album and its ordered songs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: Option<AlbumId>,
    pub title: String,
    pub sort_title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub songs: Vec<Song>,
}

impl Album {
    pub fn new(title: impl Into<String>, sort_title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            sort_title: sort_title.into(),
            songs: Vec::new(),
        }
    }

    /// Stable sort by `(disc_number, track_number)`; ties keep insertion order.
    pub fn sort_songs(&mut self) {
        self.songs
            .sort_by_key(|song| (song.disc_number, song.track_number));
    }
}

/// A single audio file in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: Option<SongId>,
    pub title: String,
    pub track_number: u32,
    pub disc_number: u32,
    pub duration: String,
    pub flags: String,
    pub relative_path: String,
    pub base_path: String,
    pub mime: String,
    pub extension: String,
    pub encoded_extension: String,
    pub is_encoded: bool,
    pub fingerprint: String,
    /// Fingerprint of the source the current encoded copies were produced from
    pub encoded_source: Option<String>,
}

impl Song {
    /// Build a song from the song-level fields of a canonical record.
    pub fn from_record(record: &TagRecord) -> Self {
        Self {
            id: record.id,
            title: record.get(CanonicalKey::Title).to_string(),
            track_number: record.track_number(),
            disc_number: record.disc_number(),
            duration: record.get(CanonicalKey::Duration).to_string(),
            flags: record.get(CanonicalKey::Flags).to_string(),
            relative_path: record.get(CanonicalKey::RelativePath).to_string(),
            base_path: record.get(CanonicalKey::BasePath).to_string(),
            mime: record.get(CanonicalKey::Mime).to_string(),
            extension: record.get(CanonicalKey::Extension).to_string(),
            encoded_extension: record.get(CanonicalKey::EncodedExtension).to_string(),
            is_encoded: record.is_encoded(),
            fingerprint: record.get(CanonicalKey::Fingerprint).to_string(),
            encoded_source: None,
        }
    }

    /// Rebuild the full canonical record for this song.
    pub fn to_record(&self, artist: &Artist, album: &Album) -> TagRecord {
        let mut record = TagRecord::new();
        record.id = self.id;
        record.set(CanonicalKey::Title, self.title.as_str());
        record.set(CanonicalKey::Artist, artist.name.as_str());
        record.set(CanonicalKey::Album, album.title.as_str());
        record.set(CanonicalKey::TrackNumber, self.track_number.to_string());
        record.set(CanonicalKey::DiscNumber, self.disc_number.to_string());
        record.set(CanonicalKey::ArtistSort, artist.sort_name.as_str());
        record.set(CanonicalKey::AlbumSort, album.sort_title.as_str());
        record.set(CanonicalKey::RelativePath, self.relative_path.as_str());
        record.set(CanonicalKey::BasePath, self.base_path.as_str());
        record.set(CanonicalKey::Mime, self.mime.as_str());
        record.set(CanonicalKey::Extension, self.extension.as_str());
        record.set(CanonicalKey::EncodedExtension, self.encoded_extension.as_str());
        record.set(CanonicalKey::IsEncoded, self.is_encoded.to_string());
        record.set(CanonicalKey::Flags, self.flags.as_str());
        record.set(CanonicalKey::Duration, self.duration.as_str());
        record.set(CanonicalKey::Fingerprint, self.fingerprint.as_str());
        record
    }

    /// True when the encoded copies are up to date with the source file.
    pub fn is_encoding_current(&self) -> bool {
        self.encoded_source.as_deref() == Some(self.fingerprint.as_str())
    }
}
