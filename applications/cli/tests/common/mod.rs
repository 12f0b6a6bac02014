//! Common test utilities and fixtures
#![allow(dead_code)]

use musiclib_core::{CanonicalKey, CatalogStore, TagRecord};
use musiclib_importer::Reconciler;
use musiclib_storage::MemoryCatalog;
use std::sync::Arc;

/// Complete record for a song at `path`
pub fn record(artist: &str, album: &str, title: &str, disc: u32, track: u32, path: &str) -> TagRecord {
    let mut record = TagRecord::new();
    record.fill_missing();
    record.set(CanonicalKey::Artist, artist);
    record.set(CanonicalKey::ArtistSort, artist.trim_start_matches("The "));
    record.set(CanonicalKey::Album, album);
    record.set(CanonicalKey::AlbumSort, album);
    record.set(CanonicalKey::Title, title);
    record.set(CanonicalKey::DiscNumber, disc.to_string());
    record.set(CanonicalKey::TrackNumber, track.to_string());
    record.set(CanonicalKey::RelativePath, path);
    record.set(
        CanonicalKey::BasePath,
        path.rsplit_once('.').map_or(path, |(base, _)| base),
    );
    record.set(CanonicalKey::Mime, "audio/flac");
    record.set(CanonicalKey::Extension, ".flac");
    record.set(CanonicalKey::EncodedExtension, ".mp3");
    record.set(CanonicalKey::IsEncoded, "false");
    record.set(CanonicalKey::Flags, "e");
    record.set(CanonicalKey::Fingerprint, format!("fp-{}", path));
    record
}

/// In-memory store populated with a small two-artist catalog
pub async fn create_test_store() -> Arc<dyn CatalogStore> {
    let store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalog::new());
    Reconciler::new(store.clone())
        .rebuild(&[
            record("The Beatles", "Help!", "Yesterday", 1, 13, "beatles/help/13.flac"),
            record("The Beatles", "Abbey Road", "Something", 1, 2, "beatles/abbey/02.flac"),
            record("The Beatles", "Abbey Road", "Come Together", 1, 1, "beatles/abbey/01.flac"),
            record("ABBA", "Arrival", "Dancing Queen", 1, 2, "abba/arrival/02.flac"),
        ])
        .await
        .expect("Failed to populate store");
    store
}
