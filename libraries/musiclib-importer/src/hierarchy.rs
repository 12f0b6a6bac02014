//! Flat record collection ⇄ Artist → Album → Song tree

use musiclib_core::{sort_records, Album, Artist, CanonicalKey, Catalog, Song, TagRecord};

/// Group records by artist, then album, keeping scan order within an album
/// until the final stable `(disc, track)` sort.
///
/// The first record seen for an artist or album supplies its sort name.
pub fn build_catalog(records: &[TagRecord]) -> Catalog {
    let mut catalog = Catalog::new();

    for record in records {
        let artist_name = record.get(CanonicalKey::Artist);
        let album_title = record.get(CanonicalKey::Album);

        let artist = catalog
            .artists
            .entry(artist_name.to_string())
            .or_insert_with(|| Artist::new(artist_name, record.get(CanonicalKey::ArtistSort)));

        let album = artist
            .albums
            .entry(album_title.to_string())
            .or_insert_with(|| Album::new(album_title, record.get(CanonicalKey::AlbumSort)));

        album.songs.push(Song::from_record(record));
    }

    for artist in catalog.artists.values_mut() {
        for album in artist.albums.values_mut() {
            album.sort_songs();
        }
    }

    catalog
}

/// Flatten a tree back into a sorted record collection carrying song ids.
pub fn flatten_catalog(catalog: &Catalog) -> Vec<TagRecord> {
    let mut records: Vec<_> = catalog
        .songs()
        .map(|(artist, album, song)| song.to_record(artist, album))
        .collect();
    sort_records(&mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(artist: &str, album: &str, title: &str, disc: &str, track: &str) -> TagRecord {
        let mut r = TagRecord::new();
        r.set(CanonicalKey::Artist, artist);
        r.set(CanonicalKey::ArtistSort, crate::normalize::sort_value(artist));
        r.set(CanonicalKey::Album, album);
        r.set(CanonicalKey::AlbumSort, album);
        r.set(CanonicalKey::Title, title);
        r.set(CanonicalKey::DiscNumber, disc);
        r.set(CanonicalKey::TrackNumber, track);
        r.set(CanonicalKey::RelativePath, format!("{}/{}/{}.flac", artist, album, title));
        r.set(CanonicalKey::Fingerprint, title);
        r.set(CanonicalKey::IsEncoded, "false");
        r.fill_missing();
        r
    }

    #[test]
    fn test_groups_by_artist_and_album() {
        let records = vec![
            record("The Beatles", "Abbey Road", "Something", "1", "2"),
            record("The Beatles", "Help!", "Yesterday", "1", "13"),
            record("Nina Simone", "Pastel Blues", "Sinnerman", "1", "5"),
            record("The Beatles", "Abbey Road", "Come Together", "1", "1"),
        ];
        let catalog = build_catalog(&records);

        assert_eq!(catalog.artists.len(), 2);
        let beatles = &catalog.artists["The Beatles"];
        assert_eq!(beatles.sort_name, "Beatles");
        assert_eq!(beatles.albums.len(), 2);

        let titles: Vec<_> = beatles.albums["Abbey Road"]
            .songs
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Come Together", "Something"]);
    }

    #[test]
    fn test_disc_sorts_before_track() {
        let records = vec![
            record("X", "Double", "d2t1", "2", "1"),
            record("X", "Double", "d1t9", "1", "9"),
            record("X", "Double", "d1t1", "1", "1"),
        ];
        let catalog = build_catalog(&records);
        let titles: Vec<_> = catalog.artists["X"].albums["Double"]
            .songs
            .iter()
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(titles, vec!["d1t1", "d1t9", "d2t1"]);
    }

    #[test]
    fn test_flatten_restores_records() {
        let mut records = vec![
            record("B", "Two", "b", "1", "1"),
            record("A", "One", "a", "1", "1"),
        ];
        sort_records(&mut records);

        let flat = flatten_catalog(&build_catalog(&records));
        assert_eq!(flat, records);
    }
}
