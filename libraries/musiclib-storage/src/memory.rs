use async_trait::async_trait;
use musiclib_core::{
    Album, AlbumId, Artist, ArtistId, CanonicalKey, Catalog, CatalogStore, LibraryError,
    PruneReport, Result, Song, SongId, TagRecord,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct State {
    catalog: Catalog,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Place `song` under its artist and album, creating either when missing.
    fn place(&mut self, record: &TagRecord, mut song: Song) -> SongId {
        let song_id = match song.id {
            Some(id) => id,
            None => self.next_id(),
        };
        song.id = Some(song_id);

        let name = record.get(CanonicalKey::Artist);
        if !self.catalog.artists.contains_key(name) {
            let mut artist = Artist::new(name, record.get(CanonicalKey::ArtistSort));
            artist.id = Some(self.next_id());
            self.catalog.artists.insert(name.to_string(), artist);
        }

        let title = record.get(CanonicalKey::Album);
        let needs_album = self
            .catalog
            .artists
            .get(name)
            .is_some_and(|artist| !artist.albums.contains_key(title));
        let album_id = if needs_album { Some(self.next_id()) } else { None };

        if let Some(artist) = self.catalog.artists.get_mut(name) {
            let album = artist.albums.entry(title.to_string()).or_insert_with(|| {
                let mut album = Album::new(title, record.get(CanonicalKey::AlbumSort));
                album.id = album_id;
                album
            });
            album.songs.push(song);
            album.sort_songs();
        }

        song_id
    }

    /// Detach a song from the tree.
    fn take(&mut self, id: SongId) -> Option<Song> {
        for artist in self.catalog.artists.values_mut() {
            for album in artist.albums.values_mut() {
                if let Some(pos) = album.songs.iter().position(|s| s.id == Some(id)) {
                    return Some(album.songs.remove(pos));
                }
            }
        }
        None
    }

    fn song_mut(&mut self, id: SongId) -> Option<&mut Song> {
        self.catalog
            .artists
            .values_mut()
            .flat_map(|artist| artist.albums.values_mut())
            .flat_map(|album| album.songs.iter_mut())
            .find(|song| song.id == Some(id))
    }
}

/// In-process [`CatalogStore`] with the same semantics as the `SQLite` store
#[derive(Default)]
pub struct MemoryCatalog {
    state: RwLock<State>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn load_catalog(&self) -> Result<Catalog> {
        Ok(self.state.read().await.catalog.clone())
    }

    async fn insert_catalog(&self, catalog: &mut Catalog) -> Result<()> {
        let mut state = self.state.write().await;

        let placed: Vec<(TagRecord, Option<String>)> = catalog
            .songs()
            .map(|(artist, album, song)| (song.to_record(artist, album), song.encoded_source.clone()))
            .collect();

        let mut ids = Vec::with_capacity(placed.len());
        for (record, encoded_source) in &placed {
            let mut song = Song::from_record(record);
            song.id = None;
            song.encoded_source = encoded_source.clone();
            ids.push(state.place(record, song));
        }

        // Hand the assigned ids back in the same traversal order
        let mut ids = ids.into_iter();
        for (name, artist) in &mut catalog.artists {
            let stored = state.catalog.artists.get(name);
            artist.id = stored.and_then(|a| a.id);
            for (title, album) in &mut artist.albums {
                album.id = stored
                    .and_then(|a| a.albums.get(title))
                    .and_then(|a| a.id);
                for song in &mut album.songs {
                    song.id = ids.next();
                }
            }
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.state.write().await.catalog = Catalog::new();
        Ok(())
    }

    async fn add_song(&self, record: &TagRecord) -> Result<SongId> {
        let mut song = Song::from_record(record);
        song.id = None;
        Ok(self.state.write().await.place(record, song))
    }

    async fn delete_song(&self, id: SongId) -> Result<()> {
        self.state
            .write()
            .await
            .take(id)
            .map(|_| ())
            .ok_or_else(|| LibraryError::not_found("Song", id))
    }

    async fn update_song_paths(
        &self,
        id: SongId,
        relative_path: &str,
        base_path: &str,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let song = state
            .song_mut(id)
            .ok_or_else(|| LibraryError::not_found("Song", id))?;
        song.relative_path = relative_path.to_string();
        song.base_path = base_path.to_string();
        Ok(())
    }

    async fn update_song_metadata(&self, id: SongId, record: &TagRecord) -> Result<()> {
        let mut state = self.state.write().await;
        let previous = state
            .take(id)
            .ok_or_else(|| LibraryError::not_found("Song", id))?;

        let mut song = Song::from_record(record);
        song.id = Some(id);
        song.encoded_source = previous.encoded_source;
        state.place(record, song);
        Ok(())
    }

    async fn prune_empty_containers(&self) -> Result<PruneReport> {
        let mut state = self.state.write().await;
        let mut report = PruneReport::default();

        for artist in state.catalog.artists.values_mut() {
            let before = artist.albums.len();
            artist.albums.retain(|_, album| !album.songs.is_empty());
            report.albums += (before - artist.albums.len()) as u64;
        }

        let before = state.catalog.artists.len();
        state
            .catalog
            .artists
            .retain(|_, artist| !artist.albums.is_empty());
        report.artists = (before - state.catalog.artists.len()) as u64;

        Ok(report)
    }

    async fn set_encoded_source(&self, id: SongId, fingerprint: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let song = state
            .song_mut(id)
            .ok_or_else(|| LibraryError::not_found("Song", id))?;
        song.encoded_source = Some(fingerprint.to_string());
        Ok(())
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        let state = self.state.read().await;
        let mut artists: Vec<Artist> = state
            .catalog
            .artists
            .values()
            .map(|artist| {
                let mut artist = artist.clone();
                artist.albums.clear();
                artist
            })
            .collect();
        artists.sort_by(|a, b| (&a.sort_name, &a.name).cmp(&(&b.sort_name, &b.name)));
        Ok(artists)
    }

    async fn list_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        let state = self.state.read().await;
        let mut albums: Vec<Album> = state
            .catalog
            .artists
            .values()
            .filter(|artist| artist.id == Some(artist_id))
            .flat_map(|artist| artist.albums.values())
            .map(|album| {
                let mut album = album.clone();
                album.songs.clear();
                album
            })
            .collect();
        albums.sort_by(|a, b| (&a.sort_title, &a.title).cmp(&(&b.sort_title, &b.title)));
        Ok(albums)
    }

    async fn list_songs(&self, album_id: AlbumId) -> Result<Vec<Song>> {
        let state = self.state.read().await;
        Ok(state
            .catalog
            .artists
            .values()
            .flat_map(|artist| artist.albums.values())
            .filter(|album| album.id == Some(album_id))
            .flat_map(|album| album.songs.iter().cloned())
            .collect())
    }
}
