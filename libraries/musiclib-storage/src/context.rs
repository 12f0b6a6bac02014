use crate::{albums, artists, songs};
use async_trait::async_trait;
use musiclib_core::{
    Album, AlbumId, Artist, ArtistId, CanonicalKey, Catalog, CatalogStore, PruneReport, Result,
    Song, SongId, TagRecord,
};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

/// [`CatalogStore`] backed by a `SQLite` pool
#[derive(Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Artist and album ids for a record, creating either when missing.
async fn resolve_album(conn: &mut SqliteConnection, record: &TagRecord) -> Result<AlbumId> {
    let artist_id = artists::find_or_create(
        conn,
        record.get(CanonicalKey::Artist),
        record.get(CanonicalKey::ArtistSort),
    )
    .await?;

    albums::find_or_create(
        conn,
        artist_id,
        record.get(CanonicalKey::Album),
        record.get(CanonicalKey::AlbumSort),
    )
    .await
}

#[async_trait]
impl CatalogStore for SqliteCatalog {
    async fn load_catalog(&self) -> Result<Catalog> {
        let mut conn = self.pool.acquire().await?;

        let mut songs_by_album: HashMap<AlbumId, Vec<Song>> = HashMap::new();
        for (album_id, song) in songs::get_all(&mut conn).await? {
            songs_by_album.entry(album_id).or_default().push(song);
        }

        let mut albums_by_artist: HashMap<ArtistId, Vec<Album>> = HashMap::new();
        for (artist_id, mut album) in albums::get_all(&mut conn).await? {
            if let Some(id) = album.id {
                album.songs = songs_by_album.remove(&id).unwrap_or_default();
            }
            albums_by_artist.entry(artist_id).or_default().push(album);
        }

        let mut catalog = Catalog::new();
        for mut artist in artists::get_all(&mut conn).await? {
            if let Some(id) = artist.id {
                for album in albums_by_artist.remove(&id).unwrap_or_default() {
                    artist.albums.insert(album.title.clone(), album);
                }
            }
            catalog.artists.insert(artist.name.clone(), artist);
        }

        debug!(
            "Loaded catalog: {} artists, {} songs",
            catalog.artists.len(),
            catalog.song_count()
        );
        Ok(catalog)
    }

    async fn insert_catalog(&self, catalog: &mut Catalog) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for artist in catalog.artists.values_mut() {
            let artist_id = artists::create(&mut tx, &artist.name, &artist.sort_name).await?;
            artist.id = Some(artist_id);

            for album in artist.albums.values_mut() {
                let album_id =
                    albums::create(&mut tx, artist_id, &album.title, &album.sort_title).await?;
                album.id = Some(album_id);

                for song in &mut album.songs {
                    song.id = Some(songs::create(&mut tx, album_id, song).await?);
                }
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for table in ["songs", "albums", "artists"] {
            sqlx::query(&format!("DELETE FROM {table}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn add_song(&self, record: &TagRecord) -> Result<SongId> {
        let mut tx = self.pool.begin().await?;
        let album_id = resolve_album(&mut tx, record).await?;
        let id = songs::create(&mut tx, album_id, &Song::from_record(record)).await?;
        tx.commit().await?;
        Ok(id)
    }

    async fn delete_song(&self, id: SongId) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        songs::delete(&mut conn, id).await
    }

    async fn update_song_paths(
        &self,
        id: SongId,
        relative_path: &str,
        base_path: &str,
    ) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        songs::update_paths(&mut conn, id, relative_path, base_path).await
    }

    async fn update_song_metadata(&self, id: SongId, record: &TagRecord) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let album_id = resolve_album(&mut tx, record).await?;
        songs::update(&mut tx, id, album_id, &Song::from_record(record)).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn prune_empty_containers(&self) -> Result<PruneReport> {
        let mut tx = self.pool.begin().await?;
        let albums = albums::delete_empty(&mut tx).await?;
        let artists = artists::delete_empty(&mut tx).await?;
        tx.commit().await?;
        Ok(PruneReport { albums, artists })
    }

    async fn set_encoded_source(&self, id: SongId, fingerprint: &str) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        songs::set_encoded_source(&mut conn, id, fingerprint).await
    }

    async fn list_artists(&self) -> Result<Vec<Artist>> {
        let mut conn = self.pool.acquire().await?;
        artists::get_all(&mut conn).await
    }

    async fn list_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>> {
        let mut conn = self.pool.acquire().await?;
        albums::get_by_artist(&mut conn, artist_id).await
    }

    async fn list_songs(&self, album_id: AlbumId) -> Result<Vec<Song>> {
        let mut conn = self.pool.acquire().await?;
        songs::get_by_album(&mut conn, album_id).await
    }
}
