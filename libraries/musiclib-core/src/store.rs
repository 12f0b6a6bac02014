//! Persistence seam for the catalog

use crate::error::Result;
use crate::types::{Album, AlbumId, Artist, ArtistId, Catalog, Song, SongId, TagRecord};
use async_trait::async_trait;

/// Counts of containers removed by [`CatalogStore::prune_empty_containers`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub albums: u64,
    pub artists: u64,
}

/// Catalog persistence operations
///
/// The reconciliation engine only talks to persistence through this trait;
/// implementations own every query they run.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // Whole catalog
    // ========================================================================

    /// Read the full persisted tree, ids populated.
    async fn load_catalog(&self) -> Result<Catalog>;

    /// Bulk insert a tree, assigning ids to every artist, album and song in place.
    async fn insert_catalog(&self, catalog: &mut Catalog) -> Result<()>;

    /// Remove every artist, album and song.
    async fn clear(&self) -> Result<()>;

    // ========================================================================
    // Incremental changes
    // ========================================================================

    /// Insert one song, creating its artist and album when they do not exist yet.
    async fn add_song(&self, record: &TagRecord) -> Result<SongId>;

    async fn delete_song(&self, id: SongId) -> Result<()>;

    /// Update the path fields of a song that moved on disk.
    async fn update_song_paths(&self, id: SongId, relative_path: &str, base_path: &str)
        -> Result<()>;

    /// Replace a song's metadata from a freshly extracted record.
    ///
    /// The song is re-parented when the record names a different artist or album.
    async fn update_song_metadata(&self, id: SongId, record: &TagRecord) -> Result<()>;

    /// Delete albums without songs, then artists without albums.
    async fn prune_empty_containers(&self) -> Result<PruneReport>;

    async fn set_encoded_source(&self, id: SongId, fingerprint: &str) -> Result<()>;

    // ========================================================================
    // Read side
    // ========================================================================

    /// Artists ordered by sort name
    async fn list_artists(&self) -> Result<Vec<Artist>>;

    /// Albums of an artist ordered by sort title
    async fn list_albums(&self, artist_id: ArtistId) -> Result<Vec<Album>>;

    /// Songs of an album ordered by disc then track
    async fn list_songs(&self, album_id: AlbumId) -> Result<Vec<Song>>;
}
