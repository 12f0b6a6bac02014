mod catalog;
mod keys;
mod record;

pub use catalog::{Album, AlbumId, Artist, ArtistId, Catalog, Song, SongId};
pub use keys::CanonicalKey;
pub use record::{sort_records, TagRecord};
