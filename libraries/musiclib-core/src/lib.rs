//! musiclib core
//!
//! Format-agnostic types, traits, and error handling shared by every musiclib crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Canonical records**: [`CanonicalKey`] and [`TagRecord`], the flat shape every
//!   decoder's output is normalized into
//! - **Catalog tree**: [`Catalog`] → [`Artist`] → [`Album`] → [`Song`]
//! - **Persistence seam**: the [`CatalogStore`] trait implemented by `musiclib-storage`
//! - **Error handling**: unified [`LibraryError`] and [`Result`] types
//!
//! # Example
//!
//! ```rust
//! use musiclib_core::{CanonicalKey, TagRecord};
//!
//! let mut record = TagRecord::new();
//! record.set(CanonicalKey::Artist, "The Beatles");
//! record.fill_missing();
//!
//! assert_eq!(record.get(CanonicalKey::Artist), "The Beatles");
//! assert!(record.missing_keys().is_empty());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{LibraryError, Result};
pub use store::{CatalogStore, PruneReport};
pub use types::{
    sort_records, Album, AlbumId, Artist, ArtistId, CanonicalKey, Catalog, Song, SongId,
    TagRecord,
};
