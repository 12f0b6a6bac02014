//! musiclib importer
//!
//! Turns a directory of audio files into canonical records and keeps a persisted
//! catalog in sync with it.
//!
//! # Architecture
//!
//! - `scanner`: filesystem walk for supported audio files
//! - `fingerprint`: content-hash or size+mtime file identity
//! - `normalize`: source tag keys → canonical keys, derived fields
//! - `library_scanner`: per-file extraction (optionally on a worker pool) into a sorted collection
//! - `hierarchy`: flat collection ⇄ artist/album/song tree
//! - `reconcile`: added/deleted/moved diff and its application to a [`CatalogStore`]
//! - `snapshot`: YAML save/load of a record collection
//!
//! [`CatalogStore`]: musiclib_core::CatalogStore

mod error;

pub mod fingerprint;
pub mod hierarchy;
pub mod library_scanner;
pub mod normalize;
pub mod reconcile;
pub mod scanner;
pub mod snapshot;

pub use error::ImportError;
pub use fingerprint::FingerprintStrategy;
pub use hierarchy::{build_catalog, flatten_catalog};
pub use library_scanner::{LibraryScanner, ScanReport, ScanStats, ScanWarning};
pub use normalize::KeyNormalizer;
pub use reconcile::{MovedSong, ReconcilePlan, Reconciler, RefreshStats};

pub type Result<T> = std::result::Result<T, ImportError>;
