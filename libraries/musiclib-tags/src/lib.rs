//! musiclib tags
//!
//! Dependency-free metadata extraction straight from file bytes.
//!
//! This crate provides:
//! - [`ByteCursor`], a bounds-checked reader every decoder is written against
//! - FLAC metadata block, ID3v2 + MPEG-1 Layer III, and MP4 atom decoders
//! - [`AudioFormat`] dispatch by file extension
//!
//! Decoders return source-keyed [`RawTags`]; mapping onto canonical keys happens
//! in `musiclib-importer`.
//!
//! # Example
//!
//! ```rust,no_run
//! use musiclib_tags::read_file;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tags = read_file(Path::new("/music/song.flac"))?;
//! println!("{:?} {:?}", tags.get("ARTIST"), tags.duration);
//! # Ok(())
//! # }
//! ```

pub mod cursor;
mod duration;
mod error;
pub mod flac;
mod format;
pub mod m4a;
pub mod mp3;
mod raw;

pub use cursor::ByteCursor;
pub use duration::format_duration;
pub use error::{Result, TagError};
pub use format::{extract, read_file, AudioFormat};
pub use raw::RawTags;
