//! Fixture builders shared by importer integration tests
//!
//! Audio files are synthesized byte by byte; only the structures the decoders
//! read are present.

#![allow(dead_code)]

use musiclib_core::{CanonicalKey, TagRecord};
use std::fs;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// FLAC stream with STREAMINFO (44.1 kHz) and a VORBIS_COMMENT block.
pub fn flac_bytes(comments: &[&str], seconds: u32) -> Vec<u8> {
    let mut info = vec![0u8; 10];
    info.extend_from_slice(&(44_100u32 << 12).to_be_bytes());
    info.extend_from_slice(&(44_100 * seconds).to_be_bytes());
    info.extend_from_slice(&[0u8; 16]);

    let mut vorbis = 0u32.to_le_bytes().to_vec();
    vorbis.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for c in comments {
        vorbis.extend_from_slice(&(c.len() as u32).to_le_bytes());
        vorbis.extend_from_slice(c.as_bytes());
    }

    let mut out = b"fLaC".to_vec();
    push_block(&mut out, 0, false, &info);
    push_block(&mut out, 4, true, &vorbis);
    out
}

fn push_block(out: &mut Vec<u8>, block_type: u8, last: bool, payload: &[u8]) {
    out.push(if last { 0x80 | block_type } else { block_type });
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes()[1..]);
    out.extend_from_slice(payload);
}

/// Tagged FLAC for `artist`/`album`/`title` at `track`.
pub fn song(artist: &str, album: &str, title: &str, track: u32) -> Vec<u8> {
    flac_bytes(
        &[
            &format!("ARTIST={}", artist),
            &format!("ALBUM={}", album),
            &format!("TITLE={}", title),
            &format!("TRACKNUMBER={}", track),
        ],
        180,
    )
}

fn syncsafe(n: u32) -> [u8; 4] {
    [
        ((n >> 21) & 0x7F) as u8,
        ((n >> 14) & 0x7F) as u8,
        ((n >> 7) & 0x7F) as u8,
        (n & 0x7F) as u8,
    ]
}

/// ID3v2.3 tag of Latin-1 text frames followed by `frames` MPEG-1 Layer III
/// frames (128 kbps, 44.1 kHz, 417 bytes each).
pub fn mp3_bytes(frames: &[(&str, &str)], mpeg_frames: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, value) in frames {
        body.extend_from_slice(id.as_bytes());
        body.extend_from_slice(&(value.len() as u32 + 1).to_be_bytes());
        body.extend_from_slice(&[0, 0, 0]);
        body.extend_from_slice(value.as_bytes());
    }
    body.extend_from_slice(&[0u8; 10]);

    let mut out = b"ID3".to_vec();
    out.extend_from_slice(&[3, 0, 0]);
    out.extend_from_slice(&syncsafe(body.len() as u32));
    out.extend_from_slice(&body);

    for _ in 0..mpeg_frames {
        let mut frame = vec![0xFF, 0xFA, 0x90, 0x00];
        frame.resize(417, 0);
        out.extend_from_slice(&frame);
    }
    out
}

pub fn atom(kind: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn data_atom(value: &[u8]) -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 1, 0, 0, 0, 0];
    payload.extend_from_slice(value);
    atom(b"data", &payload)
}

/// M4A with `©nam`/`©ART`/`©alb` text items, a `trkn` item and an `mvhd`
/// (v0, 1 kHz timescale) lasting `seconds`.
pub fn m4a_bytes(artist: &str, album: &str, title: &str, track: u16, seconds: u32) -> Vec<u8> {
    let mut trkn = vec![0, 0];
    trkn.extend_from_slice(&track.to_be_bytes());
    trkn.extend_from_slice(&[0, 0, 0, 0]);

    let mut items = atom(b"\xA9nam", &data_atom(title.as_bytes()));
    items.extend(atom(b"\xA9ART", &data_atom(artist.as_bytes())));
    items.extend(atom(b"\xA9alb", &data_atom(album.as_bytes())));
    items.extend(atom(b"trkn", &data_atom(&trkn)));

    let mut meta = vec![0u8; 4];
    meta.extend(atom(b"ilst", &items));

    let mut mvhd = vec![0u8; 12];
    mvhd.extend_from_slice(&1000u32.to_be_bytes());
    mvhd.extend_from_slice(&(seconds * 1000).to_be_bytes());
    mvhd.extend_from_slice(&[0u8; 80]);

    let mut moov = atom(b"mvhd", &mvhd);
    moov.extend(atom(b"udta", &atom(b"meta", &meta)));

    let mut out = atom(b"ftyp", b"M4A \0\0\0\0");
    out.extend(atom(b"moov", &moov));
    out.extend(atom(b"mdat", &[0u8; 32]));
    out
}

pub fn write(root: &Path, relative: &str, data: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, data).unwrap();
}

/// Complete record as the scanner would emit it for a FLAC file.
pub fn record(artist: &str, album: &str, title: &str, track: u32, path: &str) -> TagRecord {
    let mut record = TagRecord::new();
    record.fill_missing();
    record.set(CanonicalKey::Artist, artist);
    record.set(CanonicalKey::ArtistSort, artist);
    record.set(CanonicalKey::Album, album);
    record.set(CanonicalKey::AlbumSort, album);
    record.set(CanonicalKey::Title, title);
    record.set(CanonicalKey::TrackNumber, track.to_string());
    record.set(CanonicalKey::DiscNumber, "1");
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
    record.set(CanonicalKey::Duration, "3:00");
    record.set(CanonicalKey::Fingerprint, format!("fp-{}", title));
    record
}
