//! ISO base media (MP4/M4A) atom decoder

use crate::cursor::ByteCursor;
use crate::duration::format_duration;
use crate::error::{Result, TagError};
use crate::raw::RawTags;

const FTYP: &[u8] = b"ftyp";

/// `ilst` children holding a UTF-8 text value
const TEXT_ATOMS: [&[u8; 4]; 5] = [b"\xA9nam", b"\xA9ART", b"\xA9alb", b"soar", b"soal"];

/// Find the first sibling atom of type `kind`, returning a cursor over its payload.
///
/// The parent cursor is advanced past every atom examined.
pub fn find_atom<'a>(cursor: &mut ByteCursor<'a>, kind: &[u8; 4]) -> Result<Option<ByteCursor<'a>>> {
    while cursor.remaining() >= 8 {
        let (atom_type, payload) = next_atom(cursor)?;
        if atom_type == kind {
            return Ok(Some(payload));
        }
    }
    Ok(None)
}

/// Read one atom header and split off its payload.
///
/// A size smaller than its own header, or one that overruns the enclosing
/// region, is reported as [`TagError::OutOfBounds`].
fn next_atom<'a>(cursor: &mut ByteCursor<'a>) -> Result<(&'a [u8], ByteCursor<'a>)> {
    let start = cursor.position();
    let size = cursor.read_u32_be()?;
    let atom_type = cursor.read(4)?;
    let payload = match size {
        // extends to the end of the enclosing region
        0 => cursor.rest(),
        // 64-bit size follows the type
        1 => {
            let large = cursor.read_u64_be()?;
            let len = large
                .checked_sub(16)
                .and_then(|len| usize::try_from(len).ok())
                .ok_or_else(|| header_overrun(start, 16, large))?;
            cursor.sub_region(len)?
        }
        2..=7 => return Err(header_overrun(start, 8, u64::from(size))),
        _ => cursor.sub_region(size as usize - 8)?,
    };
    Ok((atom_type, payload))
}

fn header_overrun(offset: usize, header: usize, size: u64) -> TagError {
    TagError::OutOfBounds {
        offset,
        requested: header,
        remaining: usize::try_from(size).unwrap_or(usize::MAX),
    }
}

/// Map an atom type to a string key, `©` (0xA9) included.
fn atom_key(atom_type: &[u8]) -> String {
    atom_type.iter().map(|&b| char::from(b)).collect()
}

/// Decode the iTunes-style metadata list and movie duration of an M4A file.
pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<RawTags> {
    let mut peek = *cursor;
    peek.skip(4)?;
    let brand = peek.read(4)?;
    if brand != FTYP {
        return Err(TagError::BadMagic {
            format: "M4A",
            expected: FTYP,
            found: brand.to_vec(),
        });
    }

    let mut out = RawTags::new();
    let Some(moov) = find_atom(cursor, b"moov")? else {
        out.warnings.push("no moov atom".to_string());
        return Ok(out);
    };

    match read_movie_duration(moov) {
        Ok(Some(seconds)) => out.duration = Some(format_duration(seconds)),
        Ok(None) => out.warnings.push("no mvhd atom".to_string()),
        Err(err) => out.warnings.push(format!("duration unavailable: {}", err)),
    }

    if let Some(mut ilst) = find_ilst(moov)? {
        read_item_list(&mut ilst, &mut out)?;
    }

    Ok(out)
}

/// moov → udta → meta (version/flags) → ilst
fn find_ilst(mut moov: ByteCursor<'_>) -> Result<Option<ByteCursor<'_>>> {
    let Some(mut udta) = find_atom(&mut moov, b"udta")? else {
        return Ok(None);
    };
    let Some(mut meta) = find_atom(&mut udta, b"meta")? else {
        return Ok(None);
    };
    meta.skip(4)?;
    find_atom(&mut meta, b"ilst")
}

fn read_item_list(ilst: &mut ByteCursor<'_>, out: &mut RawTags) -> Result<()> {
    while ilst.remaining() >= 8 {
        let (atom_type, mut item) = next_atom(ilst)?;
        let key = atom_key(atom_type);

        if TEXT_ATOMS.iter().any(|t| t.as_slice() == atom_type) {
            item.skip(16)?;
            let len = item.remaining();
            out.insert(key, String::from_utf8_lossy(item.read(len)?));
        } else if atom_type == b"trkn" {
            item.skip(18)?;
            let track = item.read_u16_be()?;
            item.skip(4)?;
            out.insert(key, track.to_string());
        } else if atom_type == b"disk" {
            item.skip(18)?;
            let disc = item.read_u16_be()?;
            item.skip(2)?;
            out.insert(key, disc.to_string());
        }
    }
    Ok(())
}

/// Seconds from `mvhd`, for both the 32-bit (v0) and 64-bit (v1) layouts.
fn read_movie_duration(mut moov: ByteCursor<'_>) -> Result<Option<f64>> {
    let Some(mut mvhd) = find_atom(&mut moov, b"mvhd")? else {
        return Ok(None);
    };

    let version = mvhd.read_byte()?;
    mvhd.skip(3)?;
    let (timescale, duration) = match version {
        0 => {
            mvhd.skip(8)?;
            let timescale = mvhd.read_u32_be()?;
            (timescale, u64::from(mvhd.read_u32_be()?))
        }
        1 => {
            mvhd.skip(16)?;
            let timescale = mvhd.read_u32_be()?;
            (timescale, mvhd.read_u64_be()?)
        }
        v => {
            return Err(TagError::UnsupportedVariant(format!(
                "mvhd version {}",
                v
            )))
        }
    };

    if timescale == 0 {
        return Err(TagError::UnsupportedVariant("mvhd timescale 0".to_string()));
    }
    Ok(Some(duration as f64 / f64::from(timescale)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Helpers =====

    fn atom(kind: &[u8], payload: &[u8]) -> Vec<u8> {
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

    fn text_item(kind: &[u8], value: &str) -> Vec<u8> {
        atom(kind, &data_atom(value.as_bytes()))
    }

    fn trkn(track: u16, total: u16) -> Vec<u8> {
        let mut value = vec![0, 0];
        value.extend_from_slice(&track.to_be_bytes());
        value.extend_from_slice(&total.to_be_bytes());
        value.extend_from_slice(&[0, 0]);
        atom(b"trkn", &data_atom(&value))
    }

    fn disk(disc: u16, total: u16) -> Vec<u8> {
        let mut value = vec![0, 0];
        value.extend_from_slice(&disc.to_be_bytes());
        value.extend_from_slice(&total.to_be_bytes());
        atom(b"disk", &data_atom(&value))
    }

    fn mvhd_v0(timescale: u32, duration: u32) -> Vec<u8> {
        let mut payload = vec![0u8; 4 + 8];
        payload.extend_from_slice(&timescale.to_be_bytes());
        payload.extend_from_slice(&duration.to_be_bytes());
        payload.extend_from_slice(&[0u8; 80]);
        atom(b"mvhd", &payload)
    }

    fn mvhd_v1(timescale: u32, duration: u64) -> Vec<u8> {
        let mut payload = vec![1, 0, 0, 0];
        payload.extend_from_slice(&[0u8; 16]);
        payload.extend_from_slice(&timescale.to_be_bytes());
        payload.extend_from_slice(&duration.to_be_bytes());
        payload.extend_from_slice(&[0u8; 80]);
        atom(b"mvhd", &payload)
    }

    fn m4a(mvhd: Vec<u8>, items: &[Vec<u8>]) -> Vec<u8> {
        let ilst = atom(b"ilst", &items.concat());
        let mut meta_payload = vec![0u8; 4];
        meta_payload.extend(atom(b"hdlr", &[0u8; 25]));
        meta_payload.extend(ilst);
        let udta = atom(b"udta", &atom(b"meta", &meta_payload));

        let mut moov_payload = mvhd;
        moov_payload.extend(atom(b"trak", &[0u8; 40]));
        moov_payload.extend(udta);

        let mut out = atom(b"ftyp", b"M4A \0\0\0\0");
        out.extend(atom(b"moov", &moov_payload));
        out.extend(atom(b"mdat", &[0u8; 64]));
        out
    }

    // ===== Tests =====

    #[test]
    fn reads_track_number() {
        let data = m4a(mvhd_v0(1000, 0), &[trkn(5, 12)]);
        let tags = decode(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(tags.get("trkn"), Some("5"));
    }

    #[test]
    fn reads_text_and_disc_atoms() {
        let data = m4a(
            mvhd_v0(1000, 0),
            &[
                text_item(b"\xA9nam", "Bar"),
                text_item(b"\xA9ART", "Foo"),
                text_item(b"\xA9alb", "Baz"),
                text_item(b"soar", "Foo, The"),
                atom(b"covr", &data_atom(&[0u8; 12])),
                disk(2, 2),
            ],
        );
        let tags = decode(&mut ByteCursor::new(&data)).unwrap();

        assert_eq!(tags.get("©nam"), Some("Bar"));
        assert_eq!(tags.get("©ART"), Some("Foo"));
        assert_eq!(tags.get("©alb"), Some("Baz"));
        assert_eq!(tags.get("soar"), Some("Foo, The"));
        assert_eq!(tags.get("disk"), Some("2"));
        assert_eq!(tags.get("covr"), None);
    }

    #[test]
    fn duration_from_mvhd_versions() {
        let data = m4a(mvhd_v0(600, 600 * 125), &[]);
        let tags = decode(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(tags.duration.as_deref(), Some("2:05"));

        let data = m4a(mvhd_v1(44100, 44100 * 61), &[]);
        let tags = decode(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(tags.duration.as_deref(), Some("1:01"));
    }

    #[test]
    fn find_atom_skips_siblings() {
        let mut data = atom(b"free", &[1, 2, 3]);
        data.extend(atom(b"want", &[9, 9]));
        let mut cursor = ByteCursor::new(&data);

        let mut found = find_atom(&mut cursor, b"want").unwrap().unwrap();
        assert_eq!(found.read(2).unwrap(), &[9, 9]);
        assert!(find_atom(&mut ByteCursor::new(&data), b"none").unwrap().is_none());
    }

    #[test]
    fn missing_metadata_is_not_an_error() {
        let mut data = atom(b"ftyp", b"M4A \0\0\0\0");
        data.extend(atom(b"moov", &mvhd_v0(1000, 3000)));
        let tags = decode(&mut ByteCursor::new(&data)).unwrap();

        assert!(tags.tags.is_empty());
        assert_eq!(tags.duration.as_deref(), Some("0:03"));
    }

    #[test]
    fn rejects_non_mp4() {
        let data = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
        let err = decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, TagError::BadMagic { .. }));
    }

    #[test]
    fn truncated_atom_is_out_of_bounds() {
        let mut data = m4a(mvhd_v0(1000, 0), &[trkn(1, 1)]);
        let moov_end = data.len() - 72;
        data.truncate(moov_end - 4);
        let err = decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, TagError::OutOfBounds { .. }));
    }

    #[test]
    fn undersized_atom_is_fatal() {
        let mut data = atom(b"ftyp", b"M4A \0\0\0\0");
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(b"moov");
        data.extend_from_slice(&[0u8; 16]);

        let err = decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, TagError::OutOfBounds { requested: 8, remaining: 4, .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn undersized_large_atom_is_fatal() {
        let mut data = atom(b"ftyp", b"M4A \0\0\0\0");
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(b"moov");
        data.extend_from_slice(&8u64.to_be_bytes());

        let err = decode(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, TagError::OutOfBounds { requested: 16, .. }));
    }
}
