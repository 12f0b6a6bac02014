//! FLAC metadata block decoder

use crate::cursor::ByteCursor;
use crate::duration::format_duration;
use crate::error::{Result, TagError};
use crate::raw::RawTags;

const MAGIC: &[u8] = b"fLaC";

const STREAMINFO: u8 = 0;
const VORBIS_COMMENT: u8 = 4;

/// Decode the metadata blocks of a FLAC stream.
///
/// Traversal stops after the last block, or as soon as both STREAMINFO and
/// VORBIS_COMMENT have been read.
pub fn decode(cursor: &mut ByteCursor<'_>) -> Result<RawTags> {
    let magic = cursor.read(4)?;
    if magic != MAGIC {
        return Err(TagError::BadMagic {
            format: "FLAC",
            expected: MAGIC,
            found: magic.to_vec(),
        });
    }

    let mut out = RawTags::new();
    let mut seen_info = false;
    let mut seen_comments = false;

    loop {
        let header = cursor.read_u32_be()?;
        let is_last = header & 0x8000_0000 != 0;
        let block_type = ((header >> 24) & 0x7F) as u8;
        let size = (header & 0x00FF_FFFF) as usize;
        let mut block = cursor.sub_region(size)?;

        match block_type {
            STREAMINFO => {
                read_stream_info(&mut block, &mut out)?;
                seen_info = true;
            }
            VORBIS_COMMENT => {
                read_vorbis_comments(&mut block, &mut out)?;
                seen_comments = true;
            }
            _ => {}
        }

        if is_last || (seen_info && seen_comments) {
            break;
        }
    }

    Ok(out)
}

/// Duration from STREAMINFO.
///
/// Total samples are read as the trailing 32 bits of the 36-bit field; streams
/// longer than 2^32 samples report a truncated duration.
fn read_stream_info(block: &mut ByteCursor<'_>, out: &mut RawTags) -> Result<()> {
    block.skip(10)?;
    let word = block.read_u32_be()?;
    let sample_rate = word >> 12;
    let total_samples = block.read_u32_be()?;

    if sample_rate == 0 {
        out.warnings
            .push("STREAMINFO sample rate is zero, duration unavailable".to_string());
        return Ok(());
    }

    out.duration = Some(format_duration(
        f64::from(total_samples) / f64::from(sample_rate),
    ));
    Ok(())
}

fn read_vorbis_comments(block: &mut ByteCursor<'_>, out: &mut RawTags) -> Result<()> {
    let vendor_len = block.read_u32_le()? as usize;
    block.skip(vendor_len)?;

    let count = block.read_u32_le()?;
    for _ in 0..count {
        let len = block.read_u32_le()? as usize;
        let comment = String::from_utf8_lossy(block.read(len)?);
        match comment.split_once('=') {
            Some((key, value)) => out.insert(key, value),
            None => out
                .warnings
                .push(format!("Vorbis comment without '=': {}", comment)),
        }
    }
    Ok(())
}
