//! ID3v2 tag and MPEG-1 Layer III duration decoder

use crate::cursor::ByteCursor;
use crate::duration::format_duration;
use crate::error::{Result, TagError};
use crate::raw::RawTags;
use tracing::debug;

const MAGIC: &[u8] = b"ID3";

/// Frames collected from the tag; everything else is skipped.
const FRAMES: [&str; 8] = ["TPE1", "TPE2", "TIT2", "TALB", "TSOA", "TSO2", "TRCK", "TPOS"];

const FLAG_EXTENDED_HEADER: u8 = 0x40;

/// Bit rates in kbps for indices 1-14 (MPEG-1 Layer III).
const BIT_RATES: [u32; 14] = [32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320];
const SAMPLE_RATES: [u32; 3] = [44100, 48000, 32000];
const SAMPLES_PER_FRAME: f64 = 1152.0;

/// Decode the ID3v2 tag at the start of `data` and scan the stream for its duration.
///
/// An unsupported MPEG variant only loses the duration; the tags are still returned.
pub fn decode(data: &[u8]) -> Result<RawTags> {
    let mut out = read_id3(&mut ByteCursor::new(data))?;

    match scan_duration(data) {
        Ok(Some(seconds)) => out.duration = Some(format_duration(seconds)),
        Ok(None) => out.warnings.push("no MPEG frames found".to_string()),
        Err(err) => {
            debug!("duration unavailable: {}", err);
            out.warnings.push(format!("duration unavailable: {}", err));
        }
    }

    Ok(out)
}

/// Decode a 4-byte syncsafe integer (7 significant bits per byte).
pub fn syncsafe(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(0u32, |total, b| (total << 7) | u32::from(b & 0x7F))
}

/// Collect the known text frames of the leading ID3v2 tag.
pub fn read_id3(cursor: &mut ByteCursor<'_>) -> Result<RawTags> {
    let magic = cursor.read(3)?;
    if magic != MAGIC {
        return Err(TagError::BadMagic {
            format: "ID3",
            expected: MAGIC,
            found: magic.to_vec(),
        });
    }

    let major = cursor.read_byte()?;
    cursor.skip(1)?;
    let flags = cursor.read_byte()?;
    let size = syncsafe(cursor.read(4)?) as usize;
    let mut region = cursor.sub_region(size)?;

    if flags & FLAG_EXTENDED_HEADER != 0 {
        let extended_size = region.read_u32_be()? as usize;
        region.skip(extended_size)?;
    }

    let mut out = RawTags::new();
    while region.remaining() >= 10 {
        // Zero padding fills the rest of the tag
        if region.peek_byte()? == 0 {
            break;
        }

        let id = region.read(4)?;
        // v2.4 frame sizes are syncsafe, v2.3 sizes are plain big-endian
        let frame_size = if major >= 4 {
            syncsafe(region.read(4)?)
        } else {
            region.read_u32_be()?
        };
        let frame_size = frame_size as usize;
        region.skip(2)?;

        if !id.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()) {
            out.warnings.push("malformed ID3 frame id".to_string());
            break;
        }

        let mut frame = region.sub_region(frame_size)?;
        let id = String::from_utf8_lossy(id);
        if frame_size == 0 || !FRAMES.contains(&&*id) {
            continue;
        }

        let encoding = frame.read_byte()?;
        let value = decode_text(encoding, frame.read(frame_size - 1)?);
        out.insert(id.into_owned(), value);
    }

    Ok(out)
}

/// Decode an ID3 text value by its encoding byte, dropping trailing NULs.
fn decode_text(encoding: u8, bytes: &[u8]) -> String {
    let text = match encoding {
        // ISO-8859-1
        0 => bytes.iter().map(|&b| char::from(b)).collect(),
        // UTF-16 with BOM
        1 => {
            if bytes.starts_with(&[0xFF, 0xFE]) {
                utf16(&bytes[2..], u16::from_le_bytes)
            } else if bytes.starts_with(&[0xFE, 0xFF]) {
                utf16(&bytes[2..], u16::from_be_bytes)
            } else {
                utf16(bytes, u16::from_le_bytes)
            }
        }
        // UTF-16BE
        2 => utf16(bytes, u16::from_be_bytes),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    };
    text.trim_end_matches('\0').to_string()
}

fn utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// MPEG-1 Layer III frame length in bytes.
///
/// `bit_rate` is in bits per second.
pub fn frame_size(bit_rate: u32, sample_rate: u32, padding: bool, protection_absent: bool) -> usize {
    let base = (144 * u64::from(bit_rate) / u64::from(sample_rate)) as usize;
    base + usize::from(padding) + if protection_absent { 2 } else { 0 }
}

/// Parsed fields of a 4-byte MPEG frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub bit_rate: u32,
    pub sample_rate: u32,
    pub padding: bool,
    pub protection_absent: bool,
}

impl FrameHeader {
    /// Parse the header starting at `bytes[0]` (the `0xFF` sync byte).
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(bytes);
        cursor.skip(1)?;
        let b1 = cursor.read_byte()?;
        let b2 = cursor.read_byte()?;

        let version = (b1 >> 3) & 0x03;
        let layer = (b1 >> 1) & 0x03;
        if version != 0x03 || layer != 0x01 {
            return Err(TagError::UnsupportedVariant(format!(
                "MPEG version bits {:02b}, layer bits {:02b}",
                version, layer
            )));
        }

        let bit_rate_index = usize::from(b2 >> 4);
        let bit_rate = match bit_rate_index {
            1..=14 => BIT_RATES[bit_rate_index - 1] * 1000,
            _ => {
                return Err(TagError::UnsupportedVariant(format!(
                    "bit rate index {}",
                    bit_rate_index
                )))
            }
        };

        let sample_rate_index = usize::from((b2 >> 2) & 0x03);
        let sample_rate = *SAMPLE_RATES.get(sample_rate_index).ok_or_else(|| {
            TagError::UnsupportedVariant(format!("sample rate index {}", sample_rate_index))
        })?;

        Ok(Self {
            bit_rate,
            sample_rate,
            padding: (b2 >> 1) & 0x01 == 1,
            protection_absent: b1 & 0x01 == 1,
        })
    }

    pub fn frame_size(&self) -> usize {
        frame_size(
            self.bit_rate,
            self.sample_rate,
            self.padding,
            self.protection_absent,
        )
    }

    pub fn seconds(&self) -> f64 {
        SAMPLES_PER_FRAME / f64::from(self.sample_rate)
    }
}

/// Sum the play time of every MPEG frame in `data`.
///
/// ID3v2 tags are jumped over; any other byte that does not start a frame
/// advances the scan by one. Returns `None` when no frame was found.
pub fn scan_duration(data: &[u8]) -> Result<Option<f64>> {
    let mut pos = 0;
    let mut frames = 0u64;
    let mut seconds = 0.0;

    while pos + 4 <= data.len() {
        if data[pos..].starts_with(MAGIC) && pos + 10 <= data.len() {
            let size = syncsafe(&data[pos + 6..pos + 10]) as usize;
            pos += 10 + size;
            continue;
        }

        if data[pos] == 0xFF && data[pos + 1] & 0xE0 == 0xE0 {
            let header = FrameHeader::parse(&data[pos..])?;
            seconds += header.seconds();
            frames += 1;
            pos += header.frame_size().max(1);
            continue;
        }

        pos += 1;
    }

    debug!("scanned {} MPEG frames", frames);
    Ok((frames > 0).then_some(seconds))
}
