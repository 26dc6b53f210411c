//! The mask container format
//!
//! Masks persist as a minimal single-channel lossless container: an
//! 8-byte signature followed by length-prefixed chunks, each protected
//! by a CRC32 over its type and payload.
//!
//! - `IHDR` - width, height, 8-bit depth, grayscale
//! - `tEXt` - the mask's normalized bounds as UTF-8 text
//! - `IDAT` - scanlines (one leading filter byte of 0 per row) inside a
//!   zlib stream whose deflate payload uses stored blocks only
//! - `IEND` - terminator
//!
//! The stored-mode framing keeps encoding trivially lossless and keeps
//! the decoder small: a conforming stream is rejected outright if it
//! uses any other deflate block type or any non-zero row filter.

use crate::checksum::{Crc32, adler32, crc32};
use crate::error::{CodecError, CodecResult};
use maproom_core::{Bounds, RoomMask};

/// Container signature
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const KEYWORD_BOUNDS: &[u8] = b"bounds";

/// Largest stored deflate block payload
const STORED_BLOCK_MAX: usize = 65535;

/// Encode a mask into container bytes
///
/// Chunk order is fixed: header, bounds metadata, image data, end.
/// Round-trip through [`decode_mask`] is bit-exact for width, height,
/// bounds and coverage data.
pub fn encode_mask(mask: &RoomMask) -> Vec<u8> {
    let width = mask.width();
    let height = mask.height();

    let mut out = Vec::with_capacity(
        SIGNATURE.len() + 12 + 13 + 64 + mask.data().len() + mask.data().len() / STORED_BLOCK_MAX * 5 + 64,
    );
    out.extend_from_slice(&SIGNATURE);

    // IHDR: width, height, bit depth 8, color type 0 (grayscale),
    // compression 0, filter 0, interlace 0
    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 0, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &ihdr);

    // tEXt: keyword "bounds", NUL, then the four fields as decimal text
    let b = mask.bounds();
    let text = format!("{} {} {} {}", b.min_x(), b.min_y(), b.max_x(), b.max_y());
    let mut text_payload = Vec::with_capacity(KEYWORD_BOUNDS.len() + 1 + text.len());
    text_payload.extend_from_slice(KEYWORD_BOUNDS);
    text_payload.push(0);
    text_payload.extend_from_slice(text.as_bytes());
    write_chunk(&mut out, b"tEXt", &text_payload);

    // IDAT: filter byte 0 + row bytes per scanline, zlib-wrapped stored
    // deflate
    let mut raw = Vec::with_capacity(height as usize * (width as usize + 1));
    for y in 0..height {
        raw.push(0);
        let start = (y * width) as usize;
        raw.extend_from_slice(&mask.data()[start..start + width as usize]);
    }
    write_chunk(&mut out, b"IDAT", &zlib_stored(&raw));

    write_chunk(&mut out, b"IEND", &[]);
    out
}

/// Decode container bytes back into a mask
///
/// # Errors
///
/// Any framing defect is a hard error; there is no partial decode. See
/// [`CodecError`] for the failure taxonomy.
pub fn decode_mask(bytes: &[u8]) -> CodecResult<RoomMask> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(CodecError::BadSignature);
    }

    let mut pos = SIGNATURE.len();
    let mut header: Option<(u32, u32)> = None;
    let mut bounds: Option<Bounds> = None;
    let mut idat = Vec::new();
    let mut seen_end = false;
    let mut first = true;

    while pos < bytes.len() {
        let (chunk_type, payload, next) = read_chunk(bytes, pos)?;
        pos = next;

        if first && &chunk_type != b"IHDR" {
            return Err(CodecError::MissingHeader);
        }
        first = false;

        match &chunk_type {
            b"IHDR" => {
                header = Some(parse_header(payload)?);
            }
            b"tEXt" => {
                if let Some(text) = bounds_text(payload) {
                    bounds = Some(parse_bounds(text)?);
                }
            }
            b"IDAT" => {
                idat.extend_from_slice(payload);
            }
            b"IEND" => {
                seen_end = true;
                break;
            }
            other => {
                // Ancillary chunks (lowercase first letter) are skipped;
                // unknown critical chunks are a decode failure.
                if other[0] & 0x20 == 0 {
                    return Err(CodecError::UnknownCriticalChunk(
                        String::from_utf8_lossy(other).into_owned(),
                    ));
                }
            }
        }
    }

    let (width, height) = header.ok_or(CodecError::MissingHeader)?;
    if !seen_end {
        return Err(CodecError::Truncated("missing end chunk"));
    }
    if idat.is_empty() {
        return Err(CodecError::Truncated("missing image data"));
    }

    let raw = zlib_unstored(&idat)?;
    let row_len = width as usize + 1;
    let expected = height as usize * row_len;
    if raw.len() != expected {
        return Err(CodecError::PixelLengthMismatch {
            expected,
            actual: raw.len(),
        });
    }

    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let row = &raw[y * row_len..(y + 1) * row_len];
        if row[0] != 0 {
            return Err(CodecError::UnsupportedFilter(row[0]));
        }
        data.extend_from_slice(&row[1..]);
    }

    let bounds = bounds.unwrap_or_else(Bounds::full);
    Ok(RoomMask::from_data(width, height, bounds, data)?)
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(payload);
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(payload);
    out.extend_from_slice(&crc.finish().to_be_bytes());
}

fn read_chunk(bytes: &[u8], pos: usize) -> CodecResult<([u8; 4], &[u8], usize)> {
    if bytes.len() < pos + 8 {
        return Err(CodecError::Truncated("chunk header"));
    }
    let len = u32::from_be_bytes(bytes[pos..pos + 4].try_into().unwrap()) as usize;
    let mut chunk_type = [0u8; 4];
    chunk_type.copy_from_slice(&bytes[pos + 4..pos + 8]);

    let payload_start = pos + 8;
    let crc_start = payload_start + len;
    if bytes.len() < crc_start + 4 {
        return Err(CodecError::Truncated("chunk payload"));
    }
    let payload = &bytes[payload_start..crc_start];
    let stored_crc = u32::from_be_bytes(bytes[crc_start..crc_start + 4].try_into().unwrap());

    let mut crc = Crc32::new();
    crc.update(&chunk_type);
    crc.update(payload);
    let actual = crc.finish();
    if actual != stored_crc {
        return Err(CodecError::CrcMismatch {
            chunk: String::from_utf8_lossy(&chunk_type).into_owned(),
            expected: stored_crc,
            actual,
        });
    }

    Ok((chunk_type, payload, crc_start + 4))
}

fn parse_header(payload: &[u8]) -> CodecResult<(u32, u32)> {
    if payload.len() != 13 {
        return Err(CodecError::UnsupportedHeader(format!(
            "header length {}",
            payload.len()
        )));
    }
    let width = u32::from_be_bytes(payload[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(payload[4..8].try_into().unwrap());
    let (depth, color, compression, filter, interlace) =
        (payload[8], payload[9], payload[10], payload[11], payload[12]);
    if depth != 8 || color != 0 {
        return Err(CodecError::UnsupportedHeader(format!(
            "depth {depth}, color type {color}"
        )));
    }
    if compression != 0 || filter != 0 || interlace != 0 {
        return Err(CodecError::UnsupportedHeader(format!(
            "compression {compression}, filter {filter}, interlace {interlace}"
        )));
    }
    if width == 0 || height == 0 {
        return Err(CodecError::UnsupportedHeader(format!(
            "dimensions {width}x{height}"
        )));
    }
    Ok((width, height))
}

/// Extract the text of a `bounds` metadata chunk, if that is its keyword
fn bounds_text(payload: &[u8]) -> Option<&[u8]> {
    let nul = payload.iter().position(|&b| b == 0)?;
    (&payload[..nul] == KEYWORD_BOUNDS).then(|| &payload[nul + 1..])
}

fn parse_bounds(text: &[u8]) -> CodecResult<Bounds> {
    let text = std::str::from_utf8(text)
        .map_err(|_| CodecError::BadBoundsMetadata("not utf-8".into()))?;
    let mut fields = text.split_ascii_whitespace();
    let mut next = || -> CodecResult<f64> {
        fields
            .next()
            .ok_or_else(|| CodecError::BadBoundsMetadata(format!("too few fields in {text:?}")))?
            .parse::<f64>()
            .map_err(|_| CodecError::BadBoundsMetadata(format!("bad number in {text:?}")))
    };
    let (min_x, min_y, max_x, max_y) = (next()?, next()?, next()?, next()?);
    Bounds::new(min_x, min_y, max_x, max_y)
        .map_err(|_| CodecError::BadBoundsMetadata(format!("out of range: {text:?}")))
}

/// Wrap raw bytes in a zlib stream whose deflate payload is stored-mode
/// blocks only
fn zlib_stored(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len() + raw.len() / STORED_BLOCK_MAX * 5 + 16);
    // CMF: deflate, 32K window. FLG chosen so (CMF<<8 | FLG) % 31 == 0.
    out.push(0x78);
    out.push(0x01);

    if raw.is_empty() {
        // A single empty final stored block
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
    } else {
        let mut offset = 0;
        while offset < raw.len() {
            let len = (raw.len() - offset).min(STORED_BLOCK_MAX);
            let last = offset + len == raw.len();
            out.push(if last { 0x01 } else { 0x00 });
            let len16 = len as u16;
            out.extend_from_slice(&len16.to_le_bytes());
            out.extend_from_slice(&(!len16).to_le_bytes());
            out.extend_from_slice(&raw[offset..offset + len]);
            offset += len;
        }
    }

    out.extend_from_slice(&adler32(raw).to_be_bytes());
    out
}

/// Unwrap a stored-mode zlib stream
fn zlib_unstored(stream: &[u8]) -> CodecResult<Vec<u8>> {
    if stream.len() < 6 {
        return Err(CodecError::BadZlibFraming("stream too short"));
    }
    let cmf = stream[0];
    let flg = stream[1];
    if cmf & 0x0F != 8 {
        return Err(CodecError::BadZlibFraming("compression method is not deflate"));
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err(CodecError::BadZlibFraming("header check failed"));
    }
    if flg & 0x20 != 0 {
        return Err(CodecError::BadZlibFraming("preset dictionary not allowed"));
    }

    let mut out = Vec::new();
    let mut pos = 2;
    loop {
        if pos >= stream.len() {
            return Err(CodecError::BadZlibFraming("missing final block"));
        }
        let block_header = stream[pos];
        pos += 1;
        let bfinal = block_header & 0x01 != 0;
        let btype = (block_header >> 1) & 0x03;
        if btype != 0 {
            return Err(CodecError::UnsupportedCompression(btype));
        }
        if stream.len() < pos + 4 {
            return Err(CodecError::BadZlibFraming("truncated stored block header"));
        }
        let len = u16::from_le_bytes(stream[pos..pos + 2].try_into().unwrap());
        let nlen = u16::from_le_bytes(stream[pos + 2..pos + 4].try_into().unwrap());
        pos += 4;
        if len != !nlen {
            return Err(CodecError::StoredLengthMismatch);
        }
        if stream.len() < pos + len as usize {
            return Err(CodecError::BadZlibFraming("truncated stored block"));
        }
        out.extend_from_slice(&stream[pos..pos + len as usize]);
        pos += len as usize;
        if bfinal {
            break;
        }
    }

    if stream.len() < pos + 4 {
        return Err(CodecError::BadZlibFraming("missing adler32"));
    }
    let expected = u32::from_be_bytes(stream[pos..pos + 4].try_into().unwrap());
    let actual = adler32(&out);
    if expected != actual {
        return Err(CodecError::AdlerMismatch { expected, actual });
    }

    Ok(out)
}

/// CRC32 of arbitrary container bytes, exposed for diagnostics
pub fn container_crc(bytes: &[u8]) -> u32 {
    crc32(bytes)
}
