//! Mask container regression tests
//!
//! Round-trip exactness across sizes, plus cross-validation against an
//! independent PNG implementation: everything we emit must be readable
//! by a stock decoder, and foreign compressed streams must be rejected
//! by ours.

use maproom_codec::{CodecError, decode_mask, encode_mask};
use maproom_core::{Bounds, RoomMask};
use std::io::Cursor;

/// Build a mask with a deterministic non-trivial pattern
fn patterned_mask(w: u32, h: u32, bounds: Bounds) -> RoomMask {
    let mut mask = RoomMask::new(w, h, bounds).unwrap();
    for y in 0..h {
        for x in 0..w {
            mask.set_unchecked(x, y, ((x.wrapping_mul(31) ^ y.wrapping_mul(7)) % 256) as u8);
        }
    }
    mask
}

#[test]
fn test_roundtrip_across_sizes() {
    let bounds = Bounds::new(0.05, 0.1, 0.95, 0.9).unwrap();
    for &(w, h) in &[(8u32, 8u32), (33, 17), (257, 64), (1024, 8)] {
        let mask = patterned_mask(w, h, bounds);
        let decoded = decode_mask(&encode_mask(&mask)).unwrap();
        assert_eq!(decoded.width(), w);
        assert_eq!(decoded.height(), h);
        assert_eq!(decoded.bounds(), bounds);
        assert_eq!(decoded.data(), mask.data(), "{w}x{h} payload mismatch");
    }
}

#[test]
fn test_all_zero_scenario() {
    // 4x4 all-zero mask with full bounds: identical zero buffer and
    // bounds after the trip.
    let mask = RoomMask::new(4, 4, Bounds::full()).unwrap();
    let decoded = decode_mask(&encode_mask(&mask)).unwrap();
    assert_eq!(decoded.data(), &[0u8; 16]);
    assert_eq!(decoded.bounds(), Bounds::full());
}

#[test]
fn test_foreign_decoder_reads_our_output() {
    let mask = patterned_mask(40, 25, Bounds::full());
    let bytes = encode_mask(&mask);

    let decoder = png::Decoder::new(Cursor::new(bytes));
    let mut reader = decoder.read_info().expect("foreign decoder rejected header");
    let info = reader.info();
    assert_eq!(info.width, 40);
    assert_eq!(info.height, 25);
    assert_eq!(info.color_type, png::ColorType::Grayscale);
    assert_eq!(info.bit_depth, png::BitDepth::Eight);

    let size = reader.output_buffer_size().unwrap();
    let mut buf = vec![0u8; size];
    let out = reader.next_frame(&mut buf).expect("foreign decoder rejected data");
    assert_eq!(&buf[..out.buffer_size()], mask.data());
}

#[test]
fn test_compressed_stream_rejected() {
    // A real encoder compresses its image data; our decoder only accepts
    // stored-mode blocks and must fail loudly, never partially.
    let mut mask_bytes = Vec::new();
    for i in 0..64 * 64 {
        mask_bytes.push((i % 200) as u8);
    }

    let mut encoded = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut encoded, 64, 64);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&mask_bytes).unwrap();
    }

    match decode_mask(&encoded) {
        Err(CodecError::UnsupportedCompression(_)) => {}
        other => panic!("expected UnsupportedCompression, got {other:?}"),
    }
}

#[test]
fn test_chunk_order() {
    // Header first, end last, image data in between.
    let bytes = encode_mask(&patterned_mask(9, 9, Bounds::full()));
    let pos = |tag: &[u8]| bytes.windows(4).position(|w| w == tag).unwrap();
    assert_eq!(pos(b"IHDR"), 12);
    assert!(pos(b"tEXt") < pos(b"IDAT"));
    assert!(pos(b"IDAT") < pos(b"IEND"));
}
