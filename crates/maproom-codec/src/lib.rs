//! maproom-codec - Lossless mask persistence
//!
//! This crate owns the byte format masks persist in:
//!
//! - **Container** - signature + chunked layout with per-chunk CRC32
//! - **Checksums** - CRC32 (reflected 0xEDB88320) and Adler32
//! - **Data URLs** - base64 framing for the page boundary
//!
//! The container is a strict subset of PNG (8-bit grayscale, stored-mode
//! deflate, filter 0 scanlines), so any PNG viewer can open a persisted
//! mask while this decoder stays small and rejects everything outside
//! the subset.
//!
//! # Examples
//!
//! ```
//! use maproom_codec::{decode_mask, encode_mask};
//! use maproom_core::{Bounds, RoomMask};
//!
//! let mask = RoomMask::new(8, 8, Bounds::full()).unwrap();
//! let bytes = encode_mask(&mask);
//! let back = decode_mask(&bytes).unwrap();
//! assert_eq!(back.data(), mask.data());
//! ```

pub mod checksum;
pub mod container;
pub mod data_url;
pub mod error;

pub use checksum::{adler32, crc32};
pub use container::{SIGNATURE, decode_mask, encode_mask};
pub use data_url::{decode_data_url, encode_data_url};
pub use error::{CodecError, CodecResult};
