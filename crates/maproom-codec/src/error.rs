//! Error types for maproom-codec

use maproom_core::CoreError;
use thiserror::Error;

/// Codec error type
///
/// Decode failures are always explicit: a mask either decodes bit-exact
/// or the caller gets one of these variants, never a partial buffer.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Byte stream does not start with the container signature
    #[error("bad signature")]
    BadSignature,

    /// Stream ended before a complete chunk or field
    #[error("truncated stream: {0}")]
    Truncated(&'static str),

    /// Chunk CRC32 did not match its payload
    #[error("crc mismatch in {chunk} chunk: expected {expected:#010x}, got {actual:#010x}")]
    CrcMismatch {
        chunk: String,
        expected: u32,
        actual: u32,
    },

    /// First chunk was not the header chunk
    #[error("missing header chunk")]
    MissingHeader,

    /// Header declares a format outside the single-channel container
    #[error("unsupported header: {0}")]
    UnsupportedHeader(String),

    /// A critical chunk this decoder does not know
    #[error("unknown critical chunk: {0}")]
    UnknownCriticalChunk(String),

    /// Compressed stream framing is broken
    #[error("bad zlib framing: {0}")]
    BadZlibFraming(&'static str),

    /// Deflate stream uses a compression mode other than stored blocks
    #[error("unsupported compression: deflate block type {0}")]
    UnsupportedCompression(u8),

    /// Stored block length check failed
    #[error("stored block length mismatch")]
    StoredLengthMismatch,

    /// Adler32 of the decompressed stream did not match
    #[error("adler mismatch: expected {expected:#010x}, got {actual:#010x}")]
    AdlerMismatch { expected: u32, actual: u32 },

    /// A scanline used a row filter other than none
    #[error("unsupported row filter: {0}")]
    UnsupportedFilter(u8),

    /// Decompressed pixel data has the wrong length
    #[error("pixel data length mismatch: expected {expected}, got {actual}")]
    PixelLengthMismatch { expected: usize, actual: usize },

    /// Bounds metadata text did not parse
    #[error("bad bounds metadata: {0}")]
    BadBoundsMetadata(String),

    /// Data-URL framing is broken
    #[error("bad data url: {0}")]
    BadDataUrl(&'static str),

    /// Base64 payload did not decode
    #[error("bad base64: {0}")]
    BadBase64(&'static str),

    /// Core container error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
