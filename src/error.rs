//! Error types for pngtext-io

use std::io;
use std::string::FromUtf8Error;

/// Result type for pngtext-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning or rewriting PNG buffers
///
/// The lenient entry points ([`crate::embed`], [`crate::extract`]) never
/// return these; they are surfaced by a [`crate::TextCodec`] configured
/// with [`crate::CodecOptions::strict`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// No IEND chunk, so there is no safe insertion point
    #[error("PNG stream has no IEND chunk")]
    MissingIend,

    /// Keyword is empty, too long, or contains a NUL byte
    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),

    /// Text payload is not valid UTF-8
    #[error("Invalid text: {0}")]
    InvalidText(#[from] FromUtf8Error),

    /// Data size exceeds maximum allowed
    #[error("Data too large: {size} bytes (max: {max})")]
    DataTooLarge { size: usize, max: usize },

    /// Invalid chunk
    #[error("Invalid chunk at offset {offset}: {reason}")]
    InvalidSegment { offset: u64, reason: String },

    /// Stored chunk CRC does not match the computed one
    #[error("CRC mismatch in {chunk_type} chunk at offset {offset}: stored {stored:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        offset: u64,
        chunk_type: String,
        stored: u32,
        computed: u32,
    },

    /// JSON record could not be serialized or parsed
    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
