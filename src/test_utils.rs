//! Test utilities for building PNG fixtures in memory.
//!
//! This module provides:
//! - [`MINIMAL_PNG`]: the well-known 67-byte 1x1 RGBA PNG
//! - [`IEND_ONLY_PNG`]: a signature followed by nothing but `IEND`
//! - [`PngFixture`]: a builder for arbitrary chunk layouts with correct CRCs
//!
//! # Usage
//!
//! ```
//! use pngtext_io::test_utils::*;
//!
//! let png = PngFixture::new()
//!     .text("Comment", "hello")
//!     .build();
//! assert_eq!(pngtext_io::extract(&png, "Comment").as_deref(), Some("hello"));
//! ```

use crate::{
    chunk::{ChunkType, PNG_SIGNATURE},
    text::{text_data, write_chunk},
};

/// 1x1 RGBA PNG: signature, IHDR, one IDAT, IEND (67 bytes)
pub const MINIMAL_PNG: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR, length 13
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1
    0x08, 0x06, 0x00, 0x00, 0x00, // 8-bit RGBA
    0x1F, 0x15, 0xC4, 0x89, // CRC
    0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, // IDAT, length 10
    0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, // zlib stream
    0x0D, 0x0A, 0x2D, 0xB4, // CRC
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND, length 0
    0xAE, 0x42, 0x60, 0x82, // CRC
];

/// Signature followed by a zero-length IEND chunk (20 bytes)
pub const IEND_ONLY_PNG: [u8; 20] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // signature
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, // IEND, length 0
    0xAE, 0x42, 0x60, 0x82, // CRC
];

/// IHDR data for a 1x1 8-bit RGBA image
const IHDR_1X1: [u8; 13] = [0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0];

/// Builder for PNG fixtures
///
/// Starts with the signature and a 1x1 IHDR chunk. Chunks are appended in
/// call order and `IEND` is added by [`PngFixture::build`] unless
/// [`PngFixture::without_iend`] was called.
#[derive(Debug, Clone)]
pub struct PngFixture {
    bytes: Vec<u8>,
    iend: bool,
}

impl PngFixture {
    pub fn new() -> Self {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&Self::raw_chunk(ChunkType::IHDR.as_bytes(), &IHDR_1X1));
        Self { bytes, iend: true }
    }

    /// Append a chunk of any type
    pub fn chunk(mut self, chunk_type: &[u8; 4], data: &[u8]) -> Self {
        self.bytes.extend_from_slice(&Self::raw_chunk(chunk_type, data));
        self
    }

    /// Append a tEXt chunk
    pub fn text(self, keyword: &str, text: &str) -> Self {
        self.chunk(ChunkType::TEXT.as_bytes(), &text_data(keyword, text))
    }

    /// Leave the IEND chunk off
    pub fn without_iend(mut self) -> Self {
        self.iend = false;
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut bytes = self.bytes;
        if self.iend {
            bytes.extend_from_slice(&Self::raw_chunk(ChunkType::IEND.as_bytes(), &[]));
        }
        bytes
    }

    /// One serialized chunk with a correct CRC
    pub fn raw_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len() + 12);
        // Writing into a Vec cannot fail
        let _ = write_chunk(&mut out, ChunkType(*chunk_type), data);
        out
    }
}

impl Default for PngFixture {
    fn default() -> Self {
        Self::new()
    }
}
