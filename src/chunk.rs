//! PNG chunk scanner
//!
//! Walks a PNG buffer chunk by chunk starting right after the 8-byte
//! signature. Chunks are never collected; each one is described by a
//! [`ChunkRef`] (offset, declared length, type) valid only for the buffer
//! it was found in.
//!
//! Scanning ends at the first `IEND` chunk, at the end of the buffer, or at
//! the first chunk whose declared length runs past the end of the buffer.
//! Nothing is ever read outside the buffer; a chunk that does not fit is
//! recorded as a [`ScanFault`] and the scan stops there. An `IEND` whose
//! 8-byte header is present is still yielded when its CRC is cut off.

use crate::{
    crc::chunk_crc,
    error::Error,
    segment::{ByteRange, CHUNK_OVERHEAD, MAX_CHUNK_LENGTH},
};
use byteorder::{BigEndian, ByteOrder};
use std::fmt;

/// PNG signature
pub const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// A 4-byte chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header
    pub const IHDR: ChunkType = ChunkType(*b"IHDR");
    /// Image data
    pub const IDAT: ChunkType = ChunkType(*b"IDAT");
    /// Image end; always the last chunk
    pub const IEND: ChunkType = ChunkType(*b"IEND");
    /// Uncompressed Latin-1 keyword/text pair
    pub const TEXT: ChunkType = ChunkType(*b"tEXt");

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Ancillary chunks have a lowercase first letter (bit 5 set)
    pub fn is_ancillary(&self) -> bool {
        self.0[0] & 0x20 != 0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(tag: [u8; 4]) -> Self {
        Self(tag)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

/// A chunk located inside a specific buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRef {
    /// Offset of the chunk's length field
    pub offset: usize,

    /// Declared data length
    pub length: u32,

    /// Chunk type tag
    pub chunk_type: ChunkType,
}

impl ChunkRef {
    /// Whole chunk: length + type + data + CRC
    pub fn range(&self) -> ByteRange {
        ByteRange::new(self.offset, self.length as usize + CHUNK_OVERHEAD)
    }

    /// Data payload only
    pub fn data_range(&self) -> ByteRange {
        ByteRange::new(self.offset + 8, self.length as usize)
    }

    /// Borrow the chunk's data from the buffer it was found in
    ///
    /// Returns an empty slice if `buf` is not that buffer and the range
    /// does not fit.
    pub fn data<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        self.data_range().slice(buf).unwrap_or_default()
    }

    /// CRC stored after the data
    pub fn stored_crc(&self, buf: &[u8]) -> Option<u32> {
        let crc_offset = self.data_range().end_offset();
        ByteRange::new(crc_offset, 4)
            .slice(buf)
            .map(BigEndian::read_u32)
    }

    /// Recompute the CRC over type + data and compare with the stored one
    pub fn verify_crc(&self, buf: &[u8]) -> Result<(), Error> {
        let computed = chunk_crc(self.chunk_type.as_bytes(), self.data(buf));
        match self.stored_crc(buf) {
            Some(stored) if stored == computed => Ok(()),
            stored => Err(Error::CrcMismatch {
                offset: self.offset as u64,
                chunk_type: self.chunk_type.to_string(),
                stored: stored.unwrap_or_default(),
                computed,
            }),
        }
    }
}

/// Why a scan stopped before reaching `IEND` or a clean end of buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFault {
    /// Fewer than 8 bytes left for a chunk header
    TruncatedHeader { offset: usize, remaining: usize },

    /// Declared length runs past the end of the buffer
    TruncatedChunk { offset: usize, length: u32 },

    /// Declared length exceeds the PNG maximum
    Oversized { offset: usize, length: u32 },
}

impl ScanFault {
    /// Offset of the offending chunk
    pub fn offset(&self) -> usize {
        match *self {
            Self::TruncatedHeader { offset, .. }
            | Self::TruncatedChunk { offset, .. }
            | Self::Oversized { offset, .. } => offset,
        }
    }
}

impl From<ScanFault> for Error {
    fn from(fault: ScanFault) -> Self {
        let reason = match fault {
            ScanFault::TruncatedHeader { remaining, .. } => {
                format!("Chunk header truncated: only {} bytes left", remaining)
            }
            ScanFault::TruncatedChunk { length, .. } => {
                format!("Chunk length {} runs past end of buffer", length)
            }
            ScanFault::Oversized { length, .. } => {
                format!("Chunk length too large: {}", length)
            }
        };
        Error::InvalidSegment {
            offset: fault.offset() as u64,
            reason,
        }
    }
}

/// Iterator over the chunks of a PNG buffer
///
/// Yields every chunk up to and including `IEND`, then stops.
#[derive(Debug, Clone)]
pub struct ChunkIter<'a> {
    buf: &'a [u8],
    offset: usize,
    done: bool,
    fault: Option<ScanFault>,
}

impl<'a> ChunkIter<'a> {
    /// Start scanning right after the signature
    ///
    /// The signature itself is not checked.
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            offset: PNG_SIGNATURE.len(),
            done: false,
            fault: None,
        }
    }

    /// The fault that ended the scan early, if any
    pub fn fault(&self) -> Option<ScanFault> {
        self.fault
    }

    fn stop(&mut self, fault: Option<ScanFault>) -> Option<ChunkRef> {
        if let Some(fault) = fault {
            log::warn!("PNG scan stopped: {:?}", fault);
        }
        self.fault = fault;
        self.done = true;
        None
    }
}

impl Iterator for ChunkIter<'_> {
    type Item = ChunkRef;

    fn next(&mut self) -> Option<ChunkRef> {
        if self.done {
            return None;
        }

        let offset = self.offset;
        let remaining = self.buf.len().saturating_sub(offset);
        if remaining == 0 {
            return self.stop(None);
        }
        if remaining < 8 {
            return self.stop(Some(ScanFault::TruncatedHeader { offset, remaining }));
        }

        let length = BigEndian::read_u32(&self.buf[offset..offset + 4]);
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.buf[offset + 4..offset + 8]);

        if length as usize > MAX_CHUNK_LENGTH {
            return self.stop(Some(ScanFault::Oversized { offset, length }));
        }

        let chunk = ChunkRef {
            offset,
            length,
            chunk_type: ChunkType(tag),
        };

        let total = length as usize + CHUNK_OVERHEAD;
        if total > remaining {
            let fault = ScanFault::TruncatedChunk { offset, length };
            if chunk.chunk_type != ChunkType::IEND {
                return self.stop(Some(fault));
            }
            // IEND header is intact; only its tail is missing. It still marks
            // the end of the chunk stream, but the fault is kept for strict callers.
            self.stop(Some(fault));
            return Some(chunk);
        }

        // Nothing after IEND is part of the chunk stream
        if chunk.chunk_type == ChunkType::IEND {
            self.done = true;
        }
        self.offset += total;

        Some(chunk)
    }
}

/// Iterate over the chunks of `buf`
pub fn chunks(buf: &[u8]) -> ChunkIter<'_> {
    ChunkIter::new(buf)
}

/// Find the first chunk of the given type
///
/// Returns `None` if the buffer ends, or `IEND` is reached, first.
pub fn find_chunk(buf: &[u8], chunk_type: ChunkType) -> Option<ChunkRef> {
    chunks(buf).find(|chunk| chunk.chunk_type == chunk_type)
}

/// Check for the PNG signature
pub fn has_signature(buf: &[u8]) -> bool {
    buf.len() >= PNG_SIGNATURE.len() && &buf[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}
