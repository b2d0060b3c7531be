//! Byte ranges and size limits for chunks inside a PNG buffer

/// A byte range in a buffer (offset and size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// Offset from start of buffer
    pub offset: usize,
    /// Size in bytes
    pub size: usize,
}

impl ByteRange {
    /// Create a new byte range
    pub fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// Get the end offset of this range (saturating at `usize::MAX`)
    pub fn end_offset(&self) -> usize {
        self.offset.saturating_add(self.size)
    }

    /// Check if this range is immediately followed by another (contiguous)
    pub fn is_contiguous_with(&self, other: &ByteRange) -> bool {
        self.end_offset() == other.offset
    }

    /// Borrow the bytes covered by this range, if it lies within `buf`
    pub fn slice<'a>(&self, buf: &'a [u8]) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(self.size)?;
        buf.get(self.offset..end)
    }
}

/// Bytes a chunk occupies besides its data: length (4) + type (4) + CRC (4)
pub const CHUNK_OVERHEAD: usize = 12;

/// Largest chunk data length the PNG format allows (2^31 - 1)
///
/// Strict scans reject anything above this, which also keeps a corrupt
/// length field from requesting a multi-GB allocation.
pub const MAX_CHUNK_LENGTH: usize = 0x7FFFFFFF;

/// Longest keyword a tEXt chunk may carry, in bytes
pub const MAX_KEYWORD_LENGTH: usize = 79;
