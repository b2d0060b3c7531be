//! Buffer splicing
//!
//! All edits are copy-on-write: the input buffer is never modified and the
//! result is a fresh buffer.

use crate::{
    chunk::{chunks, ChunkType, ScanFault},
    segment::{ByteRange, CHUNK_OVERHEAD},
};

/// Where a new chunk goes, and how that position was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Offset of the `IEND` chunk found by scanning
    BeforeIend(usize),

    /// `IEND` not found; assume the last 12 bytes are it
    Fallback {
        offset: usize,
        fault: Option<ScanFault>,
    },
}

impl InsertionPoint {
    /// Locate the insertion point for `buf`
    pub fn locate(buf: &[u8]) -> Self {
        let mut iter = chunks(buf);
        match iter.find(|chunk| chunk.chunk_type == ChunkType::IEND) {
            Some(iend) => Self::BeforeIend(iend.offset),
            None => Self::Fallback {
                offset: buf.len().saturating_sub(CHUNK_OVERHEAD),
                fault: iter.fault(),
            },
        }
    }

    /// Locate the insertion point, warning when the fallback is used
    pub(crate) fn locate_lenient(buf: &[u8]) -> Self {
        let point = Self::locate(buf);
        if let Self::Fallback { offset, .. } = point {
            log::warn!(
                "IEND chunk not found, assuming the last 12 bytes are IEND (inserting at {})",
                offset
            );
        }
        point
    }

    /// Copy `buf` with a serialized chunk inserted at this point
    pub fn insert(&self, buf: &[u8], chunk: &[u8]) -> Vec<u8> {
        log::debug!("Inserting {} byte chunk at offset {}", chunk.len(), self.offset());
        splice(buf, self.offset(), chunk)
    }

    /// Byte offset to insert at
    pub fn offset(&self) -> usize {
        match *self {
            Self::BeforeIend(offset) | Self::Fallback { offset, .. } => offset,
        }
    }

    /// Whether the `IEND` scan failed and the heuristic position was used
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Copy `buf` with `insert` placed at `position`
///
/// Bytes at or after `position` move forward by `insert.len()`. A position
/// past the end of `buf` appends.
pub fn splice(buf: &[u8], position: usize, insert: &[u8]) -> Vec<u8> {
    let position = position.min(buf.len());

    let mut out = Vec::with_capacity(buf.len() + insert.len());
    out.extend_from_slice(&buf[..position]);
    out.extend_from_slice(insert);
    out.extend_from_slice(&buf[position..]);
    out
}

/// Copy `buf` without the given ranges
///
/// Ranges must be sorted by offset and must not overlap; anything outside
/// the buffer is ignored.
pub fn remove_ranges(buf: &[u8], ranges: &[ByteRange]) -> Vec<u8> {
    let removed = ranges
        .iter()
        .fold(0usize, |total, r| total.saturating_add(r.size));
    let mut out = Vec::with_capacity(buf.len().saturating_sub(removed));

    let mut cursor = 0;
    for range in ranges {
        let start = range.offset.clamp(cursor, buf.len());
        let end = range.end_offset().clamp(start, buf.len());
        out.extend_from_slice(&buf[cursor..start]);
        cursor = end;
    }
    out.extend_from_slice(&buf[cursor..]);
    out
}
