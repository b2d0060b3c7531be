//! tEXt chunk payloads
//!
//! A tEXt chunk's data is `keyword`, one NUL byte, then `text`. Keywords and
//! text are written as UTF-8; on read, the first NUL is the separator and
//! everything after it is the text.

use crate::{
    chunk::{chunks, ChunkRef, ChunkType},
    crc::chunk_crc,
    error::{Error, Result},
    segment::{CHUNK_OVERHEAD, MAX_CHUNK_LENGTH},
};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::borrow::Cow;
use std::io::Write;

/// Keyword/text pair borrowed from a tEXt chunk's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPayload<'a> {
    /// Keyword bytes (never empty, never contains NUL)
    pub keyword: &'a [u8],

    /// Text bytes following the separator
    pub text: &'a [u8],
}

impl<'a> TextPayload<'a> {
    /// Split chunk data at its first NUL byte
    ///
    /// Returns `None` when there is no separator or the keyword is empty.
    pub fn parse(data: &'a [u8]) -> Option<Self> {
        match data.iter().position(|&b| b == 0) {
            Some(nul) if nul > 0 => Some(Self {
                keyword: &data[..nul],
                text: &data[nul + 1..],
            }),
            _ => None,
        }
    }

    /// Whether this payload is tagged with `keyword`
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keyword == keyword.as_bytes()
    }

    /// Keyword, with invalid UTF-8 replaced
    pub fn keyword_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.keyword)
    }

    /// Text, with invalid UTF-8 replaced
    pub fn text_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.text)
    }

    /// Text, failing on invalid UTF-8
    pub fn text_utf8(&self) -> Result<String> {
        Ok(String::from_utf8(self.text.to_vec())?)
    }

    /// Owned copy
    pub fn to_entry(&self) -> TextEntry {
        TextEntry {
            keyword: self.keyword_lossy().into_owned(),
            text: self.text_lossy().into_owned(),
        }
    }
}

/// Owned keyword/text pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextEntry {
    pub keyword: String,
    pub text: String,
}

/// Chunk data for a tEXt chunk: keyword, NUL, text
pub fn text_data(keyword: &str, text: &str) -> Vec<u8> {
    let mut data = Vec::with_capacity(keyword.len() + 1 + text.len());
    data.extend_from_slice(keyword.as_bytes());
    data.push(0);
    data.extend_from_slice(text.as_bytes());
    data
}

/// Serialize a complete tEXt chunk
///
/// The result is always `keyword.len() + text.len() + 13` bytes. The keyword
/// is not validated; a NUL inside it makes the chunk unreadable under that
/// keyword.
///
/// A payload longer than `u32::MAX` bytes gets a length field of `u32::MAX`
/// rather than a wrapped one, so scanners reject the chunk as oversized
/// instead of misreading a short chunk inside it.
pub fn build_text_chunk(keyword: &str, text: &str) -> Vec<u8> {
    let data = text_data(keyword, text);
    let data_end = 8 + data.len();

    let mut chunk = vec![0u8; data.len() + CHUNK_OVERHEAD];
    BigEndian::write_u32(&mut chunk[0..4], length_field(data.len()));
    chunk[4..8].copy_from_slice(ChunkType::TEXT.as_bytes());
    chunk[8..data_end].copy_from_slice(&data);
    BigEndian::write_u32(
        &mut chunk[data_end..],
        chunk_crc(ChunkType::TEXT.as_bytes(), &data),
    );

    chunk
}

/// Length field for a chunk with `len` data bytes, saturating at `u32::MAX`
fn length_field(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Write a chunk with proper CRC
///
/// Data longer than the PNG chunk limit is refused before anything is written.
pub fn write_chunk<W: Write>(writer: &mut W, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
    if data.len() > MAX_CHUNK_LENGTH {
        return Err(Error::DataTooLarge {
            size: data.len(),
            max: MAX_CHUNK_LENGTH,
        });
    }
    writer.write_u32::<BigEndian>(length_field(data.len()))?;
    writer.write_all(chunk_type.as_bytes())?;
    writer.write_all(data)?;
    writer.write_u32::<BigEndian>(chunk_crc(chunk_type.as_bytes(), data))?;
    Ok(())
}

/// Iterate over the parseable tEXt chunks before `IEND`
pub fn text_chunks(buf: &[u8]) -> impl Iterator<Item = (ChunkRef, TextPayload<'_>)> {
    chunks(buf)
        .filter(|chunk| chunk.chunk_type == ChunkType::TEXT)
        .filter_map(move |chunk| TextPayload::parse(chunk.data(buf)).map(|p| (chunk, p)))
}

/// First tEXt chunk carrying `keyword`
pub fn find_text<'a>(buf: &'a [u8], keyword: &str) -> Option<(ChunkRef, TextPayload<'a>)> {
    text_chunks(buf).find(|(_, payload)| payload.has_keyword(keyword))
}
