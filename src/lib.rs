//! Embed and recover keyword-tagged text metadata in PNG files.
//!
//! Metadata lives in an ancillary `tEXt` chunk (`keyword`, NUL, `text`)
//! inserted immediately before the terminal `IEND` chunk. All operations
//! work on in-memory byte buffers and return new buffers; the input is
//! never modified.
//!
//! # Quick Start
//!
//! ```
//! use pngtext_io::{embed, extract, test_utils::MINIMAL_PNG, DEFAULT_KEYWORD};
//!
//! let png = embed(&MINIMAL_PNG, DEFAULT_KEYWORD, r#"{"name":"X"}"#);
//! assert_eq!(png.len(), MINIMAL_PNG.len() + 33);
//!
//! assert_eq!(extract(&png, DEFAULT_KEYWORD).as_deref(), Some(r#"{"name":"X"}"#));
//! assert_eq!(extract(&MINIMAL_PNG, DEFAULT_KEYWORD), None);
//! ```
//!
//! # Strict Mode
//!
//! The free functions never fail: malformed input is recovered from the
//! same way a browser-side reader would (see [`CodecOptions`]). Use a strict
//! [`TextCodec`] to have malformed input reported instead:
//!
//! ```
//! use pngtext_io::{CodecOptions, Error, TextCodec};
//!
//! let codec = TextCodec::with_options(CodecOptions::new().strict());
//! let result = codec.embed(b"not a png at all", "whispers", "{}");
//! assert!(matches!(result, Err(Error::InvalidFormat(_))));
//! ```

mod chunk;
mod codec;
pub mod crc;
mod error;
#[cfg(feature = "json")]
mod json;
mod segment;
mod splice;
mod text;

pub use chunk::{
    chunks, find_chunk, has_signature, ChunkIter, ChunkRef, ChunkType, ScanFault, PNG_SIGNATURE,
};
pub use codec::{validate_keyword, CodecOptions, TextCodec};
pub use error::{Error, Result};
#[cfg(feature = "json")]
pub use json::{embed_json, extract_json};
pub use segment::{ByteRange, CHUNK_OVERHEAD, MAX_CHUNK_LENGTH, MAX_KEYWORD_LENGTH};
pub use splice::{remove_ranges, splice, InsertionPoint};
pub use text::{build_text_chunk, find_text, text_chunks, write_chunk, TextEntry, TextPayload};

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Keyword the application stores its records under
pub const DEFAULT_KEYWORD: &str = "whispers";

/// Return a copy of `png` with `text` embedded under `keyword`
///
/// The new tEXt chunk goes immediately before `IEND`. If no `IEND` can be
/// found, it goes 12 bytes before the end of the buffer, on the assumption
/// that those bytes are an `IEND` chunk the scan could not confirm. This
/// never fails; on input that is not a PNG the output is not one either.
pub fn embed(png: &[u8], keyword: &str, text: &str) -> Vec<u8> {
    InsertionPoint::locate_lenient(png).insert(png, &build_text_chunk(keyword, text))
}

/// Text stored under `keyword`, or `None` if the PNG has no such tEXt chunk
///
/// Invalid UTF-8 in the stored text is replaced with U+FFFD.
pub fn extract(png: &[u8], keyword: &str) -> Option<String> {
    find_text(png, keyword).map(|(_, payload)| payload.text_lossy().into_owned())
}

/// Every keyword/text pair stored in tEXt chunks, in file order
pub fn text_entries(png: &[u8]) -> Vec<TextEntry> {
    text_chunks(png).map(|(_, payload)| payload.to_entry()).collect()
}
