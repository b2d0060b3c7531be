//! Embed and extract keyword-tagged text in PNG buffers

use crate::{
    chunk::{chunks, has_signature, ChunkRef, ChunkType, ScanFault},
    error::{Error, Result},
    segment::{ByteRange, MAX_CHUNK_LENGTH, MAX_KEYWORD_LENGTH},
    splice::{remove_ranges, InsertionPoint},
    text::{build_text_chunk, text_chunks, TextEntry, TextPayload},
};
use std::io::Write;

/// Options controlling how malformed input is treated
///
/// The default is lenient: nothing is validated, truncated chunks end the
/// scan quietly, and a PNG without `IEND` gets new chunks inserted 12 bytes
/// before its end. Strict mode turns each of those into an [`Error`].
///
/// # Example
///
/// ```
/// use pngtext_io::{CodecOptions, TextCodec};
///
/// let codec = TextCodec::with_options(CodecOptions::new().strict().verify_crc(true));
/// assert!(codec.options().is_strict());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodecOptions {
    strict: bool,
    verify_crc: bool,
}

impl CodecOptions {
    /// Lenient options (same as `CodecOptions::default()`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject malformed input instead of recovering from it
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Check the CRC of each tEXt chunk before trusting its contents
    ///
    /// Mismatching chunks are skipped, or reported in strict mode.
    pub fn verify_crc(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn verifies_crc(&self) -> bool {
        self.verify_crc
    }
}

/// PNG tEXt metadata codec
///
/// Stateless apart from its options; every call works on its own input and
/// returns a new buffer, so one codec can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec {
    options: CodecOptions,
}

impl TextCodec {
    /// Lenient codec
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Return a copy of `png` with a tEXt chunk carrying `keyword`/`text`
    /// inserted immediately before `IEND`
    ///
    /// Existing chunks with the same keyword are kept; see [`Self::replace`].
    pub fn embed(&self, png: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
        let chunk = self.build(keyword, text)?;
        Ok(self.insertion_point(png)?.insert(png, &chunk))
    }

    /// Like [`Self::embed`], streaming the result into `writer`
    pub fn embed_to<W: Write>(
        &self,
        png: &[u8],
        keyword: &str,
        text: &str,
        writer: &mut W,
    ) -> Result<()> {
        let chunk = self.build(keyword, text)?;
        let at = self.insertion_point(png)?.offset().min(png.len());
        writer.write_all(&png[..at])?;
        writer.write_all(&chunk)?;
        writer.write_all(&png[at..])?;
        Ok(())
    }

    /// Text of the first tEXt chunk carrying `keyword`
    ///
    /// `Ok(None)` is the ordinary "no embedded metadata" result.
    pub fn extract(&self, png: &[u8], keyword: &str) -> Result<Option<String>> {
        self.check_signature(png)?;

        let mut iter = chunks(png);
        for chunk in iter.by_ref() {
            if chunk.chunk_type != ChunkType::TEXT {
                continue;
            }
            let Some(payload) = TextPayload::parse(chunk.data(png)) else {
                continue;
            };
            if !payload.has_keyword(keyword) || !self.crc_ok(png, &chunk)? {
                continue;
            }

            log::debug!("Found tEXt chunk '{}' at offset {}", keyword, chunk.offset);
            let text = if self.options.strict {
                payload.text_utf8()?
            } else {
                payload.text_lossy().into_owned()
            };
            return Ok(Some(text));
        }

        self.check_fault(iter.fault())?;
        Ok(None)
    }

    /// Every keyword/text pair stored in tEXt chunks, in file order
    pub fn entries(&self, png: &[u8]) -> Result<Vec<TextEntry>> {
        self.check_signature(png)?;

        let mut entries = Vec::new();
        for (chunk, payload) in text_chunks(png) {
            if self.crc_ok(png, &chunk)? {
                entries.push(payload.to_entry());
            }
        }

        self.check_fault(self.scan_fault(png))?;
        Ok(entries)
    }

    /// Return a copy of `png` without any tEXt chunk carrying `keyword`,
    /// along with the number of chunks removed
    pub fn remove(&self, png: &[u8], keyword: &str) -> Result<(Vec<u8>, usize)> {
        self.check_signature(png)?;
        self.check_fault(self.scan_fault(png))?;

        let ranges: Vec<ByteRange> = text_chunks(png)
            .filter(|(_, payload)| payload.has_keyword(keyword))
            .map(|(chunk, _)| chunk.range())
            .collect();

        if !ranges.is_empty() {
            log::debug!("Removing {} tEXt chunk(s) '{}'", ranges.len(), keyword);
        }
        Ok((remove_ranges(png, &ranges), ranges.len()))
    }

    /// Replace every tEXt chunk carrying `keyword` with a single new one
    /// placed before `IEND`
    pub fn replace(&self, png: &[u8], keyword: &str, text: &str) -> Result<Vec<u8>> {
        let (stripped, _) = self.remove(png, keyword)?;
        self.embed(&stripped, keyword, text)
    }

    /// Where [`Self::embed`] would insert a new chunk
    pub fn insertion_point(&self, png: &[u8]) -> Result<InsertionPoint> {
        if !self.options.strict {
            return Ok(InsertionPoint::locate_lenient(png));
        }

        self.check_signature(png)?;
        // Also catches an IEND whose CRC is cut off
        self.check_fault(self.scan_fault(png))?;
        match InsertionPoint::locate(png) {
            InsertionPoint::Fallback { .. } => Err(Error::MissingIend),
            point => Ok(point),
        }
    }

    fn build(&self, keyword: &str, text: &str) -> Result<Vec<u8>> {
        if self.options.strict {
            validate_keyword(keyword)?;
            let size = keyword.len() + 1 + text.len();
            if size > MAX_CHUNK_LENGTH {
                return Err(Error::DataTooLarge {
                    size,
                    max: MAX_CHUNK_LENGTH,
                });
            }
        }
        Ok(build_text_chunk(keyword, text))
    }

    fn check_signature(&self, png: &[u8]) -> Result<()> {
        if self.options.strict && !has_signature(png) {
            return Err(Error::InvalidFormat("Not a PNG file".into()));
        }
        Ok(())
    }

    fn check_fault(&self, fault: Option<ScanFault>) -> Result<()> {
        match fault {
            Some(fault) if self.options.strict => Err(fault.into()),
            _ => Ok(()),
        }
    }

    fn scan_fault(&self, png: &[u8]) -> Option<ScanFault> {
        let mut iter = chunks(png);
        iter.by_ref().for_each(drop);
        iter.fault()
    }

    /// Whether a chunk's CRC is acceptable under the current options
    fn crc_ok(&self, png: &[u8], chunk: &ChunkRef) -> Result<bool> {
        if !self.options.verify_crc {
            return Ok(true);
        }
        match chunk.verify_crc(png) {
            Ok(()) => Ok(true),
            Err(e) if self.options.strict => Err(e),
            Err(e) => {
                log::warn!("Skipping tEXt chunk: {}", e);
                Ok(false)
            }
        }
    }
}

/// Check a keyword against the PNG rules: 1-79 bytes, no NUL
pub fn validate_keyword(keyword: &str) -> Result<()> {
    if keyword.is_empty() {
        return Err(Error::InvalidKeyword("keyword is empty".into()));
    }
    if keyword.len() > MAX_KEYWORD_LENGTH {
        return Err(Error::InvalidKeyword(format!(
            "keyword is {} bytes (max {})",
            keyword.len(),
            MAX_KEYWORD_LENGTH
        )));
    }
    if keyword.as_bytes().contains(&0) {
        return Err(Error::InvalidKeyword("keyword contains NUL".into()));
    }
    Ok(())
}
