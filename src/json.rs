//! Typed JSON records stored as tEXt chunks
//!
//! Records are serialized with `serde_json` and embedded like any other
//! text; the chunk layer never looks inside them.

use crate::{codec::TextCodec, error::Result};
use serde::{de::DeserializeOwned, Serialize};

impl TextCodec {
    /// Serialize `record` as JSON and embed it under `keyword`
    pub fn embed_json<T: Serialize + ?Sized>(
        &self,
        png: &[u8],
        keyword: &str,
        record: &T,
    ) -> Result<Vec<u8>> {
        let text = serde_json::to_string(record)?;
        self.embed(png, keyword, &text)
    }

    /// Like [`Self::embed_json`], replacing any record already stored under `keyword`
    pub fn replace_json<T: Serialize + ?Sized>(
        &self,
        png: &[u8],
        keyword: &str,
        record: &T,
    ) -> Result<Vec<u8>> {
        let text = serde_json::to_string(record)?;
        self.replace(png, keyword, &text)
    }

    /// Extract and parse the JSON record stored under `keyword`
    pub fn extract_json<T: DeserializeOwned>(&self, png: &[u8], keyword: &str) -> Result<Option<T>> {
        match self.extract(png, keyword)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

/// Serialize `record` and embed it under `keyword`
pub fn embed_json<T: Serialize + ?Sized>(png: &[u8], keyword: &str, record: &T) -> Result<Vec<u8>> {
    TextCodec::new().embed_json(png, keyword, record)
}

/// Extract and parse the JSON record stored under `keyword`
///
/// `Ok(None)` when no record is present; an error when one is present but
/// does not parse as `T`.
pub fn extract_json<T: DeserializeOwned>(png: &[u8], keyword: &str) -> Result<Option<T>> {
    TextCodec::new().extract_json(png, keyword)
}
