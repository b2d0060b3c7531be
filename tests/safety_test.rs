//! Safety tests - malformed input must never panic or read out of bounds
//!
//! These tests verify that size limits and truncation checks are in place.
//! Comprehensive testing should be done with fuzzing (cargo-fuzz).

use pngtext_io::{
    chunks, embed, extract, test_utils::*, text_entries, CodecOptions, Error, InsertionPoint,
    ScanFault, TextCodec, DEFAULT_KEYWORD, MAX_CHUNK_LENGTH, MAX_KEYWORD_LENGTH, PNG_SIGNATURE,
};

fn strict() -> TextCodec {
    TextCodec::with_options(CodecOptions::new().strict())
}

#[test]
fn test_limits() {
    // PNG maximum chunk length
    assert_eq!(MAX_CHUNK_LENGTH, 0x7FFFFFFF);
    assert_eq!(MAX_KEYWORD_LENGTH, 79);
}

#[test]
fn test_png_chunk_length_validation() {
    // PNG with chunk claiming huge size (2GB+)
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&[0x80, 0x00, 0x00, 0x00]); // Length: 2GB
    data.extend_from_slice(b"tEXt");
    data.extend_from_slice(b"whispers\0{}");
    data.extend_from_slice(&[0; 4]); // CRC

    assert_eq!(extract(&data, DEFAULT_KEYWORD), None);

    let result = strict().extract(&data, DEFAULT_KEYWORD);
    assert!(
        matches!(result, Err(Error::InvalidSegment { offset: 8, .. })),
        "Should reject 2GB chunk length"
    );
}

#[test]
fn test_every_truncation_of_embedded_png() {
    let full = embed(&MINIMAL_PNG, DEFAULT_KEYWORD, r#"{"name":"X"}"#);
    let text_end = 55 + 12 + 8 + 1 + 12;

    for len in 0..full.len() {
        let cut = &full[..len];

        // Lenient paths never panic
        let found = extract(cut, DEFAULT_KEYWORD);
        let _ = text_entries(cut);
        let out = embed(cut, "other", "x");
        assert_eq!(out.len(), len + 12 + 5 + 1 + 1);

        // The record is only visible once its chunk is complete
        if len >= text_end {
            assert_eq!(found.as_deref(), Some(r#"{"name":"X"}"#));
        } else {
            assert_eq!(found, None, "len {}", len);
        }

        // Strict mode reports something for every truncation
        assert!(strict().embed(cut, "other", "x").is_err(), "len {}", len);
    }
}

#[test]
fn test_fallback_insertion_is_lenient() {
    // Valid chunk stream with no IEND at all
    let png = PngFixture::new().text("Comment", "x").without_iend().build();
    let point = InsertionPoint::locate(&png);
    assert!(point.is_fallback());

    let out = embed(&png, DEFAULT_KEYWORD, "{}");
    assert_eq!(out.len(), png.len() + 23);
    assert_eq!(&out[..png.len() - 12], &png[..png.len() - 12]);
    assert_eq!(&out[out.len() - 12..], &png[png.len() - 12..]);
}

#[test]
fn test_crc_not_required_by_default() {
    let mut png = embed(&MINIMAL_PNG, DEFAULT_KEYWORD, "{}");
    // Zero out the inserted chunk's CRC
    png[74..78].copy_from_slice(&[0; 4]);

    assert_eq!(extract(&png, DEFAULT_KEYWORD).as_deref(), Some("{}"));

    let verifying = TextCodec::with_options(CodecOptions::new().strict().verify_crc(true));
    assert!(matches!(
        verifying.extract(&png, DEFAULT_KEYWORD),
        Err(Error::CrcMismatch { offset: 55, .. })
    ));
}

#[test]
fn test_garbage_after_signature() {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend_from_slice(&[0xAB; 5]);

    let mut iter = chunks(&data);
    assert_eq!(iter.next(), None);
    assert_eq!(
        iter.fault(),
        Some(ScanFault::TruncatedHeader {
            offset: 8,
            remaining: 5
        })
    );
}

#[test]
fn test_iend_crc_cut_off() {
    // IEND header intact, CRC missing
    let cut = &MINIMAL_PNG[..63];

    let out = embed(cut, DEFAULT_KEYWORD, "{}");
    assert_eq!(&out[..55], &cut[..55]);
    assert_eq!(&out[out.len() - 8..], &cut[55..]);
    assert_eq!(extract(&out, DEFAULT_KEYWORD).as_deref(), Some("{}"));
    assert!(matches!(InsertionPoint::locate(cut), InsertionPoint::BeforeIend(55)));

    assert!(matches!(
        strict().embed(cut, DEFAULT_KEYWORD, "{}"),
        Err(Error::InvalidSegment { offset: 55, .. })
    ));
}
