#![no_main]

use libfuzzer_sys::fuzz_target;
use pngtext_io::{TextCodec, DEFAULT_KEYWORD};

fuzz_target!(|data: &[u8]| {
    let text = r#"{"name":"fuzz"}"#;

    // Lenient embed always succeeds and always grows the buffer by one chunk
    let out = pngtext_io::embed(data, DEFAULT_KEYWORD, text);
    assert_eq!(out.len(), data.len() + 12 + DEFAULT_KEYWORD.len() + 1 + text.len());

    // Whenever the input had a reachable IEND, the record must read back
    let point = pngtext_io::InsertionPoint::locate(data);
    if !point.is_fallback() && pngtext_io::extract(data, DEFAULT_KEYWORD).is_none() {
        assert_eq!(pngtext_io::extract(&out, DEFAULT_KEYWORD).as_deref(), Some(text));
    }

    let _ = TextCodec::new().replace(data, DEFAULT_KEYWORD, text);
});
