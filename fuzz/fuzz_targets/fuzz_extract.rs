#![no_main]

use libfuzzer_sys::fuzz_target;
use pngtext_io::{CodecOptions, TextCodec, DEFAULT_KEYWORD};

fuzz_target!(|data: &[u8]| {
    // Scanning arbitrary bytes should NEVER panic, only return None or errors
    let _ = pngtext_io::extract(data, DEFAULT_KEYWORD);
    let _ = pngtext_io::text_entries(data);

    let strict = TextCodec::with_options(CodecOptions::new().strict().verify_crc(true));
    let _ = strict.extract(data, DEFAULT_KEYWORD);
    let _ = strict.entries(data);
    let _ = strict.remove(data, DEFAULT_KEYWORD);
});
