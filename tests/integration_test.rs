// Integration tests using the test_utils module

#[cfg(test)]
mod embed_extract_tests {
    use pngtext_io::{
        chunks, crc::chunk_crc, embed, extract, find_chunk, test_utils::*, text_entries,
        ChunkType, TextCodec, DEFAULT_KEYWORD,
    };

    fn fixtures() -> Vec<Vec<u8>> {
        vec![
            MINIMAL_PNG.to_vec(),
            IEND_ONLY_PNG.to_vec(),
            PngFixture::new().build(),
            PngFixture::new()
                .text("Comment", "made by hand")
                .chunk(b"IDAT", &[0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01])
                .chunk(b"tIME", &[0x07, 0xEA, 10, 19, 12, 0, 0])
                .build(),
        ]
    }

    fn texts() -> Vec<&'static str> {
        vec![
            "",
            "{}",
            r#"{"name":"X","character":"c","bans":"","avatar":""}"#,
            "caf\u{e9} \u{4e2d}\u{6587} \u{1F600}",
            "line one\nline two\r\n\ttabbed",
        ]
    }

    #[test]
    fn test_round_trip() {
        for png in fixtures() {
            for keyword in ["whispers", "k", "x-meta"] {
                for text in texts() {
                    let out = embed(&png, keyword, text);
                    assert_eq!(
                        extract(&out, keyword).as_deref(),
                        Some(text),
                        "keyword {:?} text {:?}",
                        keyword,
                        text
                    );
                }
            }
        }
    }

    #[test]
    fn test_non_destructive() {
        let png = PngFixture::new().text("Comment", "made by hand").build();
        let before: Vec<_> = chunks(&png)
            .map(|c| (c.chunk_type, c.data(&png).to_vec()))
            .collect();

        let out = embed(&png, DEFAULT_KEYWORD, "{}");
        assert_eq!(extract(&out, "Comment").as_deref(), Some("made by hand"));

        // Every original chunk survives, in order, with the new one before IEND
        let after: Vec<_> = chunks(&out)
            .map(|c| (c.chunk_type, c.data(&out).to_vec()))
            .collect();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len() - 1], before[..before.len() - 1]);
        assert_eq!(after[before.len() - 1].0, ChunkType::TEXT);
        assert_eq!(after.last(), before.last());

        // Bytes before the insertion point are untouched
        let iend = find_chunk(&png, ChunkType::IEND).unwrap().offset;
        assert_eq!(out[..iend], png[..iend]);
        assert_eq!(out[out.len() - 12..], png[iend..]);
    }

    #[test]
    fn test_absence() {
        for png in fixtures() {
            assert_eq!(extract(&png, DEFAULT_KEYWORD), None);
        }
        let out = embed(&MINIMAL_PNG, "other", "{}");
        assert_eq!(extract(&out, DEFAULT_KEYWORD), None);
        assert_eq!(extract(&out, ""), None);
    }

    #[test]
    fn test_length_invariant() {
        for png in fixtures() {
            for text in texts() {
                let out = embed(&png, DEFAULT_KEYWORD, text);
                assert_eq!(
                    out.len(),
                    png.len() + 12 + DEFAULT_KEYWORD.len() + 1 + text.len()
                );
            }
        }
    }

    #[test]
    fn test_inserted_chunk_crc() {
        let out = embed(&MINIMAL_PNG, "whispers", "{}");
        let chunk = find_chunk(&out, ChunkType::TEXT).unwrap();
        let data = chunk.data(&out);
        assert_eq!(data, b"whispers\0{}");

        let crc_at = chunk.data_range().end_offset();
        let stored = u32::from_be_bytes(out[crc_at..crc_at + 4].try_into().unwrap());
        assert_eq!(stored, chunk_crc(b"tEXt", data));
        assert_eq!(stored, 0x81AC86F8);
        chunk.verify_crc(&out).unwrap();
    }

    #[test]
    fn test_multiple_keywords_coexist() {
        let out = embed(&MINIMAL_PNG, "whispers", r#"{"name":"X"}"#);
        let out = embed(&out, "other", "second");

        assert_eq!(extract(&out, "whispers").as_deref(), Some(r#"{"name":"X"}"#));
        assert_eq!(extract(&out, "other").as_deref(), Some("second"));

        let keywords: Vec<String> = text_entries(&out).into_iter().map(|e| e.keyword).collect();
        assert_eq!(keywords, ["whispers", "other"]);
    }

    #[test]
    fn test_iend_adjacency() {
        for png in fixtures() {
            let iend_before = find_chunk(&png, ChunkType::IEND).unwrap().offset;
            let out = embed(&png, DEFAULT_KEYWORD, "{}");
            let iend_after = find_chunk(&out, ChunkType::IEND).unwrap().offset;
            let data_len = DEFAULT_KEYWORD.len() + 1 + 2;

            assert_eq!(iend_after, iend_before + 12 + data_len);

            let inserted = chunks(&out).find(|c| c.offset == iend_before).unwrap();
            let iend = find_chunk(&out, ChunkType::IEND).unwrap();
            assert_eq!(inserted.chunk_type, ChunkType::TEXT);
            assert!(inserted.range().is_contiguous_with(&iend.range()));
        }
    }

    #[test]
    fn test_minimal_png_scenario() {
        assert_eq!(MINIMAL_PNG.len(), 67);
        let out = embed(&MINIMAL_PNG, "whispers", "{\"name\":\"X\"}");
        assert_eq!(out.len(), 67 + 12 + 8 + 1 + 12);
        assert_eq!(out.len(), 100);
        assert_eq!(extract(&out, "whispers").as_deref(), Some("{\"name\":\"X\"}"));

        let chunk = find_chunk(&out, ChunkType::TEXT).unwrap();
        assert_eq!(chunk.offset, 55);
        assert_eq!(&out[out.len() - 12..], &IEND_ONLY_PNG[8..]);
    }

    #[test]
    fn test_input_not_modified() {
        let png = MINIMAL_PNG.to_vec();
        let codec = TextCodec::new();
        let _ = embed(&png, DEFAULT_KEYWORD, "{}");
        let _ = codec.replace(&png, DEFAULT_KEYWORD, "{}").unwrap();
        assert_eq!(png, MINIMAL_PNG.to_vec());
    }

    #[test]
    fn test_replace_then_extract() {
        let codec = TextCodec::new();
        let v1 = embed(&MINIMAL_PNG, DEFAULT_KEYWORD, r#"{"name":"old"}"#);
        let v2 = codec.replace(&v1, DEFAULT_KEYWORD, r#"{"name":"new"}"#).unwrap();
        assert_eq!(extract(&v2, DEFAULT_KEYWORD).as_deref(), Some(r#"{"name":"new"}"#));
        assert_eq!(v2.len(), v1.len());
    }

    #[test]
    fn test_threads_share_codec() {
        let codec = TextCodec::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                scope.spawn(move || {
                    let text = format!("{{\"n\":{}}}", i);
                    let out = codec.embed(&MINIMAL_PNG, DEFAULT_KEYWORD, &text).unwrap();
                    assert_eq!(codec.extract(&out, DEFAULT_KEYWORD).unwrap(), Some(text));
                });
            }
        });
    }
}
