use super::*;

#[test]
fn classify_sources() {
    assert_eq!(SourceKind::classify("data:image/png;base64,AAAA"), SourceKind::DataUrl);
    assert_eq!(SourceKind::classify("https://i.meee.com.tw/x.png"), SourceKind::Remote);
    assert_eq!(SourceKind::classify("HTTP://example.com/a.png"), SourceKind::Remote);
    assert_eq!(SourceKind::classify("photos/a.png"), SourceKind::File);
    assert_eq!(SourceKind::classify("file:///tmp/a.png"), SourceKind::File);
    assert_eq!(SourceKind::classify("日本"), SourceKind::File);
}

#[test]
fn data_url_roundtrip() {
    let url = encode_data_url("image/png", &[1, 2, 3, 250]);
    assert!(url.starts_with("data:image/png;base64,"));
    assert_eq!(decode_data_url(&url).unwrap(), vec![1, 2, 3, 250]);
}

#[test]
fn data_url_without_base64_is_rejected() {
    assert!(decode_data_url("data:text/plain,hello").is_err());
    assert!(decode_data_url("data:image/png;base64").is_err());
    assert!(decode_data_url("data:image/png;base64,@@@").is_err());
}

#[test]
fn file_sources_resolve_against_base_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.bin"), [9u8, 8, 7]).unwrap();
    let fetcher = DefaultFetcher::new().unwrap().with_base_dir(dir.path());

    let got = fetcher.fetch("a.bin").unwrap();
    assert_eq!(got.bytes, vec![9, 8, 7]);
    assert_eq!(got.origin, ImageOrigin::Local);

    let abs = format!("file://{}", dir.path().join("a.bin").display());
    assert_eq!(fetcher.fetch(&abs).unwrap().bytes, vec![9, 8, 7]);

    assert!(fetcher.fetch("missing.png").is_err());
}

#[test]
fn short_source_truncates_long_strings() {
    assert_eq!(short_source("a.png"), "a.png");
    let long = "x".repeat(200);
    let s = short_source(&long);
    assert_eq!(s.len(), 67);
    assert!(s.ends_with("..."));
}
