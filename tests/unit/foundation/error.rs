use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        NewscardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(NewscardError::asset("x").to_string().contains("asset error:"));
    assert!(
        NewscardError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        NewscardError::export("x")
            .to_string()
            .contains("export error:")
    );
}

#[test]
fn tainted_message_explains_local_upload() {
    let msg = NewscardError::Tainted.to_string();
    assert!(msg.contains("CORS"));
    assert!(msg.contains("我自己上傳圖卡"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = NewscardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
