use super::*;

#[test]
fn empty_engine_measures_zero_and_shapes_nothing() {
    let mut engine = TextEngine::new();
    let font = FontSpec::new(FontFace::Bold, 60.0);
    assert!(engine.shape("記者", font).is_none());
    assert_eq!(engine.measure("記者", font), 0.0);
    assert!(engine.resolve_face(FontFace::Brand).is_none());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    let mut engine = TextEngine::new();
    let err = engine
        .register_face(FontFace::Regular, b"not a font".to_vec())
        .unwrap_err();
    assert!(err.to_string().contains("validation error"));
    assert!(!engine.has_face(FontFace::Regular));
}

#[test]
fn missing_font_file_is_reported_with_path() {
    let cfg = FontConfig {
        bold: Some("/definitely/missing/font.ttf".into()),
        ..FontConfig::default()
    };
    let err = TextEngine::from_config(&cfg).err().unwrap();
    assert!(err.to_string().contains("missing/font.ttf"));
}

#[test]
fn fallback_chain_starts_with_requested_face() {
    for face in FontFace::ALL {
        assert_eq!(face.fallback_chain()[0], face);
    }
}

fn fixture_font() -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans-Bold.ttf");
    std::fs::read(path).unwrap()
}

#[test]
fn registered_font_shapes_positioned_glyphs() {
    let mut engine = TextEngine::new();
    engine.register_face(FontFace::Bold, fixture_font()).unwrap();

    let shaped = engine
        .shape("Reporter", FontSpec::new(FontFace::Bold, 60.0))
        .unwrap();
    assert_eq!(shaped.glyphs.len(), 8);
    assert_eq!(shaped.face, FontFace::Bold);
    assert!(shaped.width > 0.0);
    assert!(shaped.ascent > 0.0);
    assert!(shaped.glyphs.windows(2).all(|g| g[1].x > g[0].x));
    assert!(shaped.glyphs.iter().all(|g| g.y.abs() < 1e-3));
    let last = shaped.glyphs.last().unwrap();
    assert!(f64::from(last.x) < shaped.width);

    let measured = engine.measure("Reporter", FontSpec::new(FontFace::Bold, 60.0));
    assert_eq!(measured, shaped.width);
    let doubled = engine.measure("Reporter", FontSpec::new(FontFace::Bold, 120.0));
    assert!((doubled - 2.0 * measured).abs() < 1.0);
}

#[test]
fn missing_face_falls_back_to_registered_one() {
    let mut engine = TextEngine::new();
    engine.register_face(FontFace::Bold, fixture_font()).unwrap();
    assert_eq!(engine.resolve_face(FontFace::Brand), Some(FontFace::Bold));
    let shaped = engine
        .shape("TVBS", FontSpec::new(FontFace::Brand, 60.0))
        .unwrap();
    assert_eq!(shaped.face, FontFace::Bold);
    assert!(shaped.width > 0.0);
}
