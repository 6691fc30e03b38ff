use super::*;
use crate::model::template::TemplateKind;
use crate::text::font::FixedAdvance;

fn state() -> CardState {
    CardState::defaults(TemplateKind::Interview)
}

#[test]
fn two_character_names_get_a_middle_space() {
    assert_eq!(reporter_display_name("王明"), "王 明");
    assert_eq!(reporter_display_name("王小明"), "王小明");
    assert_eq!(reporter_display_name("王"), "王");
    assert_eq!(reporter_text("記者", "王小明"), "記者 王小明");
    assert_eq!(reporter_text("記者", "王明"), "記者 王 明");
    assert_eq!(reporter_text("", "王小明"), "王小明");
    assert_eq!(reporter_text("記者", ""), "記者");
}

#[test]
fn split_brand_keeps_tokens_in_order() {
    assert_eq!(
        split_brand("TVBS記者 王小明"),
        vec![("TVBS", true), ("記者 王小明", false)]
    );
    assert_eq!(
        split_brand("a TVBS b TVBS"),
        vec![("a ", false), ("TVBS", true), (" b ", false), ("TVBS", true)]
    );
    assert_eq!(split_brand("plain"), vec![("plain", false)]);
}

#[test]
fn reporter_plain_caption_is_centered_and_compressed() {
    let mut s = state();
    s.reporter_name = "王小明".into();
    s.reporter_text_layout = TextLayout::new(360.0, 685.0, 200.0, 50.0);
    let mut measure = FixedAdvance::default();
    let cap = layout_reporter_caption(&s, &mut measure).unwrap();

    // "記者 王小明" is 6 chars at 50px.
    assert_eq!(cap.total_width, 300.0);
    assert!((cap.compression - 200.0 / 300.0).abs() < 1e-12);
    assert_eq!(cap.vertical, VerticalAnchor::Middle);
    assert_eq!(cap.y, 685.0);
    let seg = &cap.segments[0];
    assert_eq!(seg.text, "記者 王小明");
    assert_eq!(seg.font, FontSpec::new(FontFace::Bold, 50.0));
    assert!((seg.width - 200.0).abs() < 1e-9);
    assert!((seg.x - 260.0).abs() < 1e-9);
}

#[test]
fn reporter_brand_caption_compresses_uniformly_without_touching_font_size() {
    let mut s = state();
    s.reporter_title = "TVBS記者".into();
    s.reporter_name = "王小明".into();
    s.reporter_text_layout = TextLayout::new(400.0, 600.0, 300.0, 40.0);
    let mut measure = FixedAdvance::default();
    let cap = layout_reporter_caption(&s, &mut measure).unwrap();

    assert_eq!(cap.segments.len(), 2);
    assert_eq!(cap.segments[0].role, SegmentRole::Brand);
    assert_eq!(cap.segments[0].font.face, FontFace::Brand);
    assert_eq!(cap.segments[1].font.face, FontFace::Bold);
    for seg in &cap.segments {
        assert_eq!(seg.font.size_px, 40.0);
        assert!((seg.width - seg.natural_width * cap.compression).abs() < 1e-9);
    }
    // "TVBS" (4) + "記者 王小明" (6) at 40px.
    assert_eq!(cap.total_width, 400.0);
    assert!((cap.rendered_width() - 300.0).abs() < 1e-9);
    assert!((cap.segments[0].x - 250.0).abs() < 1e-9);
    assert!((cap.segments[1].x - (250.0 + 160.0 * 0.75)).abs() < 1e-9);
    assert!((cap.y - (600.0 + 40.0 * BASELINE_CENTER_OFFSET)).abs() < 1e-9);
    assert_eq!(cap.vertical, VerticalAnchor::Baseline);
}

#[test]
fn reporter_caption_within_width_is_not_compressed() {
    let mut s = state();
    s.reporter_name = "王明".into();
    let mut measure = FixedAdvance { em_ratio: 0.5 };
    let cap = layout_reporter_caption(&s, &mut measure).unwrap();
    assert_eq!(cap.compression, 1.0);
    assert_eq!(cap.segments[0].text, "記者 王 明");
}

#[test]
fn empty_reporter_fields_produce_no_caption() {
    let mut s = state();
    s.reporter_title.clear();
    let mut measure = FixedAdvance::default();
    assert!(layout_reporter_caption(&s, &mut measure).is_none());
}

#[test]
fn interviewee_caption_sizes_and_gaps() {
    let mut s = state();
    s.interviewee_title = " 立委 ".into();
    s.interviewee_name = "陳大文".into();
    s.is_voice_altered = true;
    s.interviewee_text_layout = TextLayout::new(1000.0, 760.0, 50.0, 10.0);
    let mut measure = FixedAdvance::default();
    let cap = layout_interviewee_caption(&s, &mut measure).unwrap();

    let roles: Vec<_> = cap.segments.iter().map(|s| s.role).collect();
    assert_eq!(roles, vec![SegmentRole::Title, SegmentRole::Name, SegmentRole::Tag]);
    assert_eq!(cap.segments[0].text, "立委");
    assert_eq!(cap.segments[1].font.size_px, 13.0);
    assert_eq!(cap.segments[2].font.size_px, 10.0);
    assert_eq!(cap.segments[2].text, VOICE_ALTERED_TAG);

    // 20 + 15 + 39 + 15 + 60; the max width never compresses this caption.
    assert!((cap.total_width - 149.0).abs() < 1e-9);
    assert_eq!(cap.compression, 1.0);
    assert!((cap.segments[0].x - (1000.0 - 74.5)).abs() < 1e-9);
    assert!((cap.segments[1].x - (1000.0 - 74.5 + 35.0)).abs() < 1e-9);
    assert_eq!(cap.y, 760.0);
}

#[test]
fn interviewee_tag_alone_is_not_drawn() {
    let mut s = state();
    s.is_voice_altered = true;
    let mut measure = FixedAdvance::default();
    assert!(layout_interviewee_caption(&s, &mut measure).is_none());
}

#[test]
fn compression_never_enlarges() {
    assert_eq!(compression_for(100.0, 300.0), 1.0);
    assert_eq!(compression_for(0.0, 10.0), 1.0);
    assert_eq!(compression_for(100.0, 50.0), 0.5);
    assert_eq!(compression_for(100.0, -5.0), 0.0);
}
