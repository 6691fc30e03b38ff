use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::assets::decode::{ImageOrigin, LoadedImage};
use crate::text::font::FixedAdvance;

fn img(w: u32, h: u32) -> ImageStatus {
    ImageStatus::Loaded(Arc::new(
        LoadedImage::solid(w, h, [10, 20, 30, 255], ImageOrigin::Local).unwrap(),
    ))
}

fn no_images() -> HashMap<String, ImageStatus> {
    HashMap::new()
}

fn full_card() -> CardState {
    let mut c = CardState::default();
    c.reporter_name = "王小明".to_string();
    c.interviewee_name = "陳大文".to_string();
    c.interviewee_title = "立委".to_string();
    c.photo_credit = "翻攝 Threads".to_string();
    c.map_image = Some("map.png".to_string());
    c.reporter_photo = Some("r.png".to_string());
    c.interviewee_photo = Some("i.png".to_string());
    c
}

fn all_loaded(c: &CardState) -> HashMap<String, ImageStatus> {
    c.image_sources()
        .into_iter()
        .map(|s| (s.to_string(), img(200, 100)))
        .collect()
}

fn text_ops(plan: &CardPlan, layer: LayerKind) -> Vec<TextOp> {
    plan.ops_in(layer)
        .filter_map(|op| match op {
            DrawOp::Text(t) => Some(t.clone()),
            _ => None,
        })
        .collect()
}

fn image_ops(plan: &CardPlan, layer: LayerKind) -> Vec<ImageOp> {
    plan.ops_in(layer)
        .filter_map(|op| match op {
            DrawOp::Image(i) => Some(i.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn full_card_paints_in_fixed_order() {
    let c = full_card();
    let plan = compose_card(&c, &all_loaded(&c), &mut FixedAdvance::default());
    assert_eq!(
        plan.layers(),
        vec![
            LayerKind::Clear,
            LayerKind::Background,
            LayerKind::Map,
            LayerKind::IntervieweePhoto,
            LayerKind::PhotoCredit,
            LayerKind::Overlay,
            LayerKind::ReporterPhoto,
            LayerKind::ReporterCaption,
            LayerKind::IntervieweeCaption,
        ]
    );
    assert_eq!(plan.canvas, Canvas::CARD);
}

#[test]
fn transparent_mode_drops_background_map_interviewee_and_credit() {
    let mut c = full_card();
    c.is_transparent_mode = true;
    let plan = compose_card(&c, &all_loaded(&c), &mut FixedAdvance::default());
    for layer in [
        LayerKind::Background,
        LayerKind::Map,
        LayerKind::IntervieweePhoto,
        LayerKind::PhotoCredit,
    ] {
        assert!(!plan.has_layer(layer), "{layer:?} should be absent");
    }
    assert!(plan.has_layer(LayerKind::Overlay));
    assert!(plan.has_layer(LayerKind::ReporterPhoto));
    assert!(plan.has_layer(LayerKind::ReporterCaption));
    assert!(plan.has_layer(LayerKind::IntervieweeCaption));
}

#[test]
fn background_placeholder_reports_status() {
    let c = CardState::default();
    let mut images: HashMap<String, ImageStatus> = HashMap::new();
    let plan = compose_card(&c, &images, &mut FixedAdvance::default());
    let texts = text_ops(&plan, LayerKind::Background);
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].text, LOADING_TEXT);
    assert_eq!(texts[0].origin, Point::new(960.0, 540.0));
    assert!(matches!(
        plan.ops_in(LayerKind::Background).next(),
        Some(DrawOp::FillRect { color, .. }) if *color == PLACEHOLDER_COLOR
    ));

    images.insert(c.solid_template.clone(), ImageStatus::Failed);
    let plan = compose_card(&c, &images, &mut FixedAdvance::default());
    assert_eq!(text_ops(&plan, LayerKind::Background)[0].text, LOAD_FAILED_TEXT);
}

#[test]
fn unloaded_photos_and_overlay_are_skipped() {
    let c = full_card();
    let mut images = HashMap::new();
    images.insert(c.solid_template.clone(), img(1920, 1080));
    let plan = compose_card(&c, &images, &mut FixedAdvance::default());
    assert!(!plan.has_layer(LayerKind::Map));
    assert!(!plan.has_layer(LayerKind::IntervieweePhoto));
    assert!(!plan.has_layer(LayerKind::Overlay));
    assert!(!plan.has_layer(LayerKind::ReporterPhoto));
    assert!(plan.has_layer(LayerKind::PhotoCredit));
}

#[test]
fn photo_has_clipped_backdrop_then_foreground() {
    let c = full_card();
    let plan = compose_card(&c, &all_loaded(&c), &mut FixedAdvance::default());
    let ops = image_ops(&plan, LayerKind::ReporterPhoto);
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].filter, Some(BACKDROP_FILTER));
    assert_eq!(ops[1].filter, None);
    let frame = c.reporter_frame.to_rect();
    assert_eq!(ops[0].clip, Some(frame));
    assert_eq!(ops[1].clip, Some(frame));
    assert!(ops[0].dest.width() >= frame.width() - 1e-9);
    assert!(ops[0].dest.height() >= frame.height() - 1e-9);
}

#[test]
fn scale_three_triples_foreground() {
    let c = full_card();
    let images = all_loaded(&c);
    let base = compose_card(&c, &images, &mut FixedAdvance::default());
    let scaled_card = crate::model::edit::with_setting(
        &c,
        Subject::Interviewee,
        crate::model::edit::SettingField::Scale,
        3.0,
    );
    let scaled = compose_card(&scaled_card, &images, &mut FixedAdvance::default());

    let a = image_ops(&base, LayerKind::IntervieweePhoto)[1].dest;
    let b = image_ops(&scaled, LayerKind::IntervieweePhoto)[1].dest;
    assert!((b.width() - 3.0 * a.width()).abs() < 1e-6);
    assert!((b.height() - 3.0 * a.height()).abs() < 1e-6);
    assert!((a.center().x - b.center().x).abs() < 1e-6);
    assert!((a.center().y - b.center().y).abs() < 1e-6);
}

#[test]
fn reporter_caption_strokes_white_then_fills_black() {
    let mut c = CardState::default();
    c.reporter_name = "王明".to_string();
    let plan = compose_card(&c, &no_images(), &mut FixedAdvance::default());
    let texts = text_ops(&plan, LayerKind::ReporterCaption);
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0].text, "記者 王 明");
    assert_eq!(
        texts[0].paint,
        TextPaint::Stroke {
            color: Rgba8::WHITE,
            width: REPORTER_STROKE_WIDTH
        }
    );
    assert_eq!(texts[1].paint, TextPaint::Fill(Rgba8::BLACK));
    assert_eq!(texts[0].vertical, VerticalAnchor::Middle);
}

#[test]
fn interviewee_caption_double_stroke_and_colors() {
    let c = full_card();
    let plan = compose_card(&c, &no_images(), &mut FixedAdvance::default());
    let texts = text_ops(&plan, LayerKind::IntervieweeCaption);
    assert_eq!(texts.len(), 6);

    assert!(texts[0].shadow.is_some());
    assert!(texts[1].shadow.is_none());
    assert!(matches!(texts[0].paint, TextPaint::Stroke { color, .. } if color == INTERVIEWEE_STROKE));
    assert!(matches!(texts[1].paint, TextPaint::Stroke { color, .. } if color == INTERVIEWEE_STROKE));
    assert_eq!(texts[2].paint, TextPaint::Fill(Rgba8::WHITE));
    assert_eq!(texts[2].text, "立委");
    assert_eq!(texts[5].paint, TextPaint::Fill(Rgba8::YELLOW));
    assert_eq!(texts[5].text, "陳大文");
    assert_eq!(texts[5].font.size_px, 78.0);
}

#[test]
fn photo_credit_is_right_aligned_and_shadowed() {
    let c = full_card();
    let plan = compose_card(&c, &all_loaded(&c), &mut FixedAdvance::default());
    let texts = text_ops(&plan, LayerKind::PhotoCredit);
    assert_eq!(texts.len(), 1);
    let credit = &texts[0];
    assert_eq!(credit.align, TextAlign::Right);
    assert_eq!(credit.origin, PHOTO_CREDIT_ORIGIN);
    let TextPaint::Fill(color) = credit.paint else {
        panic!("credit should be filled");
    };
    assert_eq!((color.r, color.g, color.b), (255, 255, 255));
    assert!((178..=179).contains(&color.a));
    assert_eq!(credit.shadow.map(|s| s.blur), Some(4.0));
}
