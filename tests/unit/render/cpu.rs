use super::*;
use crate::assets::decode::{ImageOrigin, LoadedImage};
use crate::compose::plan::LayerKind;
use crate::foundation::core::{Canvas, Point};
use crate::text::font::FontSpec;

fn small_plan() -> CardPlan {
    let mut plan = CardPlan::new(Canvas {
        width: 8,
        height: 4,
    });
    plan.push(LayerKind::Clear, DrawOp::Clear);
    plan
}

fn backend() -> CpuBackend {
    CpuBackend::new(RenderSettings::default(), TextEngine::new())
}

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * frame.width + x) * 4) as usize;
    [frame.data[i], frame.data[i + 1], frame.data[i + 2], frame.data[i + 3]]
}

fn image_op(origin: ImageOrigin, dest: Rect, clip: Option<Rect>) -> DrawOp {
    DrawOp::Image(ImageOp {
        source: "green.png".to_string(),
        image: Arc::new(LoadedImage::solid(2, 2, [0, 255, 0, 255], origin).unwrap()),
        dest,
        clip,
        filter: None,
    })
}

#[test]
fn fill_rect_covers_target() {
    let mut plan = small_plan();
    plan.push(
        LayerKind::Background,
        DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 8.0, 4.0),
            color: Rgba8::rgb(255, 0, 0),
        },
    );
    let frame = backend().render_plan(&plan).unwrap();
    assert_eq!((frame.width, frame.height), (8, 4));
    assert_eq!(frame.data.len(), 8 * 4 * 4);
    assert!(frame.premultiplied);
    assert!(!frame.tainted);
    assert_eq!(px(&frame, 0, 0), [255, 0, 0, 255]);
    assert_eq!(px(&frame, 7, 3), [255, 0, 0, 255]);
}

#[test]
fn clear_color_shows_through_empty_plan() {
    let mut b = CpuBackend::new(
        RenderSettings {
            clear_rgba: Some([0, 0, 255, 255]),
        },
        TextEngine::new(),
    );
    let frame = b.render_plan(&small_plan()).unwrap();
    assert_eq!(px(&frame, 3, 2), [0, 0, 255, 255]);
}

#[test]
fn image_is_stretched_onto_dest_and_clipped() {
    let mut plan = small_plan();
    plan.push(
        LayerKind::ReporterPhoto,
        image_op(
            ImageOrigin::Local,
            Rect::new(0.0, 0.0, 8.0, 4.0),
            Some(Rect::new(0.0, 0.0, 4.0, 4.0)),
        ),
    );
    let frame = backend().render_plan(&plan).unwrap();
    assert_eq!(px(&frame, 1, 1), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 6, 1), [0, 0, 0, 0]);
}

#[test]
fn uncors_remote_image_taints_frame() {
    let mut plan = small_plan();
    plan.push(
        LayerKind::Background,
        image_op(
            ImageOrigin::Remote { cors_ok: false },
            Rect::new(0.0, 0.0, 8.0, 4.0),
            None,
        ),
    );
    assert!(backend().render_plan(&plan).unwrap().tainted);

    let mut plan = small_plan();
    plan.push(
        LayerKind::Background,
        image_op(
            ImageOrigin::Remote { cors_ok: true },
            Rect::new(0.0, 0.0, 8.0, 4.0),
            None,
        ),
    );
    assert!(!backend().render_plan(&plan).unwrap().tainted);
}

#[test]
fn filtered_image_is_darkened() {
    let mut plan = CardPlan::new(Canvas {
        width: 16,
        height: 16,
    });
    plan.push(LayerKind::Clear, DrawOp::Clear);
    plan.push(
        LayerKind::IntervieweePhoto,
        DrawOp::Image(ImageOp {
            source: "white.png".to_string(),
            image: Arc::new(
                LoadedImage::solid(4, 4, [255, 255, 255, 255], ImageOrigin::Local).unwrap(),
            ),
            dest: Rect::new(0.0, 0.0, 16.0, 16.0),
            clip: Some(Rect::new(0.0, 0.0, 16.0, 16.0)),
            filter: Some(ImageFilter {
                blur_sigma: 4.0,
                brightness: 0.5,
            }),
        }),
    );
    let frame = backend().render_plan(&plan).unwrap();
    let [r, g, b, a] = px(&frame, 8, 8);
    assert_eq!(a, 255);
    for c in [r, g, b] {
        assert!((126..=130).contains(&c), "channel {c}");
    }
}

#[test]
fn text_without_fonts_is_skipped() {
    let mut plan = small_plan();
    plan.push(
        LayerKind::ReporterCaption,
        DrawOp::Text(TextOp {
            text: "記者".to_string(),
            font: FontSpec::new(FontFace::Bold, 20.0),
            origin: Point::new(4.0, 2.0),
            align: TextAlign::Center,
            vertical: VerticalAnchor::Middle,
            max_width: None,
            paint: TextPaint::Fill(Rgba8::BLACK),
            shadow: None,
        }),
    );
    let frame = backend().render_plan(&plan).unwrap();
    assert!(frame.data.iter().all(|&b| b == 0));
}

fn shaped(width: f64) -> ShapedText {
    ShapedText {
        glyphs: Vec::new(),
        width,
        ascent: 40.0,
        descent: 10.0,
        size_px: 50.0,
        face: FontFace::Bold,
    }
}

fn op(align: TextAlign, vertical: VerticalAnchor, max_width: Option<f64>) -> TextOp {
    TextOp {
        text: String::new(),
        font: FontSpec::new(FontFace::Bold, 50.0),
        origin: Point::new(500.0, 300.0),
        align,
        vertical,
        max_width,
        paint: TextPaint::Fill(Rgba8::BLACK),
        shadow: None,
    }
}

#[test]
fn text_transform_aligns_and_compresses() {
    let s = shaped(200.0);
    let t = text_transform(&s, &op(TextAlign::Left, VerticalAnchor::Baseline, None)).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(500.0, 300.0));

    let t = text_transform(&s, &op(TextAlign::Center, VerticalAnchor::Baseline, None)).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(400.0, 300.0));

    let t = text_transform(&s, &op(TextAlign::Right, VerticalAnchor::Middle, None)).unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(300.0, 315.0));

    let t = text_transform(&s, &op(TextAlign::Center, VerticalAnchor::Baseline, Some(100.0)))
        .unwrap();
    assert_eq!(t * Point::ORIGIN, Point::new(450.0, 300.0));
    assert_eq!(t * Point::new(200.0, 0.0), Point::new(550.0, 300.0));

    assert!(text_transform(&s, &op(TextAlign::Left, VerticalAnchor::Baseline, Some(0.0))).is_none());
}

#[test]
fn undrawable_image_is_skipped_and_does_not_taint() {
    let mut plan = small_plan();
    plan.push(
        LayerKind::Background,
        DrawOp::FillRect {
            rect: Rect::new(0.0, 0.0, 8.0, 4.0),
            color: Rgba8::rgb(255, 0, 0),
        },
    );
    plan.push(
        LayerKind::ReporterPhoto,
        DrawOp::Image(ImageOp {
            source: "panorama.png".to_string(),
            image: Arc::new(
                LoadedImage::solid(70_000, 1, [0, 0, 255, 255], ImageOrigin::Remote {
                    cors_ok: false,
                })
                .unwrap(),
            ),
            dest: Rect::new(0.0, 0.0, 8.0, 4.0),
            clip: None,
            filter: None,
        }),
    );
    let frame = backend().render_plan(&plan).unwrap();
    assert_eq!(px(&frame, 4, 2), [255, 0, 0, 255]);
    assert!(!frame.tainted);
}

#[test]
fn image_cache_keeps_only_sources_of_last_plan() {
    let mut b = backend();
    for i in 0..5 {
        let mut plan = small_plan();
        plan.push(
            LayerKind::ReporterPhoto,
            DrawOp::Image(ImageOp {
                source: format!("photo-{i}.png"),
                image: Arc::new(
                    LoadedImage::solid(2, 2, [0, 255, 0, 255], ImageOrigin::Local).unwrap(),
                ),
                dest: Rect::new(0.0, 0.0, 8.0, 4.0),
                clip: None,
                filter: None,
            }),
        );
        b.render_plan(&plan).unwrap();
        assert_eq!(b.image_cache.len(), 1);
        assert!(b.image_cache.contains_key(&format!("photo-{i}.png")));
    }

    b.render_plan(&small_plan()).unwrap();
    assert!(b.image_cache.is_empty());
}
