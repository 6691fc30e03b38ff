use super::*;

#[test]
fn card_canvas_is_full_hd() {
    assert_eq!(Canvas::CARD.width, 1920);
    assert_eq!(Canvas::CARD.height, 1080);
    assert_eq!(Canvas::CARD.rect(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
}

#[test]
fn with_opacity_rounds_alpha() {
    let c = Rgba8::WHITE.with_opacity(0.5);
    assert_eq!(c.a, 128);
    assert_eq!(Rgba8::BLACK.with_opacity(2.0).a, 255);
    assert_eq!(Rgba8::BLACK.with_opacity(-1.0).a, 0);
}

#[test]
fn premul_scales_color_channels() {
    assert_eq!(Rgba8::rgba(255, 0, 0, 255).to_premul(), [255, 0, 0, 255]);
    assert_eq!(Rgba8::rgba(200, 100, 50, 0).to_premul(), [0, 0, 0, 0]);
}
