pub use kurbo::{Affine, Point, Rect, Vec2};

/// Fixed design resolution of a news card.
pub const CANVAS_WIDTH: u32 = 1920;
/// Fixed design resolution of a news card.
pub const CANVAS_HEIGHT: u32 = 1080;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// The 1920x1080 canvas every layout value is expressed in.
    pub const CARD: Canvas = Canvas {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
    };

    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);
    pub const YELLOW: Rgba8 = Rgba8::rgb(0xff, 0xff, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha taken from a `[0, 1]` opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    pub fn to_premul(self) -> [u8; 4] {
        crate::foundation::math::premul_rgba8([self.r, self.g, self.b, self.a])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
