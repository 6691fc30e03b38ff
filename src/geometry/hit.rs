use crate::foundation::core::Point;
use crate::model::card::{FrameRect, TextLayout};

/// Side length of the bottom-right resize handle of a frame.
pub const RESIZE_HANDLE_SIZE: f64 = 40.0;
/// Estimated caption height as a multiple of its base font size.
pub const TEXT_HIT_HEIGHT_FACTOR: f64 = 1.5;

/// On-screen placement of the canvas element, in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Map a client-space pointer position into canvas space.
///
/// The display rect must be the one current at event time; a collapsed display axis maps
/// with unit scale instead of producing non-finite coordinates.
pub fn canvas_point(
    client_x: f64,
    client_y: f64,
    display: DisplayRect,
    canvas_width: f64,
    canvas_height: f64,
) -> Point {
    let scale_x = axis_scale(canvas_width, display.width);
    let scale_y = axis_scale(canvas_height, display.height);
    Point::new(
        (client_x - display.left) * scale_x,
        (client_y - display.top) * scale_y,
    )
}

fn axis_scale(canvas: f64, displayed: f64) -> f64 {
    if displayed > 0.0 && displayed.is_finite() {
        canvas / displayed
    } else {
        1.0
    }
}

/// Inclusive containment on both axes.
pub fn rect_contains(p: Point, r: FrameRect) -> bool {
    p.x >= r.x && p.x <= r.x + r.w && p.y >= r.y && p.y <= r.y + r.h
}

/// Containment in the bottom-right `handle_size` square of `r`.
pub fn handle_contains(p: Point, r: FrameRect, handle_size: f64) -> bool {
    p.x >= r.x + r.w - handle_size
        && p.x <= r.x + r.w
        && p.y >= r.y + r.h - handle_size
        && p.y <= r.y + r.h
}

pub fn estimated_text_height(layout: &TextLayout) -> f64 {
    layout.size * TEXT_HIT_HEIGHT_FACTOR
}

/// Containment in a box centered on the caption anchor.
pub fn text_bounds_contains(
    p: Point,
    layout: &TextLayout,
    measured_width: f64,
    estimated_height: f64,
) -> bool {
    let half_w = measured_width / 2.0;
    let half_h = estimated_height / 2.0;
    p.x >= layout.x - half_w
        && p.x <= layout.x + half_w
        && p.y >= layout.y - half_h
        && p.y <= layout.y + half_h
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hit.rs"]
mod tests;
