use crate::foundation::core::Rect;
use crate::model::card::{FrameRect, PhotoSettings};

/// Where a photo lands inside its frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoPlacement {
    /// Cover-fit rectangle for the blurred, darkened backdrop.
    pub backdrop: Rect,
    /// Contain-fit rectangle scaled and panned by the user settings.
    pub foreground: Rect,
    /// Both layers are clipped to this.
    pub clip: Rect,
}

/// Size that covers `frame` completely while keeping `aspect`.
pub fn cover_size(frame: FrameRect, aspect: f64) -> (f64, f64) {
    let aspect = sane_aspect(frame, aspect);
    if aspect < frame.aspect_ratio() {
        (frame.w, frame.w / aspect)
    } else {
        (frame.h * aspect, frame.h)
    }
}

/// Size that fits inside `frame` while keeping `aspect`.
pub fn contain_size(frame: FrameRect, aspect: f64) -> (f64, f64) {
    let aspect = sane_aspect(frame, aspect);
    if aspect < frame.aspect_ratio() {
        (frame.h * aspect, frame.h)
    } else {
        (frame.w, frame.w / aspect)
    }
}

pub fn cover_rect(frame: FrameRect, aspect: f64) -> Rect {
    let (w, h) = cover_size(frame, aspect);
    Rect::from_center_size(frame.center(), (w, h))
}

pub fn place_photo(frame: FrameRect, aspect: f64, settings: PhotoSettings) -> PhotoPlacement {
    let (w, h) = contain_size(frame, aspect);
    let (w, h) = (w * settings.scale, h * settings.scale);
    let c = frame.center();
    let x0 = c.x - w / 2.0 + settings.x;
    let y0 = c.y - h / 2.0 + settings.y;
    PhotoPlacement {
        backdrop: cover_rect(frame, aspect),
        foreground: Rect::new(x0, y0, x0 + w, y0 + h),
        clip: frame.to_rect(),
    }
}

// Degenerate image dimensions fall back to the frame's own aspect.
fn sane_aspect(frame: FrameRect, aspect: f64) -> f64 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        frame.aspect_ratio()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/place/fit.rs"]
mod tests;
