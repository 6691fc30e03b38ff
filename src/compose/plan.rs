use std::sync::Arc;

use crate::assets::decode::LoadedImage;
use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Vec2};
use crate::text::caption::VerticalAnchor;
use crate::text::font::FontSpec;

#[derive(Clone, Debug)]
/// Backend-agnostic draw list for one card render.
///
/// Ops are executed in order onto a cleared surface; later ops paint over earlier ones.
pub struct CardPlan {
    pub canvas: Canvas,
    pub ops: Vec<PlannedOp>,
}

impl CardPlan {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    pub fn push(&mut self, layer: LayerKind, op: DrawOp) {
        self.ops.push(PlannedOp { layer, op });
    }

    /// Layers in paint order, consecutive duplicates collapsed.
    pub fn layers(&self) -> Vec<LayerKind> {
        let mut out: Vec<LayerKind> = Vec::new();
        for op in &self.ops {
            if out.last() != Some(&op.layer) {
                out.push(op.layer);
            }
        }
        out
    }

    pub fn has_layer(&self, layer: LayerKind) -> bool {
        self.ops.iter().any(|op| op.layer == layer)
    }

    pub fn ops_in(&self, layer: LayerKind) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(move |op| op.layer == layer)
            .map(|op| &op.op)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Which part of the card an op belongs to.
pub enum LayerKind {
    Clear,
    Background,
    Map,
    IntervieweePhoto,
    PhotoCredit,
    Overlay,
    ReporterPhoto,
    ReporterCaption,
    IntervieweeCaption,
}

#[derive(Clone, Debug)]
pub struct PlannedOp {
    pub layer: LayerKind,
    pub op: DrawOp,
}

#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Reset the whole surface to the backend's clear color.
    Clear,
    FillRect { rect: Rect, color: Rgba8 },
    Image(ImageOp),
    Text(TextOp),
}

#[derive(Clone, Debug)]
/// Draw a whole image stretched onto `dest`.
pub struct ImageOp {
    pub source: String,
    pub image: Arc<LoadedImage>,
    pub dest: Rect,
    pub clip: Option<Rect>,
    pub filter: Option<ImageFilter>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Gaussian blur followed by a brightness multiply.
pub struct ImageFilter {
    /// Standard deviation in canvas pixels.
    pub blur_sigma: f64,
    pub brightness: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextPaint {
    Fill(Rgba8),
    /// Round-joined outline.
    Stroke { color: Rgba8, width: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Blurred copy of the glyph paint drawn underneath it.
pub struct Shadow {
    pub color: Rgba8,
    /// Canvas-style blur amount; the gaussian sigma is half of it.
    pub blur: f64,
    pub offset: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub text: String,
    pub font: FontSpec,
    pub origin: Point,
    pub align: TextAlign,
    pub vertical: VerticalAnchor,
    /// Squeeze horizontally when the natural width exceeds this.
    pub max_width: Option<f64>,
    pub paint: TextPaint,
    pub shadow: Option<Shadow>,
}
