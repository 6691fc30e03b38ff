use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{NewscardError, NewscardResult};
use crate::text::font::{FontFace, FontSpec, TextMeasure};

/// A shaped single-line run positioned relative to its left edge on the alphabetic baseline.
#[derive(Clone)]
pub struct ShapedText {
    pub glyphs: Vec<vello_cpu::Glyph>,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
    pub size_px: f32,
    /// Face whose font data actually shaped the run (after fallback).
    pub face: FontFace,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("glyphs", &self.glyphs.len())
            .field("width", &self.width)
            .field("ascent", &self.ascent)
            .field("descent", &self.descent)
            .field("size_px", &self.size_px)
            .field("face", &self.face)
            .finish()
    }
}

struct RegisteredFace {
    family: String,
    bytes: Arc<Vec<u8>>,
}

/// Font paths per face, as read from the render config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: Option<std::path::PathBuf>,
    pub bold: Option<std::path::PathBuf>,
    pub black: Option<std::path::PathBuf>,
    pub brand: Option<std::path::PathBuf>,
}

impl FontConfig {
    pub fn path_for(&self, face: FontFace) -> Option<&Path> {
        match face {
            FontFace::Regular => self.regular.as_deref(),
            FontFace::Bold => self.bold.as_deref(),
            FontFace::Black => self.black.as_deref(),
            FontFace::Brand => self.brand.as_deref(),
        }
    }
}

/// Parley-backed shaping for the caption faces.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    faces: HashMap<FontFace, RegisteredFace>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextEngine {
    /// Engine with no faces; every measurement is zero until fonts are registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    pub fn from_config(config: &FontConfig) -> NewscardResult<Self> {
        let mut engine = Self::new();
        for face in FontFace::ALL {
            let Some(path) = config.path_for(face) else {
                continue;
            };
            let bytes = std::fs::read(path)
                .with_context(|| format!("read {face:?} font from '{}'", path.display()))?;
            engine.register_face(face, bytes)?;
        }
        Ok(engine)
    }

    pub fn register_face(&mut self, face: FontFace, bytes: Vec<u8>) -> NewscardResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            NewscardError::validation(format!("no font families registered for {face:?}"))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| NewscardError::validation("registered font family has no name"))?
            .to_string();
        tracing::debug!(?face, %family, "registered font face");
        self.faces.insert(
            face,
            RegisteredFace {
                family,
                bytes: Arc::new(bytes),
            },
        );
        Ok(())
    }

    pub fn has_face(&self, face: FontFace) -> bool {
        self.faces.contains_key(&face)
    }

    /// The face that will actually be used for `face`.
    pub fn resolve_face(&self, face: FontFace) -> Option<FontFace> {
        face.fallback_chain()
            .iter()
            .copied()
            .find(|f| self.faces.contains_key(f))
    }

    pub fn font_bytes(&self, face: FontFace) -> Option<Arc<Vec<u8>>> {
        self.faces.get(&face).map(|f| f.bytes.clone())
    }

    /// Shape `text` as one unbroken line. `None` when no face in the fallback chain is loaded
    /// or the size is unusable.
    pub fn shape(&mut self, text: &str, font: FontSpec) -> Option<ShapedText> {
        let face = self.resolve_face(font.face)?;
        let size_px = font.size_px as f32;
        if !size_px.is_finite() || size_px <= 0.0 {
            return None;
        }
        let family = self.faces.get(&face)?.family.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(font.face.weight()),
        ));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        let mut ascent = 0.0f64;
        let mut descent = 0.0f64;
        for line in layout.lines() {
            let metrics = line.metrics();
            ascent = ascent.max(f64::from(metrics.ascent));
            descent = descent.max(f64::from(metrics.descent));
            let baseline = metrics.baseline;
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let mut x = run.offset();
                let y = run.baseline() - baseline;
                glyphs.extend(run.glyphs().map(|g| {
                    let gx = x + g.x;
                    x += g.advance;
                    vello_cpu::Glyph {
                        id: g.id,
                        x: gx,
                        y: y - g.y,
                    }
                }));
            }
        }

        Some(ShapedText {
            glyphs,
            width: f64::from(layout.width()),
            ascent,
            descent,
            size_px,
            face,
        })
    }
}

impl TextMeasure for TextEngine {
    fn measure(&mut self, text: &str, font: FontSpec) -> f64 {
        match self.shape(text, font) {
            Some(shaped) => shaped.width,
            None => {
                tracing::warn!(face = ?font.face, "no font data for text measurement");
                0.0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
