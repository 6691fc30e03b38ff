//! Caption composition: which strings are drawn, at which size, and where.

use crate::model::card::{CardState, TextLayout};
use crate::text::font::{FontFace, FontSpec, TextMeasure};

/// Token rendered in the brand face whenever it appears in the reporter caption.
pub const BRAND_TOKEN: &str = "TVBS";
/// Tag appended to the interviewee caption when the voice is altered.
pub const VOICE_ALTERED_TAG: &str = "(變音處理)";
/// Shift from a stored anchor y to the alphabetic baseline, in multiples of the font size.
/// Empirical; saved layouts depend on it.
pub const BASELINE_CENTER_OFFSET: f64 = 0.35;
/// Horizontal gap between interviewee caption segments.
pub const SPLIT_SEGMENT_GAP: f64 = 15.0;
/// Interviewee name size relative to the base size.
pub const NAME_SIZE_RATIO: f64 = 1.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptionStyle {
    /// White stroke under black fill.
    Reporter,
    /// Shadowed navy double stroke under white/yellow fill.
    Interviewee,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentRole {
    Plain,
    Brand,
    Title,
    Name,
    Tag,
}

/// How `Caption::y` relates to the glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum VerticalAnchor {
    /// `y` is the alphabetic baseline.
    Baseline,
    /// `y` is the middle of the em box.
    Middle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CaptionSegment {
    pub text: String,
    pub role: SegmentRole,
    pub font: FontSpec,
    pub natural_width: f64,
    /// Left edge of the drawn segment.
    pub x: f64,
    /// Drawn advance after compression.
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Caption {
    pub style: CaptionStyle,
    pub segments: Vec<CaptionSegment>,
    pub y: f64,
    pub vertical: VerticalAnchor,
    /// Sum of natural widths plus gaps.
    pub total_width: f64,
    /// Horizontal compression applied to every segment, in `(0, 1]`.
    pub compression: f64,
}

impl Caption {
    pub fn rendered_width(&self) -> f64 {
        self.total_width * self.compression
    }
}

/// Reporter name with the two-character spacing rule applied.
pub fn reporter_display_name(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => format!("{a} {b}"),
        _ => name.to_string(),
    }
}

/// Title and display name joined into the single reporter line.
pub fn reporter_text(title: &str, name: &str) -> String {
    format!("{title} {}", reporter_display_name(name))
        .trim()
        .to_string()
}

/// Split `text` into alternating plain and brand pieces, dropping empty pieces.
pub fn split_brand(text: &str) -> Vec<(&str, bool)> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find(BRAND_TOKEN) {
        if idx > 0 {
            out.push((&rest[..idx], false));
        }
        out.push((BRAND_TOKEN, true));
        rest = &rest[idx + BRAND_TOKEN.len()..];
    }
    if !rest.is_empty() {
        out.push((rest, false));
    }
    out
}

/// Uniform factor that squeezes `total` into `max_width`, never enlarging.
pub fn compression_for(total: f64, max_width: f64) -> f64 {
    if total > 0.0 && max_width < total {
        (max_width / total).max(0.0)
    } else {
        1.0
    }
}

pub fn layout_reporter_caption(
    state: &CardState,
    measure: &mut dyn TextMeasure,
) -> Option<Caption> {
    if state.reporter_name.is_empty() && state.reporter_title.is_empty() {
        return None;
    }
    let text = reporter_text(&state.reporter_title, &state.reporter_name);
    if text.is_empty() {
        return None;
    }
    let layout = state.reporter_text_layout;

    if !text.contains(BRAND_TOKEN) {
        let font = FontSpec::new(FontFace::Bold, layout.size);
        let natural = measure.measure(&text, font);
        let compression = compression_for(natural, layout.w);
        let width = natural * compression;
        return Some(Caption {
            style: CaptionStyle::Reporter,
            segments: vec![CaptionSegment {
                text,
                role: SegmentRole::Plain,
                font,
                natural_width: natural,
                x: layout.x - width / 2.0,
                width,
            }],
            y: layout.y,
            vertical: VerticalAnchor::Middle,
            total_width: natural,
            compression,
        });
    }

    let mut segments = Vec::new();
    let mut total = 0.0;
    for (piece, is_brand) in split_brand(&text) {
        let (face, role) = if is_brand {
            (FontFace::Brand, SegmentRole::Brand)
        } else {
            (FontFace::Bold, SegmentRole::Plain)
        };
        let font = FontSpec::new(face, layout.size);
        let natural = measure.measure(piece, font);
        total += natural;
        segments.push(CaptionSegment {
            text: piece.to_string(),
            role,
            font,
            natural_width: natural,
            x: 0.0,
            width: 0.0,
        });
    }

    let compression = compression_for(total, layout.w);
    let mut cursor = layout.x - (total * compression) / 2.0;
    for seg in &mut segments {
        seg.x = cursor;
        seg.width = seg.natural_width * compression;
        cursor += seg.width;
    }

    Some(Caption {
        style: CaptionStyle::Reporter,
        segments,
        y: layout.y + layout.size * BASELINE_CENTER_OFFSET,
        vertical: VerticalAnchor::Baseline,
        total_width: total,
        compression,
    })
}

pub fn layout_interviewee_caption(
    state: &CardState,
    measure: &mut dyn TextMeasure,
) -> Option<Caption> {
    if state.interviewee_name.is_empty() && state.interviewee_title.is_empty() {
        return None;
    }
    let layout: TextLayout = state.interviewee_text_layout;

    let mut parts: Vec<(String, SegmentRole, f64)> = Vec::with_capacity(3);
    let title = state.interviewee_title.trim();
    if !title.is_empty() {
        parts.push((title.to_string(), SegmentRole::Title, layout.size));
    }
    let name = state.interviewee_name.trim();
    if !name.is_empty() {
        parts.push((
            name.to_string(),
            SegmentRole::Name,
            layout.size * NAME_SIZE_RATIO,
        ));
    }
    if state.is_voice_altered {
        parts.push((VOICE_ALTERED_TAG.to_string(), SegmentRole::Tag, layout.size));
    }

    let mut segments = Vec::with_capacity(parts.len());
    let mut total = 0.0;
    for (text, role, size) in parts {
        let font = FontSpec::new(FontFace::Black, size);
        let natural = measure.measure(&text, font);
        if !segments.is_empty() {
            total += SPLIT_SEGMENT_GAP;
        }
        total += natural;
        segments.push(CaptionSegment {
            text,
            role,
            font,
            natural_width: natural,
            x: 0.0,
            width: natural,
        });
    }
    if segments.is_empty() {
        return None;
    }

    let mut cursor = layout.x - total / 2.0;
    for seg in &mut segments {
        seg.x = cursor;
        cursor += seg.width + SPLIT_SEGMENT_GAP;
    }

    Some(Caption {
        style: CaptionStyle::Interviewee,
        segments,
        y: layout.y,
        vertical: VerticalAnchor::Baseline,
        total_width: total,
        compression: 1.0,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/caption.rs"]
mod tests;
