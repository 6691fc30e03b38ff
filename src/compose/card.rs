use crate::assets::loader::{ImageLookup, ImageStatus};
use crate::compose::plan::{
    CardPlan, DrawOp, ImageFilter, ImageOp, LayerKind, Shadow, TextAlign, TextOp, TextPaint,
};
use crate::foundation::core::{Canvas, Point, Rgba8, Vec2};
use crate::model::card::{CardState, Subject};
use crate::place::fit::place_photo;
use crate::text::caption::{
    Caption, SegmentRole, VerticalAnchor, layout_interviewee_caption, layout_reporter_caption,
};
use crate::text::font::{FontFace, FontSpec, TextMeasure};

pub const PLACEHOLDER_COLOR: Rgba8 = Rgba8::rgb(0x1e, 0x29, 0x3b);
pub const LOADING_TEXT: &str = "載入中...";
pub const LOAD_FAILED_TEXT: &str = "圖片載入失敗";
pub const STATUS_TEXT_SIZE: f64 = 40.0;

/// Right edge and baseline of the photo credit.
pub const PHOTO_CREDIT_ORIGIN: Point = Point::new(1739.0, 675.0);
pub const PHOTO_CREDIT_SIZE: f64 = 26.0;

pub const BACKDROP_FILTER: ImageFilter = ImageFilter {
    blur_sigma: 40.0,
    brightness: 0.6,
};

pub const REPORTER_STROKE_WIDTH: f64 = 8.0;
pub const INTERVIEWEE_STROKE: Rgba8 = Rgba8::rgb(0x00, 0x16, 0x5d);
pub const INTERVIEWEE_SHADOW: Rgba8 = Rgba8::rgb(0x00, 0x0b, 0x2e);
pub const INTERVIEWEE_STROKE_WIDTH: f64 = 14.0;
pub const INTERVIEWEE_SHADOW_BLUR: f64 = 3.0;
/// 3px at 60 degrees below the horizontal.
pub const INTERVIEWEE_SHADOW_OFFSET: Vec2 = Vec2::new(1.5, 2.598);

/// Build the full draw list for `card`.
///
/// Paint order is fixed: background, map, interviewee photo, photo credit, overlay art,
/// reporter photo, reporter caption, interviewee caption. Transparent mode drops the first
/// four. Sources that are not loaded yet are skipped, except the background which gets a
/// status placeholder.
#[tracing::instrument(level = "debug", skip_all, fields(transparent = card.is_transparent_mode))]
pub fn compose_card(
    card: &CardState,
    images: &dyn ImageLookup,
    measure: &mut dyn TextMeasure,
) -> CardPlan {
    let canvas = Canvas::CARD;
    let mut plan = CardPlan::new(canvas);
    plan.push(LayerKind::Clear, DrawOp::Clear);

    if !card.is_transparent_mode {
        push_background(&mut plan, card, images);

        if let Some(map) = card.map_image.as_deref() {
            push_full_frame(&mut plan, LayerKind::Map, map, images);
        }

        push_photo(&mut plan, LayerKind::IntervieweePhoto, card, Subject::Interviewee, images);

        if !card.photo_credit.is_empty() {
            plan.push(LayerKind::PhotoCredit, DrawOp::Text(photo_credit_op(&card.photo_credit)));
        }
    }

    push_full_frame(&mut plan, LayerKind::Overlay, &card.transparent_template, images);
    push_photo(&mut plan, LayerKind::ReporterPhoto, card, Subject::Reporter, images);

    if let Some(caption) = layout_reporter_caption(card, measure) {
        push_reporter_caption(&mut plan, &caption);
    }
    if let Some(caption) = layout_interviewee_caption(card, measure) {
        push_interviewee_caption(&mut plan, &caption);
    }

    tracing::debug!(ops = plan.ops.len(), "card composed");
    plan
}

fn push_background(plan: &mut CardPlan, card: &CardState, images: &dyn ImageLookup) {
    let rect = plan.canvas.rect();
    let status = match images.status(&card.solid_template) {
        ImageStatus::Loaded(image) => {
            plan.push(
                LayerKind::Background,
                DrawOp::Image(ImageOp {
                    source: card.solid_template.clone(),
                    image,
                    dest: rect,
                    clip: None,
                    filter: None,
                }),
            );
            return;
        }
        ImageStatus::Pending => LOADING_TEXT,
        ImageStatus::Failed => LOAD_FAILED_TEXT,
    };

    plan.push(
        LayerKind::Background,
        DrawOp::FillRect {
            rect,
            color: PLACEHOLDER_COLOR,
        },
    );
    plan.push(
        LayerKind::Background,
        DrawOp::Text(TextOp {
            text: status.to_string(),
            font: FontSpec::new(FontFace::Regular, STATUS_TEXT_SIZE),
            origin: rect.center(),
            align: TextAlign::Center,
            vertical: VerticalAnchor::Baseline,
            max_width: None,
            paint: TextPaint::Fill(Rgba8::WHITE),
            shadow: None,
        }),
    );
}

fn push_full_frame(plan: &mut CardPlan, layer: LayerKind, source: &str, images: &dyn ImageLookup) {
    if source.is_empty() {
        return;
    }
    if let ImageStatus::Loaded(image) = images.status(source) {
        let dest = plan.canvas.rect();
        plan.push(
            layer,
            DrawOp::Image(ImageOp {
                source: source.to_string(),
                image,
                dest,
                clip: None,
                filter: None,
            }),
        );
    }
}

fn push_photo(
    plan: &mut CardPlan,
    layer: LayerKind,
    card: &CardState,
    subject: Subject,
    images: &dyn ImageLookup,
) {
    let Some(source) = card.photo(subject) else {
        return;
    };
    let ImageStatus::Loaded(image) = images.status(source) else {
        return;
    };
    let placement = place_photo(card.frame(subject), image.aspect_ratio(), card.settings(subject));

    plan.push(
        layer,
        DrawOp::Image(ImageOp {
            source: source.to_string(),
            image: image.clone(),
            dest: placement.backdrop,
            clip: Some(placement.clip),
            filter: Some(BACKDROP_FILTER),
        }),
    );
    plan.push(
        layer,
        DrawOp::Image(ImageOp {
            source: source.to_string(),
            image,
            dest: placement.foreground,
            clip: Some(placement.clip),
            filter: None,
        }),
    );
}

fn photo_credit_op(text: &str) -> TextOp {
    TextOp {
        text: text.to_string(),
        font: FontSpec::new(FontFace::Regular, PHOTO_CREDIT_SIZE),
        origin: PHOTO_CREDIT_ORIGIN,
        align: TextAlign::Right,
        vertical: VerticalAnchor::Baseline,
        max_width: None,
        paint: TextPaint::Fill(Rgba8::WHITE.with_opacity(0.7)),
        shadow: Some(Shadow {
            color: Rgba8::BLACK.with_opacity(0.5),
            blur: 4.0,
            offset: Vec2::ZERO,
        }),
    }
}

fn push_reporter_caption(plan: &mut CardPlan, caption: &Caption) {
    for seg in &caption.segments {
        let base = TextOp {
            text: seg.text.clone(),
            font: seg.font,
            origin: Point::new(seg.x, caption.y),
            align: TextAlign::Left,
            vertical: caption.vertical,
            max_width: Some(seg.width),
            paint: TextPaint::Stroke {
                color: Rgba8::WHITE,
                width: REPORTER_STROKE_WIDTH,
            },
            shadow: None,
        };
        plan.push(LayerKind::ReporterCaption, DrawOp::Text(base.clone()));
        plan.push(
            LayerKind::ReporterCaption,
            DrawOp::Text(TextOp {
                paint: TextPaint::Fill(Rgba8::BLACK),
                ..base
            }),
        );
    }
}

fn push_interviewee_caption(plan: &mut CardPlan, caption: &Caption) {
    for seg in &caption.segments {
        let fill = match seg.role {
            SegmentRole::Name => Rgba8::YELLOW,
            _ => Rgba8::WHITE,
        };
        let stroke = TextOp {
            text: seg.text.clone(),
            font: seg.font,
            origin: Point::new(seg.x, caption.y),
            align: TextAlign::Left,
            vertical: caption.vertical,
            max_width: None,
            paint: TextPaint::Stroke {
                color: INTERVIEWEE_STROKE,
                width: INTERVIEWEE_STROKE_WIDTH,
            },
            shadow: None,
        };
        plan.push(
            LayerKind::IntervieweeCaption,
            DrawOp::Text(TextOp {
                shadow: Some(Shadow {
                    color: INTERVIEWEE_SHADOW,
                    blur: INTERVIEWEE_SHADOW_BLUR,
                    offset: INTERVIEWEE_SHADOW_OFFSET,
                }),
                ..stroke.clone()
            }),
        );
        plan.push(LayerKind::IntervieweeCaption, DrawOp::Text(stroke.clone()));
        plan.push(
            LayerKind::IntervieweeCaption,
            DrawOp::Text(TextOp {
                paint: TextPaint::Fill(fill),
                ..stroke
            }),
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/card.rs"]
mod tests;
