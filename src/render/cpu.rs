use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::assets::source::short_source;
use crate::compose::plan::{CardPlan, DrawOp, ImageFilter, ImageOp, Shadow, TextAlign, TextOp, TextPaint};
use crate::foundation::core::{Affine, Rect, Rgba8};
use crate::foundation::error::{NewscardError, NewscardResult};
use crate::foundation::math::premul_rgba8;
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::blur::{blur_rgba8_premul, filter_rgba8_premul, radius_for_sigma};
use crate::render::composite::over_in_place;
use crate::text::caption::VerticalAnchor;
use crate::text::engine::{ShapedText, TextEngine};
use crate::text::font::{FontFace, TextMeasure};

/// Filtered images are blurred at `1 / FILTER_DOWNSAMPLE` of canvas resolution.
pub const FILTER_DOWNSAMPLE: f64 = 4.0;

struct CachedImage {
    pixels: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

/// CPU backend powered by `vello_cpu` for vector and text rasterization.
pub struct CpuBackend {
    settings: RenderSettings,
    text: TextEngine,
    ctx: Option<vello_cpu::RenderContext>,
    image_cache: HashMap<String, CachedImage>,
    font_cache: HashMap<FontFace, vello_cpu::peniko::FontData>,
    warned_missing_fonts: bool,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings, text: TextEngine) -> Self {
        Self {
            settings,
            text,
            ctx: None,
            image_cache: HashMap::new(),
            font_cache: HashMap::new(),
            warned_missing_fonts: false,
        }
    }

    pub fn text_engine(&mut self) -> &mut TextEngine {
        &mut self.text
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> NewscardResult<R>,
    ) -> NewscardResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx);
        self.ctx = Some(ctx);
        out
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Rect,
        op: &DrawOp,
        tainted: &mut bool,
    ) -> NewscardResult<()> {
        match op {
            DrawOp::Clear => {
                ctx.reset();
                Ok(())
            }
            DrawOp::FillRect { rect, color } => {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&rect_to_cpu(*rect));
                Ok(())
            }
            DrawOp::Image(image) => {
                match self.draw_image_op(ctx, image) {
                    Ok(()) => *tainted |= image.image.origin.taints(),
                    Err(err) => tracing::warn!(
                        source = %short_source(&image.source),
                        width = image.image.width,
                        height = image.image.height,
                        %err,
                        "image layer skipped"
                    ),
                }
                Ok(())
            }
            DrawOp::Text(text) => self.draw_text_op(ctx, canvas, text),
        }
    }

    fn image_paint(&mut self, op: &ImageOp) -> NewscardResult<vello_cpu::Image> {
        if let Some(cached) = self.image_cache.get(&op.source)
            && Arc::ptr_eq(&cached.pixels, &op.image.rgba8_premul)
        {
            return Ok(cached.paint.clone());
        }
        let paint = rgba_premul_to_image(&op.image.rgba8_premul, op.image.width, op.image.height)?;
        self.image_cache.insert(
            op.source.clone(),
            CachedImage {
                pixels: op.image.rgba8_premul.clone(),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }

    fn draw_image_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &ImageOp,
    ) -> NewscardResult<()> {
        if op.dest.width() <= 0.0 || op.dest.height() <= 0.0 {
            return Ok(());
        }
        let paint = self.image_paint(op)?;

        if let Some(clip) = op.clip {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.push_clip_layer(&rect_to_cpu(clip).to_path(0.1));
        }

        let result = match (op.filter, op.clip) {
            (Some(filter), Some(clip)) => self.draw_filtered(ctx, op, paint, filter, clip),
            (Some(filter), None) => {
                let dest = op.dest;
                self.draw_filtered(ctx, op, paint, filter, dest)
            }
            (None, _) => {
                draw_image(ctx, paint, op.image.width, op.image.height, op.dest);
                Ok(())
            }
        };

        if op.clip.is_some() {
            ctx.pop_layer();
        }
        result
    }

    // Blur and darken the part of the image that can reach `visible`, at reduced resolution,
    // then draw the result back scaled up.
    fn draw_filtered(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &ImageOp,
        paint: vello_cpu::Image,
        filter: ImageFilter,
        visible: Rect,
    ) -> NewscardResult<()> {
        let f = FILTER_DOWNSAMPLE;
        let sigma = (filter.blur_sigma / f) as f32;
        let radius = radius_for_sigma(sigma);
        let pad = f64::from(radius) * f;
        let region = visible.inflate(pad, pad).intersect(op.dest);
        if region.width() <= 0.0 || region.height() <= 0.0 {
            return Ok(());
        }

        let sw = ((region.width() / f).ceil() as u32).max(1);
        let sh = ((region.height() / f).ceil() as u32).max(1);
        let (sw16, sh16) = pixmap_dims(sw, sh)?;

        let mut small = vello_cpu::RenderContext::new(sw16, sh16);
        let to_small = Affine::scale(1.0 / f)
            * Affine::translate((-region.x0, -region.y0))
            * image_to_dest(op.image.width, op.image.height, op.dest);
        small.set_transform(affine_to_cpu(to_small));
        small.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        small.set_paint(paint);
        small.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(op.image.width),
            f64::from(op.image.height),
        ));
        small.flush();
        let mut pixmap = vello_cpu::Pixmap::new(sw16, sh16);
        small.render_to_pixmap(&mut pixmap);

        let blurred = filter_rgba8_premul(
            pixmap.data_as_u8_slice(),
            sw,
            sh,
            sigma,
            filter.brightness as f32,
        )?;

        let filtered = rgba_premul_to_image(&blurred, sw, sh)?;
        let dest = Rect::new(
            region.x0,
            region.y0,
            region.x0 + f64::from(sw) * f,
            region.y0 + f64::from(sh) * f,
        );
        draw_image(ctx, filtered, sw, sh, dest);
        Ok(())
    }

    fn font_data(&mut self, face: FontFace) -> NewscardResult<vello_cpu::peniko::FontData> {
        if let Some(font) = self.font_cache.get(&face) {
            return Ok(font.clone());
        }
        let bytes = self
            .text
            .font_bytes(face)
            .ok_or_else(|| NewscardError::render(format!("no font data for {face:?}")))?;
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        self.font_cache.insert(face, font.clone());
        Ok(font)
    }

    fn draw_text_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Rect,
        op: &TextOp,
    ) -> NewscardResult<()> {
        let Some(shaped) = self.text.shape(&op.text, op.font) else {
            if !self.warned_missing_fonts {
                tracing::warn!(face = ?op.font.face, "no font loaded, text layers are skipped");
                self.warned_missing_fonts = true;
            }
            return Ok(());
        };
        let Some(transform) = text_transform(&shaped, op) else {
            return Ok(());
        };

        if let Some(shadow) = op.shadow {
            self.draw_text_shadow(ctx, canvas, &shaped, transform, op.paint, shadow)?;
        }
        self.paint_glyphs(ctx, &shaped, transform, op.paint)
    }

    fn paint_glyphs(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        shaped: &ShapedText,
        transform: Affine,
        paint: TextPaint,
    ) -> NewscardResult<()> {
        let font = self.font_data(shaped.face)?;
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let glyphs = shaped.glyphs.iter().map(|g| vello_cpu::Glyph {
            id: g.id,
            x: g.x,
            y: g.y,
        });
        match paint {
            TextPaint::Fill(color) => {
                ctx.set_paint(color_to_cpu(color));
                ctx.glyph_run(&font)
                    .font_size(shaped.size_px)
                    .fill_glyphs(glyphs);
            }
            TextPaint::Stroke { color, width } => {
                ctx.set_stroke(
                    vello_cpu::kurbo::Stroke::new(width).with_join(vello_cpu::kurbo::Join::Round),
                );
                ctx.set_paint(color_to_cpu(color));
                ctx.glyph_run(&font)
                    .font_size(shaped.size_px)
                    .stroke_glyphs(glyphs);
            }
        }
        Ok(())
    }

    // Render the glyphs in the shadow color into a tight offscreen, blur it, and draw it
    // underneath. The blur amount follows canvas semantics (sigma = blur / 2).
    fn draw_text_shadow(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        canvas: Rect,
        shaped: &ShapedText,
        transform: Affine,
        paint: TextPaint,
        shadow: Shadow,
    ) -> NewscardResult<()> {
        let sigma = (shadow.blur / 2.0) as f32;
        let radius = radius_for_sigma(sigma);
        let stroke_pad = match paint {
            TextPaint::Stroke { width, .. } => width,
            TextPaint::Fill(_) => 0.0,
        };
        let pad = f64::from(radius) + stroke_pad + 2.0;
        let local = Rect::new(0.0, -shaped.ascent, shaped.width, shaped.descent);
        let bounds = (transform.transform_rect_bbox(local) + shadow.offset)
            .inflate(pad, pad)
            .intersect(canvas)
            .expand();
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Ok(());
        }

        let w = bounds.width() as u32;
        let h = bounds.height() as u32;
        let (w16, h16) = pixmap_dims(w, h)?;
        let mut off = vello_cpu::RenderContext::new(w16, h16);
        let to_off = Affine::translate((-bounds.x0, -bounds.y0))
            * Affine::translate(shadow.offset)
            * transform;
        let shadow_paint = match paint {
            TextPaint::Fill(_) => TextPaint::Fill(shadow.color),
            TextPaint::Stroke { width, .. } => TextPaint::Stroke {
                color: shadow.color,
                width,
            },
        };
        self.paint_glyphs(&mut off, shaped, to_off, shadow_paint)?;
        off.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        off.render_to_pixmap(&mut pixmap);

        let blurred = blur_rgba8_premul(pixmap.data_as_u8_slice(), w, h, sigma)?;
        let image = rgba_premul_to_image(&blurred, w, h)?;
        draw_image(ctx, image, w, h, bounds);
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(level = "debug", skip_all, fields(ops = plan.ops.len()))]
    fn render_plan(&mut self, plan: &CardPlan) -> NewscardResult<FrameRGBA> {
        let (width, height) = (plan.canvas.width, plan.canvas.height);
        let (w16, h16) = pixmap_dims(width, height)?;
        let canvas = plan.canvas.rect();
        self.warned_missing_fonts = false;

        let mut tainted = false;
        let layer = self.with_ctx_mut(w16, h16, |this, ctx| {
            for planned in &plan.ops {
                this.draw_op(ctx, canvas, &planned.op, &mut tainted)?;
            }
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
            ctx.render_to_pixmap(&mut pixmap);
            Ok(pixmap)
        });

        // Only sources drawn by this plan stay cached.
        let drawn: HashSet<&str> = plan
            .ops
            .iter()
            .filter_map(|planned| match &planned.op {
                DrawOp::Image(image) => Some(image.source.as_str()),
                _ => None,
            })
            .collect();
        self.image_cache
            .retain(|source, _| drawn.contains(source.as_str()));
        let layer = layer?;

        // vello_cpu renders into a fresh buffer; composite it over the clear color.
        let mut data = vec![0u8; layer.data_as_u8_slice().len()];
        if let Some(clear) = self.settings.clear_rgba {
            let px = premul_rgba8(clear);
            for d in data.chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }
        over_in_place(&mut data, layer.data_as_u8_slice())?;

        if tainted {
            tracing::debug!("frame tainted by cross-origin image");
        }
        Ok(FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
            tainted,
        })
    }

    fn text_measure(&mut self) -> &mut dyn TextMeasure {
        &mut self.text
    }
}

fn text_transform(shaped: &ShapedText, op: &TextOp) -> Option<Affine> {
    let natural = shaped.width;
    let sx = match op.max_width {
        Some(max) if natural > max => {
            if max <= 0.0 {
                return None;
            }
            max / natural
        }
        _ => 1.0,
    };
    let drawn = natural * sx;
    let x0 = match op.align {
        TextAlign::Left => op.origin.x,
        TextAlign::Center => op.origin.x - drawn / 2.0,
        TextAlign::Right => op.origin.x - drawn,
    };
    let baseline = match op.vertical {
        VerticalAnchor::Baseline => op.origin.y,
        VerticalAnchor::Middle => op.origin.y + (shaped.ascent - shaped.descent) / 2.0,
    };
    Some(Affine::translate((x0, baseline)) * Affine::scale_non_uniform(sx, 1.0))
}

fn image_to_dest(width: u32, height: u32, dest: Rect) -> Affine {
    Affine::translate((dest.x0, dest.y0))
        * Affine::scale_non_uniform(
            dest.width() / f64::from(width),
            dest.height() / f64::from(height),
        )
}

fn draw_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
    dest: Rect,
) {
    ctx.set_transform(affine_to_cpu(image_to_dest(width, height, dest)));
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(width),
        f64::from(height),
    ));
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn pixmap_dims(width: u32, height: u32) -> NewscardResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| NewscardError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| NewscardError::render("pixmap height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(NewscardError::render("pixmap must be non-empty"));
    }
    Ok((w, h))
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> NewscardResult<vello_cpu::Pixmap> {
    let (w, h) = pixmap_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(NewscardError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> NewscardResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
