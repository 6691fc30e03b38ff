use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{NewscardError, NewscardResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Longest side accepted for a decoded raster.
pub const MAX_IMAGE_DIM: u32 = 16_384;
const MAX_SVG_DIM: u32 = 8192;

/// Where image bytes came from, as far as export tainting is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageOrigin {
    /// Data URL or local file.
    Local,
    /// Fetched over HTTP(S). `cors_ok` records whether the response allowed cross-origin use.
    Remote { cors_ok: bool },
}

impl ImageOrigin {
    /// Drawing this image makes the rendered frame unexportable.
    pub fn taints(self) -> bool {
        matches!(self, ImageOrigin::Remote { cors_ok: false })
    }
}

/// Decoded image in premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
    pub origin: ImageOrigin,
}

impl LoadedImage {
    pub fn from_premul(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
        origin: ImageOrigin,
    ) -> NewscardResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| NewscardError::asset("image buffer size overflow"))?;
        if width == 0 || height == 0 || rgba8_premul.len() != expected {
            return Err(NewscardError::asset(format!(
                "image buffer does not match {width}x{height} rgba8"
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            origin,
        })
    }

    /// Single opaque-colored image, mostly for tests and placeholders.
    pub fn solid(width: u32, height: u32, premul: [u8; 4], origin: ImageOrigin) -> NewscardResult<Self> {
        let data = premul.repeat((width as usize) * (height as usize));
        Self::from_premul(width, height, data, origin)
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Decode raster or SVG bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8], origin: ImageOrigin) -> NewscardResult<LoadedImage> {
    if looks_like_svg(bytes) {
        return rasterize_svg(bytes, origin);
    }
    let (width, height) = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .context("sniff image format")?
        .into_dimensions()
        .context("read image dimensions")?;
    check_dims("image", width, height, MAX_IMAGE_DIM)?;

    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    LoadedImage::from_premul(width, height, rgba8_premul, origin)
}

/// Render an SVG document at its intrinsic size.
pub fn rasterize_svg(bytes: &[u8], origin: ImageOrigin) -> NewscardResult<LoadedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> NewscardResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(NewscardError::asset("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    check_dims("svg raster", width, height, MAX_SVG_DIM)?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| NewscardError::asset("failed to allocate svg pixmap"))?;
    let xform = resvg::tiny_skia::Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    LoadedImage::from_premul(width, height, pixmap.take(), origin)
}

fn check_dims(what: &str, width: u32, height: u32, max: u32) -> NewscardResult<()> {
    if width > max || height > max {
        return Err(NewscardError::asset(format!(
            "{what} size too large: {width}x{height} (max {max}x{max})"
        )));
    }
    Ok(())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
