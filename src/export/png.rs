use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{NewscardError, NewscardResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::model::card::CardState;
use crate::render::backend::FrameRGBA;

const UNNAMED: &str = "未命名";

/// Suggested file stem for a card, without extension.
pub fn default_filename(state: &CardState) -> String {
    let or_unnamed = |s: &str| {
        if s.is_empty() {
            UNNAMED.to_string()
        } else {
            s.to_string()
        }
    };
    format!(
        "電訪框_{}_{}{}",
        or_unnamed(&state.reporter_name),
        or_unnamed(&state.interviewee_name),
        if state.is_transparent_mode { "_透明版" } else { "" }
    )
}

/// Encode a rendered frame as PNG (straight alpha).
///
/// Fails with [`NewscardError::Tainted`] when cross-origin pixels were drawn.
pub fn encode_png(frame: &FrameRGBA) -> NewscardResult<Vec<u8>> {
    if frame.tainted {
        return Err(NewscardError::Tainted);
    }
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(NewscardError::export(format!(
            "frame data is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, data)
        .ok_or_else(|| NewscardError::export("frame buffer does not match its size"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| NewscardError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Keep a user-typed name inside `dir`: path separators and control characters become `_`.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        UNNAMED.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Write `frame` as `<dir>/<name>.png` and return the written path.
#[tracing::instrument(level = "debug", skip(frame), fields(w = frame.width, h = frame.height))]
pub fn export_png(frame: &FrameRGBA, dir: &Path, name: &str) -> NewscardResult<PathBuf> {
    let bytes = encode_png(frame)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create output dir '{}'", dir.display()))?;
    let path = dir.join(format!("{}.png", sanitize_filename(name)));
    std::fs::write(&path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
    tracing::info!(path = %path.display(), "exported card");
    Ok(path)
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
