use crate::foundation::error::{NewscardError, NewscardResult};

/// Kernel half-width that keeps three standard deviations.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Normalized 1D gaussian taps in 16.16 fixed point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaussianKernel {
    taps: Vec<u32>,
}

impl GaussianKernel {
    /// `None` when `sigma` would not blur at all.
    pub fn new(sigma: f32) -> Option<Self> {
        let radius = radius_for_sigma(sigma) as i64;
        if radius == 0 {
            return None;
        }
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let raw: Vec<f64> = (-radius..=radius)
            .map(|i| (-(i * i) as f64 / denom).exp())
            .collect();
        let sum: f64 = raw.iter().sum();

        let mut taps: Vec<u32> = raw
            .iter()
            .map(|w| ((w / sum) * 65536.0).round() as u32)
            .collect();
        // Put the rounding remainder on the center tap so the taps sum to one.
        let total: i64 = taps.iter().map(|&t| i64::from(t)).sum();
        let mid = taps.len() / 2;
        taps[mid] = (i64::from(taps[mid]) + 65536 - total).clamp(0, 65536) as u32;
        Some(Self { taps })
    }

    pub fn radius(&self) -> u32 {
        (self.taps.len() / 2) as u32
    }

    pub fn taps(&self) -> &[u32] {
        &self.taps
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Rows,
    Columns,
}

/// Gaussian blur of a premultiplied RGBA8 buffer with clamped edges.
pub fn blur_rgba8_premul(src: &[u8], width: u32, height: u32, sigma: f32) -> NewscardResult<Vec<u8>> {
    filter_rgba8_premul(src, width, height, sigma, 1.0)
}

/// Blur and scale color by `brightness` in one go, as the photo backdrop wants. Alpha is
/// only blurred; brightened color saturates at alpha so the output stays premultiplied.
pub fn filter_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
    brightness: f32,
) -> NewscardResult<Vec<u8>> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| NewscardError::render("blur buffer size overflow"))?;
    if src.len() != len {
        return Err(NewscardError::render(format!(
            "blur expects {width}x{height} rgba8, got {} bytes",
            src.len()
        )));
    }
    let gain = brightness.max(0.0);

    let Some(kernel) = GaussianKernel::new(sigma) else {
        let mut out = src.to_vec();
        if gain != 1.0 {
            for px in out.chunks_exact_mut(4) {
                let a = px[3];
                for c in &mut px[..3] {
                    *c = scale_channel(u64::from(*c) << 16, gain, a);
                }
            }
        }
        return Ok(out);
    };
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut rows = vec![0u8; len];
    let mut out = vec![0u8; len];
    convolve(src, &mut rows, width, height, &kernel, Axis::Rows, 1.0);
    convolve(&rows, &mut out, width, height, &kernel, Axis::Columns, gain);
    Ok(out)
}

fn convolve(
    src: &[u8],
    dst: &mut [u8],
    width: u32,
    height: u32,
    kernel: &GaussianKernel,
    axis: Axis,
    gain: f32,
) {
    let (w, h) = (width as i64, height as i64);
    let r = i64::from(kernel.radius());
    let (len, stride) = match axis {
        Axis::Rows => (w, 1),
        Axis::Columns => (h, w),
    };
    for y in 0..h {
        for x in 0..w {
            let (pos, base) = match axis {
                Axis::Rows => (x, y * w),
                Axis::Columns => (y, x),
            };
            let mut acc = [0u64; 4];
            for (k, &tap) in kernel.taps().iter().enumerate() {
                let s = (pos + k as i64 - r).clamp(0, len - 1);
                let i = ((base + s * stride) * 4) as usize;
                for (a, &v) in acc.iter_mut().zip(&src[i..i + 4]) {
                    *a += u64::from(tap) * u64::from(v);
                }
            }
            let o = ((y * w + x) * 4) as usize;
            let alpha = q16_round(acc[3]);
            dst[o + 3] = alpha;
            for c in 0..3 {
                dst[o + c] = if gain == 1.0 {
                    q16_round(acc[c])
                } else {
                    scale_channel(acc[c], gain, alpha)
                };
            }
        }
    }
}

fn q16_round(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

fn scale_channel(acc_q16: u64, gain: f32, alpha: u8) -> u8 {
    let v = (acc_q16 as f64 / 65536.0) * f64::from(gain);
    v.round().min(f64::from(alpha)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
