use crate::foundation::error::{ThumbError, ThumbResult};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Separable gaussian parameters.
pub struct BlurParams {
    pub radius: u32,
    pub sigma: f32,
}

impl BlurParams {
    /// Parameters matching a canvas-style `shadowBlur` of `blur` pixels (sigma = blur / 2).
    pub fn from_canvas_blur(blur: f64) -> Self {
        if !blur.is_finite() || blur <= 0.0 {
            return Self {
                radius: 0,
                sigma: 0.0,
            };
        }
        let sigma = blur / 2.0;
        Self {
            radius: (sigma * 3.0).ceil() as u32,
            sigma: sigma as f32,
        }
    }
}

pub fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ThumbResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ThumbError::render("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(ThumbError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Blur a single-channel coverage mask. Samples outside the mask read as zero.
pub fn blur_alpha_q16(
    mask: &[u8],
    width: u32,
    height: u32,
    params: BlurParams,
) -> ThumbResult<Vec<u8>> {
    let expected = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| ThumbError::render("blur mask size overflow"))?;
    if mask.len() != expected {
        return Err(ThumbError::render(
            "blur_alpha_q16 expects mask matching width*height",
        ));
    }
    if params.radius == 0 {
        return Ok(mask.to_vec());
    }

    let kernel = gaussian_kernel_q16(params.radius, params.sigma)?;
    let mut tmp = vec![0u8; expected];
    let mut out = vec![0u8; expected];
    horizontal_pass(mask, &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, &mut out, width, height, &kernel);
    Ok(out)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i32 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                acc += u64::from(kw) * u64::from(src[row + sx as usize]);
            }
            dst[row + x as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i32 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                acc += u64::from(kw) * u64::from(src[(sy * w + x) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
