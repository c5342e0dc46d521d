use crate::{
    foundation::core::{Canvas, Rect, Rgba8Premul},
    foundation::error::{ThumbError, ThumbResult},
};

pub type PremulRgba8 = [u8; 4];

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

/// Premultiplied source-over.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = u16::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> ThumbResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ThumbError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `color` over every pixel of `dst`.
pub fn fill_over(dst: &mut [u8], color: Rgba8Premul) {
    let src = color.to_array();
    if src[3] == 255 {
        for d in dst.chunks_exact_mut(4) {
            d.copy_from_slice(&src);
        }
        return;
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], src);
        d.copy_from_slice(&out);
    }
}

/// Integer pixel bounds `[x0, x1) × [y0, y1)` of `rect` intersected with the canvas.
pub fn pixel_bounds(canvas: Canvas, rect: Rect) -> Option<(u32, u32, u32, u32)> {
    let clamp_x = |v: f64| v.round().clamp(0.0, f64::from(canvas.width)) as u32;
    let clamp_y = |v: f64| v.round().clamp(0.0, f64::from(canvas.height)) as u32;
    let (x0, x1) = (clamp_x(rect.x0), clamp_x(rect.x1));
    let (y0, y1) = (clamp_y(rect.y0), clamp_y(rect.y1));
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Composite `color` over the pixels of `rect`.
pub fn fill_rect_over(dst: &mut [u8], canvas: Canvas, rect: Rect, color: Rgba8Premul) {
    let Some((x0, y0, x1, y1)) = pixel_bounds(canvas, rect) else {
        return;
    };
    let src = color.to_array();
    let w = canvas.width as usize;
    for y in y0 as usize..y1 as usize {
        let row = &mut dst[(y * w + x0 as usize) * 4..(y * w + x1 as usize) * 4];
        for d in row.chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], src);
            d.copy_from_slice(&out);
        }
    }
}

/// Zero every pixel outside `clip`.
pub fn clear_outside(buf: &mut [u8], canvas: Canvas, clip: Rect) {
    let Some((x0, y0, x1, y1)) = pixel_bounds(canvas, clip) else {
        buf.fill(0);
        return;
    };
    let w = canvas.width as usize;
    for (y, row) in buf.chunks_exact_mut(w * 4).enumerate() {
        if y < y0 as usize || y >= y1 as usize {
            row.fill(0);
            continue;
        }
        row[..x0 as usize * 4].fill(0);
        row[x1 as usize * 4..].fill(0);
    }
}

/// Alpha channel of a premultiplied RGBA8 buffer.
pub fn alpha_mask(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4).map(|px| px[3]).collect()
}

/// Smallest pixel box containing every non-zero mask value.
pub fn mask_bounds(mask: &[u8], width: u32) -> Option<(u32, u32, u32, u32)> {
    if width == 0 {
        return None;
    }
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, &a) in mask.iter().enumerate() {
        if a == 0 {
            continue;
        }
        let x = (i % width as usize) as u32;
        let y = (i / width as usize) as u32;
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    bounds
}

/// Premultiplied RGBA8 buffer of `color` scaled by per-pixel `mask` coverage.
pub fn tint_mask(mask: &[u8], color: Rgba8Premul) -> Vec<u8> {
    let c = color.to_array();
    let mut out = Vec::with_capacity(mask.len() * 4);
    for &m in mask {
        let m = u16::from(m);
        out.extend_from_slice(&[
            mul_div255(u16::from(c[0]), m),
            mul_div255(u16::from(c[1]), m),
            mul_div255(u16::from(c[2]), m),
            mul_div255(u16::from(c[3]), m),
        ]);
    }
    out
}

/// Composite a `src_w`-wide premultiplied buffer over `dst` with its top-left at `(ox, oy)`.
pub fn over_at(dst: &mut [u8], canvas: Canvas, src: &[u8], src_w: u32, ox: u32, oy: u32) {
    if src_w == 0 {
        return;
    }
    let dw = canvas.width as usize;
    let sw = src_w as usize;
    for (sy, src_row) in src.chunks_exact(sw * 4).enumerate() {
        let y = oy as usize + sy;
        if y >= canvas.height as usize {
            break;
        }
        let x_end = (ox as usize + sw).min(dw);
        if x_end <= ox as usize {
            continue;
        }
        let dst_row = &mut dst[(y * dw + ox as usize) * 4..(y * dw + x_end) * 4];
        for (d, s) in dst_row.chunks_exact_mut(4).zip(src_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
            d.copy_from_slice(&out);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
