use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{ThumbError, ThumbResult};

/// Decoded raster image in premultiplied RGBA8 form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Image payload encoding, used to pick a decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormatHint {
    /// Anything `image` can sniff (PNG, JPEG, WebP, ...).
    Raster,
    /// SVG document, rasterized at its intrinsic size.
    Svg,
}

// Avoid pathological allocations from hostile SVG sizes.
const MAX_SVG_DIM: u32 = 8_192;

pub fn decode_image(bytes: &[u8]) -> ThumbResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub fn decode_svg(bytes: &[u8]) -> ThumbResult<PreparedImage> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;

    let size = tree.size();
    let to_px = |v: f32| -> ThumbResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ThumbError::invalid_geometry("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;
    if width > MAX_SVG_DIM || height > MAX_SVG_DIM {
        return Err(ThumbError::invalid_geometry(format!(
            "svg raster size too large: {width}x{height} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ThumbError::render("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.data().to_vec()),
    })
}

/// Decode bytes with the decoder selected by `hint`; failures become [`ThumbError::ImageLoad`].
pub fn decode_with_hint(bytes: &[u8], hint: ImageFormatHint) -> ThumbResult<PreparedImage> {
    let decoded = match hint {
        ImageFormatHint::Raster => decode_image(bytes),
        ImageFormatHint::Svg => decode_svg(bytes),
    };
    let img = decoded.map_err(|e| match e {
        ThumbError::Other(err) => ThumbError::image_load(format!("{err:#}")),
        other => other,
    })?;
    if img.width == 0 || img.height == 0 {
        return Err(ThumbError::invalid_geometry(
            "decoded image has zero width or height",
        ));
    }
    Ok(img)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
