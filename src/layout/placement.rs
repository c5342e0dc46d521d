use crate::{
    foundation::core::{Canvas, Point, Rect},
    foundation::error::{ThumbError, ThumbResult},
    state::model::{AspectRatio, BrandingPosition},
};

/// Overlay asset width as a fraction of canvas width (before `branding_scale`).
pub const OVERLAY_WIDTH_FRACTION: f64 = 0.45;
/// How far the overlay asset hangs past its anchored edge.
pub const OVERLAY_BLEED_PX: f64 = 20.0;
/// Title x-origin, as a fraction of canvas width, when the overlay asset sits on the left.
pub const TEXT_COLLISION_X_FRACTION: f64 = 0.45;

/// Bottom-anchored rectangle for the overlay asset, preserving the image aspect ratio.
pub fn overlay_rect(
    canvas: Canvas,
    img_w: u32,
    img_h: u32,
    position: BrandingPosition,
    branding_scale: f64,
) -> ThumbResult<Rect> {
    if img_w == 0 || img_h == 0 {
        return Err(ThumbError::invalid_geometry(format!(
            "overlay image has degenerate size {img_w}x{img_h}"
        )));
    }
    if !branding_scale.is_finite() || branding_scale <= 0.0 {
        return Err(ThumbError::invalid_geometry(format!(
            "branding scale must be finite and > 0, got {branding_scale}"
        )));
    }

    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let w = cw * OVERLAY_WIDTH_FRACTION * branding_scale;
    let h = w / f64::from(img_w) * f64::from(img_h);
    let x = match position {
        BrandingPosition::Left => -OVERLAY_BLEED_PX,
        BrandingPosition::Right => cw - w + OVERLAY_BLEED_PX,
    };
    let y = ch - h;
    Ok(Rect::new(x, y, x + w, y + h))
}

/// Left edge and baseline of the title line.
///
/// The only collision rule: an overlay asset on the left edge pushes the text to
/// [`TEXT_COLLISION_X_FRACTION`] of the canvas width.
pub fn text_anchor(aspect: AspectRatio, overlay_on_left: bool) -> Point {
    let canvas = aspect.canvas();
    let scale = aspect.scale_factor();
    let (padding, bottom_offset) = match aspect {
        AspectRatio::Landscape16x9 => (60.0, 180.0),
        AspectRatio::Portrait9x16 => (40.0, 350.0),
    };
    let x = if overlay_on_left {
        f64::from(canvas.width) * TEXT_COLLISION_X_FRACTION
    } else {
        padding
    };
    let y = f64::from(canvas.height) - bottom_offset * scale;
    Point::new(x, y)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
