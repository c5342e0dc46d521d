use crate::{
    foundation::core::Rect,
    foundation::error::{ThumbError, ThumbResult},
};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of a cover-fit: where the whole image lands and the rectangle drawing is clipped to.
pub struct CoverPlacement {
    /// Full image rectangle; covers `clip` and overflows it on at most one axis.
    pub draw: Rect,
    /// Destination rectangle, unchanged.
    pub clip: Rect,
}

impl CoverPlacement {
    /// Horizontal and vertical scale from image pixels to draw space.
    pub fn scale(&self, img_w: f64, img_h: f64) -> (f64, f64) {
        (self.draw.width() / img_w, self.draw.height() / img_h)
    }
}

fn check_dim(what: &str, v: f64) -> ThumbResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ThumbError::invalid_geometry(format!(
            "{what} must be finite and > 0, got {v}"
        )));
    }
    Ok(())
}

/// Scale and center an `img_w`×`img_h` image so it fills `dest` with no empty borders,
/// cropping the longer axis.
pub fn cover_fit(img_w: f64, img_h: f64, dest: Rect) -> ThumbResult<CoverPlacement> {
    check_dim("image width", img_w)?;
    check_dim("image height", img_h)?;
    check_dim("destination width", dest.width())?;
    check_dim("destination height", dest.height())?;
    if !dest.x0.is_finite() || !dest.y0.is_finite() {
        return Err(ThumbError::invalid_geometry(
            "destination origin must be finite",
        ));
    }

    let (x, y, w, h) = (dest.x0, dest.y0, dest.width(), dest.height());
    let img_aspect = img_w / img_h;
    let target_aspect = w / h;

    let (dx, dy, dw, dh) = if img_aspect > target_aspect {
        let dw = h * img_aspect;
        (x + (w - dw) / 2.0, y, dw, h)
    } else {
        let dh = w / img_aspect;
        (x, y + (h - dh) / 2.0, w, dh)
    };

    Ok(CoverPlacement {
        draw: Rect::new(dx, dy, dx + dw, dy + dh),
        clip: dest,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/cover.rs"]
mod tests;
