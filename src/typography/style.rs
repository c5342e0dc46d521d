use serde::{Deserialize, Serialize};

use crate::{foundation::color::HexColor, state::model::TextStyle};

/// Title stroke width before scaling.
pub const TITLE_STROKE_WIDTH: f64 = 12.0;
/// Subtitle baseline offset below the title baseline, before scaling.
pub const SUBTITLE_OFFSET: f64 = 100.0;
/// Half-height of the gradient title fill around the baseline.
pub const GRADIENT_HALF_SPAN: f64 = 50.0;
/// Drop shadow under all text.
pub const TEXT_SHADOW_BLUR: f64 = 10.0;
pub const TEXT_SHADOW_ALPHA: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Font faces the studio ships with.
pub enum FontFace {
    /// Bold (700) sans.
    SansBold,
    /// Black-weight (900) sans.
    SansBlack,
    /// Display face for the comic style.
    Display,
}

impl FontFace {
    pub const ALL: [Self; 3] = [Self::SansBold, Self::SansBlack, Self::Display];
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Font selection and sizes for one text style.
pub struct FontSpec {
    pub face: FontFace,
    pub weight: f32,
    pub title_px: f32,
    pub subtitle_px: f32,
}

impl FontSpec {
    pub fn scaled(self, scale: f64) -> Self {
        let s = scale as f32;
        Self {
            title_px: self.title_px * s,
            subtitle_px: self.subtitle_px * s,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// How the title glyphs are filled.
pub enum TitleFill {
    Flat(HexColor),
    /// Vertical gradient from `top` at `y0` to `bottom` at `y1` (canvas space), clamped outside.
    VerticalGradient {
        top: HexColor,
        bottom: HexColor,
        y0: f64,
        y1: f64,
    },
}

impl TitleFill {
    /// Straight-alpha color at canvas row `y`.
    pub fn color_at(&self, y: f64) -> HexColor {
        match *self {
            Self::Flat(c) => c,
            Self::VerticalGradient {
                top,
                bottom,
                y0,
                y1,
            } => {
                let t = if y1 > y0 { (y - y0) / (y1 - y0) } else { 1.0 };
                top.lerp(bottom, t as f32)
            }
        }
    }
}

impl TextStyle {
    /// Unscaled font spec.
    pub fn spec(self) -> FontSpec {
        match self {
            Self::Clean | Self::Gradient => FontSpec {
                face: FontFace::SansBold,
                weight: 700.0,
                title_px: 90.0,
                subtitle_px: 45.0,
            },
            Self::Impact => FontSpec {
                face: FontFace::SansBlack,
                weight: 900.0,
                title_px: 110.0,
                subtitle_px: 50.0,
            },
            Self::Comic => FontSpec {
                face: FontFace::Display,
                weight: 400.0,
                title_px: 90.0,
                subtitle_px: 45.0,
            },
        }
    }

    /// Title fill for a title whose baseline sits at `baseline_y`.
    pub fn title_fill(self, primary: HexColor, baseline_y: f64) -> TitleFill {
        match self {
            Self::Gradient => TitleFill::VerticalGradient {
                top: HexColor::WHITE,
                bottom: primary,
                y0: baseline_y - GRADIENT_HALF_SPAN,
                y1: baseline_y + GRADIENT_HALF_SPAN,
            },
            Self::Clean | Self::Impact | Self::Comic => TitleFill::Flat(primary),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typography/style.rs"]
mod tests;
