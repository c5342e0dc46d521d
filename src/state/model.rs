use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    assets::source::{ImageSource, de_optional_source},
    foundation::color::HexColor,
    foundation::core::Canvas,
    foundation::error::{ThumbError, ThumbResult},
};

/// Upper bound applied to [`CompositionState::branding_scale`].
pub const MAX_BRANDING_SCALE: f64 = 4.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Output framing. Selects the canvas size and the typography scale factor.
pub enum AspectRatio {
    /// 1280×720, scale factor 1.0.
    #[default]
    #[serde(rename = "16:9")]
    Landscape16x9,
    /// 720×1280, scale factor 0.85.
    #[serde(rename = "9:16")]
    Portrait9x16,
}

impl AspectRatio {
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Landscape16x9 => Canvas {
                width: 1280,
                height: 720,
            },
            Self::Portrait9x16 => Canvas {
                width: 720,
                height: 1280,
            },
        }
    }

    /// Multiplier for font sizes, stroke widths and text offsets.
    pub fn scale_factor(self) -> f64 {
        match self {
            Self::Landscape16x9 => 1.0,
            Self::Portrait9x16 => 0.85,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape16x9 => "16:9",
            Self::Portrait9x16 => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(Self::Landscape16x9),
            "9:16" => Ok(Self::Portrait9x16),
            other => Err(ThumbError::validation(format!(
                "unknown aspect ratio \"{other}\" (expected 16:9 or 9:16)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Horizontal edge the overlay asset anchors to.
pub enum BrandingPosition {
    Left,
    #[default]
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Typography preset for the title and subtitle.
pub enum TextStyle {
    Clean,
    #[default]
    Impact,
    Comic,
    Gradient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Declarative description of one thumbnail.
///
/// The compositor reads a state and owns none of it. Collaborators never mutate a state in
/// place; they produce a new one with [`CompositionState::apply`].
pub struct CompositionState {
    pub title: String,
    pub subtitle: String,
    /// Prompt text for remote background generation and suggestions.
    pub topic: String,
    /// Generated (or previously uploaded) background.
    #[serde(deserialize_with = "de_optional_source")]
    pub background_image: Option<ImageSource>,
    /// Secondary full-frame background candidate (identity/style source).
    #[serde(deserialize_with = "de_optional_source")]
    pub branding_image1: Option<ImageSource>,
    /// Overlay asset drawn small and anchored to a bottom corner.
    #[serde(deserialize_with = "de_optional_source")]
    pub branding_image2: Option<ImageSource>,
    pub branding_position2: BrandingPosition,
    /// Overlay asset size multiplier.
    pub branding_scale: f64,
    pub text_style: TextStyle,
    pub aspect_ratio: AspectRatio,
    pub primary_color: HexColor,
    pub secondary_color: HexColor,
    /// Scrim strength in `[0, 1]`.
    pub overlay_opacity: f64,
    /// Gate for the scrim.
    pub show_overlay: bool,
}

impl Default for CompositionState {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            topic: String::new(),
            background_image: None,
            branding_image1: None,
            branding_image2: None,
            branding_position2: BrandingPosition::Right,
            branding_scale: 1.0,
            text_style: TextStyle::Impact,
            aspect_ratio: AspectRatio::Landscape16x9,
            primary_color: HexColor::rgb(255, 0, 0),
            secondary_color: HexColor::WHITE,
            overlay_opacity: 0.3,
            show_overlay: true,
        }
    }
}

impl CompositionState {
    pub fn canvas(&self) -> Canvas {
        self.aspect_ratio.canvas()
    }

    pub fn scale_factor(&self) -> f64 {
        self.aspect_ratio.scale_factor()
    }

    /// Copy with numeric fields forced into their valid ranges.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        out.overlay_opacity = if self.overlay_opacity.is_nan() {
            0.0
        } else {
            self.overlay_opacity.clamp(0.0, 1.0)
        };
        out.branding_scale = if !self.branding_scale.is_finite() || self.branding_scale <= 0.0 {
            1.0
        } else {
            self.branding_scale.min(MAX_BRANDING_SCALE)
        };
        out
    }

    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let state: Self =
            serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("state json: {e}")))?;
        Ok(state.sanitized())
    }

    pub fn to_json_pretty(&self) -> ThumbResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ThumbError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/model.rs"]
mod tests;
