use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::error::ThumbError,
    state::model::CompositionState,
};

pub const DEFAULT_GRID_SPACING: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Which of the two full-frame candidates wins when both are set.
pub enum BackgroundPriority {
    /// `background_image` first, then `branding_image1`.
    PreferGenerated,
    /// `branding_image1` first, then `background_image`.
    PreferUploadedBase,
}

impl BackgroundPriority {
    /// The background source to draw, if any.
    pub fn select(self, state: &CompositionState) -> Option<&ImageSource> {
        let (first, second) = match self {
            Self::PreferGenerated => (&state.background_image, &state.branding_image1),
            Self::PreferUploadedBase => (&state.branding_image1, &state.background_image),
        };
        first.as_ref().or(second.as_ref())
    }
}

impl FromStr for BackgroundPriority {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "prefer-generated" | "generated" => Ok(Self::PreferGenerated),
            "prefer-uploaded-base" | "uploaded" => Ok(Self::PreferUploadedBase),
            other => Err(ThumbError::validation(format!(
                "unknown background priority \"{other}\" (expected prefer-generated or prefer-uploaded-base)"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// What the background looks like when no source is set.
pub enum EmptyFill {
    /// Flat fallback color.
    Flat,
    /// Flat fallback color with a faint grid.
    Grid { spacing: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Mode-dependent compositing contract passed to every render.
pub struct RenderPolicy {
    pub background_priority: BackgroundPriority,
    /// Whether the title/subtitle are burned into the frame.
    pub render_text: bool,
    pub empty_fill: EmptyFill,
    /// Refuse PNG export when no background image was drawn.
    pub export_requires_background: bool,
}

impl RenderPolicy {
    pub fn with_priority(mut self, priority: BackgroundPriority) -> Self {
        self.background_priority = priority;
        self
    }

    /// Change grid spacing; a no-op for flat empty fills.
    pub fn with_grid_spacing(mut self, spacing: u32) -> Self {
        if let EmptyFill::Grid { .. } = self.empty_fill {
            self.empty_fill = EmptyFill::Grid {
                spacing: spacing.max(1),
            };
        }
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Studio workflow. Each mode implies a [`RenderPolicy`].
pub enum StudioMode {
    /// Video-thumbnail mode: generated background wins, text is burned in.
    #[default]
    Classic,
    /// Image-only creator fusion: uploaded base wins, no text, export needs a background.
    UgcFusion,
}

impl StudioMode {
    pub fn policy(self) -> RenderPolicy {
        match self {
            Self::Classic => RenderPolicy {
                background_priority: BackgroundPriority::PreferGenerated,
                render_text: true,
                empty_fill: EmptyFill::Flat,
                export_requires_background: false,
            },
            Self::UgcFusion => RenderPolicy {
                background_priority: BackgroundPriority::PreferUploadedBase,
                render_text: false,
                empty_fill: EmptyFill::Grid {
                    spacing: DEFAULT_GRID_SPACING,
                },
                export_requires_background: true,
            },
        }
    }
}

impl fmt::Display for StudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Classic => "classic",
            Self::UgcFusion => "ugc-fusion",
        })
    }
}

impl FromStr for StudioMode {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "classic" => Ok(Self::Classic),
            "ugc-fusion" | "ugc" => Ok(Self::UgcFusion),
            other => Err(ThumbError::validation(format!(
                "unknown studio mode \"{other}\" (expected classic or ugc-fusion)"
            ))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/policy.rs"]
mod tests;
