use serde::Deserialize;

use crate::{
    assets::source::{ImageSource, de_patch_source},
    foundation::color::HexColor,
    foundation::error::{ThumbError, ThumbResult},
    state::model::{AspectRatio, BrandingPosition, CompositionState, TextStyle},
};

/// Partial update of a [`CompositionState`].
///
/// `Some` overwrites, `None` keeps. Image fields are doubly optional so a patch can clear them:
/// `Some(None)` removes the image. In JSON a missing key keeps and `null`/`""` clears.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatePatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub topic: Option<String>,
    #[serde(deserialize_with = "de_patch_source")]
    pub background_image: Option<Option<ImageSource>>,
    #[serde(deserialize_with = "de_patch_source")]
    pub branding_image1: Option<Option<ImageSource>>,
    #[serde(deserialize_with = "de_patch_source")]
    pub branding_image2: Option<Option<ImageSource>>,
    pub branding_position2: Option<BrandingPosition>,
    pub branding_scale: Option<f64>,
    pub text_style: Option<TextStyle>,
    pub aspect_ratio: Option<AspectRatio>,
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub overlay_opacity: Option<f64>,
    pub show_overlay: Option<bool>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("patch json: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn title(mut self, v: impl Into<String>) -> Self {
        self.title = Some(v.into());
        self
    }

    pub fn subtitle(mut self, v: impl Into<String>) -> Self {
        self.subtitle = Some(v.into());
        self
    }

    pub fn topic(mut self, v: impl Into<String>) -> Self {
        self.topic = Some(v.into());
        self
    }

    pub fn background_image(mut self, v: Option<ImageSource>) -> Self {
        self.background_image = Some(v);
        self
    }

    pub fn branding_image1(mut self, v: Option<ImageSource>) -> Self {
        self.branding_image1 = Some(v);
        self
    }

    pub fn branding_image2(mut self, v: Option<ImageSource>) -> Self {
        self.branding_image2 = Some(v);
        self
    }

    pub fn branding_position2(mut self, v: BrandingPosition) -> Self {
        self.branding_position2 = Some(v);
        self
    }

    pub fn branding_scale(mut self, v: f64) -> Self {
        self.branding_scale = Some(v);
        self
    }

    pub fn text_style(mut self, v: TextStyle) -> Self {
        self.text_style = Some(v);
        self
    }

    pub fn aspect_ratio(mut self, v: AspectRatio) -> Self {
        self.aspect_ratio = Some(v);
        self
    }

    pub fn primary_color(mut self, v: HexColor) -> Self {
        self.primary_color = Some(v);
        self
    }

    pub fn secondary_color(mut self, v: HexColor) -> Self {
        self.secondary_color = Some(v);
        self
    }

    pub fn overlay_opacity(mut self, v: f64) -> Self {
        self.overlay_opacity = Some(v);
        self
    }

    pub fn show_overlay(mut self, v: bool) -> Self {
        self.show_overlay = Some(v);
        self
    }
}

fn merge<T: Clone>(dst: &mut T, src: &Option<T>) {
    if let Some(v) = src {
        *dst = v.clone();
    }
}

impl CompositionState {
    /// New state with `patch` merged over `self`, then sanitized.
    pub fn apply(&self, patch: &StatePatch) -> Self {
        let mut out = self.clone();
        merge(&mut out.title, &patch.title);
        merge(&mut out.subtitle, &patch.subtitle);
        merge(&mut out.topic, &patch.topic);
        merge(&mut out.background_image, &patch.background_image);
        merge(&mut out.branding_image1, &patch.branding_image1);
        merge(&mut out.branding_image2, &patch.branding_image2);
        merge(&mut out.branding_position2, &patch.branding_position2);
        merge(&mut out.branding_scale, &patch.branding_scale);
        merge(&mut out.text_style, &patch.text_style);
        merge(&mut out.aspect_ratio, &patch.aspect_ratio);
        merge(&mut out.primary_color, &patch.primary_color);
        merge(&mut out.secondary_color, &patch.secondary_color);
        merge(&mut out.overlay_opacity, &patch.overlay_opacity);
        merge(&mut out.show_overlay, &patch.show_overlay);
        out.sanitized()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/patch.rs"]
mod tests;
