use crate::{
    assets::decode::PreparedImage,
    foundation::color::HexColor,
    foundation::core::{Canvas, Point, Rect, Rgba8Premul},
    layout::cover::cover_fit,
    layout::placement::{overlay_rect, text_anchor},
    state::model::{BrandingPosition, CompositionState},
    state::policy::{EmptyFill, RenderPolicy},
    typography::style::{
        FontSpec, SUBTITLE_OFFSET, TEXT_SHADOW_ALPHA, TEXT_SHADOW_BLUR, TITLE_STROKE_WIDTH,
        TitleFill,
    },
};

/// Background drawn when no image is set or the image failed to load.
pub const FALLBACK_FILL: HexColor = HexColor::rgb(0x11, 0x11, 0x11);
/// Canvas-style blur of the glow behind the overlay asset.
pub const OVERLAY_GLOW_BLUR: f64 = 40.0;
const GRID_LINE_ALPHA: f64 = 0.06;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Outcome of loading the selected background source.
pub enum BackgroundResolution {
    /// No background source selected.
    Absent,
    Loaded(PreparedImage),
    /// A source was selected but could not be loaded or decoded.
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Images fetched for one render.
pub struct ResolvedImages {
    pub background: BackgroundResolution,
    pub overlay: Option<PreparedImage>,
}

impl ResolvedImages {
    pub fn none() -> Self {
        Self {
            background: BackgroundResolution::Absent,
            overlay: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Blurred silhouette drawn behind a layer.
pub struct ShadowSpec {
    /// Canvas-style blur in pixels.
    pub blur: f64,
    pub color: Rgba8Premul,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextLayer {
    pub title: String,
    pub subtitle: String,
    /// Already scaled by the aspect-ratio factor.
    pub font: FontSpec,
    /// Left edge and title baseline.
    pub origin: Point,
    pub subtitle_baseline: f64,
    pub title_fill: TitleFill,
    pub stroke_width: f64,
    pub shadow: ShadowSpec,
}

#[derive(Clone, Debug, PartialEq)]
/// One compositing step; layers are applied in order with source-over.
pub enum Layer {
    Fill(Rgba8Premul),
    Grid {
        spacing: u32,
        color: Rgba8Premul,
    },
    /// `image` scaled to `draw`, clipped to `clip`.
    Image {
        image: PreparedImage,
        draw: Rect,
        clip: Rect,
    },
    /// Shadow of `image`'s silhouette at `draw`; the image itself is a separate layer.
    Glow {
        image: PreparedImage,
        draw: Rect,
        shadow: ShadowSpec,
    },
    Text(TextLayer),
}

#[derive(Clone, Debug, PartialEq)]
/// Ordered, backend-agnostic description of one frame.
pub struct LayerPlan {
    pub canvas: Canvas,
    pub layers: Vec<Layer>,
    /// Index in `layers` of the background image, when one (not the fallback) made it into
    /// the plan.
    pub background_layer: Option<usize>,
}

impl LayerPlan {
    pub fn background_drawn(&self) -> bool {
        self.background_layer.is_some()
    }
}

/// Turn a state and its loaded images into a layer plan.
///
/// Pure and infallible: geometry failures drop the affected layer and are logged.
///
/// Text moves right of a left-positioned overlay asset only when that asset is actually in the
/// plan; an overlay that failed to load leaves the text at its normal anchor.
pub fn compile_frame(
    state: &CompositionState,
    policy: &RenderPolicy,
    images: &ResolvedImages,
) -> LayerPlan {
    let state = state.sanitized();
    let canvas = state.canvas();
    let full = canvas.rect();
    let mut layers = vec![Layer::Fill(FALLBACK_FILL.to_premul())];
    let mut background_layer = None;

    match &images.background {
        BackgroundResolution::Loaded(img) => {
            match cover_fit(f64::from(img.width), f64::from(img.height), full) {
                Ok(p) => {
                    background_layer = Some(layers.len());
                    layers.push(Layer::Image {
                        image: img.clone(),
                        draw: p.draw,
                        clip: p.clip,
                    });
                }
                Err(e) => tracing::warn!(error = %e, "background skipped; using fallback fill"),
            }
        }
        BackgroundResolution::Failed => {}
        BackgroundResolution::Absent => {
            if let EmptyFill::Grid { spacing } = policy.empty_fill {
                layers.push(Layer::Grid {
                    spacing: spacing.max(1),
                    color: Rgba8Premul::from_straight_rgba(
                        255,
                        255,
                        255,
                        (GRID_LINE_ALPHA * 255.0).round() as u8,
                    ),
                });
            }
        }
    }

    if state.show_overlay && state.overlay_opacity > 0.0 {
        layers.push(Layer::Fill(Rgba8Premul::black_alpha(state.overlay_opacity)));
    }

    let mut overlay_on_left = false;
    if let Some(img) = &images.overlay {
        match overlay_rect(
            canvas,
            img.width,
            img.height,
            state.branding_position2,
            state.branding_scale,
        ) {
            Ok(draw) => {
                layers.push(Layer::Glow {
                    image: img.clone(),
                    draw,
                    shadow: ShadowSpec {
                        blur: OVERLAY_GLOW_BLUR,
                        color: state.primary_color.to_premul(),
                    },
                });
                layers.push(Layer::Image {
                    image: img.clone(),
                    draw,
                    clip: full,
                });
                overlay_on_left = state.branding_position2 == BrandingPosition::Left;
            }
            Err(e) => tracing::warn!(error = %e, "overlay asset skipped"),
        }
    }

    if policy.render_text && !(state.title.is_empty() && state.subtitle.is_empty()) {
        layers.push(Layer::Text(text_layer(&state, overlay_on_left)));
    }

    LayerPlan {
        canvas,
        layers,
        background_layer,
    }
}

fn text_layer(state: &CompositionState, overlay_on_left: bool) -> TextLayer {
    let scale = state.scale_factor();
    let origin = text_anchor(state.aspect_ratio, overlay_on_left);
    TextLayer {
        title: state.title.clone(),
        subtitle: state.subtitle.clone(),
        font: state.text_style.spec().scaled(scale),
        origin,
        subtitle_baseline: origin.y + SUBTITLE_OFFSET * scale,
        title_fill: state.text_style.title_fill(state.primary_color, origin.y),
        stroke_width: TITLE_STROKE_WIDTH * scale,
        shadow: ShadowSpec {
            blur: TEXT_SHADOW_BLUR,
            color: Rgba8Premul::black_alpha(TEXT_SHADOW_ALPHA),
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
