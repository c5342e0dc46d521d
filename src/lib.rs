//! Thumbforge composes video thumbnails from a declarative state.
//!
//! A [`CompositionState`] names the images, text and styling of one thumbnail. The
//! [`Compositor`] resolves its images, compiles an ordered layer plan (background, scrim,
//! overlay asset with glow, text) and rasterizes it on the CPU. Frames reach the displayable
//! [`Surface`] only if no newer render started meanwhile.
//!
//! - Build or patch a [`CompositionState`]
//! - Drive renders through a [`Studio`] (or a bare [`Compositor`])
//! - Export the surface with [`export_png`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod compile;
pub(crate) mod effects;
pub(crate) mod layout;
pub(crate) mod typography;

/// Host configuration.
pub mod config;
/// PNG export of the surface.
pub mod export;
/// Contracts for the remote image/video/suggestion capability.
pub mod remote;
/// Render pipeline: compositor, CPU backend, surface.
pub mod render;
/// Composition state, patches and mode policies.
pub mod state;
/// Editing session tying state, compositor and surface together.
pub mod studio;

pub use crate::foundation::color::HexColor;
pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{ThumbError, ThumbResult};

pub use crate::assets::decode::{
    ImageFormatHint, PreparedImage, decode_image, decode_svg, decode_with_hint,
};
pub use crate::assets::loader::{CachedLoader, ImageLoader, SourceLoader};
pub use crate::assets::source::{EmbeddedImage, ImageSource};

pub use crate::compile::plan::{
    BackgroundResolution, FALLBACK_FILL, Layer, LayerPlan, ResolvedImages, ShadowSpec, TextLayer,
    compile_frame,
};
pub use crate::layout::cover::{CoverPlacement, cover_fit};
pub use crate::layout::placement::{overlay_rect, text_anchor};
pub use crate::typography::fonts::{FontBook, FontFiles};
pub use crate::typography::style::{FontFace, FontSpec, TitleFill};

pub use crate::config::StudioConfig;
pub use crate::export::png::{PngExport, encode_png, export_filename, export_png};
pub use crate::remote::generator::{BackgroundGenerator, EncodedImage};
pub use crate::remote::prompt::{GenerationKind, GenerationRequest};
pub use crate::remote::suggestions::{
    SuggestionSource, Suggestions, suggestion_prompt, suggestions_or_default,
};
pub use crate::remote::video::{
    ScriptedVideoGenerator, ScriptedVideoJob, VideoGenerator, VideoJob, VideoPhase, VideoRequest,
    VideoResolution, VideoStatus, final_status,
};
pub use crate::render::compositor::{Compositor, RenderOutcome};
pub use crate::render::cpu::{CpuBackend, Rasterized};
pub use crate::render::frame::{FrameRGBA, PresentOutcome, RenderedFrame, Surface};
pub use crate::render::generation::{GenerationCounter, RenderTicket};
pub use crate::state::model::{
    AspectRatio, BrandingPosition, CompositionState, MAX_BRANDING_SCALE, TextStyle,
};
pub use crate::state::patch::StatePatch;
pub use crate::state::policy::{
    BackgroundPriority, DEFAULT_GRID_SPACING, EmptyFill, RenderPolicy, StudioMode,
};
pub use crate::studio::session::{GENERATION_FAILED_MESSAGE, Studio};
