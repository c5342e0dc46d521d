use crate::{
    assets::loader::ImageLoader,
    compile::plan::{BackgroundResolution, FALLBACK_FILL, ResolvedImages, compile_frame},
    render::cpu::CpuBackend,
    render::frame::{FrameRGBA, PresentOutcome, RenderedFrame, Surface},
    render::generation::{GenerationCounter, RenderTicket},
    state::model::CompositionState,
    state::policy::RenderPolicy,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed(RenderedFrame),
    /// A newer render started while this one was loading; nothing was produced.
    Stale { generation: u64, superseded_by: u64 },
}

impl RenderOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// Turns states into frames: resolve images, compile a plan, rasterize.
///
/// The compositor holds no composition state and never touches a [`Surface`] on its own. Every
/// render is tied to a [`RenderTicket`]; once a newer ticket is issued the older render stops
/// at its next load and reports [`RenderOutcome::Stale`].
pub struct Compositor<L> {
    loader: L,
    backend: CpuBackend,
    generations: GenerationCounter,
}

impl<L: ImageLoader> Compositor<L> {
    pub fn new(loader: L, backend: CpuBackend) -> Self {
        Self {
            loader,
            backend,
            generations: GenerationCounter::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn backend(&self) -> &CpuBackend {
        &self.backend
    }

    pub fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    /// Issue the ticket for a new render, invalidating all earlier ones.
    pub fn begin(&self) -> RenderTicket {
        self.generations.issue()
    }

    fn stale(&self, ticket: RenderTicket) -> Option<RenderOutcome> {
        if self.generations.is_current(ticket) {
            return None;
        }
        let superseded_by = self.generations.latest();
        tracing::debug!(
            generation = ticket.generation,
            superseded_by,
            "render superseded"
        );
        Some(RenderOutcome::Stale {
            generation: ticket.generation,
            superseded_by,
        })
    }

    /// Render `state` under `ticket`.
    ///
    /// Image, geometry and font failures never surface here: they become fallback fills or
    /// skipped layers and the frame is still produced.
    #[tracing::instrument(skip_all, fields(generation = ticket.generation))]
    pub async fn render(
        &self,
        state: &CompositionState,
        policy: &RenderPolicy,
        ticket: RenderTicket,
    ) -> RenderOutcome {
        let state = state.sanitized();

        let background = match policy.background_priority.select(&state) {
            None => BackgroundResolution::Absent,
            Some(src) => {
                let loaded = self.loader.load(src).await;
                if let Some(stale) = self.stale(ticket) {
                    return stale;
                }
                match loaded {
                    Ok(img) => BackgroundResolution::Loaded(img),
                    Err(e) => {
                        tracing::warn!(
                            source = %src.describe(),
                            error = %e,
                            "background failed to load"
                        );
                        BackgroundResolution::Failed
                    }
                }
            }
        };

        let overlay = match &state.branding_image2 {
            None => None,
            Some(src) => {
                let loaded = self.loader.load(src).await;
                if let Some(stale) = self.stale(ticket) {
                    return stale;
                }
                match loaded {
                    Ok(img) => Some(img),
                    Err(e) => {
                        tracing::warn!(
                            source = %src.describe(),
                            error = %e,
                            "overlay asset failed to load"
                        );
                        None
                    }
                }
            }
        };

        let images = ResolvedImages {
            background,
            overlay,
        };
        let plan = compile_frame(&state, policy, &images);
        let (frame, background_drawn) = match self.backend.rasterize_layers(&plan) {
            Ok(out) => {
                let drawn = plan.background_layer.is_some_and(|i| out.drew(i));
                (out.frame, drawn)
            }
            Err(e) => {
                tracing::warn!(error = %e, "rasterization failed; presenting fallback fill");
                (FrameRGBA::solid(plan.canvas, FALLBACK_FILL.to_premul()), false)
            }
        };

        if let Some(stale) = self.stale(ticket) {
            return stale;
        }
        RenderOutcome::Completed(RenderedFrame {
            ticket,
            frame,
            background_drawn,
        })
    }

    /// Start a render and present it to `surface` if nothing newer started meanwhile.
    pub async fn refresh(
        &self,
        state: &CompositionState,
        policy: &RenderPolicy,
        surface: &mut Surface,
    ) -> PresentOutcome {
        let ticket = self.begin();
        match self.render(state, policy, ticket).await {
            RenderOutcome::Completed(rendered) => surface.present(&self.generations, rendered),
            RenderOutcome::Stale {
                generation,
                superseded_by,
            } => PresentOutcome::Stale {
                generation,
                superseded_by,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
