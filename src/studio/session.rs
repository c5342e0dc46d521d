use std::time::SystemTime;

use crate::{
    assets::{loader::ImageLoader, source::ImageSource},
    export::png::{PngExport, export_png},
    foundation::error::{ThumbError, ThumbResult},
    remote::{
        generator::{BackgroundGenerator, EncodedImage},
        prompt::GenerationRequest,
    },
    render::{
        compositor::Compositor,
        frame::{PresentOutcome, Surface},
    },
    state::{
        model::CompositionState,
        patch::StatePatch,
        policy::{RenderPolicy, StudioMode},
    },
};

/// Shown to the user whenever remote background generation comes back empty.
pub const GENERATION_FAILED_MESSAGE: &str = "failed to generate, try again";

/// One editing session: the current state, the mode's policy, the compositor and the surface it
/// presents to. Every state change re-renders.
pub struct Studio<L> {
    state: CompositionState,
    mode: StudioMode,
    policy: RenderPolicy,
    compositor: Compositor<L>,
    surface: Surface,
    generating: bool,
}

impl<L: ImageLoader> Studio<L> {
    pub fn new(mode: StudioMode, compositor: Compositor<L>) -> Self {
        Self {
            state: CompositionState::default(),
            mode,
            policy: mode.policy(),
            compositor,
            surface: Surface::new(),
            generating: false,
        }
    }

    /// Override the mode's default policy (e.g. a configured grid spacing).
    pub fn with_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_state(mut self, state: CompositionState) -> Self {
        self.state = state.sanitized();
        self
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn mode(&self) -> StudioMode {
        self.mode
    }

    pub fn policy(&self) -> &RenderPolicy {
        &self.policy
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn compositor(&self) -> &Compositor<L> {
        &self.compositor
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Re-render the current state onto the surface.
    pub async fn render(&mut self) -> PresentOutcome {
        self.compositor
            .refresh(&self.state, &self.policy, &mut self.surface)
            .await
    }

    pub async fn apply(&mut self, patch: &StatePatch) -> PresentOutcome {
        if !patch.is_empty() {
            self.state = self.state.apply(patch);
        }
        self.render().await
    }

    /// A freshly uploaded base photo replaces any generated background.
    pub async fn upload_base(&mut self, source: ImageSource) -> PresentOutcome {
        let patch = StatePatch::new()
            .branding_image1(Some(source))
            .background_image(None);
        self.apply(&patch).await
    }

    /// Build the request for the current state and mark generation as running.
    ///
    /// Pair with [`Studio::finish_generation`] when the remote call is driven elsewhere.
    pub fn begin_generation(&mut self) -> ThumbResult<GenerationRequest> {
        if self.generating {
            return Err(ThumbError::validation("a background is already being generated"));
        }
        let request = GenerationRequest::from_state(&self.state)?;
        self.generating = true;
        Ok(request)
    }

    /// Clear the generating flag and, on success, show the new background.
    pub async fn finish_generation(
        &mut self,
        result: Option<EncodedImage>,
    ) -> ThumbResult<PresentOutcome> {
        self.generating = false;
        let Some(image) = result else {
            tracing::warn!(topic = %self.state.topic, "background generation returned nothing");
            return Err(ThumbError::remote_generation(GENERATION_FAILED_MESSAGE));
        };
        let patch = StatePatch::new().background_image(Some(image.into_source()));
        Ok(self.apply(&patch).await)
    }

    #[tracing::instrument(skip_all, fields(mode = %self.mode))]
    pub async fn generate_background<G: BackgroundGenerator>(
        &mut self,
        generator: &G,
    ) -> ThumbResult<PresentOutcome> {
        let request = self.begin_generation()?;
        tracing::debug!(
            kind = ?request.kind,
            references = request.references.len(),
            "generating background"
        );
        let result = {
            // cleared even if this future is dropped mid-call
            let _reset = ResetOnDrop(&mut self.generating);
            generator.generate_background(&request).await
        };
        self.finish_generation(result).await
    }

    pub fn export_png(&self) -> ThumbResult<PngExport> {
        export_png(&self.surface, &self.policy, SystemTime::now())
    }
}

struct ResetOnDrop<'a>(&'a mut bool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/studio/session.rs"]
mod tests;
