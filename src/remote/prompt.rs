use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::error::{ThumbError, ThumbResult},
    state::model::{AspectRatio, CompositionState},
};

/// Instruction sent with every background request. Generated backgrounds are composited under
/// styled text, so they must never carry their own lettering.
pub const SYSTEM_INSTRUCTION: &str = "You are a thumbnail photographer for creator content. \
Produce images that read as high-end vlog photography with authentic skin texture and natural, \
polished faces. Never include text, graphics, logos or watermarks of any kind.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationKind {
    /// Identity from reference 1 placed into the look of reference 2.
    Fusion,
    /// Identity from reference 1 in a scene built from the prompt.
    CreatorScene,
    /// Prompt only.
    PurePrompt,
}

/// A fully built request for the remote background capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub system_instruction: String,
    pub user_prompt: String,
    /// Reference images, identity first.
    pub references: Vec<ImageSource>,
}

impl GenerationRequest {
    /// Pick the instruction for the references at hand.
    ///
    /// A style reference without an identity reference is ignored.
    pub fn build(
        prompt: &str,
        aspect_ratio: AspectRatio,
        identity: Option<&ImageSource>,
        style: Option<&ImageSource>,
    ) -> Self {
        let prompt = prompt.trim();
        let (kind, user_prompt, references) = match (identity, style) {
            (Some(identity), Some(style)) => (
                GenerationKind::Fusion,
                format!(
                    "Fusion thumbnail for \"{prompt}\". Keep the person from image 1 exactly \
                     recognizable. Take colors and lighting from image 2 and place the person \
                     from image 1 naturally inside the setting of image 2."
                ),
                vec![identity.clone(), style.clone()],
            ),
            (Some(identity), None) => (
                GenerationKind::CreatorScene,
                format!(
                    "Creator scene about \"{prompt}\". Use the face from image 1 with \
                     professional cinematic lighting."
                ),
                vec![identity.clone()],
            ),
            (None, _) => (
                GenerationKind::PurePrompt,
                format!(
                    "Authentic creator thumbnail about \"{prompt}\". Premium camera look, vivid \
                     colors, natural feel."
                ),
                Vec::new(),
            ),
        };

        Self {
            kind,
            prompt: prompt.to_string(),
            aspect_ratio,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_prompt,
            references,
        }
    }

    /// Build from the studio state: topic as prompt, `branding_image1` as identity and
    /// `branding_image2` as style.
    pub fn from_state(state: &CompositionState) -> ThumbResult<Self> {
        if state.topic.trim().is_empty() {
            return Err(ThumbError::validation("a topic is required to generate a background"));
        }
        Ok(Self::build(
            &state.topic,
            state.aspect_ratio,
            state.branding_image1.as_ref(),
            state.branding_image2.as_ref(),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/prompt.rs"]
mod tests;
