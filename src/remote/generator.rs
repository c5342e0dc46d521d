use crate::{assets::source::ImageSource, remote::prompt::GenerationRequest};

/// Raw image bytes returned by a remote capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            mime: "image/png".to_string(),
            bytes,
        }
    }

    /// Embed as a self-describing `data:` source the compositor can load directly.
    pub fn into_source(self) -> ImageSource {
        ImageSource::embedded(self.mime, &self.bytes)
    }
}

/// Remote background synthesis. Implementations swallow their own transport errors and answer
/// `None`; callers turn that into a user-facing retry message.
pub trait BackgroundGenerator {
    fn generate_background(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Option<EncodedImage>>;
}

impl<G: BackgroundGenerator + ?Sized> BackgroundGenerator for &G {
    fn generate_background(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Option<EncodedImage>> {
        (**self).generate_background(request)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/generator.rs"]
mod tests;
