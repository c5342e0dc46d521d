/// Convenience result type used across thumbforge.
pub type ThumbResult<T> = Result<T, ThumbError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`ThumbError::RemoteGeneration`] is meant to reach end users. Everything raised inside the
/// compositor is converted into a visual fallback before the render entry point returns.
#[derive(thiserror::Error, Debug)]
pub enum ThumbError {
    /// Invalid user-provided state, patch or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced image could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Degenerate image or destination dimensions during placement.
    #[error("invalid image geometry: {0}")]
    InvalidImageGeometry(String),

    /// The remote generation capability returned nothing or failed.
    #[error("remote generation failed: {0}")]
    RemoteGeneration(String),

    /// Errors while rasterizing a layer plan.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThumbError {
    /// Build a [`ThumbError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ThumbError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`ThumbError::InvalidImageGeometry`] value.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidImageGeometry(msg.into())
    }

    /// Build a [`ThumbError::RemoteGeneration`] value.
    pub fn remote_generation(msg: impl Into<String>) -> Self {
        Self::RemoteGeneration(msg.into())
    }

    /// Build a [`ThumbError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ThumbError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
