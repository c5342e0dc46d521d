use std::{
    collections::HashMap,
    future::Future,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::assets::decode::{ImageFormatHint, PreparedImage, decode_with_hint};
use crate::assets::source::ImageSource;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Asynchronous image load-and-decode.
///
/// Loads are the only suspension points of a render. Implementations must not panic and should
/// report every failure as [`ThumbError::ImageLoad`] (or [`ThumbError::InvalidImageGeometry`] for
/// degenerate images); the compositor turns both into visual fallbacks.
pub trait ImageLoader {
    /// Fetch and decode `source`.
    fn load(&self, source: &ImageSource) -> impl Future<Output = ThumbResult<PreparedImage>>;
}

impl<L: ImageLoader + ?Sized> ImageLoader for Arc<L> {
    fn load(&self, source: &ImageSource) -> impl Future<Output = ThumbResult<PreparedImage>> {
        (**self).load(source)
    }
}

/// Default loader: embedded blobs, local files and (with the `http` feature) remote URLs.
#[derive(Clone, Debug, Default)]
pub struct SourceLoader {
    #[cfg(feature = "http")]
    client: reqwest::Client,
    http_timeout: Option<Duration>,
}

impl SourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound remote fetches. There is no timeout unless one is set here.
    pub fn with_http_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }

    #[cfg(feature = "http")]
    async fn fetch_remote(&self, url: &str) -> ThumbResult<PreparedImage> {
        let mut req = self.client.get(url);
        if let Some(t) = self.http_timeout {
            req = req.timeout(t);
        }
        let resp = req
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ThumbError::image_load(format!("fetch '{url}': {e}")))?;

        let hint = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(hint_for_mime)
            .unwrap_or_else(|| hint_for_path(Path::new(url)));
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ThumbError::image_load(format!("read body of '{url}': {e}")))?;
        decode_with_hint(&bytes, hint)
    }

    #[cfg(not(feature = "http"))]
    async fn fetch_remote(&self, url: &str) -> ThumbResult<PreparedImage> {
        let _ = self.http_timeout;
        Err(ThumbError::image_load(format!(
            "cannot fetch '{url}': remote image loading requires the `http` feature"
        )))
    }
}

impl ImageLoader for SourceLoader {
    #[tracing::instrument(skip_all, fields(source = %source.describe()))]
    async fn load(&self, source: &ImageSource) -> ThumbResult<PreparedImage> {
        match source {
            ImageSource::Embedded(e) => {
                let bytes = e.decode_payload()?;
                decode_with_hint(&bytes, hint_for_mime(&e.mime))
            }
            ImageSource::File(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    ThumbError::image_load(format!("read '{}': {e}", path.display()))
                })?;
                decode_with_hint(&bytes, hint_for_path(path))
            }
            ImageSource::Remote(url) => self.fetch_remote(url).await,
        }
    }
}

/// Memoizes successful loads so re-renders of an unchanged state reuse decoded pixels.
///
/// Failures are not cached: a flaky remote image gets another chance on the next render.
#[derive(Debug)]
pub struct CachedLoader<L> {
    inner: L,
    cache: Mutex<HashMap<ImageSource, PreparedImage>>,
}

impl<L> CachedLoader<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn lookup(&self, source: &ImageSource) -> Option<PreparedImage> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(source)
            .cloned()
    }
}

impl<L: ImageLoader> ImageLoader for CachedLoader<L> {
    async fn load(&self, source: &ImageSource) -> ThumbResult<PreparedImage> {
        if let Some(img) = self.lookup(source) {
            return Ok(img);
        }
        let img = self.inner.load(source).await?;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(source.clone(), img.clone());
        Ok(img)
    }
}

fn hint_for_mime(mime: &str) -> ImageFormatHint {
    if mime.to_ascii_lowercase().contains("svg") {
        ImageFormatHint::Svg
    } else {
        ImageFormatHint::Raster
    }
}

fn hint_for_path(path: &Path) -> ImageFormatHint {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormatHint::Svg,
        _ => ImageFormatHint::Raster,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
