use std::{fmt, path::PathBuf, str::FromStr};

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ThumbError, ThumbResult};

/// Reference to a raster (or SVG) image exchanged between collaborators and the compositor.
///
/// The string form is the one used by the studio UI: a `data:` URL for embedded blobs, an
/// `http(s)://` URL for remote images, and anything else is read as a local file path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Remote image fetched over HTTP(S).
    Remote(String),
    /// Self-describing embedded blob (MIME type + payload).
    Embedded(EmbeddedImage),
    /// Local file path.
    File(PathBuf),
}

/// Payload of a `data:` URL. The payload is kept in its textual form and decoded at load time,
/// so a corrupt blob surfaces as an image load failure rather than a state error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EmbeddedImage {
    pub mime: String,
    pub base64: bool,
    pub payload: String,
}

impl EmbeddedImage {
    /// Embed raw bytes as base64.
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            base64: true,
            payload: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode_payload(&self) -> ThumbResult<Vec<u8>> {
        if !self.base64 {
            return Ok(percent_decode(&self.payload));
        }
        let compact: String = self
            .payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        base64::engine::general_purpose::STANDARD
            .decode(compact.as_bytes())
            .map_err(|e| ThumbError::image_load(format!("invalid base64 image payload: {e}")))
    }

    pub fn is_svg(&self) -> bool {
        self.mime.eq_ignore_ascii_case("image/svg+xml")
    }
}

impl ImageSource {
    /// Parse the string form. Blank input yields `None` (the field is absent).
    pub fn parse(s: &str) -> ThumbResult<Option<Self>> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(None);
        }
        if let Some(rest) = strip_prefix_ignore_case(s, "data:") {
            return parse_data_url(rest).map(|e| Some(Self::Embedded(e)));
        }
        if strip_prefix_ignore_case(s, "http://").is_some()
            || strip_prefix_ignore_case(s, "https://").is_some()
        {
            return Ok(Some(Self::Remote(s.to_string())));
        }
        Ok(Some(Self::File(PathBuf::from(s))))
    }

    pub fn embedded(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self::Embedded(EmbeddedImage::from_bytes(mime, bytes))
    }

    /// Short, log-friendly description that never dumps a whole payload.
    pub fn describe(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Embedded(e) => format!("data:{} ({} bytes encoded)", e.mime, e.payload.len()),
            Self::File(p) => p.display().to_string(),
        }
    }
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

fn parse_data_url(rest: &str) -> ThumbResult<EmbeddedImage> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ThumbError::validation("data URL is missing the ',' separator"))?;

    let mut parts = meta.split(';');
    let mime = parts.next().unwrap_or_default().trim();
    let mime = if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime.to_ascii_lowercase()
    };
    let base64 = parts.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    Ok(EmbeddedImage {
        mime,
        base64,
        payload: payload.to_string(),
    })
}

fn percent_decode(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let Some(v) = s
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
        {
            out.push(v);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Embedded(e) => {
                if e.base64 {
                    write!(f, "data:{};base64,{}", e.mime, e.payload)
                } else {
                    write!(f, "data:{},{}", e.mime, e.payload)
                }
            }
            Self::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl FromStr for ImageSource {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)?.ok_or_else(|| ThumbError::validation("image source must be non-empty"))
    }
}

impl Serialize for ImageSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Serde helper for optional image fields: `null`, a missing key and `""` all mean absent.
pub(crate) fn de_optional_source<'de, D>(deserializer: D) -> Result<Option<ImageSource>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) => ImageSource::parse(&s).map_err(serde::de::Error::custom),
    }
}

/// Serde helper for patch image fields: a missing key keeps the current value (outer `None`),
/// `null` or `""` clears it (`Some(None)`).
pub(crate) fn de_patch_source<'de, D>(
    deserializer: D,
) -> Result<Option<Option<ImageSource>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    de_optional_source(deserializer).map(Some)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
