use std::{
    io::Cursor,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{ThumbError, ThumbResult},
    render::frame::{FrameRGBA, Surface},
    state::policy::RenderPolicy,
};

/// Encoded snapshot of the surface, ready to be offered as a download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PngExport {
    pub file_name: String,
    /// Generation of the render the bytes were taken from.
    pub generation: u64,
    pub bytes: Vec<u8>,
}

impl PngExport {
    /// Write the PNG into `dir` under its timestamped name.
    pub fn write_to_dir(&self, dir: &Path) -> ThumbResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(path)
    }
}

/// `thumbnail-<unix-millis>.png`
pub fn export_filename(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("thumbnail-{millis}.png")
}

/// Undo premultiplication for 8-bit RGBA, rounding to nearest.
pub fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for px in data.chunks_exact(4) {
        let a = px[3];
        match a {
            0 => out.extend_from_slice(&[0, 0, 0, 0]),
            255 => out.extend_from_slice(px),
            _ => {
                let a16 = u16::from(a);
                for &c in &px[..3] {
                    let v = (u16::from(c) * 255 + a16 / 2) / a16;
                    out.push(v.min(255) as u8);
                }
                out.push(a);
            }
        }
    }
    out
}

pub fn encode_png(frame: &FrameRGBA) -> ThumbResult<Vec<u8>> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(ThumbError::render(format!(
            "frame buffer has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }
    let straight = if frame.premultiplied {
        unpremultiply(&frame.data)
    } else {
        frame.data.clone()
    };

    let mut out = Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut out,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out.into_inner())
}

/// Serialize whatever the surface currently shows.
///
/// The surface only ever holds complete frames, so the export always matches the last render
/// that finished. Modes whose output must contain a background refuse to export without one.
#[tracing::instrument(skip_all, fields(generation = surface.generation()))]
pub fn export_png(
    surface: &Surface,
    policy: &RenderPolicy,
    now: SystemTime,
) -> ThumbResult<PngExport> {
    let frame = surface
        .frame()
        .ok_or_else(|| ThumbError::validation("export disabled: nothing has been rendered yet"))?;
    if policy.export_requires_background && !surface.background_drawn() {
        return Err(ThumbError::validation(
            "export disabled: upload a base image or generate a background first",
        ));
    }
    let bytes = encode_png(frame)?;
    tracing::debug!(bytes = bytes.len(), "encoded png export");
    Ok(PngExport {
        file_name: export_filename(now),
        generation: surface.generation(),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/png.rs"]
mod tests;
