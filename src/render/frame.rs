use crate::{
    foundation::core::{Canvas, Rgba8Premul},
    render::generation::{GenerationCounter, RenderTicket},
};

/// A rendered frame as RGBA8 pixels.
///
/// Frames produced by the compositor are **premultiplied alpha**; the flag makes that explicit
/// at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn solid(canvas: Canvas, color: Rgba8Premul) -> Self {
        let px = color.to_array();
        let mut data = Vec::with_capacity(canvas.rgba8_len());
        for _ in 0..(canvas.width as usize) * (canvas.height as usize) {
            data.extend_from_slice(&px);
        }
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Pixel at `(x, y)`; `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A completed render waiting to be presented.
pub struct RenderedFrame {
    pub ticket: RenderTicket,
    pub frame: FrameRGBA,
    pub background_drawn: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentOutcome {
    Presented { generation: u64 },
    /// A newer render was started; the surface was not touched.
    Stale { generation: u64, superseded_by: u64 },
}

/// The one displayable raster. Owned by the caller and only written through [`Surface::present`].
#[derive(Clone, Debug, Default)]
pub struct Surface {
    frame: Option<FrameRGBA>,
    generation: u64,
    background_drawn: bool,
    writes: u64,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit `rendered` if its ticket is still the latest one issued by `counter`.
    pub fn present(
        &mut self,
        counter: &GenerationCounter,
        rendered: RenderedFrame,
    ) -> PresentOutcome {
        let generation = rendered.ticket.generation;
        if !counter.is_current(rendered.ticket) {
            let superseded_by = counter.latest();
            tracing::debug!(generation, superseded_by, "dropping stale frame");
            return PresentOutcome::Stale {
                generation,
                superseded_by,
            };
        }
        self.frame = Some(rendered.frame);
        self.generation = generation;
        self.background_drawn = rendered.background_drawn;
        self.writes += 1;
        PresentOutcome::Presented { generation }
    }

    /// Last fully completed frame, if any.
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Generation of the frame currently held (0 when empty).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn background_drawn(&self) -> bool {
        self.background_drawn
    }

    /// Number of frames committed so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
