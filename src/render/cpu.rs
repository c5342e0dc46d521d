use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    assets::decode::PreparedImage,
    compile::plan::{Layer, LayerPlan, ShadowSpec, TextLayer},
    effects::blur::{BlurParams, blur_alpha_q16},
    effects::composite::{
        alpha_mask, clear_outside, fill_over, fill_rect_over, mask_bounds, over_at,
        over_in_place, tint_mask,
    },
    foundation::core::{Canvas, Rect, Rgba8Premul},
    foundation::error::{ThumbError, ThumbResult},
    render::frame::FrameRGBA,
    typography::engine::{ShapedText, TextLayoutEngine},
    typography::fonts::FontBook,
    typography::style::TitleFill,
};

/// Rasterizes [`LayerPlan`]s on the CPU.
///
/// Images and glyphs go through `vello_cpu`; shadows, glows and compositing are CPU passes over
/// premultiplied RGBA8 buffers. Font faces are registered with the text engine once per backend.
#[derive(Default)]
pub struct CpuBackend {
    fonts: FontBook,
    text_engine: Mutex<TextLayoutEngine>,
}

impl Clone for CpuBackend {
    fn clone(&self) -> Self {
        Self::new(self.fonts.clone())
    }
}

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

/// A rasterized frame plus the plan layers that could not be drawn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rasterized {
    pub frame: FrameRGBA,
    /// Indices into [`LayerPlan::layers`], ascending.
    pub skipped: Vec<usize>,
}

impl Rasterized {
    pub fn drew(&self, layer: usize) -> bool {
        !self.skipped.contains(&layer)
    }
}

impl CpuBackend {
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            text_engine: Mutex::new(TextLayoutEngine::new()),
        }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Number of font faces registered with the shared text engine so far.
    pub fn registered_faces(&self) -> usize {
        self.text_engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .registered_faces()
    }

    /// Execute `plan` into a fresh frame. See [`CpuBackend::rasterize_layers`].
    pub fn rasterize(&self, plan: &LayerPlan) -> ThumbResult<FrameRGBA> {
        Ok(self.rasterize_layers(plan)?.frame)
    }

    /// Execute `plan`, skipping layers that fail to draw.
    ///
    /// A layer that cannot be drawn (oversized image, no usable font, shaping failure) is
    /// logged and left out; everything before and after it is still composited. Only an
    /// unusable canvas is an error.
    #[tracing::instrument(
        skip_all,
        fields(width = plan.canvas.width, height = plan.canvas.height, layers = plan.layers.len())
    )]
    pub fn rasterize_layers(&self, plan: &LayerPlan) -> ThumbResult<Rasterized> {
        let canvas = plan.canvas;
        canvas_u16(canvas)?;
        let mut buf = vec![0u8; canvas.rgba8_len()];
        let mut skipped = Vec::new();

        for (i, layer) in plan.layers.iter().enumerate() {
            let drawn = match layer {
                Layer::Fill(color) => {
                    fill_over(&mut buf, *color);
                    Ok(true)
                }
                Layer::Grid { spacing, color } => {
                    draw_grid(&mut buf, canvas, *spacing, *color);
                    Ok(true)
                }
                Layer::Image { image, draw, clip } => {
                    draw_image(canvas, image, *draw).and_then(|mut px| {
                        clear_outside(&mut px, canvas, *clip);
                        over_in_place(&mut buf, &px)?;
                        Ok(true)
                    })
                }
                Layer::Glow {
                    image,
                    draw,
                    shadow,
                } => draw_image(canvas, image, *draw).and_then(|px| {
                    composite_shadow(&mut buf, canvas, &px, *shadow)?;
                    Ok(true)
                }),
                Layer::Text(text) => self.draw_text(canvas, text).and_then(|px| match px {
                    Some(px) => {
                        composite_shadow(&mut buf, canvas, &px, text.shadow)?;
                        over_in_place(&mut buf, &px)?;
                        Ok(true)
                    }
                    None => Ok(false),
                }),
            };
            match drawn {
                Ok(true) => {}
                Ok(false) => skipped.push(i),
                Err(e) => {
                    tracing::warn!(layer = i, error = %e, "layer skipped");
                    skipped.push(i);
                }
            }
        }

        Ok(Rasterized {
            frame: FrameRGBA {
                width: canvas.width,
                height: canvas.height,
                data: buf,
                premultiplied: true,
            },
            skipped,
        })
    }

    fn draw_text(&self, canvas: Canvas, t: &TextLayer) -> ThumbResult<Option<Vec<u8>>> {
        let Some((face, bytes)) = self.fonts.resolve(t.font.face) else {
            tracing::warn!(requested = ?t.font.face, "no font available; text layer skipped");
            return Ok(None);
        };
        if face != t.font.face {
            tracing::debug!(requested = ?t.font.face, using = ?face, "font face substituted");
        }

        let mut engine = self
            .text_engine
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let subtitle = if t.subtitle.is_empty() {
            None
        } else {
            Some(engine.shape_line(&t.subtitle, face, &bytes, t.font.subtitle_px, t.font.weight)?)
        };
        let title = if t.title.is_empty() {
            None
        } else {
            Some(engine.shape_line(&t.title, face, &bytes, t.font.title_px, t.font.weight)?)
        };
        drop(engine);

        let (w, h) = canvas_u16(canvas)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        if let Some(sub) = &subtitle {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                t.origin.x,
                t.subtitle_baseline - f64::from(sub.baseline),
            )));
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            draw_glyphs(&mut ctx, sub, GlyphMode::Fill);
        }

        let mut gradient_fill = None;
        if let Some(title) = &title {
            let tr = vello_cpu::kurbo::Affine::translate((
                t.origin.x,
                t.origin.y - f64::from(title.baseline),
            ));
            ctx.set_transform(tr);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(t.stroke_width)
                    .with_join(vello_cpu::kurbo::Join::Round),
            );
            draw_glyphs(&mut ctx, title, GlyphMode::Stroke);

            match t.title_fill {
                TitleFill::Flat(c) => {
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                    draw_glyphs(&mut ctx, title, GlyphMode::Fill);
                }
                TitleFill::VerticalGradient { .. } => {
                    let mut fill_ctx = vello_cpu::RenderContext::new(w, h);
                    fill_ctx.set_transform(tr);
                    fill_ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
                    draw_glyphs(&mut fill_ctx, title, GlyphMode::Fill);
                    let mut coverage = finish(&mut fill_ctx, w, h);
                    recolor_rows(&mut coverage, canvas, &t.title_fill);
                    gradient_fill = Some(coverage);
                }
            }
        }

        let mut out = finish(&mut ctx, w, h);
        if let Some(fill) = gradient_fill {
            over_in_place(&mut out, &fill)?;
        }
        Ok(Some(out))
    }
}

#[derive(Clone, Copy)]
enum GlyphMode {
    Fill,
    Stroke,
}

fn draw_glyphs(ctx: &mut vello_cpu::RenderContext, shaped: &ShapedText, mode: GlyphMode) {
    for line in shaped.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx
                .glyph_run(&shaped.font)
                .font_size(run.run().font_size());
            match mode {
                GlyphMode::Fill => builder.fill_glyphs(glyphs),
                GlyphMode::Stroke => builder.stroke_glyphs(glyphs),
            }
        }
    }
}

fn finish(ctx: &mut vello_cpu::RenderContext, w: u16, h: u16) -> Vec<u8> {
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().to_vec()
}

fn canvas_u16(canvas: Canvas) -> ThumbResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ThumbError::render("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ThumbError::render("canvas height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(ThumbError::render("canvas must be non-empty"));
    }
    Ok((w, h))
}

fn image_paint(image: &PreparedImage) -> ThumbResult<vello_cpu::Image> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| ThumbError::render("image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| ThumbError::render("image height exceeds u16"))?;
    if image.rgba8_premul.len()
        != (image.width as usize)
            .saturating_mul(image.height as usize)
            .saturating_mul(4)
    {
        return Err(ThumbError::render("image byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; prepared images are already premultiplied.
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let may_have_opacities = image.rgba8_premul.chunks_exact(4).any(|px| px[3] != 255);
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Full-canvas buffer with `image` scaled into `draw`.
fn draw_image(canvas: Canvas, image: &PreparedImage, draw: Rect) -> ThumbResult<Vec<u8>> {
    let (w, h) = canvas_u16(canvas)?;
    let paint = image_paint(image)?;
    let iw = f64::from(image.width);
    let ih = f64::from(image.height);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::new([
        draw.width() / iw,
        0.0,
        0.0,
        draw.height() / ih,
        draw.x0,
        draw.y0,
    ]));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
    Ok(finish(&mut ctx, w, h))
}

/// Blur the silhouette of `layer`, tint it and composite it onto `dst`.
fn composite_shadow(
    dst: &mut [u8],
    canvas: Canvas,
    layer: &[u8],
    shadow: ShadowSpec,
) -> ThumbResult<()> {
    let params = BlurParams::from_canvas_blur(shadow.blur);
    let mask = alpha_mask(layer);
    let Some((x0, y0, x1, y1)) = mask_bounds(&mask, canvas.width) else {
        return Ok(());
    };

    let pad = params.radius;
    let (cx0, cy0) = (x0.saturating_sub(pad), y0.saturating_sub(pad));
    let cx1 = x1.saturating_add(pad).min(canvas.width);
    let cy1 = y1.saturating_add(pad).min(canvas.height);
    let (cw, ch) = (cx1 - cx0, cy1 - cy0);

    let stride = canvas.width as usize;
    let mut crop = Vec::with_capacity((cw as usize) * (ch as usize));
    for y in cy0 as usize..cy1 as usize {
        crop.extend_from_slice(&mask[y * stride + cx0 as usize..y * stride + cx1 as usize]);
    }

    let blurred = blur_alpha_q16(&crop, cw, ch, params)?;
    let tinted = tint_mask(&blurred, shadow.color);
    over_at(dst, canvas, &tinted, cw, cx0, cy0);
    Ok(())
}

/// Replace white glyph coverage with the per-row fill color.
fn recolor_rows(buf: &mut [u8], canvas: Canvas, fill: &TitleFill) {
    let stride = canvas.width as usize * 4;
    for (y, row) in buf.chunks_exact_mut(stride).enumerate() {
        let c = fill.color_at(y as f64 + 0.5);
        for px in row.chunks_exact_mut(4) {
            let coverage = px[3];
            if coverage == 0 {
                continue;
            }
            let a = ((u16::from(c.a) * u16::from(coverage) + 127) / 255) as u8;
            px.copy_from_slice(&Rgba8Premul::from_straight_rgba(c.r, c.g, c.b, a).to_array());
        }
    }
}

fn draw_grid(buf: &mut [u8], canvas: Canvas, spacing: u32, color: Rgba8Premul) {
    let spacing = spacing.max(1);
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    for x in (0..canvas.width).step_by(spacing as usize) {
        let x = f64::from(x);
        fill_rect_over(buf, canvas, Rect::new(x, 0.0, x + 1.0, h), color);
    }
    for y in (0..canvas.height).step_by(spacing as usize) {
        let y = f64::from(y);
        fill_rect_over(buf, canvas, Rect::new(0.0, y, w, y + 1.0), color);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
