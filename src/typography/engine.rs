use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::error::{ThumbError, ThumbResult},
    typography::style::FontFace,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// A shaped single line of text plus the font needed to draw its glyphs.
pub struct ShapedText {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub font: vello_cpu::peniko::FontData,
    pub size_px: f32,
    /// Distance from the layout top to the first baseline.
    pub baseline: f32,
}

impl std::fmt::Debug for ShapedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedText")
            .field("size_px", &self.size_px)
            .field("baseline", &self.baseline)
            .field("width", &self.layout.width())
            .finish()
    }
}

impl ShapedText {
    pub fn width(&self) -> f32 {
        self.layout.width()
    }
}

/// Parley-based shaper. Each face is registered once per engine.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<FontFace, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Faces whose font data has been registered with the font context.
    pub fn registered_faces(&self) -> usize {
        self.families.len()
    }

    fn family_for(&mut self, face: FontFace, font_bytes: &[u8]) -> ThumbResult<String> {
        if let Some(name) = self.families.get(&face) {
            return Ok(name.clone());
        }
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                ThumbError::render(format!("no font families in {face:?} font data"))
            })?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ThumbError::render("registered font family has no name"))?
            .to_string();
        self.families.insert(face, name.clone());
        Ok(name)
    }

    /// Shape `text` as one unwrapped line.
    pub fn shape_line(
        &mut self,
        text: &str,
        face: FontFace,
        font_bytes: &Arc<Vec<u8>>,
        size_px: f32,
        weight: f32,
    ) -> ThumbResult<ShapedText> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ThumbError::render("text size must be finite and > 0"));
        }
        let family = self.family_for(face, font_bytes)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(weight),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8 {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline)
            .unwrap_or(size_px);
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        Ok(ShapedText {
            layout,
            font,
            size_px,
            baseline,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typography/engine.rs"]
mod tests;
