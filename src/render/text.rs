use std::{borrow::Cow, collections::HashMap};

use crate::foundation::{
    core::Color,
    error::{TemplateError, TemplateResult},
};

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";
pub const BOLD_WEIGHT: f32 = 700.0;

/// Full text style for one `draw_text` call. Nothing carries over between calls.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// CSS-style family list, e.g. `"Inter, sans-serif"`.
    pub family: String,
    /// Weight in `1..=1000` (400 regular, 700 bold).
    pub weight: f32,
    pub size_px: f32,
    pub color: Color,
}

impl TextStyle {
    /// Bold sans-serif at `size_px`.
    pub fn new(size_px: f32, color: Color) -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_owned(),
            weight: BOLD_WEIGHT,
            size_px,
            color,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn validate(&self) -> TemplateResult<()> {
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(TemplateError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        if !self.weight.is_finite() || !(1.0..=1000.0).contains(&self.weight) {
            return Err(TemplateError::validation(
                "text weight must be within 1..=1000",
            ));
        }
        if self.family.trim().is_empty() {
            return Err(TemplateError::validation("text family must be non-empty"));
        }
        Ok(())
    }
}

/// Stateful helper holding Parley contexts and converted font handles.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    fonts: HashMap<(u64, u32), vello_cpu::peniko::FontData>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
        }
    }

    /// Register raw font bytes; returns the family names they provide.
    pub(crate) fn register_font(&mut self, font_bytes: Vec<u8>) -> TemplateResult<Vec<String>> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes), None);
        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            if let Some(name) = self.font_ctx.collection.family_name(id) {
                names.push(name.to_owned());
            }
        }
        if names.is_empty() {
            return Err(TemplateError::validation(
                "no font families registered from font bytes",
            ));
        }
        Ok(names)
    }

    /// Shape a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        style: &TextStyle,
    ) -> TemplateResult<parley::Layout<()>> {
        style.validate()?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(style.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(style.weight),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Convert shaped font data into a rasterizer font handle, caching by blob.
    pub(crate) fn cpu_font(
        &mut self,
        blob_id: u64,
        index: u32,
        bytes: &[u8],
    ) -> vello_cpu::peniko::FontData {
        self.fonts
            .entry((blob_id, index))
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.to_vec()),
                    index,
                )
            })
            .clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
