use std::path::Path;

use crate::{
    assets::decode::SourceImage,
    compose::ops::PaintOp,
    foundation::{
        color::parse_hex,
        core::{Axis, Color, GradientSpec},
        error::TemplateResult,
    },
    render::{
        canvas::{Canvas, RectStyle, StrokeStyle},
        text::TextStyle,
    },
};

/// Sequential front-end over a [`Canvas`] taking hex color tokens.
///
/// Layers that fail with a recoverable error (an unreadable image) are logged
/// and omitted; everything else propagates.
#[derive(Debug)]
pub struct TemplateBuilder {
    canvas: Canvas,
}

impl TemplateBuilder {
    pub fn build(width: u32, height: u32) -> TemplateResult<Self> {
        Ok(Self::from_canvas(Canvas::new(width, height)?))
    }

    pub fn from_canvas(canvas: Canvas) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }

    pub fn background(&mut self, color: &str) -> TemplateResult<&mut Self> {
        self.canvas.fill(parse_hex(color)?)?;
        Ok(self)
    }

    pub fn overlay(&mut self, color: &str, opacity: f32) -> TemplateResult<&mut Self> {
        self.canvas.overlay(parse_hex(color)?, opacity)?;
        Ok(self)
    }

    pub fn gradient(&mut self, from: &str, to: &str, axis: Axis) -> TemplateResult<&mut Self> {
        let spec = GradientSpec {
            from: parse_hex(from)?,
            to: parse_hex(to)?,
            axis,
        };
        self.canvas.linear_gradient(&spec)?;
        Ok(self)
    }

    /// Blit the PNG at `path` into `(x, y, width, height)`, skipping it if unreadable.
    pub fn logo(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> TemplateResult<&mut Self> {
        let res = self.canvas.draw_image_file(path, x, y, width, height);
        self.skip_recoverable(res, "image")
    }

    pub fn image(
        &mut self,
        image: &SourceImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> TemplateResult<&mut Self> {
        let res = self.canvas.draw_image(image, x, y, width, height);
        self.skip_recoverable(res, "image")
    }

    /// Rectangle with optional fill and optional outline; neither is a no-op.
    #[allow(clippy::too_many_arguments)]
    pub fn rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<&str>,
        stroke: Option<&str>,
        stroke_width: f64,
    ) -> TemplateResult<&mut Self> {
        let style = RectStyle {
            fill: fill.map(parse_hex).transpose()?,
            stroke: stroke
                .map(parse_hex)
                .transpose()?
                .map(|c| StrokeStyle::new(c, stroke_width)),
            ..RectStyle::default()
        };
        self.canvas.draw_rectangle(x, y, width, height, &style)?;
        Ok(self)
    }

    /// White bold sans-serif text at `size_px` with its baseline at `(x, y)`.
    pub fn text(&mut self, text: &str, x: f64, y: f64, size_px: f32) -> TemplateResult<&mut Self> {
        self.text_with(text, x, y, &TextStyle::new(size_px, Color::WHITE))
    }

    pub fn text_with(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> TemplateResult<&mut Self> {
        self.canvas.draw_text(text, x, y, style)?;
        Ok(self)
    }

    pub fn apply(&mut self, op: &PaintOp) -> TemplateResult<&mut Self> {
        let res = op.apply(&mut self.canvas);
        self.skip_recoverable(res, op.kind())
    }

    /// Save to `path`, then release the canvas whether or not the save succeeded.
    pub fn finish(mut self, path: &Path) -> TemplateResult<()> {
        let res = self.canvas.save_png(path);
        self.canvas.release();
        res
    }

    fn skip_recoverable(
        &mut self,
        res: TemplateResult<()>,
        layer: &'static str,
    ) -> TemplateResult<&mut Self> {
        match res {
            Ok(()) => Ok(self),
            Err(e) if e.is_recoverable_layer_error() => {
                tracing::warn!(layer, error = %e, "layer skipped");
                Ok(self)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/builder.rs"]
mod tests;
