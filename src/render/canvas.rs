use std::{
    ops::{Deref, DerefMut},
    path::Path,
    sync::Arc,
};

use vello_cpu::kurbo::Shape as _;

use crate::{
    assets::decode::{SourceImage, load_png},
    foundation::{
        core::{
            Affine, Axis, Color, GradientSpec, Point, Rect, Vec2, affine_from_cpu, affine_to_cpu,
            rect_to_cpu,
        },
        error::{TemplateError, TemplateResult},
    },
    render::{
        encode,
        text::{TextLayoutEngine, TextStyle},
    },
};

/// Outline centered on a shape's geometric boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f64,
    pub alpha: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }
}

/// Fill and/or stroke for [`Canvas::draw_rectangle`]. Neither set is a no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectStyle {
    pub fill: Option<Color>,
    pub fill_alpha: f32,
    pub stroke: Option<StrokeStyle>,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: None,
            fill_alpha: 1.0,
            stroke: None,
        }
    }
}

impl RectStyle {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn outlined(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(StrokeStyle::new(color, width)),
            ..Self::default()
        }
    }

    pub fn with_fill_alpha(mut self, alpha: f32) -> Self {
        self.fill_alpha = alpha;
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeStyle) -> Self {
        self.stroke = Some(stroke);
        self
    }

    fn validate(&self) -> TemplateResult<()> {
        check_alpha(self.fill_alpha, "rectangle fill alpha")?;
        if let Some(stroke) = &self.stroke {
            if !stroke.width.is_finite() || stroke.width <= 0.0 {
                return Err(TemplateError::validation(
                    "rectangle stroke width must be finite and > 0",
                ));
            }
            check_alpha(stroke.alpha, "rectangle stroke alpha")?;
        }
        Ok(())
    }
}

/// Fixed-size raster surface that paint operations composite into, in call order.
///
/// Coordinates are canvas pixels, origin top-left, y down. Every operation takes
/// its full style explicitly; the only state kept between calls is the pixel
/// content itself. After [`Canvas::release`] every call fails with
/// [`TemplateError::UseAfterRelease`].
pub struct Canvas {
    width: u16,
    height: u16,
    state: CanvasState,
}

enum CanvasState {
    Open(Box<Surface>),
    Released,
}

struct Surface {
    ctx: vello_cpu::RenderContext,
    // Font discovery is expensive; created on first text draw.
    text: Option<TextLayoutEngine>,
}

/// Transform composed onto the context for the lifetime of the guard.
///
/// The previous transform is restored on drop, so no exit path (including `?`)
/// can leak it into later operations.
struct TransformScope<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    saved: vello_cpu::kurbo::Affine,
}

impl<'a> TransformScope<'a> {
    fn enter(ctx: &'a mut vello_cpu::RenderContext, local: Affine) -> Self {
        let saved = *ctx.transform();
        ctx.set_transform(saved * affine_to_cpu(local));
        Self { ctx, saved }
    }
}

impl Deref for TransformScope<'_> {
    type Target = vello_cpu::RenderContext;

    fn deref(&self) -> &Self::Target {
        self.ctx
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.ctx.set_transform(self.saved);
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Canvas {
    /// Create a transparent canvas. Each side must be in `1..=65535`.
    pub fn new(width: u32, height: u32) -> TemplateResult<Self> {
        let dims = u16::try_from(width)
            .ok()
            .zip(u16::try_from(height).ok())
            .filter(|&(w, h)| w > 0 && h > 0);
        let Some((w, h)) = dims else {
            return Err(TemplateError::InvalidDimensions { width, height });
        };

        tracing::debug!(width, height, "canvas created");
        Ok(Self {
            width: w,
            height: h,
            state: CanvasState::Open(Box::new(Surface {
                ctx: vello_cpu::RenderContext::new(w, h),
                text: None,
            })),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    pub fn is_released(&self) -> bool {
        matches!(self.state, CanvasState::Released)
    }

    /// Current geometry transform. Identity between operations.
    pub fn transform(&self) -> TemplateResult<Affine> {
        match &self.state {
            CanvasState::Open(s) => Ok(affine_from_cpu(*s.ctx.transform())),
            CanvasState::Released => Err(TemplateError::UseAfterRelease),
        }
    }

    /// Paint every pixel with the opaque `color`.
    pub fn fill(&mut self, color: Color) -> TemplateResult<()> {
        let bounds = self.cpu_bounds();
        let ctx = &mut self.surface()?.ctx;
        ctx.set_paint(color.to_cpu(1.0));
        ctx.fill_rect(&bounds);
        Ok(())
    }

    /// Composite `color` at `opacity` over the whole surface.
    pub fn overlay(&mut self, color: Color, opacity: f32) -> TemplateResult<()> {
        let bounds = self.cpu_bounds();
        let ctx = &mut self.surface()?.ctx;
        check_alpha(opacity, "overlay opacity")?;
        ctx.set_paint(color.to_cpu(opacity));
        ctx.fill_rect(&bounds);
        Ok(())
    }

    /// Paint the full surface with a two-stop linear gradient.
    ///
    /// `t` is sampled at pixel centres: the first row (or column) is exactly
    /// `spec.from` and the last exactly `spec.to`.
    pub fn linear_gradient(&mut self, spec: &GradientSpec) -> TemplateResult<()> {
        let bounds = self.cpu_bounds();
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let ctx = &mut self.surface()?.ctx;

        let (start, end, extent) = match spec.axis {
            Axis::Vertical => ((0.0, 0.5), (0.0, h - 0.5), h),
            Axis::Horizontal => ((0.5, 0.0), (w - 0.5, 0.0), w),
        };

        if extent <= 1.0 {
            // A single row/column only ever sees t = 0.
            ctx.set_paint(spec.from.to_cpu(1.0));
        } else {
            let gradient = vello_cpu::peniko::Gradient::new_linear(
                vello_cpu::kurbo::Point::new(start.0, start.1),
                vello_cpu::kurbo::Point::new(end.0, end.1),
            )
            .with_stops([spec.from.to_cpu(1.0), spec.to.to_cpu(1.0)]);
            ctx.set_paint(gradient);
        }
        ctx.fill_rect(&bounds);
        Ok(())
    }

    /// Blit `image` scaled independently on each axis into `(x, y, width, height)`.
    pub fn draw_image(
        &mut self,
        image: &SourceImage,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> TemplateResult<()> {
        let surface = self.surface()?;
        if ![x, y, width, height].iter().all(|v| v.is_finite()) || width <= 0.0 || height <= 0.0
        {
            return Err(TemplateError::validation(
                "image target must be finite with width/height > 0",
            ));
        }

        let pixmap = image_pixmap(image)?;
        let (src_w, src_h) = (f64::from(image.width), f64::from(image.height));
        let local = Affine::translate(Vec2::new(x, y))
            * Affine::scale_non_uniform(width / src_w, height / src_h);

        let mut scoped = TransformScope::enter(&mut surface.ctx, local);
        scoped.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        scoped.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, src_w, src_h));
        Ok(())
    }

    /// Load a PNG from `path` and blit it; the decoded pixels are dropped on return.
    pub fn draw_image_file(
        &mut self,
        path: &Path,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> TemplateResult<()> {
        self.surface()?;
        let image = load_png(path)?;
        self.draw_image(&image, x, y, width, height)
    }

    pub fn draw_rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: &RectStyle,
    ) -> TemplateResult<()> {
        let ctx = &mut self.surface()?.ctx;
        style.validate()?;
        if ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return Err(TemplateError::validation(
                "rectangle geometry must be finite",
            ));
        }

        let rect = rect_to_cpu(Rect::new(x, y, x + width, y + height).abs());
        if let Some(fill) = style.fill {
            ctx.set_paint(fill.to_cpu(style.fill_alpha));
            ctx.fill_rect(&rect);
        }
        if let Some(stroke) = style.stroke {
            ctx.set_stroke(
                vello_cpu::kurbo::Stroke::new(stroke.width)
                    .with_join(vello_cpu::kurbo::Join::Miter),
            );
            ctx.set_paint(stroke.color.to_cpu(stroke.alpha));
            ctx.stroke_rect(&rect);
        }
        Ok(())
    }

    pub fn fill_circle(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        opacity: f32,
    ) -> TemplateResult<()> {
        let ctx = &mut self.surface()?.ctx;
        check_alpha(opacity, "circle opacity")?;
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return Err(TemplateError::validation(
                "circle center must be finite and radius > 0",
            ));
        }

        let path =
            vello_cpu::kurbo::Circle::new(vello_cpu::kurbo::Point::new(center.x, center.y), radius)
                .to_path(0.1);
        ctx.set_paint(color.to_cpu(opacity));
        ctx.fill_path(&path);
        Ok(())
    }

    /// Composite `color` over the whole surface with opacity falling linearly
    /// from `opacity` at `center` to zero at `radius` and beyond.
    pub fn radial_glow(
        &mut self,
        center: Point,
        radius: f64,
        color: Color,
        opacity: f32,
    ) -> TemplateResult<()> {
        let bounds = self.cpu_bounds();
        let ctx = &mut self.surface()?.ctx;
        check_alpha(opacity, "glow opacity")?;
        if !center.is_finite() || !radius.is_finite() || radius <= 0.0 {
            return Err(TemplateError::validation(
                "glow center must be finite and radius > 0",
            ));
        }

        let gradient = vello_cpu::peniko::Gradient::new_radial(
            vello_cpu::kurbo::Point::new(center.x, center.y),
            radius as f32,
        )
        .with_stops([color.to_cpu(opacity), color.to_cpu(0.0)]);
        ctx.set_paint(gradient);
        ctx.fill_rect(&bounds);
        Ok(())
    }

    /// Register font bytes so their families can be named in [`TextStyle::family`].
    pub fn register_font(&mut self, font_bytes: Vec<u8>) -> TemplateResult<Vec<String>> {
        let surface = self.surface()?;
        surface
            .text
            .get_or_insert_with(TextLayoutEngine::new)
            .register_font(font_bytes)
    }

    /// Paint a single line of text with its first baseline starting at `(x, y)`.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> TemplateResult<()> {
        let surface = self.surface()?;
        style.validate()?;
        if !x.is_finite() || !y.is_finite() {
            return Err(TemplateError::validation("text origin must be finite"));
        }
        if text.is_empty() {
            return Ok(());
        }

        let engine = surface.text.get_or_insert_with(TextLayoutEngine::new);
        let layout = engine.layout_line(text, style)?;
        let Some(first_baseline) = layout.lines().next().map(|l| l.metrics().baseline) else {
            return Ok(());
        };

        let local = Affine::translate(Vec2::new(x, y - f64::from(first_baseline)));
        let mut scoped = TransformScope::enter(&mut surface.ctx, local);
        scoped.set_paint(style.color.to_cpu(1.0));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };

                let run = glyph_run.run();
                let font = run.font();
                let cpu_font = engine.cpu_font(font.data.id(), font.index, font.data.data());

                let glyphs = glyph_run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                scoped
                    .glyph_run(&cpu_font)
                    .font_size(run.font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    /// Rasterize everything painted so far into straight-alpha RGBA8.
    pub fn to_rgba8(&mut self) -> TemplateResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        let surface = self.surface()?;
        surface.ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        surface.ctx.render_to_pixmap(&mut pixmap);
        encode::pixmap_to_rgba_image(pixmap)
    }

    /// Encode the current pixels as PNG at `path`, creating parent directories.
    pub fn save_png(&mut self, path: &Path) -> TemplateResult<()> {
        let img = self.to_rgba8()?;
        encode::write_png(&img, path)?;
        tracing::info!(path = %path.display(), "saved image");
        Ok(())
    }

    /// Drop the pixel buffer and font state. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let CanvasState::Open(_) = self.state {
            tracing::debug!(width = self.width, height = self.height, "canvas released");
            self.state = CanvasState::Released;
        }
    }

    fn surface(&mut self) -> TemplateResult<&mut Surface> {
        match &mut self.state {
            CanvasState::Open(s) => Ok(&mut **s),
            CanvasState::Released => Err(TemplateError::UseAfterRelease),
        }
    }

    fn cpu_bounds(&self) -> vello_cpu::kurbo::Rect {
        vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

fn check_alpha(alpha: f32, what: &str) -> TemplateResult<()> {
    if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
        Ok(())
    } else {
        Err(TemplateError::validation(format!(
            "{what} must be within 0..=1"
        )))
    }
}

fn image_pixmap(image: &SourceImage) -> TemplateResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| TemplateError::image_load("image width exceeds 65535"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| TemplateError::image_load("image height exceeds 65535"))?;
    if w == 0 || h == 0 {
        return Err(TemplateError::image_load("image has a zero dimension"));
    }
    if image.rgba8_premul.len() != usize::from(w) * usize::from(h) * 4 {
        return Err(TemplateError::image_load("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    for px in image.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
