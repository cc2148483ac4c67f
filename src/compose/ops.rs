use std::path::{Path, PathBuf};

use crate::{
    foundation::{
        color::parse_hex,
        core::{Axis, GradientSpec, Point},
        error::TemplateResult,
    },
    render::{
        canvas::{Canvas, RectStyle, StrokeStyle},
        text::{BOLD_WEIGHT, DEFAULT_FONT_FAMILY, TextStyle},
    },
};

/// One paint operation with every parameter spelled out.
///
/// Colors stay as hex tokens until [`PaintOp::apply`], so a malformed token
/// surfaces as `InvalidColorFormat` from the call that would have used it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintOp {
    Fill {
        color: String,
    },
    Overlay {
        color: String,
        opacity: f32,
    },
    LinearGradient {
        from: String,
        to: String,
        #[serde(default)]
        axis: Axis,
    },
    Image {
        path: PathBuf,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        fill: Option<String>,
        #[serde(default = "default_alpha")]
        fill_alpha: f32,
        #[serde(default)]
        stroke: Option<String>,
        #[serde(default = "default_stroke_width")]
        stroke_width: f64,
        #[serde(default = "default_alpha")]
        stroke_alpha: f32,
    },
    Circle {
        x: f64,
        y: f64,
        radius: f64,
        color: String,
        #[serde(default = "default_alpha")]
        opacity: f32,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size_px: f32,
        #[serde(default = "default_family")]
        family: String,
        #[serde(default = "default_weight")]
        weight: f32,
        #[serde(default = "default_text_color")]
        color: String,
    },
}

fn default_alpha() -> f32 {
    1.0
}

fn default_stroke_width() -> f64 {
    1.0
}

fn default_family() -> String {
    DEFAULT_FONT_FAMILY.to_owned()
}

fn default_weight() -> f32 {
    BOLD_WEIGHT
}

fn default_text_color() -> String {
    "#FFFFFF".to_owned()
}

impl PaintOp {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fill { .. } => "fill",
            Self::Overlay { .. } => "overlay",
            Self::LinearGradient { .. } => "linear_gradient",
            Self::Image { .. } => "image",
            Self::Rectangle { .. } => "rectangle",
            Self::Circle { .. } => "circle",
            Self::Text { .. } => "text",
        }
    }

    /// Execute against `canvas`. Errors are returned as-is; skipping is the caller's call.
    pub fn apply(&self, canvas: &mut Canvas) -> TemplateResult<()> {
        match self {
            Self::Fill { color } => canvas.fill(parse_hex(color)?),
            Self::Overlay { color, opacity } => canvas.overlay(parse_hex(color)?, *opacity),
            Self::LinearGradient { from, to, axis } => canvas.linear_gradient(&GradientSpec {
                from: parse_hex(from)?,
                to: parse_hex(to)?,
                axis: *axis,
            }),
            Self::Image {
                path,
                x,
                y,
                width,
                height,
            } => canvas.draw_image_file(path, *x, *y, *width, *height),
            Self::Rectangle {
                x,
                y,
                width,
                height,
                fill,
                fill_alpha,
                stroke,
                stroke_width,
                stroke_alpha,
            } => {
                let style = RectStyle {
                    fill: fill.as_deref().map(parse_hex).transpose()?,
                    fill_alpha: *fill_alpha,
                    stroke: stroke
                        .as_deref()
                        .map(parse_hex)
                        .transpose()?
                        .map(|c| StrokeStyle::new(c, *stroke_width).with_alpha(*stroke_alpha)),
                };
                canvas.draw_rectangle(*x, *y, *width, *height, &style)
            }
            Self::Circle {
                x,
                y,
                radius,
                color,
                opacity,
            } => canvas.fill_circle(Point::new(*x, *y), *radius, parse_hex(color)?, *opacity),
            Self::Text {
                text,
                x,
                y,
                size_px,
                family,
                weight,
                color,
            } => {
                let style = TextStyle::new(*size_px, parse_hex(color)?)
                    .with_family(family.as_str())
                    .with_weight(*weight);
                canvas.draw_text(text, *x, *y, &style)
            }
        }
    }

    /// Make relative image paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if let Self::Image { path, .. } = self
            && path.is_relative()
        {
            *path = base.join(&*path);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/ops.rs"]
mod tests;
