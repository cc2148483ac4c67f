//! template-gen composes flat raster graphics (event posters, banners) from layers.
//!
//! A [`Canvas`] is a fixed-size RGBA surface. Paint operations are applied in call
//! order (painter's algorithm) and each one takes its full style as arguments, so
//! nothing leaks from one draw into the next. The result is written as PNG.
//!
//! # Layers
//!
//! - **Fill / overlay**: opaque or translucent color over the whole surface.
//! - **Linear gradient**: two colors along the vertical or horizontal axis.
//! - **Image**: a PNG scaled independently on each axis into a target rectangle.
//! - **Rectangle / circle**: solid shapes, rectangles with an optional outline.
//! - **Text**: a single line shaped with system or registered fonts.
//!
//! [`TemplateBuilder`] drives a canvas with hex color tokens and skips layers whose
//! images cannot be read. [`TemplateDoc`] describes a whole template as JSON and
//! can pull its background from an external generator through a
//! [`BackgroundFetcher`], falling back to a procedural background when that fails.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod fetch;
mod foundation;
mod render;

pub use assets::decode::{SourceImage, decode_png, load_png};
pub use compose::builder::TemplateBuilder;
pub use compose::doc::{BackgroundSpec, TemplateDoc, render_template, render_templates};
pub use compose::fallback::paint_fallback_background;
pub use compose::ops::PaintOp;
pub use fetch::command::{
    CommandFetcher, DEFAULT_BG_ARGS, DEFAULT_BG_PROGRAM, DEFAULT_BG_TIMEOUT, FetchConfig,
};
pub use fetch::{BackgroundFetcher, NoFetch};
pub use foundation::color::parse_hex;
pub use foundation::core::{Affine, Axis, Color, GradientSpec, Point, Rect, Vec2};
pub use foundation::error::{TemplateError, TemplateResult};
pub use render::canvas::{Canvas, RectStyle, StrokeStyle};
pub use render::encode::ensure_parent_dir;
pub use render::text::{BOLD_WEIGHT, DEFAULT_FONT_FAMILY, TextStyle};
