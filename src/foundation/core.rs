pub use kurbo::{Affine, Point, Rect, Vec2};

/// Opaque sRGB color with channels normalized to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
        }
    }

    /// Quantize to 8-bit channels with rounding.
    pub fn to_rgb8(self) -> [u8; 3] {
        fn to_u8(x: f32) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        [to_u8(self.r), to_u8(self.g), to_u8(self.b)]
    }

    /// Per-channel `(1 - t) * self + t * other`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: (1.0 - t) * self.r + t * other.r,
            g: (1.0 - t) * self.g + t * other.g,
            b: (1.0 - t) * self.b + t * other.b,
        }
    }

    pub(crate) fn to_cpu(self, alpha: f32) -> vello_cpu::peniko::Color {
        let [r, g, b] = self.to_rgb8();
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
    }
}

/// Interpolation axis of a linear gradient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Top (t = 0) to bottom (t = 1).
    #[default]
    Vertical,
    /// Left (t = 0) to right (t = 1).
    Horizontal,
}

/// Two endpoint colors plus an axis spanning the whole canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientSpec {
    pub from: Color,
    pub to: Color,
    pub axis: Axis,
}

impl GradientSpec {
    pub fn vertical(from: Color, to: Color) -> Self {
        Self {
            from,
            to,
            axis: Axis::Vertical,
        }
    }

    pub fn horizontal(from: Color, to: Color) -> Self {
        Self {
            from,
            to,
            axis: Axis::Horizontal,
        }
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

pub(crate) fn affine_from_cpu(a: vello_cpu::kurbo::Affine) -> Affine {
    Affine::new(a.as_coeffs())
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}
