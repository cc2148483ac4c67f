use crate::{
    foundation::{
        core::{Color, GradientSpec, Point},
        error::TemplateResult,
    },
    render::canvas::{Canvas, RectStyle, StrokeStyle},
};

// Layout constants are authored for a 1024x1024 canvas and scaled per axis.
const DESIGN_SIZE: f64 = 1024.0;
const GLOW_CENTER: f64 = 540.0;
const GLOW_MAX_RADIUS: f64 = 750.0;
const GLOW_MAX_ALPHA: u8 = 50;
const GRID_SPACING: usize = 40;
const GRID_ALPHA: u8 = 15;
const BLOCKS_PER_CORNER: usize = 3;
const BLOCK_OUTLINE_ALPHA: u8 = 100;

const BLOCK_PALETTE: [[u8; 4]; 3] = [[220, 20, 60, 180], [139, 0, 0, 160], [255, 0, 0, 140]];

/// `(x range, y range)` in design space for the top-right, bottom-left and
/// bottom-right block clusters.
const CORNERS: [((u64, u64), (u64, u64)); 3] = [
    ((880, 1020), (0, 200)),
    ((0, 200), (880, 1020)),
    ((880, 1020), (880, 1020)),
];

#[derive(Clone, Copy, Debug)]
pub(crate) struct Rng64 {
    state: u64,
}

impl Rng64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        // SplitMix64
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish integer in `lo..=hi`.
    pub(crate) fn range_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        debug_assert!(lo <= hi);
        lo + self.next_u64() % (hi - lo + 1)
    }
}

/// Paint the procedural dark-crimson background used when no fetched image is available.
///
/// Output is a pure function of canvas size and `seed`.
pub fn paint_fallback_background(canvas: &mut Canvas, seed: u64) -> TemplateResult<()> {
    let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
    let (sx, sy) = (w / DESIGN_SIZE, h / DESIGN_SIZE);
    let scale = sx.min(sy);
    let mut rng = Rng64::new(seed);

    canvas.linear_gradient(&GradientSpec::vertical(
        Color::from_rgb8(139, 0, 0),
        Color::from_rgb8(42, 0, 0),
    ))?;

    // Single glow layer: each pixel gets crimson once, at an opacity that fades
    // linearly from GLOW_MAX_ALPHA at the centre to nothing at GLOW_MAX_RADIUS.
    canvas.radial_glow(
        Point::new(GLOW_CENTER * sx, GLOW_CENTER * sy),
        GLOW_MAX_RADIUS * scale,
        Color::from_rgb8(220, 20, 60),
        f32::from(GLOW_MAX_ALPHA) / 255.0,
    )?;

    let outline = StrokeStyle::new(Color::WHITE, 2.0 * scale)
        .with_alpha(f32::from(BLOCK_OUTLINE_ALPHA) / 255.0);
    for ((x_lo, x_hi), (y_lo, y_hi)) in CORNERS {
        for _ in 0..BLOCKS_PER_CORNER {
            let [r, g, b, a] = BLOCK_PALETTE[rng.range_inclusive(0, 2) as usize];
            let size = rng.range_inclusive(60, 150) as f64;
            let x = rng.range_inclusive(x_lo, x_hi) as f64;
            let y = rng.range_inclusive(y_lo, y_hi) as f64;
            let style = RectStyle::filled(Color::from_rgb8(r, g, b))
                .with_fill_alpha(f32::from(a) / 255.0)
                .with_stroke(outline);
            canvas.draw_rectangle(x * sx, y * sy, size * scale, size * scale, &style)?;
        }
    }

    let grid = RectStyle::filled(Color::WHITE).with_fill_alpha(f32::from(GRID_ALPHA) / 255.0);
    for step in (0..DESIGN_SIZE as usize).step_by(GRID_SPACING) {
        let offset = step as f64;
        canvas.draw_rectangle(offset * sx, 0.0, 1.0, h, &grid)?;
        canvas.draw_rectangle(0.0, offset * sy, w, 1.0, &grid)?;
    }

    tracing::debug!(seed, "painted fallback background");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fallback.rs"]
mod tests;
