// Beam FX: the glowing "blade" drawn between the two tracked tips.
// Software-drawn straight into the framebuffer with additive glow.
// Visual outcomes:
// - A solid white, round-capped core starting at the hilt tip.
// - A soft halo around it that brightens whatever the camera shows underneath.
// - Both grow with the *squared* tip distance, so the blade thickens fast as the
//   object gets closer to the camera.

use crate::geometry::{dist_sq, lerp_point};
use crate::types::{Color, FrameBuffer, TipPair};

const WIDTH_PER_DIST_SQ: f32 = 0.03;
const BLUR_PER_DIST_SQ: f32 = 0.01;
const REACH_PER_DIST_SQ: f32 = 0.2;
const REACH_MIN: f32 = 2.0;
const REACH_MAX: f32 = 8.0;

/// Geometry of one beam stroke, in frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamStroke {
    pub start: (f32, f32),
    pub end: (f32, f32),
    pub width: f32,   // full core width (round caps use width/2)
    pub blur: f32,    // glow reach beyond the core edge
    pub color: Color, // core color; the glow uses the same color
}

impl BeamStroke {
    /// Derive the stroke from oriented tips (index 0 = hilt).
    ///
    /// The end point is `lerp(tips[0], tips[1], clamp(d * 0.2, 2, 8))`. The factor is
    /// always >= 2, so the blade overshoots tip 1 instead of stopping on it.
    pub fn from_tips(tips: &TipPair) -> Self {
        let d = dist_sq(tips[0], tips[1]) as f32;
        let t = (d * REACH_PER_DIST_SQ).clamp(REACH_MIN, REACH_MAX);
        Self {
            start: (tips[0].x as f32, tips[0].y as f32),
            end: lerp_point(tips[0], tips[1], t),
            width: d * WIDTH_PER_DIST_SQ,
            blur: d * BLUR_PER_DIST_SQ,
            color: Color::WHITE,
        }
    }

    /// Distance from (px,py) to the stroke's center segment.
    fn distance_to(&self, px: f32, py: f32) -> f32 {
        let (x0, y0) = self.start;
        let (x1, y1) = self.end;
        let (dx, dy) = (x1 - x0, y1 - y0);
        let len2 = dx * dx + dy * dy;
        let t = if len2 > 0.0 {
            (((px - x0) * dx + (py - y0) * dy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (cx, cy) = (x0 + dx * t, y0 + dy * t);
        ((px - cx) * (px - cx) + (py - cy) * (py - cy)).sqrt()
    }
}

// ----------------------------- drawing helpers --------------------------------

/// Additive blend one RGB triplet at `idx` with saturation to 255.
/// Visual: the pixel gets brighter/colored; repeated draws stack until white.
#[inline]
fn add_rgb_saturating(fb: &mut FrameBuffer, idx: usize, add: Color) {
    let old = Color::unpack(fb.pixels[idx]);
    fb.pixels[idx] = Color::new(
        old.r.saturating_add(add.r),
        old.g.saturating_add(add.g),
        old.b.saturating_add(add.b),
    )
    .pack();
}

#[inline]
fn scale(c: Color, w: f32) -> Color {
    let s = |v: u8| (v as f32 * w).round().clamp(0.0, 255.0) as u8;
    Color::new(s(c.r), s(c.g), s(c.b))
}

/// Pixel range [lo, hi] covering `a..b` grown by `pad`, clipped to `0..limit`.
fn clipped_span(a: f32, b: f32, pad: f32, limit: usize) -> Option<(usize, usize)> {
    if limit == 0 {
        return None;
    }
    let lo = (a.min(b) - pad).floor();
    let hi = (a.max(b) + pad).ceil();
    if hi < 0.0 || lo > (limit - 1) as f32 {
        return None;
    }
    Some((lo.max(0.0) as usize, hi.min((limit - 1) as f32) as usize))
}

/// Stroke a round-capped line with a Gaussian glow.
/// Only the clipped bounding box is visited, so off-screen geometry is cheap.
pub fn draw_glow_stroke(fb: &mut FrameBuffer, stroke: &BeamStroke) {
    let half = (stroke.width * 0.5).max(0.0);
    let blur = stroke.blur.max(0.0);
    let reach = half + blur;
    if reach <= 0.0 {
        return;
    }

    let Some((x_lo, x_hi)) = clipped_span(stroke.start.0, stroke.end.0, reach, fb.width) else {
        return;
    };
    let Some((y_lo, y_hi)) = clipped_span(stroke.start.1, stroke.end.1, reach, fb.height) else {
        return;
    };

    let sigma = blur * 0.5; // softness; smaller = sharper halo edge
    let denom = 2.0 * sigma * sigma;
    let core = stroke.color.pack();

    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dist = stroke.distance_to(x as f32, y as f32);
            if dist > reach {
                continue; // outside the halo
            }
            let idx = y * fb.width + x;
            if dist <= half {
                fb.pixels[idx] = core; // solid core
            } else if denom > 0.0 {
                // Gaussian falloff: 1.0 at the core edge -> ~0 at the halo edge
                let e = dist - half;
                let w = (-(e * e) / denom).exp();
                add_rgb_saturating(fb, idx, scale(stroke.color, w));
            }
        }
    }
}

/// Draw the beam for this frame. With no tips nothing is drawn and the
/// background frame stays as-is.
pub fn render_beam(fb: &mut FrameBuffer, tips: Option<&TipPair>) -> Option<BeamStroke> {
    let stroke = BeamStroke::from_tips(tips?);
    draw_glow_stroke(fb, &stroke);
    Some(stroke)
}
