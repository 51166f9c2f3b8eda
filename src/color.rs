// Color distance test that decides which pixels belong to the tracked region.

use crate::error::Error;
use crate::types::Color;

/// Squared RGB distance between two colors.
#[inline]
pub fn color_dist_sq(a: Color, b: Color) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// True when `candidate` is strictly closer than `threshold` (squared units) to `reference`.
#[inline]
pub fn is_match(reference: Color, candidate: Color, threshold: u32) -> bool {
    color_dist_sq(reference, candidate) < threshold
}

/// Target color plus threshold, fixed for the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorMatcher {
    pub target: Color,
    pub threshold: u32,
}

impl ColorMatcher {
    pub fn new(target: Color, threshold: u32) -> Self {
        Self { target, threshold }
    }

    #[inline]
    pub fn matches(&self, candidate: Color) -> bool {
        is_match(self.target, candidate, self.threshold)
    }
}

impl Default for ColorMatcher {
    // Saturated green; ~55 per-channel slack.
    fn default() -> Self {
        Self::new(Color::new(0, 255, 0), 9000)
    }
}

/// Parse "R,G,B" (each 0..=255) as used by `--target`.
pub fn parse_rgb(s: &str) -> Result<Color, Error> {
    let bad = || Error::InvalidColor(s.to_string());
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(bad());
    };
    let ch = |v: &str| v.parse::<u8>().map_err(|_| bad());
    Ok(Color::new(ch(*r)?, ch(*g)?, ch(*b)?))
}
