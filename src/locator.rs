// Turns one camera frame into a stable pair of "tips" for the beam.
// Pipeline: scan -> center -> raw tips -> orient -> stabilize.
// Visual expectation: the beam's hilt sits on the lower end of the colored
// object and the blade points away along its long axis.

use crate::color::ColorMatcher;
use crate::geometry::{average, dist_sq, farthest_from};
use crate::types::{Color, FrameAnalysis, FrameBuffer, Point, TipPair};

/// Tunables for the locator, fixed at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    pub matcher: ColorMatcher,
    /// Re-clustering passes after the farthest-point estimate (1 = one-shot).
    pub refine_iterations: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { matcher: ColorMatcher::default(), refine_iterations: 1 }
    }
}

/// Collect the coordinates of every matching pixel, in row-major order.
/// `width` maps the linear pixel index back to (x, y). Any pixel layout works
/// as long as it yields colors row by row (packed frames, RGBA chunks, ...).
pub fn collect_matches<I>(pixels: I, width: usize, matcher: &ColorMatcher) -> Vec<Point>
where
    I: IntoIterator<Item = Color>,
{
    if width == 0 {
        return Vec::new();
    }
    pixels
        .into_iter()
        .enumerate()
        .filter(|(_, c)| matcher.matches(*c))
        .map(|(i, _)| Point::new((i % width) as i32, (i / width) as i32))
        .collect()
}

/// Scan a packed 0x00RRGGBB frame.
pub fn scan_frame(frame: &FrameBuffer, matcher: &ColorMatcher) -> Vec<Point> {
    collect_matches(frame.colors(), frame.width, matcher)
}

/// Centroid of the matched points, floored. None when nothing matched.
pub fn center(points: &[Point]) -> Option<Point> {
    average(points)
}

/// Tip A = farthest from the center, tip B = farthest from tip A.
/// This approximates the two ends of an elongated blob; it is not the exact diameter.
pub fn raw_tips(center: Point, points: &[Point]) -> Option<TipPair> {
    let a = farthest_from(center, points)?;
    let b = farthest_from(a, points)?;
    Some([a, b])
}

/// Put the tip at or below the center (larger y) first.
pub fn orient(tips: TipPair, center: Point) -> TipPair {
    let [a, b] = tips;
    if a.y - center.y < 0 { [b, a] } else { [a, b] }
}

/// Assign each point to the squared-closer tip. Ties go to tip 1.
pub fn partition(tips: &TipPair, points: &[Point]) -> [Vec<Point>; 2] {
    let mut clusters = [Vec::new(), Vec::new()];
    for &p in points {
        let side = if dist_sq(p, tips[0]) < dist_sq(p, tips[1]) { 0 } else { 1 };
        clusters[side].push(p);
    }
    clusters
}

/// Replace each tip by the average of its cluster, `iterations` times.
/// A tip whose cluster is empty keeps its previous position.
pub fn stabilize(tips: TipPair, points: &[Point], iterations: usize) -> TipPair {
    let mut tips = tips;
    for _ in 0..iterations {
        let clusters = partition(&tips, points);
        let next = [
            average(&clusters[0]).unwrap_or(tips[0]),
            average(&clusters[1]).unwrap_or(tips[1]),
        ];
        if next == tips {
            break;
        }
        tips = next;
    }
    tips
}

/// Locate from an already scanned point set.
pub fn analyze_points(points: Vec<Point>, refine_iterations: usize) -> FrameAnalysis {
    let Some(center) = center(&points) else {
        return FrameAnalysis { points, center: None, tips: None };
    };
    let tips = raw_tips(center, &points)
        .map(|t| orient(t, center))
        .map(|t| stabilize(t, &points, refine_iterations));
    FrameAnalysis { points, center: Some(center), tips }
}

/// Full per-frame pipeline.
pub fn analyze(frame: &FrameBuffer, config: &TrackerConfig) -> FrameAnalysis {
    let points = scan_frame(frame, &config.matcher);
    log::trace!("matched {} of {} pixels", points.len(), frame.pixels.len());
    analyze_points(points, config.refine_iterations)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: Color = Color::new(0, 255, 0);

    fn config() -> TrackerConfig {
        TrackerConfig { matcher: ColorMatcher::new(TARGET, 100), refine_iterations: 1 }
    }

    fn frame_with(width: usize, height: usize, hits: &[(usize, usize)]) -> FrameBuffer {
        let mut fb = FrameBuffer::filled(width, height, Color::new(30, 30, 30));
        for &(x, y) in hits {
            fb.pixels[y * width + x] = TARGET.pack();
        }
        fb
    }

    #[test]
    fn uniform_non_matching_frame_yields_nothing() {
        let fb = FrameBuffer::filled(32, 24, Color::new(200, 10, 10));
        let out = analyze(&fb, &config());
        assert!(out.points.is_empty());
        assert_eq!(out.center, None);
        assert_eq!(out.tips, None);
    }

    #[test]
    fn scan_maps_index_to_xy() {
        let fb = frame_with(5, 4, &[(4, 0), (0, 1), (2, 3)]);
        let pts = scan_frame(&fb, &config().matcher);
        assert_eq!(pts, vec![Point::new(4, 0), Point::new(0, 1), Point::new(2, 3)]);
    }

    #[test]
    fn rgba_bytes_scan_ignores_alpha() {
        // 2x2, only (1,1) is green; alpha varies
        let data = [
            0, 0, 0, 255, /**/ 0, 0, 255, 0, //
            9, 9, 9, 0, /*  */ 0, 255, 0, 17,
        ];
        let colors = data.chunks_exact(4).map(|px| Color::new(px[0], px[1], px[2]));
        let pts = collect_matches(colors, 2, &config().matcher);
        assert_eq!(pts, vec![Point::new(1, 1)]);
    }

    #[test]
    fn near_colors_within_threshold_match() {
        let mut fb = frame_with(3, 1, &[]);
        fb.pixels[1] = Color::new(3, 250, 4).pack(); // 9 + 25 + 16 = 50 < 100
        fb.pixels[2] = Color::new(10, 250, 0).pack(); // 100 + 25 = 125
        assert_eq!(scan_frame(&fb, &config().matcher), vec![Point::new(1, 0)]);
    }

    #[test]
    fn two_pixels_resolve_with_lower_tip_first() {
        let fb = frame_with(4, 11, &[(0, 0), (0, 10)]);
        let out = analyze(&fb, &config());
        assert_eq!(out.points, vec![Point::new(0, 0), Point::new(0, 10)]);
        assert_eq!(out.center, Some(Point::new(0, 5)));
        assert_eq!(out.tips, Some([Point::new(0, 10), Point::new(0, 0)]));
    }

    #[test]
    fn raw_tips_before_orientation() {
        let pts = [Point::new(0, 0), Point::new(0, 10)];
        // both are 25 from the center; the first one wins
        assert_eq!(raw_tips(Point::new(0, 5), &pts), Some([Point::new(0, 0), Point::new(0, 10)]));
    }

    #[test]
    fn orient_swaps_only_when_above_center() {
        let c = Point::new(5, 5);
        let up = Point::new(5, 0);
        let down = Point::new(5, 9);
        assert_eq!(orient([up, down], c), [down, up]);
        assert_eq!(orient([down, up], c), [down, up]);
        // equal y counts as "below"
        let level = Point::new(0, 5);
        assert_eq!(orient([level, up], c), [level, up]);
    }

    #[test]
    fn oriented_tips_are_never_above_center() {
        let fb = frame_with(
            20,
            20,
            &[(3, 2), (4, 3), (5, 5), (6, 8), (7, 11), (8, 14), (9, 17), (10, 19), (2, 1)],
        );
        let out = analyze_points(scan_frame(&fb, &config().matcher), 0);
        let (c, tips) = (out.center.unwrap(), out.tips.unwrap());
        assert!(tips[0].y >= c.y);
        assert!(tips[1].y < c.y);
    }

    #[test]
    fn partition_covers_every_point_once_and_ties_go_up() {
        let tips = [Point::new(0, 10), Point::new(0, 0)];
        let pts = [Point::new(0, 1), Point::new(0, 5), Point::new(0, 9), Point::new(3, 5)];
        let [bottom, top] = partition(&tips, &pts);
        assert_eq!(bottom.len() + top.len(), pts.len());
        assert_eq!(bottom, vec![Point::new(0, 9)]);
        // (0,5) and (3,5) are equidistant and land on tip 1
        assert_eq!(top, vec![Point::new(0, 1), Point::new(0, 5), Point::new(3, 5)]);
    }

    #[test]
    fn stabilize_moves_tips_to_cluster_means() {
        let pts = [
            Point::new(0, 0),
            Point::new(2, 0),
            Point::new(0, 20),
            Point::new(2, 20),
        ];
        let tips = stabilize([Point::new(0, 20), Point::new(0, 0)], &pts, 1);
        assert_eq!(tips, [Point::new(1, 20), Point::new(1, 0)]);
    }

    #[test]
    fn stabilize_with_zero_iterations_is_identity() {
        let pts = [Point::new(0, 0), Point::new(4, 4)];
        let tips = [Point::new(4, 4), Point::new(0, 0)];
        assert_eq!(stabilize(tips, &pts, 0), tips);
    }

    #[test]
    fn stabilize_keeps_tip_with_empty_cluster() {
        let p = Point::new(3, 3);
        assert_eq!(stabilize([p, p], &[p], 1), [p, p]);
    }

    #[test]
    fn stabilize_converges_with_more_iterations() {
        let pts: Vec<Point> = (0..30).map(|y| Point::new(0, y)).collect();
        let once = stabilize([Point::new(0, 29), Point::new(0, 0)], &pts, 1);
        let many = stabilize([Point::new(0, 29), Point::new(0, 0)], &pts, 50);
        assert_eq!(once, [Point::new(0, 22), Point::new(0, 7)]);
        assert_eq!(stabilize(many, &pts, 1), many);
    }

    #[test]
    fn zero_width_scans_nothing() {
        assert!(collect_matches([TARGET, TARGET], 0, &config().matcher).is_empty());
    }
}
