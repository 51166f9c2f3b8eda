// Small geometry helpers used by the locator and the beam renderer.
// All pure; nothing here keeps state between frames.

use crate::types::Point;

/// Linear interpolation: t=0 -> a, t=1 -> b. Values outside [0,1] extrapolate.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Componentwise `lerp` between two pixel points.
#[inline]
pub fn lerp_point(a: Point, b: Point, t: f32) -> (f32, f32) {
    (lerp(a.x as f32, b.x as f32, t), lerp(a.y as f32, b.y as f32, t))
}

/// Squared Euclidean distance. Widened to i64 so far-apart points can't overflow.
#[inline]
pub fn dist_sq(a: Point, b: Point) -> i64 {
    let dx = a.x as i64 - b.x as i64;
    let dy = a.y as i64 - b.y as i64;
    dx * dx + dy * dy
}

/// Mean position of `points`, floored on each axis. None for an empty set.
pub fn average(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as i64;
    let (sx, sy) = points
        .iter()
        .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
    Some(Point::new(sx.div_euclid(n) as i32, sy.div_euclid(n) as i32))
}

/// The point in `points` farthest from `origin`.
/// Strict `>` so the earliest of several equally far points wins.
pub fn farthest_from(origin: Point, points: &[Point]) -> Option<Point> {
    let mut best: Option<(Point, i64)> = None;
    for &p in points {
        let d = dist_sq(origin, p);
        match best {
            Some((_, best_d)) if d <= best_d => {}
            _ => best = Some((p, d)),
        }
    }
    best.map(|(p, _)| p)
}
