//! Clipping open paths against closed shapes.
//!
//! This is the non-tracing intersection: an open polyline keeps the runs
//! of segments that lie inside the shape, cut exactly at the boundary.

use plotgen_core::Point;

/// A closed shape usable as an intersection operand or clip mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClipShape {
    Circle { center: Point, radius: f64 },
    Rect { min: Point, max: Point },
}

impl ClipShape {
    /// Returns true if `p` is inside or on the boundary.
    pub fn contains(&self, p: Point) -> bool {
        match *self {
            ClipShape::Circle { center, radius } => p.distance_squared(center) <= radius * radius,
            ClipShape::Rect { min, max } => {
                p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
            }
        }
    }

    /// The parameter range `[t0, t1]` of segment `a -> b` inside the shape,
    /// or `None` if the segment only touches or misses it.
    pub fn segment_interval(&self, a: Point, b: Point) -> Option<(f64, f64)> {
        match *self {
            ClipShape::Circle { center, radius } => circle_interval(a, b, center, radius),
            ClipShape::Rect { min, max } => rect_interval(a, b, min, max),
        }
    }
}

fn circle_interval(a: Point, b: Point, center: Point, radius: f64) -> Option<(f64, f64)> {
    let d = b - a;
    let f = a - center;
    let qa = d.dot(d);
    if qa == 0.0 {
        return (f.length_squared() <= radius * radius).then_some((0.0, 1.0));
    }
    let qb = 2.0 * f.dot(d);
    let qc = f.dot(f) - radius * radius;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc <= 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t0 = ((-qb - sq) / (2.0 * qa)).max(0.0);
    let t1 = ((-qb + sq) / (2.0 * qa)).min(1.0);
    (t0 < t1).then_some((t0, t1))
}

/// Liang-Barsky parametric clipping.
fn rect_interval(a: Point, b: Point, min: Point, max: Point) -> Option<(f64, f64)> {
    let d = b - a;
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    let edges = [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    (t0 < t1).then_some((t0, t1))
}

fn point_at(a: Point, b: Point, t: f64) -> Point {
    if t <= 0.0 {
        a
    } else if t >= 1.0 {
        b
    } else {
        a.lerp(b, t)
    }
}

/// Splits `points` into the runs that lie inside `shape`.
///
/// Consecutive segments that stay inside are joined into one run; every
/// boundary crossing starts or ends a run. Paths with fewer than two points
/// produce nothing.
pub fn clip_polyline(points: &[Point], shape: &ClipShape) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current: Option<Vec<Point>> = None;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let Some((t0, t1)) = shape.segment_interval(a, b) else {
            runs.extend(current.take());
            continue;
        };

        let end = point_at(a, b, t1);
        match current.as_mut() {
            Some(run) if t0 <= 0.0 => run.push(end),
            _ => {
                runs.extend(current.take());
                current = Some(vec![point_at(a, b, t0), end]);
            }
        }
        if t1 < 1.0 {
            runs.extend(current.take());
        }
    }

    runs.extend(current);
    runs
}
