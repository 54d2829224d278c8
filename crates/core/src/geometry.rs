//! Pure geometry and layout helpers shared by generators.
//!
//! Nothing here touches the drawing engine. Points are `glam::DVec2`, and
//! every function is a pure function of its inputs (randomness comes in
//! through an explicit draw closure).

use glam::DVec2;

/// A point in world coordinates (y grows downward, as in SVG).
pub type Point = DVec2;

/// Default number of segments used when sampling a curve.
pub const DEFAULT_CURVE_STEPS: usize = 120;

/// The `1 - sqrt(t)` easing function on `t` in [0, 1].
pub fn ease_sqrt(t: f64) -> f64 {
    1.0 - t.max(0.0).sqrt()
}

/// The concave "moonrise" arc across a `width`-wide world.
///
/// `y(x) = top_y + (1 - sqrt(x / width)) * (bottom_y - top_y)`: it starts at
/// `bottom_y` on the left edge and rises to `top_y` at the right edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingCurve {
    pub width: f64,
    pub top_y: f64,
    pub bottom_y: f64,
}

impl EasingCurve {
    /// The arc whose ends sit one `radius` inside the top and bottom edges.
    pub fn inset(width: f64, height: f64, radius: f64) -> Self {
        Self {
            width,
            top_y: radius,
            bottom_y: height - radius,
        }
    }

    /// Evaluates the curve at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        self.top_y + ease_sqrt(x / self.width) * (self.bottom_y - self.top_y)
    }
}

/// Places `num_circles` panel centers along the inset easing curve.
///
/// With one circle (or none) the single center sits at the bottom middle,
/// `(width / 2, height - radius)`. Otherwise x is spread evenly across
/// `[margin, width - margin]` and y follows [`EasingCurve::inset`].
pub fn circle_centers(
    num_circles: usize,
    width: f64,
    height: f64,
    margin: f64,
    radius: f64,
) -> Vec<Point> {
    if num_circles <= 1 {
        return vec![Point::new(width / 2.0, height - radius)];
    }

    let span = width - margin * 2.0;
    let last = (num_circles - 1) as f64;
    let curve = EasingCurve::inset(width, height, radius);
    (0..num_circles)
        .map(|i| {
            let x = margin + (i as f64 * span) / last;
            Point::new(x, curve.eval(x))
        })
        .collect()
}

/// Samples `f` over `[0, target.x]` and shifts it to pass through `target`.
///
/// Produces `steps + 1` points at evenly spaced x positions, each moved
/// vertically by `target.y - f(target.x)`. The last sample is pinned to
/// exactly `(target.x, f(target.x) + shift)`. A `steps` of zero is treated
/// as one.
pub fn translated_curve<F>(target: Point, f: F, steps: usize) -> Vec<Point>
where
    F: Fn(f64) -> f64,
{
    let steps = steps.max(1);
    let shift = target.y - f(target.x);

    let mut points: Vec<Point> = (0..=steps)
        .map(|i| {
            let x = target.x * (i as f64 / steps as f64);
            Point::new(x, f(x) + shift)
        })
        .collect();

    if let Some(last) = points.last_mut() {
        *last = Point::new(target.x, f(target.x) + shift);
    }
    points
}

/// Scatters `count` points uniformly over `[0, width) x [0, height)`.
///
/// Draws x then y for each point, so the draw order is part of the output.
pub fn random_points<R>(count: usize, width: f64, height: f64, rand: &mut R) -> Vec<Point>
where
    R: FnMut() -> f64,
{
    (0..count)
        .map(|_| {
            let x = rand() * width;
            let y = rand() * height;
            Point::new(x, y)
        })
        .collect()
}

/// Offsets `value` by a uniform amount in `[-amount, amount)`.
pub fn jitter<R>(value: f64, amount: f64, rand: &mut R) -> f64
where
    R: FnMut() -> f64,
{
    value + (rand() - 0.5) * 2.0 * amount
}

/// Orientation of a grid line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// One full-span line of a jittered grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub axis: Axis,
    /// Un-jittered coordinate on the perpendicular axis.
    pub nominal: f64,
    pub from: Point,
    pub to: Point,
}

impl GridLine {
    /// The jittered coordinate on the perpendicular axis.
    pub fn position(&self) -> f64 {
        match self.axis {
            Axis::Vertical => self.from.x,
            Axis::Horizontal => self.from.y,
        }
    }
}

/// Builds `columns + 1` vertical then `rows + 1` horizontal jittered lines.
///
/// Each line spans the full width or height; its position is the regular
/// grid coordinate perturbed by [`jitter`]. Draw order: all vertical lines
/// left to right, then all horizontal lines top to bottom.
pub fn jittered_grid<R>(
    width: f64,
    height: f64,
    columns: usize,
    rows: usize,
    amount: f64,
    rand: &mut R,
) -> Vec<GridLine>
where
    R: FnMut() -> f64,
{
    let columns = columns.max(1);
    let rows = rows.max(1);
    let cell_w = width / columns as f64;
    let cell_h = height / rows as f64;
    let mut lines = Vec::with_capacity(columns + rows + 2);

    for c in 0..=columns {
        let nominal = c as f64 * cell_w;
        let x = jitter(nominal, amount, rand);
        lines.push(GridLine {
            axis: Axis::Vertical,
            nominal,
            from: Point::new(x, 0.0),
            to: Point::new(x, height),
        });
    }

    for r in 0..=rows {
        let nominal = r as f64 * cell_h;
        let y = jitter(nominal, amount, rand);
        lines.push(GridLine {
            axis: Axis::Horizontal,
            nominal,
            from: Point::new(0.0, y),
            to: Point::new(width, y),
        });
    }

    lines
}
