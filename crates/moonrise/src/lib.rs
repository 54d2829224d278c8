#![deny(unsafe_code)]
//! Moonrise generator.
//!
//! Scatters seeded random points over the world rectangle and turns each
//! one into a flowing curve: the shared easing function sampled from the
//! left edge and shifted to pass through the point. Panel circles sit along
//! a concave arc; intersecting every curve with every circle leaves the
//! lens-shaped panel artwork.
//!
//! Preview mode draws the whole world with its framing (border, panel
//! rectangles). Export mode crops to a single panel: a `2R` square with the
//! selected circle's curves centered in it.

use plotgen_core::geometry::{
    circle_centers, random_points, translated_curve, EasingCurve, DEFAULT_CURVE_STEPS,
};
use plotgen_core::schema::Display;
use plotgen_core::{
    make_rng, Canvas, FieldSpec, Generator, ItemId, Params, PlotError, Point, Rendering, Schema,
    Session, Srgb, Stroke, UiMeta,
};
use tracing::{info, warn};

const CURVE_STROKE: Stroke = Stroke::new(Srgb::BLACK, 0.5);
const FRAME_STROKE: Stroke = Stroke::new(Srgb::BLUE, 2.0);
const PANEL_STROKE: Stroke = Stroke::new(Srgb::RED, 2.0);

/// Whether to render the whole composition or one cropped panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Export,
}

impl Mode {
    fn parse(value: &str) -> Result<Self, PlotError> {
        match value {
            "preview" => Ok(Mode::Preview),
            "export" => Ok(Mode::Export),
            other => Err(PlotError::ParamTypeMismatch {
                name: "mode".into(),
                expected: "preview or export".into(),
                got: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Preview => "preview",
            Mode::Export => "export",
        }
    }
}

/// Typed view of a coerced Moonrise params record.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonriseParams {
    pub seed: String,
    pub points: usize,
    pub panels: usize,
    pub circle_radius: f64,
    pub panel_width: f64,
    pub total_height: f64,
    pub total_width: f64,
    pub mode: Mode,
    /// 1-based.
    pub export_panel: usize,
}

impl MoonriseParams {
    pub fn from_params(params: &Params) -> Result<Self, PlotError> {
        Ok(Self {
            seed: params.str("seed")?.to_string(),
            points: params.usize("points")?,
            panels: params.usize("panels")?,
            circle_radius: params.f64("circleRadius")?,
            panel_width: params.f64("panelWidth")?,
            total_height: params.f64("totalHeight")?,
            total_width: params.f64("totalWidth")?,
            mode: Mode::parse(params.str("mode")?)?,
            export_panel: params.usize("exportPanel")?,
        })
    }

    /// The arc the panel centers sit on, used as the base for every curve.
    ///
    /// Runs from `(0, H - R)` on the left edge up to `(W, R)` on the right.
    pub fn base_curve(&self) -> impl Fn(f64) -> f64 {
        let curve = EasingCurve::inset(self.total_width, self.total_height, self.circle_radius);
        move |x| curve.eval(x)
    }

    /// Panel centers along the moonrise arc, left to right.
    pub fn centers(&self) -> Vec<Point> {
        circle_centers(
            self.panels,
            self.total_width,
            self.total_height,
            self.panel_width / 2.0,
            self.circle_radius,
        )
    }

    /// One sampled curve per seeded random point.
    pub fn curves(&self) -> Vec<Vec<Point>> {
        let mut rand = make_rng(&self.seed);
        let f = self.base_curve();
        random_points(self.points, self.total_width, self.total_height, &mut rand)
            .into_iter()
            .map(|p| translated_curve(p, &f, DEFAULT_CURVE_STEPS))
            .collect()
    }

    pub fn file_stem(&self) -> String {
        match self.mode {
            Mode::Preview => format!("moonrise-preview-{}-panels", self.panels),
            Mode::Export => format!("moonrise-panel-{}-of-{}", self.export_panel, self.panels),
        }
    }
}

/// The Moonrise generator.
#[derive(Debug)]
pub struct Moonrise {
    schema: Schema,
    ui: UiMeta,
}

impl Moonrise {
    pub fn new() -> Result<Self, PlotError> {
        let schema = Schema::builder()
            .field("seed", FieldSpec::string("demo").label("Seed").randomize())
            .field(
                "points",
                FieldSpec::int(300).min(1.0).max(100_000.0).label("Points"),
            )
            .field("panels", FieldSpec::int(4).min(1.0).max(50.0).label("Panels"))
            .field(
                "circleRadius",
                FieldSpec::float(27.5)
                    .min(0.0)
                    .max(10_000.0)
                    .step(0.1)
                    .label("Circle radius"),
            )
            .field(
                "panelWidth",
                FieldSpec::float(75.0)
                    .min(1.0)
                    .max(10_000.0)
                    .step(0.1)
                    .label("Panel width"),
            )
            .field(
                "totalHeight",
                FieldSpec::float(270.0)
                    .min(1.0)
                    .max(100_000.0)
                    .step(0.1)
                    .label("Total height"),
            )
            .field(
                "totalWidth",
                FieldSpec::float(570.0)
                    .min(1.0)
                    .max(100_000.0)
                    .step(0.1)
                    .label("Total width"),
            )
            .field(
                "mode",
                FieldSpec::enumeration(&["preview", "export"], "preview").display(Display::Radio),
            )
            .field(
                "exportPanel",
                FieldSpec::int(1)
                    .min(1.0)
                    .max_ref("panels")
                    .label("Panel #")
                    .group("export"),
            )
            .build()?;

        let ui = UiMeta::titled("Moonrise SVG").with_group(
            "export",
            "Export",
            Some("In export mode, the SVG will contain only the selected panel."),
        );

        Ok(Self { schema, ui })
    }

    fn render_preview(
        &self,
        p: &MoonriseParams,
        canvas: &mut dyn Canvas,
    ) -> Result<(String, f64, f64), PlotError> {
        let (w, h) = (p.total_width, p.total_height);
        let mut session = Session::open(canvas, w, h)?;

        session.rectangle(Point::ZERO, Point::new(w, h), FRAME_STROKE);

        let paths: Vec<ItemId> = p
            .curves()
            .iter()
            .map(|curve| session.polyline(curve, CURVE_STROKE))
            .collect();

        let centers = p.centers();
        let circles: Vec<ItemId> = centers
            .iter()
            .map(|&c| session.circle(c, p.circle_radius, FRAME_STROKE))
            .collect();

        let half = p.panel_width / 2.0;
        for c in &centers {
            session.rectangle(
                Point::new(c.x - half, 0.0),
                Point::new(c.x + half, h),
                PANEL_STROKE,
            );
        }

        for &circle in &circles {
            for &path in &paths {
                session.intersect(path, circle)?;
            }
        }

        for item in paths.into_iter().chain(circles) {
            session.remove(item)?;
        }

        Ok((session.finish(), w, h))
    }

    fn render_export(
        &self,
        p: &MoonriseParams,
        canvas: &mut dyn Canvas,
    ) -> Result<(String, f64, f64), PlotError> {
        let r = p.circle_radius;
        let size = r * 2.0;
        let mut session = Session::open(canvas, size, size)?;

        let paths: Vec<ItemId> = p
            .curves()
            .iter()
            .map(|curve| session.polyline(curve, CURVE_STROKE))
            .collect();

        let centers = p.centers();
        let center = match centers.get(p.export_panel.saturating_sub(1)) {
            Some(&c) => c,
            None => {
                warn!(
                    export_panel = p.export_panel,
                    panels = centers.len(),
                    "export panel out of range, using the first panel"
                );
                centers.first().copied().unwrap_or(Point::ZERO)
            }
        };

        let circle = session.circle(center, r, FRAME_STROKE);
        let mut clipped = Vec::with_capacity(paths.len());
        for &path in &paths {
            clipped.extend(session.intersect(path, circle)?);
        }
        let panel = session.group(&clipped)?;
        session.translate(panel, Point::new(r - center.x, r - center.y))?;

        session.rectangle(Point::ZERO, Point::splat(size), FRAME_STROKE);

        for item in paths.into_iter().chain([circle]) {
            session.remove(item)?;
        }

        Ok((session.finish(), size, size))
    }
}

impl Generator for Moonrise {
    fn id(&self) -> &str {
        "moonrise"
    }

    fn name(&self) -> &str {
        "Moonrise"
    }

    fn description(&self) -> Option<&str> {
        Some("Arc-based multi-panel SVG with boolean intersections.")
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn ui(&self) -> Option<&UiMeta> {
        Some(&self.ui)
    }

    fn render(&self, params: &Params, canvas: &mut dyn Canvas) -> Result<Rendering, PlotError> {
        let p = MoonriseParams::from_params(params)?;
        let (svg, width, height) = match p.mode {
            Mode::Preview => self.render_preview(&p, canvas)?,
            Mode::Export => self.render_export(&p, canvas)?,
        };
        info!(
            generator = self.id(),
            mode = p.mode.as_str(),
            width,
            height,
            "rendered"
        );
        Ok(Rendering {
            generator: self.id().to_string(),
            svg,
            width,
            height,
            params: params.clone(),
            file_stem: p.file_stem(),
        })
    }
}
