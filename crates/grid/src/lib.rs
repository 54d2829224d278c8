#![deny(unsafe_code)]
//! Jittered grid generator.
//!
//! A rectilinear grid whose line positions are perturbed by a seeded
//! jitter, for plotter calibration studies. No boolean operations.

use plotgen_core::geometry::jittered_grid;
use plotgen_core::{
    make_rng, Canvas, FieldSpec, Generator, Params, PlotError, Rendering, Schema, Session, Srgb,
    Stroke, UiMeta,
};
use tracing::info;

/// Typed view of a coerced Grid params record.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub seed: String,
    pub width: f64,
    pub height: f64,
    pub columns: usize,
    pub rows: usize,
    pub jitter: f64,
    pub stroke_width: f64,
}

impl GridParams {
    pub fn from_params(params: &Params) -> Result<Self, PlotError> {
        Ok(Self {
            seed: params.str("seed")?.to_string(),
            width: params.f64("width")?,
            height: params.f64("height")?,
            columns: params.usize("columns")?,
            rows: params.usize("rows")?,
            jitter: params.f64("jitter")?,
            stroke_width: params.f64("strokeWidth")?,
        })
    }

    pub fn file_stem(&self) -> String {
        format!("grid-{}x{}", self.columns, self.rows)
    }
}

#[derive(Debug)]
pub struct Grid {
    schema: Schema,
    ui: UiMeta,
}

impl Grid {
    pub fn new() -> Result<Self, PlotError> {
        let schema = Schema::builder()
            .field("seed", FieldSpec::string("grid").label("Seed").randomize())
            .field("width", FieldSpec::float(600.0).min(50.0).max(5000.0).step(1.0))
            .field("height", FieldSpec::float(400.0).min(50.0).max(5000.0).step(1.0))
            .field("columns", FieldSpec::int(12).min(1.0).max(200.0))
            .field("rows", FieldSpec::int(8).min(1.0).max(200.0))
            .field("jitter", FieldSpec::float(4.0).min(0.0).max(100.0).step(0.1))
            .field(
                "strokeWidth",
                FieldSpec::float(1.5).min(0.1).max(10.0).step(0.1),
            )
            .build()?;
        Ok(Self {
            schema,
            ui: UiMeta::titled("Jittered Grid"),
        })
    }
}

impl Generator for Grid {
    fn id(&self) -> &str {
        "grid"
    }

    fn name(&self) -> &str {
        "Jittered Grid"
    }

    fn description(&self) -> Option<&str> {
        Some("A rectilinear grid with seeded jitter for plotter studies.")
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn ui(&self) -> Option<&UiMeta> {
        Some(&self.ui)
    }

    fn render(&self, params: &Params, canvas: &mut dyn Canvas) -> Result<Rendering, PlotError> {
        let p = GridParams::from_params(params)?;
        let stroke = Stroke::new(Srgb::BLACK, p.stroke_width);
        let mut rand = make_rng(&p.seed);

        let mut session = Session::open(canvas, p.width, p.height)?;
        let lines = jittered_grid(p.width, p.height, p.columns, p.rows, p.jitter, &mut rand);
        for line in &lines {
            session.line(line.from, line.to, stroke);
        }
        let svg = session.finish();

        info!(
            generator = self.id(),
            lines = lines.len(),
            width = p.width,
            height = p.height,
            "rendered"
        );
        Ok(Rendering {
            generator: self.id().to_string(),
            svg,
            width: p.width,
            height: p.height,
            params: params.clone(),
            file_stem: p.file_stem(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotgen_svg::SvgCanvas;
    use serde_json::json;

    fn render(raw: serde_json::Value) -> Rendering {
        let grid = Grid::new().unwrap();
        let params = grid.coerce(&raw);
        grid.render(&params, &mut SvgCanvas::new()).unwrap()
    }

    #[test]
    fn default_grid_has_22_lines() {
        let rendering = render(json!({"columns": 12, "rows": 8}));
        assert_eq!(rendering.svg.matches("<line").count(), 22);
        assert_eq!(rendering.file_stem, "grid-12x8");
        assert!(rendering.svg.contains(r#"width="600" height="400""#));
    }

    #[test]
    fn stroke_width_is_applied() {
        let svg = render(json!({"strokeWidth": 2.5})).svg;
        assert!(svg.contains(r#"stroke-width="2.5""#), "{svg}");
    }

    #[test]
    fn zero_jitter_draws_regular_grid() {
        let svg = render(json!({"jitter": 0, "columns": 2, "rows": 1, "width": 100, "height": 50})).svg;
        assert!(svg.contains(r#"<line x1="50" y1="0" x2="50" y2="50""#), "{svg}");
        assert!(svg.contains(r#"<line x1="0" y1="50" x2="100" y2="50""#), "{svg}");
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let rendering = render(json!({"columns": 0, "rows": "500", "width": -3}));
        let p = GridParams::from_params(&rendering.params).unwrap();
        assert_eq!((p.columns, p.rows, p.width), (1, 200, 50.0));
    }

    #[test]
    fn same_seed_same_svg() {
        assert_eq!(render(json!({})).svg, render(json!({})).svg);
        assert_ne!(render(json!({})).svg, render(json!({"seed": "other"})).svg);
    }

    #[test]
    fn ui_title() {
        let grid = Grid::new().unwrap();
        assert_eq!(grid.ui().and_then(|u| u.title.as_deref()), Some("Jittered Grid"));
        assert_eq!(grid.schema().randomizable().collect::<Vec<_>>(), ["seed"]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn line_count_follows_columns_and_rows(columns in 1_i64..30, rows in 1_i64..30) {
                let svg = render(json!({"columns": columns, "rows": rows})).svg;
                prop_assert_eq!(svg.matches("<line").count() as i64, columns + rows + 2);
            }
        }
    }
}
