#![deny(unsafe_code)]
//! Generator registry: maps generator ids to implementations.
//!
//! This crate sits between `plotgen-core` (which defines the `Generator`
//! trait) and the individual generator crates (`plotgen-moonrise`,
//! `plotgen-grid`). The CLI depends on it so dispatch lives in one place.

pub mod output;

use std::collections::HashMap;

use plotgen_core::{Canvas, Generator, Params, PlotError, Rendering, Schema, UiMeta};
use plotgen_grid::Grid;
use plotgen_moonrise::Moonrise;
use serde_json::Value;
use tracing::debug;

/// The fixed set of built-in generators.
///
/// Wraps each implementation and delegates the `Generator` trait.
#[derive(Debug)]
pub enum GeneratorKind {
    /// Arc-based multi-panel composition.
    Moonrise(Moonrise),
    /// Seeded jittered grid.
    Grid(Grid),
}

impl GeneratorKind {
    /// Every built-in generator, in gallery order.
    pub fn all() -> Result<Vec<Self>, PlotError> {
        Ok(vec![
            GeneratorKind::Moonrise(Moonrise::new()?),
            GeneratorKind::Grid(Grid::new()?),
        ])
    }

    fn inner(&self) -> &dyn Generator {
        match self {
            GeneratorKind::Moonrise(g) => g,
            GeneratorKind::Grid(g) => g,
        }
    }
}

impl Generator for GeneratorKind {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn name(&self) -> &str {
        self.inner().name()
    }

    fn description(&self) -> Option<&str> {
        self.inner().description()
    }

    fn schema(&self) -> &Schema {
        self.inner().schema()
    }

    fn ui(&self) -> Option<&UiMeta> {
        self.inner().ui()
    }

    fn render(&self, params: &Params, canvas: &mut dyn Canvas) -> Result<Rendering, PlotError> {
        self.inner().render(params, canvas)
    }
}

/// Ordered generators with id lookup, built once at startup.
#[derive(Debug)]
pub struct Registry {
    generators: Vec<GeneratorKind>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Builds a registry, preserving order.
    ///
    /// Returns `PlotError::DuplicateGenerator` if two generators share an id.
    pub fn new(generators: Vec<GeneratorKind>) -> Result<Self, PlotError> {
        let mut index = HashMap::with_capacity(generators.len());
        for (i, g) in generators.iter().enumerate() {
            if index.insert(g.id().to_string(), i).is_some() {
                return Err(PlotError::DuplicateGenerator(g.id().to_string()));
            }
        }
        debug!(count = generators.len(), "registry built");
        Ok(Self { generators, index })
    }

    /// Moonrise then Grid.
    pub fn builtin() -> Result<Self, PlotError> {
        Self::new(GeneratorKind::all()?)
    }

    pub fn lookup(&self, id: &str) -> Option<&GeneratorKind> {
        self.index.get(id).map(|&i| &self.generators[i])
    }

    /// Like [`Registry::lookup`], but absence is an error.
    pub fn require(&self, id: &str) -> Result<&GeneratorKind, PlotError> {
        self.lookup(id)
            .ok_or_else(|| PlotError::UnknownGenerator(id.to_string()))
    }

    /// Generators in registration order.
    pub fn list(&self) -> &[GeneratorKind] {
        &self.generators
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.generators.iter().map(|g| g.id())
    }

    /// Coerces `raw` against the generator's schema and renders it.
    pub fn render(
        &self,
        id: &str,
        raw: &Value,
        canvas: &mut dyn Canvas,
    ) -> Result<Rendering, PlotError> {
        let generator = self.require(id)?;
        let params = generator.coerce(raw);
        generator.render(&params, canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotgen_svg::SvgCanvas;
    use serde_json::json;

    #[test]
    fn builtin_lists_moonrise_then_grid() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), ["moonrise", "grid"]);
        assert_eq!(registry.list().len(), 2);
    }

    #[test]
    fn lookup_finds_registered_ids() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.lookup("grid").map(|g| g.name()), Some("Jittered Grid"));
        assert_eq!(registry.lookup("moonrise").map(|g| g.name()), Some("Moonrise"));
    }

    #[test]
    fn lookup_unknown_returns_none() {
        let registry = Registry::builtin().unwrap();
        assert!(registry.lookup("nonexistent").is_none());
        assert!(matches!(
            registry.require("nonexistent"),
            Err(PlotError::UnknownGenerator(_))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let generators = vec![
            GeneratorKind::Grid(Grid::new().unwrap()),
            GeneratorKind::Grid(Grid::new().unwrap()),
        ];
        let err = Registry::new(generators).unwrap_err();
        assert!(matches!(err, PlotError::DuplicateGenerator(ref id) if id == "grid"));
    }

    #[test]
    fn trait_delegation_exposes_metadata() {
        let registry = Registry::builtin().unwrap();
        let moonrise = registry.require("moonrise").unwrap();
        assert!(moonrise.description().is_some());
        assert_eq!(moonrise.schema().len(), 9);
        assert_eq!(
            moonrise.ui().and_then(|u| u.title.as_deref()),
            Some("Moonrise SVG")
        );
    }

    #[test]
    fn render_by_id_coerces_input() {
        let registry = Registry::builtin().unwrap();
        let rendering = registry
            .render("grid", &json!({"columns": 3, "rows": "2"}), &mut SvgCanvas::new())
            .unwrap();
        assert_eq!(rendering.generator, "grid");
        assert_eq!(rendering.svg.matches("<line").count(), 7);
    }

    #[test]
    fn one_canvas_serves_consecutive_renders() {
        let registry = Registry::builtin().unwrap();
        let mut canvas = SvgCanvas::new();
        let grid = registry.render("grid", &json!({}), &mut canvas).unwrap();
        let moonrise = registry
            .render("moonrise", &json!({"points": 10}), &mut canvas)
            .unwrap();
        assert!(!moonrise.svg.contains("<line"), "grid lines leaked into moonrise");
        let again = registry.render("grid", &json!({}), &mut canvas).unwrap();
        assert_eq!(grid.svg, again.svg);
    }

    #[test]
    fn object_safety() {
        let registry = Registry::builtin().unwrap();
        let boxed: &dyn Generator = registry.lookup("grid").unwrap();
        assert_eq!(boxed.id(), "grid");
    }

    mod proptests {
        use super::*;
        use plotgen_core::schema::Bound;
        use plotgen_core::{FieldKind, ParamValue};
        use proptest::prelude::*;
        use serde_json::Map;

        /// Field names and enum members declared by any builtin generator.
        fn vocabulary() -> (Vec<String>, Vec<String>) {
            let registry = Registry::builtin().unwrap();
            let mut names = vec!["extra".to_string()];
            let mut options = Vec::new();
            for g in registry.list() {
                for (name, spec) in g.schema().fields() {
                    names.push(name.to_string());
                    options.extend(spec.options().iter().cloned());
                }
            }
            (names, options)
        }

        fn raw_value(options: Vec<String>) -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                (-1e7_f64..1e7).prop_map(Value::from),
                (-1e4_f64..1e4).prop_map(|v| Value::from(v.to_string())),
                "[a-z0-9 .-]{0,8}".prop_map(Value::from),
                proptest::sample::select(options).prop_map(Value::from),
                Just(json!([1, 2])),
            ]
        }

        fn raw_record() -> impl Strategy<Value = Value> {
            let (names, options) = vocabulary();
            let pair = (proptest::sample::select(names), raw_value(options));
            proptest::collection::vec(pair, 0..16)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>()))
        }

        fn resolve(bound: &Bound, params: &Params) -> f64 {
            match bound {
                Bound::Literal(v) => *v,
                Bound::Ref { field } => params.get(field).and_then(ParamValue::as_f64).unwrap(),
            }
        }

        proptest! {
            #[test]
            fn coerce_is_idempotent_for_every_builtin(raw in raw_record()) {
                let registry = Registry::builtin().unwrap();
                for g in registry.list() {
                    let once = g.coerce(&raw);
                    let twice = g.coerce(&once.to_json());
                    prop_assert_eq!(&once, &twice, "{} is not idempotent", g.id());
                }
            }

            #[test]
            fn coerced_fields_match_kind_and_bounds(raw in raw_record()) {
                let registry = Registry::builtin().unwrap();
                for g in registry.list() {
                    let params = g.coerce(&raw);
                    prop_assert_eq!(params.len(), g.schema().len());
                    for (name, spec) in g.schema().fields() {
                        let value = params.get(name).unwrap();
                        match (spec.kind(), value) {
                            (FieldKind::Int, ParamValue::Int(_))
                            | (FieldKind::Float, ParamValue::Float(_))
                            | (FieldKind::String, ParamValue::Text(_)) => {}
                            (FieldKind::Enum, ParamValue::Text(v)) => {
                                prop_assert!(
                                    spec.options().contains(v),
                                    "{}.{name} = {v:?} is not an option",
                                    g.id()
                                );
                            }
                            (kind, value) => {
                                prop_assert!(false, "{}.{name}: {kind:?} holds {value:?}", g.id());
                            }
                        }
                        let Some(v) = value.as_f64() else { continue };
                        prop_assert!(v.is_finite());
                        if let Some(min) = spec.min_bound() {
                            let min = resolve(min, &params);
                            prop_assert!(v >= min, "{}.{name} = {v} below {min}", g.id());
                        }
                        if let Some(max) = spec.max_bound() {
                            let max = resolve(max, &params);
                            prop_assert!(v <= max, "{}.{name} = {v} above {max}", g.id());
                        }
                    }
                }
            }
        }
    }
}
