//! Declarative parameter schemas.
//!
//! A [`Schema`] is an ordered list of named [`FieldSpec`]s. Numeric bounds
//! may be literals or references to another numeric field's resolved value
//! (`exportPanel <= panels`). [`SchemaBuilder::build`] rejects authoring
//! mistakes up front: duplicate names, dangling or cyclic references, and
//! defaults that violate their own constraints.

use serde::Serialize;
use serde_json::Value;

use crate::error::PlotError;
use crate::params::ParamValue;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Int,
    Float,
    String,
    Enum,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Int | FieldKind::Float)
    }
}

/// A numeric bound: a literal, or another field's resolved value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Literal(f64),
    Ref {
        #[serde(rename = "ref")]
        field: String,
    },
}

impl Bound {
    fn reference(&self) -> Option<&str> {
        match self {
            Bound::Literal(_) => None,
            Bound::Ref { field } => Some(field),
        }
    }
}

/// How a UI should present an enum field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    Select,
    Radio,
}

/// Declaration of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    kind: FieldKind,
    default: ParamValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    min: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max: Option<Bound>,
    #[serde(skip_serializing_if = "Option::is_none")]
    step: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    display: Option<Display>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    randomize: bool,
}

impl FieldSpec {
    fn new(kind: FieldKind, default: ParamValue) -> Self {
        Self {
            kind,
            default,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            label: None,
            description: None,
            group: None,
            display: None,
            randomize: false,
        }
    }

    /// An integer field.
    pub fn int(default: i64) -> Self {
        Self::new(FieldKind::Int, ParamValue::Int(default))
    }

    /// A floating-point field.
    pub fn float(default: f64) -> Self {
        Self::new(FieldKind::Float, ParamValue::Float(default))
    }

    /// A free-form string field.
    pub fn string(default: impl Into<String>) -> Self {
        Self::new(FieldKind::String, ParamValue::Text(default.into()))
    }

    /// An enum field over an ordered option set.
    pub fn enumeration(options: &[&str], default: &str) -> Self {
        let mut spec = Self::new(FieldKind::Enum, ParamValue::Text(default.to_string()));
        spec.options = options.iter().map(|o| o.to_string()).collect();
        spec
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(Bound::Literal(min));
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(Bound::Literal(max));
        self
    }

    /// Lower bound taken from another field's resolved value.
    pub fn min_ref(mut self, field: &str) -> Self {
        self.min = Some(Bound::Ref {
            field: field.to_string(),
        });
        self
    }

    /// Upper bound taken from another field's resolved value.
    pub fn max_ref(mut self, field: &str) -> Self {
        self.max = Some(Bound::Ref {
            field: field.to_string(),
        });
        self
    }

    /// Display/rounding hint for UIs. Coercion ignores it.
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn display(mut self, display: Display) -> Self {
        self.display = Some(display);
        self
    }

    /// Marks the field as eligible for one-click re-randomization.
    pub fn randomize(mut self) -> Self {
        self.randomize = true;
        self
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    pub fn min_bound(&self) -> Option<&Bound> {
        self.min.as_ref()
    }

    pub fn max_bound(&self) -> Option<&Bound> {
        self.max.as_ref()
    }

    pub fn step_hint(&self) -> Option<f64> {
        self.step
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn group_name(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn display_hint(&self) -> Option<Display> {
        self.display
    }

    pub fn is_randomizable(&self) -> bool {
        self.randomize
    }

    /// True if either bound references another field.
    pub fn has_ref_bound(&self) -> bool {
        self.references().next().is_some()
    }

    /// Names of the fields this field's bounds depend on.
    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.min
            .iter()
            .chain(self.max.iter())
            .filter_map(Bound::reference)
    }
}

/// An ordered, validated set of field declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<(String, FieldSpec)>,
    /// Field indices in dependency order: every field comes after the
    /// fields its bounds reference, ties broken by declaration order.
    order: Vec<usize>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Fields in resolution (dependency) order.
    pub fn resolution_order(&self) -> impl Iterator<Item = (usize, &str, &FieldSpec)> {
        self.order.iter().map(|&i| {
            let (name, spec) = &self.fields[i];
            (i, name.as_str(), spec)
        })
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index_of(name).map(|i| &self.fields[i].1)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    /// Names of fields marked `randomize`.
    pub fn randomizable(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, s)| s.randomize)
            .map(|(n, _)| n.as_str())
    }

    /// The schema as a JSON object keyed by field name, for UI collaborators.
    pub fn to_json(&self) -> Value {
        let map = self
            .fields
            .iter()
            .map(|(name, spec)| {
                let spec = serde_json::to_value(spec).unwrap_or(Value::Null);
                (name.clone(), spec)
            })
            .collect();
        Value::Object(map)
    }
}

/// Accumulates field declarations; [`build`](SchemaBuilder::build) validates them.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(String, FieldSpec)>,
}

impl SchemaBuilder {
    pub fn field(mut self, name: &str, spec: FieldSpec) -> Self {
        self.fields.push((name.to_string(), spec));
        self
    }

    /// Validates the declarations and fixes the resolution order.
    pub fn build(self) -> Result<Schema, PlotError> {
        let fields = self.fields;

        for (i, (name, _)) in fields.iter().enumerate() {
            if fields[..i].iter().any(|(n, _)| n == name) {
                return Err(PlotError::DuplicateField(name.clone()));
            }
        }

        let deps = reference_indices(&fields)?;
        let order = dependency_order(&fields, &deps)?;
        let schema = Schema { fields, order };
        validate_defaults(&schema)?;
        Ok(schema)
    }
}

/// For each field, the indices of the fields its bounds reference.
fn reference_indices(fields: &[(String, FieldSpec)]) -> Result<Vec<Vec<usize>>, PlotError> {
    fields
        .iter()
        .map(|(name, spec)| {
            spec.references()
                .map(|target| {
                    let idx = fields
                        .iter()
                        .position(|(n, _)| n == target)
                        .ok_or_else(|| PlotError::UnknownBoundReference {
                            field: name.clone(),
                            target: target.to_string(),
                        })?;
                    if !fields[idx].1.kind.is_numeric() {
                        return Err(PlotError::NonNumericBoundReference {
                            field: name.clone(),
                            target: target.to_string(),
                        });
                    }
                    Ok(idx)
                })
                .collect()
        })
        .collect()
}

/// Stable topological sort: repeatedly takes the earliest-declared field
/// whose references are all placed.
fn dependency_order(
    fields: &[(String, FieldSpec)],
    deps: &[Vec<usize>],
) -> Result<Vec<usize>, PlotError> {
    let mut placed = vec![false; fields.len()];
    let mut order = Vec::with_capacity(fields.len());

    while order.len() < fields.len() {
        let next = (0..fields.len())
            .find(|&i| !placed[i] && deps[i].iter().all(|&d| placed[d]));
        match next {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => {
                let stuck = placed.iter().position(|p| !p).unwrap_or_default();
                return Err(PlotError::CyclicBound(fields[stuck].0.clone()));
            }
        }
    }
    Ok(order)
}

/// Checks every default against its own constraints, resolving reference
/// bounds against the other fields' defaults.
fn validate_defaults(schema: &Schema) -> Result<(), PlotError> {
    let invalid = |field: &str, reason: String| PlotError::InvalidDefault {
        field: field.to_string(),
        reason,
    };

    for (_, name, spec) in schema.resolution_order() {
        match (spec.kind, &spec.default) {
            (FieldKind::Enum, ParamValue::Text(d)) => {
                if spec.options.is_empty() {
                    return Err(invalid(name, "enum has no options".into()));
                }
                if !spec.options.contains(d) {
                    return Err(invalid(name, format!("{d:?} is not one of the options")));
                }
            }
            (FieldKind::String, ParamValue::Text(_)) => {}
            (FieldKind::Int | FieldKind::Float, default) => {
                let value = default.as_f64().unwrap_or(f64::NAN);
                if !value.is_finite() {
                    return Err(invalid(name, "default is not a finite number".into()));
                }
                let resolve = |bound: &Bound| match bound {
                    Bound::Literal(v) => *v,
                    Bound::Ref { field } => schema
                        .get(field)
                        .and_then(|s| s.default.as_f64())
                        .unwrap_or(f64::NAN),
                };
                if let Some(min) = spec.min.as_ref().map(resolve) {
                    if value < min {
                        return Err(invalid(name, format!("default {value} below min {min}")));
                    }
                }
                if let Some(max) = spec.max.as_ref().map(resolve) {
                    if value > max {
                        return Err(invalid(name, format!("default {value} above max {max}")));
                    }
                }
            }
            (_, other) => {
                return Err(invalid(
                    name,
                    format!("{} default for a {:?} field", other.type_name(), spec.kind),
                ));
            }
        }
    }
    Ok(())
}
