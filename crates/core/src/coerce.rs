//! Turns raw, possibly malformed input into a validated [`Params`].
//!
//! Coercion is total: a missing, wrong-typed, non-finite, or out-of-range
//! value is replaced by its default or clamped, never reported. It is also
//! idempotent: feeding a coerced record back in (as JSON) yields the same
//! record.

use serde_json::{Number, Value};
use tracing::debug;

use crate::params::{json_type_name, ParamValue, Params};
use crate::schema::{Bound, FieldKind, FieldSpec, Schema};

/// Coerces `raw` against `schema`.
///
/// Fields resolve in dependency order, so a reference bound always sees
/// its target's final value. Keys not in the schema are ignored; a
/// non-object `raw` yields all defaults.
pub fn coerce(schema: &Schema, raw: &Value) -> Params {
    let mut values: Vec<Option<ParamValue>> = vec![None; schema.len()];

    for (idx, name, spec) in schema.resolution_order() {
        let value = resolve_field(schema, &values, name, spec, raw.get(name));
        values[idx] = Some(value);
    }

    // Re-clamp every reference-bounded field against the final record so a
    // cross-field invariant holds however the raw pair was ordered.
    for (idx, name, spec) in schema.resolution_order() {
        if !spec.has_ref_bound() {
            continue;
        }
        if let Some(current) = values[idx].clone() {
            let (min, max) = resolve_bounds(schema, &values, spec);
            let clamped = clamp_value(spec.kind(), current.clone(), min, max);
            if clamped != current {
                debug!(field = name, from = ?current, to = ?clamped, "re-clamped against reference bound");
            }
            values[idx] = Some(clamped);
        }
    }

    let entries = schema
        .fields()
        .zip(values)
        .map(|((name, spec), value)| {
            let value = value.unwrap_or_else(|| spec.default_value().clone());
            (name.to_string(), value)
        })
        .collect();
    Params::from_entries(entries)
}

fn resolve_field(
    schema: &Schema,
    values: &[Option<ParamValue>],
    name: &str,
    spec: &FieldSpec,
    raw: Option<&Value>,
) -> ParamValue {
    let read = raw.and_then(|v| read_raw(spec, v));
    let value = match read {
        Some(v) => v,
        None => {
            if let Some(v) = raw {
                debug!(
                    field = name,
                    raw_type = json_type_name(v),
                    "unreadable value replaced by default"
                );
            }
            spec.default_value().clone()
        }
    };

    let (min, max) = resolve_bounds(schema, values, spec);
    let clamped = clamp_value(spec.kind(), value.clone(), min, max);
    if clamped != value {
        debug!(field = name, from = ?value, to = ?clamped, "clamped into bounds");
    }
    clamped
}

/// Interprets a raw JSON value as the field's kind, or `None` if it can't be.
fn read_raw(spec: &FieldSpec, raw: &Value) -> Option<ParamValue> {
    match spec.kind() {
        FieldKind::Int => read_number(raw).map(|v| ParamValue::Int(round_half_up(v) as i64)),
        FieldKind::Float => read_number(raw).map(ParamValue::Float),
        FieldKind::String => match raw {
            Value::String(s) => Some(ParamValue::Text(s.clone())),
            Value::Number(n) => Some(ParamValue::Text(number_text(n))),
            _ => None,
        },
        FieldKind::Enum => raw
            .as_str()
            .filter(|s| spec.options().iter().any(|o| o == s))
            .map(|s| ParamValue::Text(s.to_string())),
    }
}

/// Text of a number given where a string is expected. Integral floats
/// drop the fraction, so `1.0` reads as `"1"` like a form field would.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() => v.to_string(),
        _ => n.to_string(),
    }
}

/// Accepts JSON numbers and numeric strings (form-field text); rejects
/// everything non-finite.
fn read_number(raw: &Value) -> Option<f64> {
    let v = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    v.is_finite().then_some(v)
}

/// Rounds to nearest, halves toward positive infinity.
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Evaluates a field's bounds against the values resolved so far.
///
/// A reference whose target is not resolved yet falls back to the
/// target's default.
fn resolve_bounds(
    schema: &Schema,
    values: &[Option<ParamValue>],
    spec: &FieldSpec,
) -> (Option<f64>, Option<f64>) {
    let eval = |bound: &Bound| match bound {
        Bound::Literal(v) => Some(*v),
        Bound::Ref { field } => {
            let idx = schema.index_of(field)?;
            values[idx]
                .as_ref()
                .and_then(ParamValue::as_f64)
                .or_else(|| schema.get(field).and_then(|s| s.default_value().as_f64()))
        }
    };
    (
        spec.min_bound().and_then(eval),
        spec.max_bound().and_then(eval),
    )
}

/// Clamps a value into `[min, max]`: lower bound first, then upper, so an
/// inverted range resolves to `max`. Integers clamp into
/// `[ceil(min), floor(max)]`; enum and string values pass through.
fn clamp_value(kind: FieldKind, value: ParamValue, min: Option<f64>, max: Option<f64>) -> ParamValue {
    match kind {
        FieldKind::Int => {
            let mut v = value.as_f64().unwrap_or(0.0);
            if let Some(lo) = min {
                v = v.max(lo.ceil());
            }
            if let Some(hi) = max {
                v = v.min(hi.floor());
            }
            ParamValue::Int(v as i64)
        }
        FieldKind::Float => {
            let mut v = value.as_f64().unwrap_or(0.0);
            if let Some(lo) = min {
                v = v.max(lo);
            }
            if let Some(hi) = max {
                v = v.min(hi);
            }
            ParamValue::Float(v)
        }
        FieldKind::String | FieldKind::Enum => value,
    }
}
