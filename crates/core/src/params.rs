//! Validated parameter records and their JSON interchange form.
//!
//! A [`Params`] is only ever produced by [`coerce`](crate::coerce::coerce),
//! so every value in it already satisfies its field's constraints. It is
//! immutable: overriding a value means coercing a new record.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::PlotError;

/// One resolved parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    /// String and enum fields.
    Text(String),
}

impl ParamValue {
    /// Short name of the variant, used in type-mismatch errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Text(_) => "string",
        }
    }

    /// Numeric view of the value; `None` for text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// The value in its native JSON representation.
    pub fn to_json(&self) -> Value {
        match self {
            ParamValue::Int(v) => Value::from(*v),
            ParamValue::Float(v) => Value::from(*v),
            ParamValue::Text(v) => Value::from(v.as_str()),
        }
    }
}

/// A concrete parameter record: exactly the fields of one schema, in
/// declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub(crate) fn from_entries(entries: Vec<(String, ParamValue)>) -> Self {
        Self { entries }
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Looks up a value by field name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    fn require(&self, name: &str) -> Result<&ParamValue, PlotError> {
        self.get(name)
            .ok_or_else(|| PlotError::ParamNotFound(name.to_string()))
    }

    fn mismatch(name: &str, expected: &str, got: &ParamValue) -> PlotError {
        PlotError::ParamTypeMismatch {
            name: name.to_string(),
            expected: expected.to_string(),
            got: got.type_name().to_string(),
        }
    }

    /// Reads a numeric field as `f64`. Integer fields convert losslessly
    /// within the ranges plotgen schemas allow.
    pub fn f64(&self, name: &str) -> Result<f64, PlotError> {
        let value = self.require(name)?;
        value
            .as_f64()
            .ok_or_else(|| Self::mismatch(name, "number", value))
    }

    /// Reads an integer field.
    pub fn int(&self, name: &str) -> Result<i64, PlotError> {
        match self.require(name)? {
            ParamValue::Int(v) => Ok(*v),
            other => Err(Self::mismatch(name, "int", other)),
        }
    }

    /// Reads a non-negative integer field as `usize`.
    pub fn usize(&self, name: &str) -> Result<usize, PlotError> {
        let v = self.int(name)?;
        usize::try_from(v).map_err(|_| PlotError::ParamTypeMismatch {
            name: name.to_string(),
            expected: "non-negative int".to_string(),
            got: v.to_string(),
        })
    }

    /// Reads a string or enum field.
    pub fn str(&self, name: &str) -> Result<&str, PlotError> {
        match self.require(name)? {
            ParamValue::Text(v) => Ok(v),
            other => Err(Self::mismatch(name, "string", other)),
        }
    }

    /// The record as a JSON object keyed by field name.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Pretty-printed JSON, the format written by "export params".
    pub fn to_json_string(&self) -> Result<String, PlotError> {
        serde_json::to_string_pretty(&self.to_json())
            .map_err(|e| PlotError::InvalidParams(e.to_string()))
    }
}

/// Parses imported parameter JSON.
///
/// The text must be a JSON object; anything else is an interchange error.
/// Field values are not checked here, that is coercion's job.
pub fn parse_params_json(text: &str) -> Result<Value, PlotError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| PlotError::InvalidParams(e.to_string()))?;
    if !value.is_object() {
        return Err(PlotError::InvalidParams(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }
    Ok(value)
}

/// Overlays the keys of `overlay` onto `base`, returning a new raw record.
///
/// Non-object inputs contribute no keys.
pub fn merge_raw(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.as_object().cloned().unwrap_or_default();
    if let Some(over) = overlay.as_object() {
        for (k, v) in over {
            merged.insert(k.clone(), v.clone());
        }
    }
    Value::Object(merged)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
