//! The `Generator` trait every plotgen generator implements.
//!
//! A generator pairs a [`Schema`] with a render pipeline from validated
//! [`Params`] to an SVG document. The trait is object-safe so generators
//! can be handled as `dyn Generator`.

use serde::Serialize;
use serde_json::Value;

use crate::canvas::Canvas;
use crate::coerce::coerce;
use crate::error::PlotError;
use crate::params::Params;
use crate::schema::Schema;

/// Label and help text for a group of fields in a UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMeta {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Optional presentation hints for a generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UiMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Field groups keyed by the name fields use in `FieldSpec::group`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<(String, GroupMeta)>,
}

impl UiMeta {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, key: &str, label: &str, description: Option<&str>) -> Self {
        self.groups.push((
            key.to_string(),
            GroupMeta {
                label: label.to_string(),
                description: description.map(str::to_string),
            },
        ));
        self
    }

    pub fn group(&self, key: &str) -> Option<&GroupMeta> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, g)| g)
    }
}

/// The result of one render call. Callers own it; nothing is retained.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    /// Id of the generator that produced it.
    pub generator: String,
    pub svg: String,
    pub width: f64,
    pub height: f64,
    /// The params it was rendered from.
    pub params: Params,
    /// Suggested file name without extension.
    pub file_stem: String,
}

impl Rendering {
    pub fn file_name(&self) -> String {
        format!("{}.svg", self.file_stem)
    }
}

/// Core trait for plotgen generators.
///
/// `render` must be deterministic: the same params produce the same SVG.
pub trait Generator {
    /// Stable, unique key (used for selection and lookup).
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Declared parameters.
    fn schema(&self) -> &Schema;

    fn ui(&self) -> Option<&UiMeta> {
        None
    }

    /// Renders `params` into a new scene on `canvas` and serializes it.
    ///
    /// The canvas is left cleared when this returns, on success or error.
    fn render(&self, params: &Params, canvas: &mut dyn Canvas) -> Result<Rendering, PlotError>;

    /// Coerces raw input against this generator's schema.
    fn coerce(&self, raw: &Value) -> Params {
        coerce(self.schema(), raw)
    }
}
