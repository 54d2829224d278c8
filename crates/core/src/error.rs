//! Error types for plotgen.
//!
//! Malformed parameter input is never an error: coercion resolves it
//! silently. What remains are schema authoring mistakes (fatal at startup),
//! registry misuse, interchange failures, and drawing-session misuse.

use thiserror::Error;

/// Errors produced by plotgen operations.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Two fields in one schema share a name.
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),

    /// A bound references a field the schema does not declare.
    #[error("field '{field}' has a bound referencing unknown field '{target}'")]
    UnknownBoundReference { field: String, target: String },

    /// A bound references a field that is not numeric.
    #[error("field '{field}' has a bound referencing non-numeric field '{target}'")]
    NonNumericBoundReference { field: String, target: String },

    /// Bound references form a cycle.
    #[error("cyclic bound references involving field '{0}'")]
    CyclicBound(String),

    /// A field's default does not satisfy its own constraints.
    #[error("invalid default for field '{field}': {reason}")]
    InvalidDefault { field: String, reason: String },

    /// Two generators were registered under the same id.
    #[error("duplicate generator id: {0}")]
    DuplicateGenerator(String),

    /// No generator is registered under the requested id.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),

    /// A requested parameter name was not found in the params record.
    #[error("parameter not found: {0}")]
    ParamNotFound(String),

    /// A parameter existed but held a different kind of value.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// Parameter JSON could not be parsed or was not an object.
    #[error("invalid params JSON: {0}")]
    InvalidParams(String),

    /// Width or height of a drawing surface was negative or not finite.
    #[error("invalid dimensions: width and height must be finite and non-negative")]
    InvalidDimensions,

    /// An item handle does not refer to a live item in the current session.
    #[error("unknown drawing item: {0}")]
    UnknownItem(usize),

    /// The drawing engine cannot intersect this pair of items.
    #[error("unsupported intersection: {0}")]
    UnsupportedIntersection(String),

    /// An I/O failure (writing an SVG or params file).
    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_field_includes_name() {
        let err = PlotError::DuplicateField("panels".into());
        let msg = format!("{err}");
        assert!(msg.contains("panels"), "missing field name in: {msg}");
    }

    #[test]
    fn unknown_bound_reference_includes_both_fields() {
        let err = PlotError::UnknownBoundReference {
            field: "exportPanel".into(),
            target: "panes".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("exportPanel"), "missing field in: {msg}");
        assert!(msg.contains("panes"), "missing target in: {msg}");
    }

    #[test]
    fn invalid_default_includes_reason() {
        let err = PlotError::InvalidDefault {
            field: "points".into(),
            reason: "default 0 below min 1".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("points"), "missing field in: {msg}");
        assert!(msg.contains("below min"), "missing reason in: {msg}");
    }

    #[test]
    fn param_type_mismatch_includes_all_fields() {
        let err = PlotError::ParamTypeMismatch {
            name: "radius".into(),
            expected: "float".into(),
            got: "string".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("radius"), "missing param name in: {msg}");
        assert!(msg.contains("float"), "missing expected type in: {msg}");
        assert!(msg.contains("string"), "missing got type in: {msg}");
    }

    #[test]
    fn unknown_item_includes_handle() {
        let err = PlotError::UnknownItem(17);
        assert!(format!("{err}").contains("17"));
    }

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = format!("{}", PlotError::InvalidDimensions);
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn plot_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PlotError>();
    }

    #[test]
    fn plot_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<PlotError>();
    }
}
