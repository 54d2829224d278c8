//! Writing renderings and params to disk, and reading params back.
//!
//! Files are the CLI's stand-in for browser download and import. All
//! failures map to `PlotError::Io` or `PlotError::InvalidParams`.

use std::fs;
use std::path::Path;

use plotgen_core::params::parse_params_json;
use plotgen_core::{Params, PlotError, Rendering};
use serde_json::Value;
use tracing::info;

/// Writes the rendering's SVG text to `path`.
pub fn write_svg(rendering: &Rendering, path: &Path) -> Result<(), PlotError> {
    fs::write(path, &rendering.svg).map_err(|e| PlotError::Io(e.to_string()))?;
    info!(path = %path.display(), bytes = rendering.svg.len(), "wrote svg");
    Ok(())
}

/// Writes params as pretty JSON to `path`.
pub fn write_params(params: &Params, path: &Path) -> Result<(), PlotError> {
    let text = params.to_json_string()?;
    fs::write(path, text).map_err(|e| PlotError::Io(e.to_string()))
}

/// Reads a raw params record from a JSON file.
///
/// The record is not coerced; pass it through a generator's `coerce`.
pub fn read_params_file(path: &Path) -> Result<Value, PlotError> {
    let text = fs::read_to_string(path).map_err(|e| PlotError::Io(e.to_string()))?;
    parse_params_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use plotgen_core::Generator;
    use plotgen_svg::SvgCanvas;
    use serde_json::json;

    #[test]
    fn write_svg_round_trip() {
        let registry = Registry::builtin().unwrap();
        let rendering = registry
            .render("grid", &json!({}), &mut SvgCanvas::new())
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(rendering.file_name());

        write_svg(&rendering, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, rendering.svg);
        assert!(path.ends_with("grid-12x8.svg"));
    }

    #[test]
    fn exported_params_reimport_identically() {
        let registry = Registry::builtin().unwrap();
        let moonrise = registry.require("moonrise").unwrap();
        let params = moonrise.coerce(&json!({"circleRadius": 31.7, "exportPanel": 9}));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");

        write_params(&params, &path).unwrap();
        let raw = read_params_file(&path).unwrap();

        assert_eq!(moonrise.coerce(&raw), params);
    }

    #[test]
    fn read_params_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            read_params_file(&path),
            Err(PlotError::InvalidParams(_))
        ));
    }

    #[test]
    fn read_params_reports_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, "{\"seed\": ").unwrap();
        assert!(matches!(
            read_params_file(&path),
            Err(PlotError::InvalidParams(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_params_file(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(PlotError::Io(_))));
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.svg");
        let rendering = Registry::builtin()
            .unwrap()
            .render("grid", &json!({}), &mut SvgCanvas::new())
            .unwrap();
        assert!(matches!(write_svg(&rendering, &path), Err(PlotError::Io(_))));
    }
}
