//! How `plotgen` failures reach the shell.
//!
//! Every failure ends the process with a code the calling script can
//! branch on. Clap exits with 2 on its own for malformed arguments;
//! everything after parsing goes through [`CliError`]:
//!
//! | code | kind            | typical cause                                               |
//! |------|-----------------|-------------------------------------------------------------|
//! | 10   | `render`        | a generator's schema or pipeline failed, or a registry conflict |
//! | 11   | `io`            | the SVG or params file could not be written, or `--params-file` unreadable |
//! | 12   | `input`         | `--params` is not a JSON object, a `--set` lacks `=`, or the id is unknown |
//! | 13   | `serialization` | JSON output for `--json`, `schema` or `params` failed        |
//!
//! Out-of-range or mistyped parameter *values* are not errors at all:
//! coercion repairs them before a render starts.

use plotgen_core::PlotError;
use std::fmt;

/// A failed `plotgen` invocation.
#[derive(Debug)]
pub enum CliError {
    /// The selected generator could not produce a rendering.
    Render(PlotError),
    /// Reading a params file or writing an output file failed.
    Io(String),
    /// What the user typed cannot be used.
    Input(String),
    /// Building JSON output failed.
    Serialization(String),
}

impl CliError {
    /// Process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Short machine-readable name, reported next to the code in `--json` mode.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::Render(_) => "render",
            CliError::Io(_) => "io",
            CliError::Input(_) => "input",
            CliError::Serialization(_) => "serialization",
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Render(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<PlotError> for CliError {
    fn from(e: PlotError) -> Self {
        match e {
            PlotError::Io(msg) => CliError::Io(msg),
            // Params text and generator ids come straight from the command line.
            PlotError::InvalidParams(_) | PlotError::UnknownGenerator(_) => {
                CliError::Input(e.to_string())
            }
            other => CliError::Render(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
