#![deny(unsafe_code)]
//! CLI binary for the plotgen procedural SVG system.
//!
//! Subcommands:
//! - `list`: print available generators in gallery order
//! - `schema <id>`: print a generator's parameter schema as JSON
//! - `params <id>`: print coerced params as JSON
//! - `render <id>`: coerce params, render, write SVG
//! - `seed`: print a fresh random seed

mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use error::CliError;
use plotgen_core::params::{merge_raw, parse_params_json};
use plotgen_core::seed::{random_seed, DEFAULT_SEED_LEN};
use plotgen_core::Generator;
use plotgen_generators::output::{read_params_file, write_params, write_svg};
use plotgen_generators::{GeneratorKind, Registry};
use plotgen_svg::SvgCanvas;
use serde_json::{json, Map, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotgen", about = "Procedural SVG generators for pen plotters")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Log debug events (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Raw parameter sources, merged in order: file, inline JSON, `--set`.
#[derive(clap::Args)]
struct ParamArgs {
    /// Parameters as a JSON object.
    #[arg(long, default_value = "{}")]
    params: String,

    /// Read parameters from a JSON file.
    #[arg(long)]
    params_file: Option<PathBuf>,

    /// Override one field, e.g. `--set panels=6`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set: Vec<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List available generators.
    List,
    /// Print a generator's parameter schema.
    Schema {
        /// Generator id (e.g. "moonrise").
        generator: String,
    },
    /// Print the coerced parameters a render would use.
    Params {
        generator: String,

        #[command(flatten)]
        input: ParamArgs,

        /// Also write them to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a generator and write the SVG.
    Render {
        generator: String,

        #[command(flatten)]
        input: ParamArgs,

        /// Output file path (defaults to the suggested file name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a fresh random seed.
    Seed {
        #[arg(long, default_value_t = DEFAULT_SEED_LEN)]
        len: usize,
    },
}

/// Parses one `KEY=VALUE` override. Values stay strings, like form input.
fn parse_set(arg: &str) -> Result<(String, Value), CliError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), Value::String(value.to_string())))
        }
        _ => Err(CliError::Input(format!(
            "invalid --set {arg:?}: expected KEY=VALUE"
        ))),
    }
}

fn raw_params(input: &ParamArgs) -> Result<Value, CliError> {
    let mut raw = match &input.params_file {
        Some(path) => read_params_file(path)?,
        None => Value::Object(Map::new()),
    };
    raw = merge_raw(&raw, &parse_params_json(&input.params)?);
    let overrides = input
        .set
        .iter()
        .map(|s| parse_set(s))
        .collect::<Result<Map<String, Value>, _>>()?;
    Ok(merge_raw(&raw, &Value::Object(overrides)))
}

fn gallery(registry: &Registry) -> Value {
    let entries: Vec<Value> = registry
        .list()
        .iter()
        .map(|g| json!({"id": g.id(), "name": g.name(), "description": g.description()}))
        .collect();
    json!({ "generators": entries })
}

fn print_gallery(registry: &Registry, json_mode: bool) -> Result<(), CliError> {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&gallery(registry))?);
    } else {
        println!("Generators:");
        for g in registry.list() {
            match g.description() {
                Some(d) => println!("  {:<10} {} - {d}", g.id(), g.name()),
                None => println!("  {:<10} {}", g.id(), g.name()),
            }
        }
    }
    Ok(())
}

/// Resolves an id, showing the gallery when it is unknown.
fn select<'r>(
    registry: &'r Registry,
    id: &str,
    json_mode: bool,
) -> Result<&'r GeneratorKind, CliError> {
    match registry.lookup(id) {
        Some(g) => Ok(g),
        None => {
            if !json_mode {
                print_gallery(registry, false)?;
            }
            Err(CliError::Input(format!("unknown generator: {id}")))
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let registry = Registry::builtin()?;

    match cli.command {
        Command::List => print_gallery(&registry, cli.json)?,
        Command::Schema { generator } => {
            let g = select(&registry, &generator, cli.json)?;
            let mut info = json!({
                "id": g.id(),
                "name": g.name(),
                "schema": g.schema().to_json(),
            });
            if let Some(ui) = g.ui() {
                info["ui"] = serde_json::to_value(ui)?;
            }
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Params {
            generator,
            input,
            output,
        } => {
            let g = select(&registry, &generator, cli.json)?;
            let params = g.coerce(&raw_params(&input)?);
            if let Some(path) = &output {
                write_params(&params, path)?;
            }
            println!("{}", params.to_json_string()?);
        }
        Command::Render {
            generator,
            input,
            output,
        } => {
            let g = select(&registry, &generator, cli.json)?;
            let params = g.coerce(&raw_params(&input)?);
            let mut canvas = SvgCanvas::new();
            let rendering = g.render(&params, &mut canvas)?;
            let output = output.unwrap_or_else(|| PathBuf::from(rendering.file_name()));
            write_svg(&rendering, &output)?;

            if cli.json {
                let info = json!({
                    "generator": rendering.generator,
                    "width": rendering.width,
                    "height": rendering.height,
                    "params": rendering.params.to_json(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {} ({}x{}) -> {}",
                    rendering.generator,
                    rendering.width,
                    rendering.height,
                    output.display()
                );
            }
        }
        Command::Seed { len } => {
            let seed = random_seed(len);
            if cli.json {
                println!("{}", json!({ "seed": seed }));
            } else {
                println!("{seed}");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = json!({"error": e.to_string(), "kind": e.kind(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
