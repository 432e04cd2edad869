//! objs - compose and inspect JSON/YAML configuration files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path as FsPath, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use objs::value::{self, Value};
use objs::{Object, Path};

#[derive(Debug, Parser)]
#[command(name = "objs", version, about = "Compose and inspect JSON/YAML configuration files")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge files left to right into one document.
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Replace top-level keys instead of merging nested maps.
        #[arg(long)]
        shallow: bool,
        #[command(flatten)]
        out: Output,
    },
    /// Print the value at a dotted path, e.g. `server.tls.port` or `hosts[0]`.
    Get {
        file: PathBuf,
        path: Path,
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Set the value at a dotted path, creating intermediate maps.
    Set {
        file: PathBuf,
        path: Path,
        /// JSON value; anything that is not valid JSON is stored as a string.
        value: String,
        #[command(flatten)]
        out: Output,
    },
    /// Keep only the listed top-level keys.
    Pick {
        file: PathBuf,
        #[arg(short, long, value_delimiter = ',', required = true)]
        keys: Vec<String>,
        #[command(flatten)]
        out: Output,
    },
}

#[derive(Debug, clap::Args)]
struct Output {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,
    /// Output location. Use '-' for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Merge {
            files,
            shallow,
            out,
        } => {
            let mut merged = Object::new();
            for file in &files {
                let source = load_object(file)?;
                if shallow {
                    objs::shallow_merge(&mut merged, [&source]);
                } else {
                    objs::deep_merge(&mut merged, &source);
                }
                debug!(file = %file.display(), keys = merged.len(), "merged");
            }
            write_value(&Value::Map(merged), &out)
        }
        Command::Get { file, path, format } => {
            let root = load(&file)?;
            let Some(found) = objs::get_path(&root, &path) else {
                bail!("no value at '{}' in {}", path, file.display());
            };
            let rendered = render(&found, format)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writeln!(stdout)?;
            }
            Ok(())
        }
        Command::Set {
            file,
            path,
            value: raw,
            out,
        } => {
            let mut root = load(&file)?;
            let parsed = value::from_json(&raw).unwrap_or_else(|_| Value::String(raw));
            objs::create_path(&mut root, &path, parsed)
                .with_context(|| format!("failed to set '{}' in {}", path, file.display()))?;
            write_value(&root, &out)
        }
        Command::Pick { file, keys, out } => {
            let object = load_object(&file)?;
            let picked = objs::clone_filtered(&object, |k| keys.iter().any(|wanted| wanted == k));
            write_value(&Value::Map(picked), &out)
        }
    }
}

/// Reads a file as JSON when its extension says so, YAML otherwise.
fn load(file: &FsPath) -> Result<Value> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let is_json = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        value::from_json(&content)
    } else {
        value::from_yaml(&content)
    };
    parsed.with_context(|| format!("failed to parse {}", file.display()))
}

fn load_object(file: &FsPath) -> Result<Object> {
    match load(file)? {
        Value::Map(object) => Ok(object),
        other => bail!("{}: expected a map at the top level, found {}", file.display(), other.kind()),
    }
}

fn render(value: &Value, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Yaml => value::to_yaml(value)?,
    })
}

fn write_value(value: &Value, out: &Output) -> Result<()> {
    let mut rendered = render(value, out.format)?;
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    if out.output == "-" {
        io::stdout().lock().write_all(rendered.as_bytes())?;
    } else {
        fs::write(&out.output, rendered)
            .with_context(|| format!("failed to write {}", out.output))?;
    }
    Ok(())
}
