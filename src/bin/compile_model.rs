//! Compile a definitions directory and print the sealed model as JSON.
//!
//! Usage:
//!   compile-model --definitions defs/
//!   compile-model --definitions defs/ --columns columns.json --pretty
//!   compile-model --hierarchy hierarchy.json --default-type emf:Document
//!
//! Exits non-zero with the full error chain when the build or seal fails.
//! Set RUST_LOG (for example `RUST_LOG=integration_model=debug`) to see
//! skipped relations and criteria.

use anyhow::{Context, Result};
use clap::Parser;
use integration_model::{
    ColumnMapping, JsonSheetSource, StaticHierarchy, build_search_model, compile_model,
    resolve_definitions_root,
};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "compile-model")]
#[command(about = "Build and seal an integration model from definition sheets")]
struct Cli {
    /// Definitions directory; falls back to MODEL_DEFINITIONS_ROOT or the current directory.
    #[arg(long)]
    definitions: Option<PathBuf>,
    /// JSON column mapping for property sheets; defaults to the standard field order.
    #[arg(long)]
    columns: Option<PathBuf>,
    /// JSON class hierarchy; when given, the search model is built as well.
    #[arg(long, requires = "default_type")]
    hierarchy: Option<PathBuf>,
    /// Searched type used when no cultural object or image type is found.
    #[arg(long)]
    default_type: Option<String>,
    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let root = resolve_definitions_root(cli.definitions.as_deref())
        .context("locating definitions directory")?;
    let columns = match &cli.columns {
        Some(path) => ColumnMapping::load(path)
            .with_context(|| format!("loading column mapping {}", path.display()))?,
        None => ColumnMapping::default(),
    };

    let source = JsonSheetSource::new().context("preparing sheet reader")?;
    let model = compile_model(&source, &root, &columns)?;

    let mut output = json!({
        "definitions": root.display().to_string(),
        "model": model,
        "namespaces": model.namespaces().collect::<Vec<_>>(),
    });

    if let (Some(path), Some(default_type)) = (&cli.hierarchy, &cli.default_type) {
        let hierarchy = StaticHierarchy::load(path)
            .with_context(|| format!("loading class hierarchy {}", path.display()))?;
        let search = build_search_model(&source, &root, &model, &hierarchy, default_type)?;
        output["search"] = serde_json::to_value(&search).context("serializing search model")?;
    }

    print_json(&output, cli.pretty)
}

fn print_json(value: &Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serializing model")?;
    println!("{rendered}");
    Ok(())
}
