//! # Name Cleaning Utility
//!
//! Reads one company or fund name per line and prints its canonical form.
//!
//! ## Usage
//!
//! ```
//! # Clean names from a file, tab-separated raw/canonical pairs
//! cargo run --bin clean_names -- names.txt
//!
//! # Clean names from stdin as JSON
//! cat names.txt | cargo run --bin clean_names -- --format json
//!
//! # Group duplicates under their canonical name
//! cargo run --bin clean_names -- names.txt --group
//! ```
//!
//! ## Configuration
//!
//! - `--rules <path>` or `NAME_RULES_PATH`: JSON rule tables (defaults are built in)
//! - `NAME_EXTRA_ACRONYMS`: `;`-separated acronyms added to the tables
//! - `RUST_LOG`: stderr log filter

use anyhow::{Context, Result};
use canonical_names::entity::batch::{clean_names, group_by_canonical};
use canonical_names::entity::{NameCleaner, RuleTables};
use canonical_names::environment::rules_path;
use canonical_names::logging::configure_logging;
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File with one name per line (stdin when omitted)
    input: Option<PathBuf>,

    /// JSON rule tables
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output format for cleaned names
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: OutputFormat,

    /// Print names grouped by canonical form as JSON
    #[arg(short, long)]
    group: bool,

    /// Also write daily log files to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    configure_logging(cli.log_dir.as_deref());

    let tables = match cli.rules.clone().or_else(rules_path) {
        Some(path) => RuleTables::from_json_file(&path)
            .with_context(|| format!("Failed to load rule tables from {}", path.display()))?,
        None => RuleTables::default(),
    }
    .with_env_overrides();

    let cleaner = NameCleaner::new(&tables).context("Failed to compile rule tables")?;

    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    let names: Vec<&str> = input.lines().collect();
    info!("Cleaning {} names", names.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.group {
        let groups = group_by_canonical(&cleaner, names.iter().copied());
        serde_json::to_writer_pretty(&mut out, &groups)?;
        writeln!(out)?;
        return Ok(());
    }

    let cleaned = clean_names(&cleaner, names.iter().copied());
    match cli.format {
        OutputFormat::Tsv => {
            for name in &cleaned {
                writeln!(out, "{}\t{}", name.raw, name.canonical)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &cleaned)?;
            writeln!(out)?;
        }
    }

    Ok(())
}
