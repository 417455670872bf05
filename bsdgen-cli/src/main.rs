//! # bsdgen CLI Entry Point
//!
//! Generates Rust modules from a binary schema type dictionary.

use anyhow::Context;
use bsdgen_codegen::{
    BaseTypes, CodeGenConfig, DEFAULT_BANNER, DEFAULT_LIBRARY, Generator, OutputLayout,
    write_modules,
};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Rust code generator for binary schema (.bsd) type dictionaries.
#[derive(Parser, Debug)]
#[command(name = "bsdgen", version, about)]
struct Cli {
    /// Input type dictionary.
    #[arg(short, long)]
    schema: PathBuf,

    /// Output file, or output directory with `--per-type`.
    #[arg(short, long)]
    output: PathBuf,

    /// Import path of the runtime library.
    #[arg(long, default_value = DEFAULT_LIBRARY)]
    library: String,

    /// Skip declarations listed as base types.
    #[arg(long)]
    base_schema: bool,

    /// File listing base type names, one per line.
    #[arg(long)]
    base_types: Option<PathBuf>,

    /// Write one module per type instead of a single file.
    #[arg(long)]
    per_type: bool,

    /// Banner comment text.
    #[arg(long, default_value = DEFAULT_BANNER)]
    banner: String,
}

impl Cli {
    fn config(&self) -> CodeGenConfig {
        let layout = if self.per_type {
            OutputLayout::PerType
        } else {
            OutputLayout::SingleFile
        };

        CodeGenConfig::new(&self.output)
            .with_library(&self.library)
            .with_banner(&self.banner)
            .with_base_schema_mode(self.base_schema)
            .with_layout(layout)
    }
}

/// Parses a base type list. Blank lines and `#` comments are ignored.
fn parse_base_types(text: &str) -> BaseTypes {
    BaseTypes::new(
        text.lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|name| !name.is_empty()),
    )
}

fn read_base_types(path: &Path) -> anyhow::Result<BaseTypes> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read base types from {}", path.display()))?;
    Ok(parse_base_types(&text))
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let base_types = match &cli.base_types {
        Some(path) => read_base_types(path)?,
        None => BaseTypes::default(),
    };
    if cli.base_schema && base_types.is_empty() {
        tracing::warn!("--base-schema given without base types; nothing will be skipped");
    }

    let generator = Generator::new(cli.config()).with_base_types(base_types);
    let modules = generator
        .generate_file(&cli.schema)
        .with_context(|| format!("failed to generate code from {}", cli.schema.display()))?;
    write_modules(&modules)
        .with_context(|| format!("failed to write output to {}", cli.output.display()))?;

    tracing::info!(
        schema = %cli.schema.display(),
        output = %cli.output.display(),
        files = modules.len(),
        "done"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    run(&cli)
}
