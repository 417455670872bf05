//! Generates the demo types into `OUT_DIR` at build time, once as a single
//! module and once as a per-type module directory.

use bsdgen_codegen::{CodeGenConfig, Generator, OutputLayout, write_modules};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let schema = PathBuf::from("schemas/demo.bsd.xml");
    println!("cargo:rerun-if-changed={}", schema.display());

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    let configs = [
        CodeGenConfig::new(out_dir.join("generated.rs")),
        CodeGenConfig::new(out_dir.join("types")).with_layout(OutputLayout::PerType),
    ];

    for config in configs {
        let modules = Generator::new(config).generate_file(&schema)?;
        write_modules(&modules)?;
    }

    Ok(())
}
