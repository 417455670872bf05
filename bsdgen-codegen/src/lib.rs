//! # bsdgen Codegen
//!
//! Code generation from binary schema type dictionaries.
//!
//! This crate provides:
//! - Rust struct, enum and alias generation with `BinaryEncoder` impls
//! - Single-file and per-type module layouts
//! - Parallel rendering with deterministic output
//! - Build script integration

pub mod config;
pub mod error;
pub mod generator;
pub mod naming;
pub mod rust;
pub mod writer;

pub use bsdgen_schema::BaseTypes;
pub use config::{CodeGenConfig, DEFAULT_BANNER, DEFAULT_LIBRARY, OutputLayout};
pub use error::CodegenError;
pub use generator::Generator;
pub use writer::{GeneratedModule, ModuleWriter, write_modules};

/// Generates Rust code from a type dictionary string.
///
/// Uses the default configuration and writes everything into one module.
///
/// # Arguments
/// * `xml` - Type dictionary content
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution or generation fails.
pub fn generate_from_xml(xml: &str) -> Result<String, CodegenError> {
    Generator::default()
        .generate(xml, "<inline>")?
        .into_iter()
        .next()
        .map(|module| module.text)
        .ok_or_else(|| CodegenError::generation("no module produced"))
}

/// Generates Rust code from a type dictionary file and writes it out.
///
/// # Arguments
/// * `path` - Path to the type dictionary
/// * `config` - Generation settings, including the output location
///
/// # Returns
/// The modules that were written.
///
/// # Errors
/// Returns `CodegenError` if reading, generation or writing fails. Nothing
/// is written if generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &CodeGenConfig,
) -> Result<Vec<GeneratedModule>, CodegenError> {
    let modules = Generator::new(config.clone()).generate_file(path)?;
    write_modules(&modules)?;
    Ok(modules)
}
