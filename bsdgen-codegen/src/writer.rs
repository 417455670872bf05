//! Assembly of generated module files.

use crate::config::{CodeGenConfig, OutputLayout};
use crate::error::CodegenError;
use crate::naming::field_ident;
use crate::rust::{EmittedKind, EmittedType};
use std::collections::HashSet;
use std::path::PathBuf;

/// Name of the per-type module holding every enum.
const ENUMS_MODULE: &str = "enums";

/// One generated file, fully assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Destination path.
    pub path: PathBuf,
    /// File content.
    pub text: String,
}

/// Assembles emitted types into module texts.
pub struct ModuleWriter<'a> {
    config: &'a CodeGenConfig,
    schema_source: &'a str,
}

impl<'a> ModuleWriter<'a> {
    /// Creates a new module writer.
    #[must_use]
    pub fn new(config: &'a CodeGenConfig, schema_source: &'a str) -> Self {
        Self {
            config,
            schema_source,
        }
    }

    /// Builds every module for the configured layout.
    #[must_use]
    pub fn write(&self, types: &[EmittedType]) -> Vec<GeneratedModule> {
        match self.config.layout {
            OutputLayout::SingleFile => vec![self.single_file(types)],
            OutputLayout::PerType => self.per_type(types),
        }
    }

    fn single_file(&self, types: &[EmittedType]) -> GeneratedModule {
        let mut text = self.header(false);
        for ty in types {
            text.push('\n');
            text.push_str(&ty.code);
        }

        GeneratedModule {
            path: self.config.output_module_path.clone(),
            text,
        }
    }

    fn per_type(&self, types: &[EmittedType]) -> Vec<GeneratedModule> {
        let dir = &self.config.output_module_path;
        let mut modules = Vec::new();
        let mut mod_lines = Vec::new();
        let mut use_lines = Vec::new();
        let mut taken: HashSet<String> = HashSet::from([ENUMS_MODULE.to_string()]);

        let enums: Vec<&EmittedType> = types
            .iter()
            .filter(|t| t.kind == EmittedKind::Enum)
            .collect();
        if !enums.is_empty() {
            let mut text = self.header(false);
            for ty in &enums {
                text.push('\n');
                text.push_str(&ty.code);
            }
            modules.push(GeneratedModule {
                path: dir.join(format!("{ENUMS_MODULE}.rs")),
                text,
            });
            mod_lines.push(format!("mod {ENUMS_MODULE};\n"));
            use_lines.push(format!("pub use {ENUMS_MODULE}::*;\n"));
        }

        for ty in types.iter().filter(|t| t.kind != EmittedKind::Enum) {
            let mut module = field_ident(&ty.ident);
            while !taken.insert(module.clone()) {
                module.push('_');
            }

            let mut text = self.header(true);
            text.push('\n');
            text.push_str(&ty.code);
            modules.push(GeneratedModule {
                path: dir.join(format!("{module}.rs")),
                text,
            });
            mod_lines.push(format!("mod {module};\n"));
            use_lines.push(format!("pub use {module}::{};\n", ty.ident));
        }

        let mut root = self.banner();
        if !mod_lines.is_empty() {
            root.push('\n');
            root.extend(mod_lines);
            root.push('\n');
            root.extend(use_lines);
        }
        modules.insert(
            0,
            GeneratedModule {
                path: dir.join("mod.rs"),
                text: root,
            },
        );

        modules
    }

    /// Banner comment naming the source schema.
    fn banner(&self) -> String {
        let mut text = String::new();
        for line in self.config.banner_text.lines() {
            if line.trim().is_empty() {
                text.push_str("//\n");
            } else {
                text.push_str(&format!("// {}\n", line.trim_end()));
            }
        }
        text.push_str(&format!("// Source: {}\n", self.schema_source));
        text.push_str("// DO NOT EDIT.\n");
        text
    }

    /// Banner plus imports. Sibling modules also import their parent.
    fn header(&self, sibling: bool) -> String {
        let mut text = self.banner();
        text.push('\n');
        text.push_str("#[allow(unused_imports)]\n");
        text.push_str(&format!("use {}::*;\n", self.config.library_import_path));
        if sibling {
            text.push_str("#[allow(unused_imports)]\n");
            text.push_str("use super::*;\n");
        }
        text
    }
}

/// Writes every module to disk, creating parent directories as needed.
///
/// # Errors
/// Returns `CodegenError::Io` on the first failed directory or file write.
pub fn write_modules(modules: &[GeneratedModule]) -> Result<(), CodegenError> {
    for module in modules {
        if let Some(parent) = module.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&module.path, &module.text)?;
        tracing::debug!(
            path = %module.path.display(),
            bytes = module.text.len(),
            "wrote module"
        );
    }

    tracing::info!(files = modules.len(), "modules written");
    Ok(())
}
