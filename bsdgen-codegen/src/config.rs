//! Code generation settings.

use std::path::{Path, PathBuf};

/// Import path of the runtime library generated code targets.
pub const DEFAULT_LIBRARY: &str = "bsdgen_types";

/// Banner written at the top of every generated file.
pub const DEFAULT_BANNER: &str = "Generated by bsdgen.";

/// How generated definitions are split into files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputLayout {
    /// Everything in one file at `output_module_path`.
    #[default]
    SingleFile,
    /// A module directory at `output_module_path` with `mod.rs`, one
    /// `enums.rs` and one file per struct or alias.
    PerType,
}

/// Settings for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenConfig {
    /// Output file (single file) or directory (per type).
    pub output_module_path: PathBuf,
    /// Path imported with a glob by every generated module.
    pub library_import_path: String,
    /// Banner comment text.
    pub banner_text: String,
    /// Suppress declarations the library already provides.
    pub base_schema_mode: bool,
    /// File layout.
    pub layout: OutputLayout,
}

impl CodeGenConfig {
    /// Creates a configuration writing a single file to `output_module_path`.
    #[must_use]
    pub fn new(output_module_path: impl Into<PathBuf>) -> Self {
        Self {
            output_module_path: output_module_path.into(),
            library_import_path: DEFAULT_LIBRARY.to_string(),
            banner_text: DEFAULT_BANNER.to_string(),
            base_schema_mode: false,
            layout: OutputLayout::SingleFile,
        }
    }

    /// Sets the runtime library import path.
    #[must_use]
    pub fn with_library(mut self, path: impl Into<String>) -> Self {
        self.library_import_path = path.into();
        self
    }

    /// Sets the banner text.
    #[must_use]
    pub fn with_banner(mut self, text: impl Into<String>) -> Self {
        self.banner_text = text.into();
        self
    }

    /// Enables or disables base schema mode.
    #[must_use]
    pub fn with_base_schema_mode(mut self, enabled: bool) -> Self {
        self.base_schema_mode = enabled;
        self
    }

    /// Sets the output layout.
    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Returns the output path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output_module_path
    }
}

impl Default for CodeGenConfig {
    fn default() -> Self {
        Self::new("generated.rs")
    }
}
