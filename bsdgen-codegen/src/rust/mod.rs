//! Rust code generation modules.

pub mod aliases;
pub mod enums;
pub mod structs;

pub use aliases::AliasGenerator;
pub use enums::EnumGenerator;
pub use structs::StructGenerator;

use crate::naming::type_ident;
use bsdgen_schema::ResolvedRef;

/// Kind of an emitted definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmittedKind {
    /// Struct with a `BinaryEncoder` impl.
    Struct,
    /// Closed enum with a `BinaryEncoder` impl.
    Enum,
    /// Type alias.
    Alias,
}

/// Rendered text of one schema type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedType {
    /// Rust identifier of the type.
    pub ident: String,
    /// Kind of definition.
    pub kind: EmittedKind,
    /// Rendered Rust source.
    pub code: String,
}

/// Returns the Rust type a resolved reference renders as.
#[must_use]
pub fn rust_type(target: &ResolvedRef) -> String {
    match target {
        ResolvedRef::Builtin(builtin) => builtin.rust_type().to_string(),
        ResolvedRef::Declared(name) | ResolvedRef::Base(name) => type_ident(name),
    }
}

/// Renders documentation as `///` lines at the given indent.
pub(crate) fn push_doc(output: &mut String, documentation: Option<&str>, indent: &str) {
    let Some(documentation) = documentation else {
        return;
    };
    for line in documentation.lines() {
        let line = line.trim();
        if line.is_empty() {
            output.push_str(&format!("{indent}///\n"));
        } else {
            output.push_str(&format!("{indent}/// {line}\n"));
        }
    }
}
