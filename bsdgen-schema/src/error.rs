//! Error types for schema parsing, resolution and layout planning.

use thiserror::Error;

/// Error type for schema parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute syntax error.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (type, field, variant label, variant value).
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Attribute references a field that the declaration does not have.
    #[error("'{attribute}' on field '{field}' of '{type_name}' names unknown field '{target}'")]
    UnknownField {
        /// Declaring type.
        type_name: String,
        /// Field carrying the attribute.
        field: String,
        /// Attribute name.
        attribute: String,
        /// Referenced field name.
        target: String,
    },

    /// Invalid schema structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Error type for resolution and layout planning.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A type reference matches no declaration, base type or built-in.
    #[error("unresolved reference '{reference}' in field '{field}' of type '{type_name}'")]
    UnresolvedReference {
        /// Referencing type.
        type_name: String,
        /// Referencing field (or `<alias>` for alias targets).
        field: String,
        /// Unresolved name as written.
        reference: String,
    },

    /// Declarations reference each other in a cycle.
    #[error("cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency {
        /// Type names along the cycle, in reference order.
        cycle: Vec<String>,
    },

    /// A struct declares an inconsistent derived-field relationship.
    #[error("layout error in '{type_name}', field '{field}': {reason}")]
    Layout {
        /// Struct name.
        type_name: String,
        /// Offending field.
        field: String,
        /// What is inconsistent.
        reason: String,
    },
}

/// Renders a cycle as `A -> B -> A`.
fn format_cycle(cycle: &[String]) -> String {
    let mut path = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        path.push_str(" -> ");
        path.push_str(first);
    }
    path
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl SchemaError {
    /// Creates a layout error.
    pub fn layout(
        type_name: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Layout {
            type_name: type_name.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}
