//! Schema type definitions.
//!
//! This module contains the data structures produced by the parser: the
//! document, its type declarations, and their fields.

use std::fmt;

/// Index of a field within its struct declaration.
pub type FieldId = usize;

/// A parsed type dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    /// Target namespace URI, if declared.
    pub target_namespace: Option<String>,
    /// Declarations in schema order.
    pub declarations: Vec<TypeDeclaration>,
}

impl SchemaDocument {
    /// Looks up a declaration by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.declarations.iter().find(|decl| decl.name() == name)
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if the document declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Type declaration variants.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclaration {
    /// Structured type with an ordered field list.
    Struct(StructType),
    /// Enumerated type.
    Enum(EnumType),
    /// Alias of another type.
    Alias(AliasType),
}

impl TypeDeclaration {
    /// Returns the name of the type.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Struct(s) => &s.name,
            Self::Enum(e) => &e.name,
            Self::Alias(a) => &a.name,
        }
    }

    /// Returns the schema documentation, if any.
    #[must_use]
    pub fn documentation(&self) -> Option<&str> {
        match self {
            Self::Struct(s) => s.documentation.as_deref(),
            Self::Enum(e) => e.documentation.as_deref(),
            Self::Alias(a) => a.documentation.as_deref(),
        }
    }

    /// Returns the type references this declaration makes, in order.
    pub fn references(&self) -> impl Iterator<Item = &TypeRef> {
        let (fields, target) = match self {
            Self::Struct(s) => (s.fields.as_slice(), None),
            Self::Enum(_) => (&[][..], None),
            Self::Alias(a) => (&[][..], Some(&a.target)),
        };
        fields.iter().map(|f| &f.type_ref).chain(target)
    }

    /// Returns true if this is a struct declaration.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// Returns true if this is an enum declaration.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }
}

/// Structured type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    /// Type name.
    pub name: String,
    /// Documentation text.
    pub documentation: Option<String>,
    /// Fields in wire order.
    pub fields: Vec<Field>,
}

impl StructType {
    /// Creates a new struct declaration with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            fields: Vec::new(),
        }
    }

    /// Returns the index of the field with the given name.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<FieldId> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A field of a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Referenced type (element type for arrays).
    pub type_ref: TypeRef,
    /// Documentation text.
    pub documentation: Option<String>,
    /// Name of the field holding this array's element count.
    pub length_field: Option<String>,
    /// Mask field and bit controlling this field's presence.
    pub switch: Option<SwitchRef>,
}

impl Field {
    /// Creates a plain field.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            documentation: None,
            length_field: None,
            switch: None,
        }
    }

    /// Returns true if this field is an array.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        self.length_field.is_some()
    }
}

/// Reference from an optional field to its switch mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchRef {
    /// Name of the mask field.
    pub field: String,
    /// Explicit bit index, if declared.
    pub bit: Option<u32>,
}

/// Enumerated type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    /// Type name.
    pub name: String,
    /// Documentation text.
    pub documentation: Option<String>,
    /// Bit width of the backing integer (8, 16, 32 or 64).
    pub width: u32,
    /// Variants in schema order.
    pub variants: Vec<EnumVariant>,
    /// Label that unknown wire values decode to, if declared.
    pub default_variant: Option<String>,
}

impl EnumType {
    /// Creates a new enum declaration with no variants.
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            documentation: None,
            width,
            variants: Vec::new(),
            default_variant: None,
        }
    }

    /// Returns true if `value` fits the backing integer.
    #[must_use]
    pub fn fits(&self, value: i64) -> bool {
        match self.width {
            8 => i8::try_from(value).is_ok(),
            16 => i16::try_from(value).is_ok(),
            32 => i32::try_from(value).is_ok(),
            _ => true,
        }
    }
}

/// A labelled enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Variant label.
    pub label: String,
    /// Wire value.
    pub value: i64,
    /// Documentation text.
    pub documentation: Option<String>,
}

impl EnumVariant {
    /// Creates a new variant.
    #[must_use]
    pub fn new(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value,
            documentation: None,
        }
    }
}

/// Alias type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasType {
    /// Type name.
    pub name: String,
    /// Documentation text.
    pub documentation: Option<String>,
    /// Aliased type.
    pub target: TypeRef,
}

/// A type reference as written in the schema, e.g. `opc:Int32`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Namespace prefix before the colon.
    pub prefix: Option<String>,
    /// Local type name.
    pub name: String,
}

impl TypeRef {
    /// Prefix that addresses the built-in primitive table.
    pub const BUILTIN_PREFIX: &'static str = "opc";

    /// Parses a qualified name.
    #[must_use]
    pub fn parse(qualified: &str) -> Self {
        match qualified.split_once(':') {
            Some((prefix, name)) => Self {
                prefix: Some(prefix.to_string()),
                name: name.to_string(),
            },
            None => Self {
                prefix: None,
                name: qualified.to_string(),
            },
        }
    }

    /// Returns true if the reference addresses the built-in table.
    #[must_use]
    pub fn is_builtin_namespace(&self) -> bool {
        self.prefix.as_deref() == Some(Self::BUILTIN_PREFIX)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_parse() {
        let r = TypeRef::parse("opc:Int32");
        assert_eq!(r.prefix.as_deref(), Some("opc"));
        assert_eq!(r.name, "Int32");
        assert!(r.is_builtin_namespace());
        assert_eq!(r.to_string(), "opc:Int32");

        let r = TypeRef::parse("Foo");
        assert!(r.prefix.is_none());
        assert!(!r.is_builtin_namespace());
        assert_eq!(r.to_string(), "Foo");
    }

    #[test]
    fn test_enum_fits() {
        let e = EnumType::new("Small", 8);
        assert!(e.fits(127));
        assert!(!e.fits(128));
        assert!(e.fits(-128));

        let e = EnumType::new("Wide", 64);
        assert!(e.fits(i64::MAX));
    }

    #[test]
    fn test_declaration_references() {
        let mut s = StructType::new("Foo");
        s.fields.push(Field::new("A", TypeRef::parse("opc:Int32")));
        s.fields.push(Field::new("B", TypeRef::parse("tns:Bar")));
        let decl = TypeDeclaration::Struct(s);
        let names: Vec<_> = decl.references().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Int32", "Bar"]);

        let alias = TypeDeclaration::Alias(AliasType {
            name: "Duration".to_string(),
            documentation: None,
            target: TypeRef::parse("opc:Double"),
        });
        assert_eq!(alias.references().count(), 1);
    }

    #[test]
    fn test_field_index() {
        let mut s = StructType::new("Foo");
        s.fields.push(Field::new("Count", TypeRef::parse("opc:Int32")));
        s.fields.push(Field::new("Items", TypeRef::parse("opc:Int32")));
        assert_eq!(s.field_index("Items"), Some(1));
        assert_eq!(s.field_index("Missing"), None);
    }
}
