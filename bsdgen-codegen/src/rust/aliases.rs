//! Type alias generation.

use crate::naming::type_ident;
use crate::rust::{push_doc, rust_type};
use bsdgen_schema::{AliasType, ResolvedRef};

/// Generator for a type alias.
pub struct AliasGenerator<'a> {
    def: &'a AliasType,
    target: &'a ResolvedRef,
}

impl<'a> AliasGenerator<'a> {
    /// Creates a new alias generator.
    #[must_use]
    pub fn new(def: &'a AliasType, target: &'a ResolvedRef) -> Self {
        Self { def, target }
    }

    /// Returns the Rust identifier of the alias.
    #[must_use]
    pub fn ident(&self) -> String {
        type_ident(&self.def.name)
    }

    /// Generates the alias definition.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        push_doc(&mut output, self.def.documentation.as_deref(), "");
        output.push_str(&format!(
            "pub type {} = {};\n",
            self.ident(),
            rust_type(self.target)
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsdgen_schema::{BuiltinType, TypeRef};

    #[test]
    fn test_generate_alias() {
        let def = AliasType {
            name: "Duration".to_string(),
            documentation: Some("Milliseconds.".to_string()),
            target: TypeRef::parse("opc:Double"),
        };
        let target = ResolvedRef::Builtin(BuiltinType::Double);
        let code = AliasGenerator::new(&def, &target).generate();
        assert_eq!(code, "/// Milliseconds.\npub type Duration = f64;\n");
    }

    #[test]
    fn test_alias_of_declared_type() {
        let def = AliasType {
            name: "image_data".to_string(),
            documentation: None,
            target: TypeRef::parse("tns:RawBytes"),
        };
        let target = ResolvedRef::Declared("RawBytes".to_string());
        let code = AliasGenerator::new(&def, &target).generate();
        assert_eq!(code, "pub type ImageData = RawBytes;\n");
    }
}
