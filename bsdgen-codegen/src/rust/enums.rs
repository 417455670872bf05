//! Enum code generation.

use crate::error::CodegenError;
use crate::naming::type_ident;
use crate::rust::push_doc;
use bsdgen_schema::EnumType;
use std::collections::HashMap;

/// Generator for one closed enum and its encoder impl.
pub struct EnumGenerator<'a> {
    def: &'a EnumType,
    variants: Vec<String>,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two labels map to the same
    /// variant identifier.
    pub fn new(def: &'a EnumType) -> Result<Self, CodegenError> {
        let variants: Vec<String> = def.variants.iter().map(|v| type_ident(&v.label)).collect();

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (ident, variant) in variants.iter().zip(&def.variants) {
            if let Some(previous) = seen.insert(ident.as_str(), variant.label.as_str()) {
                return Err(CodegenError::generation(format!(
                    "labels '{}' and '{}' of '{}' both map to variant '{}'",
                    previous, variant.label, def.name, ident
                )));
            }
        }

        Ok(Self { def, variants })
    }

    /// Returns the Rust identifier of the enum.
    #[must_use]
    pub fn ident(&self) -> String {
        type_ident(&self.def.name)
    }

    /// Returns the backing integer type.
    fn repr(&self) -> &'static str {
        match self.def.width {
            8 => "i8",
            16 => "i16",
            64 => "i64",
            _ => "i32",
        }
    }

    /// Returns the identifier of the default variant, if declared.
    fn default_variant(&self) -> Option<&str> {
        let label = self.def.default_variant.as_deref()?;
        self.def
            .variants
            .iter()
            .position(|v| v.label == label)
            .map(|i| self.variants[i].as_str())
    }

    /// Generates the enum, its value conversions and its `BinaryEncoder` impl.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();
        let name = self.ident();
        let repr = self.repr();

        push_doc(&mut output, self.def.documentation.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        output.push_str(&format!("#[repr({repr})]\n"));
        output.push_str(&format!("pub enum {name} {{\n"));
        for (variant, ident) in self.def.variants.iter().zip(&self.variants) {
            push_doc(&mut output, variant.documentation.as_deref(), "    ");
            output.push_str(&format!("    {ident} = {},\n", variant.value));
        }
        output.push_str("}\n\n");

        output.push_str(&format!("impl {name} {{\n"));
        output.push_str("    /// Returns the wire value.\n");
        output.push_str("    #[must_use]\n");
        output.push_str(&format!("    pub const fn value(self) -> {repr} {{\n"));
        output.push_str(&format!("        self as {repr}\n"));
        output.push_str("    }\n\n");

        output.push_str("    /// Maps a wire value to its variant.\n");
        if self.default_variant().is_none() {
            output.push_str("    ///\n");
            output.push_str("    /// # Errors\n");
            output.push_str(
                "    /// Returns `EncodingError::UnknownVariant` for an undeclared value.\n",
            );
        }
        output.push_str(&format!(
            "    pub fn from_value(value: {repr}) -> EncodingResult<Self> {{\n"
        ));
        output.push_str("        match value {\n");
        for (variant, ident) in self.def.variants.iter().zip(&self.variants) {
            output.push_str(&format!(
                "            {} => Ok(Self::{ident}),\n",
                variant.value
            ));
        }
        match self.default_variant() {
            Some(default) => {
                output.push_str(&format!("            _ => Ok(Self::{default}),\n"));
            }
            None => {
                output.push_str(&format!(
                    "            _ => Err(EncodingError::unknown_variant({:?}, value)),\n",
                    self.def.name
                ));
            }
        }
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");

        if let Some(default) = self.default_variant() {
            output.push_str(&format!("impl Default for {name} {{\n"));
            output.push_str("    fn default() -> Self {\n");
            output.push_str(&format!("        Self::{default}\n"));
            output.push_str("    }\n");
            output.push_str("}\n\n");
        }

        output.push_str(&format!("impl BinaryEncoder for {name} {{\n"));
        output.push_str("    fn byte_len(&self) -> usize {\n");
        output.push_str(&format!("        {}\n", self.def.width / 8));
        output.push_str("    }\n\n");
        output.push_str(
            "    fn encode<W: std::io::Write>(&self, stream: &mut W) -> EncodingResult<usize> {\n",
        );
        output.push_str("        self.value().encode(stream)\n");
        output.push_str("    }\n\n");
        output.push_str(
            "    fn decode<R: std::io::Read>(stream: &mut R) -> EncodingResult<Self> {\n",
        );
        output.push_str(&format!(
            "        Self::from_value({repr}::decode(stream)?)\n"
        ));
        output.push_str("    }\n");
        output.push_str("}\n");

        output
    }
}
