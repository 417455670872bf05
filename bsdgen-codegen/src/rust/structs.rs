//! Struct definition and `BinaryEncoder` impl generation.

use crate::error::CodegenError;
use crate::naming::{field_ident, type_ident};
use crate::rust::{push_doc, rust_type};
use bsdgen_schema::{FieldId, FieldRole, ResolvedRef, StructLayout, StructType};
use std::collections::HashMap;

/// Generator for one struct and its encoder impl.
pub struct StructGenerator<'a> {
    def: &'a StructType,
    refs: &'a [ResolvedRef],
    layout: &'a StructLayout,
    idents: Vec<String>,
}

impl<'a> StructGenerator<'a> {
    /// Creates a new struct generator.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if two fields map to the same
    /// identifier or the inputs do not describe the same field list.
    pub fn new(
        def: &'a StructType,
        refs: &'a [ResolvedRef],
        layout: &'a StructLayout,
    ) -> Result<Self, CodegenError> {
        if refs.len() != def.fields.len() || layout.fields.len() != def.fields.len() {
            return Err(CodegenError::generation(format!(
                "struct '{}' has {} fields but {} resolved types and {} layouts",
                def.name,
                def.fields.len(),
                refs.len(),
                layout.fields.len()
            )));
        }

        let idents: Vec<String> = def.fields.iter().map(|f| field_ident(&f.name)).collect();
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (ident, field) in idents.iter().zip(&def.fields) {
            if let Some(previous) = seen.insert(ident.as_str(), field.name.as_str()) {
                return Err(CodegenError::generation(format!(
                    "fields '{}' and '{}' of '{}' both map to identifier '{}'",
                    previous, field.name, def.name, ident
                )));
            }
        }

        Ok(Self {
            def,
            refs,
            layout,
            idents,
        })
    }

    /// Returns the Rust identifier of the struct.
    #[must_use]
    pub fn ident(&self) -> String {
        type_ident(&self.def.name)
    }

    /// Generates the struct definition and its `BinaryEncoder` impl.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = self.generate_struct();
        output.push_str(&format!("impl BinaryEncoder for {} {{\n", self.ident()));
        output.push_str(&self.generate_byte_len());
        output.push('\n');
        output.push_str(&self.generate_encode());
        output.push('\n');
        output.push_str(&self.generate_decode());
        output.push_str("}\n");
        output
    }

    /// Generates the struct definition with its public fields.
    fn generate_struct(&self) -> String {
        let mut output = String::new();

        push_doc(&mut output, self.def.documentation.as_deref(), "");
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");

        if self.layout.public_fields.is_empty() {
            output.push_str(&format!("pub struct {} {{}}\n\n", self.ident()));
            return output;
        }

        output.push_str(&format!("pub struct {} {{\n", self.ident()));
        for &id in &self.layout.public_fields {
            push_doc(
                &mut output,
                self.def.fields[id].documentation.as_deref(),
                "    ",
            );
            output.push_str(&format!(
                "    pub {}: {},\n",
                self.idents[id],
                self.field_type(id)
            ));
        }
        output.push_str("}\n\n");

        output
    }

    fn generate_byte_len(&self) -> String {
        let mut output = String::new();
        output.push_str("    fn byte_len(&self) -> usize {\n");

        if self.layout.is_empty() {
            output.push_str("        0\n");
            output.push_str("    }\n");
            return output;
        }

        output.push_str("        let mut size = 0usize;\n");
        for (id, field_layout) in self.layout.fields.iter().enumerate() {
            let ident = &self.idents[id];
            match &field_layout.role {
                FieldRole::LengthDeterminant { builtin, .. }
                | FieldRole::SwitchMask { builtin, .. } => {
                    output.push_str(&format!(
                        "        size += {};\n",
                        builtin.wire_size().unwrap_or(0)
                    ));
                }
                FieldRole::Plain => {
                    output.push_str(&format!("        size += self.{ident}.byte_len();\n"));
                }
                FieldRole::Array { .. } => {
                    output.push_str(&format!(
                        "        size += self.{ident}.iter().map(BinaryEncoder::byte_len).sum::<usize>();\n"
                    ));
                }
                FieldRole::SwitchControlled { .. } => {
                    output.push_str(&format!(
                        "        size += self.{ident}.as_ref().map_or(0, BinaryEncoder::byte_len);\n"
                    ));
                }
            }
        }
        output.push_str("        size\n");
        output.push_str("    }\n");

        output
    }

    /// Generates `encode`, writing every field in schema order.
    fn generate_encode(&self) -> String {
        let mut output = String::new();

        if self.layout.is_empty() {
            output.push_str(
                "    fn encode<W: std::io::Write>(&self, _stream: &mut W) -> EncodingResult<usize> {\n",
            );
            output.push_str("        Ok(0)\n");
            output.push_str("    }\n");
            return output;
        }

        output.push_str(
            "    fn encode<W: std::io::Write>(&self, stream: &mut W) -> EncodingResult<usize> {\n",
        );
        output.push_str("        let mut size = 0usize;\n");

        for (id, field_layout) in self.layout.fields.iter().enumerate() {
            let ident = &self.idents[id];
            match &field_layout.role {
                FieldRole::LengthDeterminant { array, builtin } => {
                    output.push_str(&format!(
                        "        let {ident}: {} = array_length(&self.{}, {:?})?;\n",
                        builtin.rust_type(),
                        self.idents[*array],
                        self.def.fields[*array].name
                    ));
                    output.push_str(&format!("        size += {ident}.encode(stream)?;\n"));
                }
                FieldRole::SwitchMask { bits, builtin } => {
                    output.push_str(&format!(
                        "        let mut {ident}: {} = 0;\n",
                        builtin.rust_type()
                    ));
                    for (controlled, bit) in bits {
                        output.push_str(&format!(
                            "        if self.{}.is_some() {{\n",
                            self.idents[*controlled]
                        ));
                        output.push_str(&format!("            {ident} |= 1 << {bit};\n"));
                        output.push_str("        }\n");
                    }
                    output.push_str(&format!("        size += {ident}.encode(stream)?;\n"));
                }
                FieldRole::Plain => {
                    output.push_str(&format!("        size += self.{ident}.encode(stream)?;\n"));
                }
                FieldRole::Array { .. } => {
                    output.push_str(&format!(
                        "        size += encode_array(stream, &self.{ident})?;\n"
                    ));
                }
                FieldRole::SwitchControlled { .. } => {
                    output.push_str(&format!("        if let Some(value) = &self.{ident} {{\n"));
                    output.push_str("            size += value.encode(stream)?;\n");
                    output.push_str("        }\n");
                }
            }
        }

        output.push_str("        Ok(size)\n");
        output.push_str("    }\n");
        output
    }

    /// Generates `decode`, reading fields in the same order `encode` wrote them.
    fn generate_decode(&self) -> String {
        let mut output = String::new();

        if self.layout.is_empty() {
            output.push_str(
                "    fn decode<R: std::io::Read>(_stream: &mut R) -> EncodingResult<Self> {\n",
            );
            output.push_str("        Ok(Self {})\n");
            output.push_str("    }\n");
            return output;
        }

        output.push_str(
            "    fn decode<R: std::io::Read>(stream: &mut R) -> EncodingResult<Self> {\n",
        );

        for (id, field_layout) in self.layout.fields.iter().enumerate() {
            let ident = &self.idents[id];
            match &field_layout.role {
                FieldRole::LengthDeterminant { builtin, .. }
                | FieldRole::SwitchMask { builtin, .. } => {
                    output.push_str(&format!(
                        "        let {ident} = {}::decode(stream)?;\n",
                        builtin.rust_type()
                    ));
                }
                FieldRole::Plain => {
                    output.push_str(&format!(
                        "        let {ident} = {}::decode(stream)?;\n",
                        self.element_type(id)
                    ));
                }
                FieldRole::Array { length } => {
                    output.push_str(&format!(
                        "        let {ident}: {} = decode_array(stream, {})?;\n",
                        self.field_type(id),
                        self.idents[*length]
                    ));
                }
                FieldRole::SwitchControlled { mask, bit } => {
                    output.push_str(&format!(
                        "        let {ident} = if {} & (1 << {bit}) != 0 {{\n",
                        self.idents[*mask]
                    ));
                    output.push_str(&format!(
                        "            Some({}::decode(stream)?)\n",
                        self.element_type(id)
                    ));
                    output.push_str("        } else {\n");
                    output.push_str("            None\n");
                    output.push_str("        };\n");
                }
            }
        }

        if self.layout.public_fields.is_empty() {
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str("        Ok(Self {\n");
            for &id in &self.layout.public_fields {
                output.push_str(&format!("            {},\n", self.idents[id]));
            }
            output.push_str("        })\n");
        }
        output.push_str("    }\n");
        output
    }

    /// Returns the element type of a field, without array or option wrapping.
    fn element_type(&self, id: FieldId) -> String {
        rust_type(&self.refs[id])
    }

    /// Returns the type of a field on the public surface.
    fn field_type(&self, id: FieldId) -> String {
        let element = self.element_type(id);
        match self.layout.role(id) {
            FieldRole::Array { .. } => format!("Vec<{element}>"),
            FieldRole::SwitchControlled { .. } => format!("Option<{element}>"),
            _ => element,
        }
    }
}
