//! Generation pipeline.
//!
//! Parses a type dictionary, resolves and orders it, plans struct layouts,
//! renders every type in parallel and hands the results to the
//! [`ModuleWriter`]. Nothing is written to disk here; see
//! [`crate::writer::write_modules`].

use crate::config::CodeGenConfig;
use crate::error::CodegenError;
use crate::rust::{AliasGenerator, EmittedKind, EmittedType, EnumGenerator, StructGenerator};
use crate::writer::{GeneratedModule, ModuleWriter};
use bsdgen_schema::{
    BaseTypes, BuiltinType, ResolvedSchema, ResolvedType, StructLayout, TypeDeclaration,
    parse_schema, plan, resolve,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Code generator for one configuration.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: CodeGenConfig,
    base_types: BaseTypes,
}

impl Generator {
    /// Creates a new generator.
    #[must_use]
    pub fn new(config: CodeGenConfig) -> Self {
        Self {
            config,
            base_types: BaseTypes::default(),
        }
    }

    /// Sets the names the target library already provides.
    #[must_use]
    pub fn with_base_types(mut self, base_types: BaseTypes) -> Self {
        self.base_types = base_types;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CodeGenConfig {
        &self.config
    }

    /// Generates module texts from schema content.
    ///
    /// # Arguments
    /// * `xml` - Type dictionary content
    /// * `schema_source` - Label of the schema, written into the banner
    ///
    /// # Errors
    /// Returns `CodegenError` if the schema is invalid or a type cannot be
    /// rendered. No module is produced on error.
    pub fn generate(
        &self,
        xml: &str,
        schema_source: &str,
    ) -> Result<Vec<GeneratedModule>, CodegenError> {
        let document = parse_schema(xml)?;
        tracing::debug!(declarations = document.len(), "parsed schema");

        let schema = resolve(&document, &self.base_types, self.config.base_schema_mode)?;
        let layouts = plan(&schema)?;
        tracing::debug!(types = schema.types.len(), "planned layouts");

        let emitted = self.emit(&schema, &layouts)?;
        let modules = ModuleWriter::new(&self.config, schema_source).write(&emitted);

        tracing::info!(
            source = schema_source,
            types = emitted.len(),
            modules = modules.len(),
            "generated code"
        );
        Ok(modules)
    }

    /// Generates module texts from a schema file.
    ///
    /// # Errors
    /// Returns `CodegenError` if reading the file or generation fails.
    pub fn generate_file(&self, path: &Path) -> Result<Vec<GeneratedModule>, CodegenError> {
        let xml = std::fs::read_to_string(path)?;
        self.generate(&xml, &path.display().to_string())
    }

    /// Renders every emitted type, in emission order.
    ///
    /// Types are rendered in parallel; the result keeps the order of
    /// `schema.types` with skipped types left out.
    ///
    /// # Errors
    /// Returns a `CodegenError` if any type fails to render. Which one is
    /// reported is unspecified when several fail.
    pub fn emit(
        &self,
        schema: &ResolvedSchema,
        layouts: &[Option<StructLayout>],
    ) -> Result<Vec<EmittedType>, CodegenError> {
        let pending: Vec<(&ResolvedType, Option<&StructLayout>)> = schema
            .types
            .iter()
            .zip(layouts.iter().map(Option::as_ref).chain(std::iter::repeat(None)))
            .filter(|(resolved, _)| !resolved.skipped)
            .collect();

        let emitted: Vec<EmittedType> = pending
            .par_iter()
            .map(|(resolved, layout)| emit_type(resolved, *layout))
            .collect::<Result<_, _>>()?;

        check_unique_idents(&emitted)?;
        Ok(emitted)
    }
}

/// Renders one resolved type.
fn emit_type(
    resolved: &ResolvedType,
    layout: Option<&StructLayout>,
) -> Result<EmittedType, CodegenError> {
    let emitted = match &resolved.declaration {
        TypeDeclaration::Struct(def) => {
            let layout = layout.ok_or_else(|| {
                CodegenError::generation(format!("no layout planned for struct '{}'", def.name))
            })?;
            let generator = StructGenerator::new(def, &resolved.field_refs, layout)?;
            EmittedType {
                ident: generator.ident(),
                kind: EmittedKind::Struct,
                code: generator.generate(),
            }
        }
        TypeDeclaration::Enum(def) => {
            let generator = EnumGenerator::new(def)?;
            EmittedType {
                ident: generator.ident(),
                kind: EmittedKind::Enum,
                code: generator.generate(),
            }
        }
        TypeDeclaration::Alias(def) => {
            let target = resolved.field_refs.first().ok_or_else(|| {
                CodegenError::generation(format!("alias '{}' has no resolved target", def.name))
            })?;
            let generator = AliasGenerator::new(def, target);
            if generator.ident() == crate::rust::rust_type(target) {
                return Err(CodegenError::generation(format!(
                    "alias '{}' would refer to itself; list it as a base type instead",
                    def.name
                )));
            }
            EmittedType {
                ident: generator.ident(),
                kind: EmittedKind::Alias,
                code: generator.generate(),
            }
        }
    };

    tracing::debug!(type_name = resolved.name(), ident = %emitted.ident, "emitted type");
    Ok(emitted)
}

/// Names the generated code takes from the runtime library or the prelude
/// besides the built-in types.
const RESERVED_IDENTS: &[&str] = &[
    "ArrayLength",
    "BinaryEncoder",
    "EncodingError",
    "EncodingResult",
    "Identifier",
    "Default",
    "Option",
    "Vec",
];

/// Rejects emitted types whose identifiers clash with each other, with a
/// built-in's Rust type, or with a name the generated code imports.
fn check_unique_idents(emitted: &[EmittedType]) -> Result<(), CodegenError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for (index, ty) in emitted.iter().enumerate() {
        if BuiltinType::ALL.iter().any(|b| b.rust_type() == ty.ident) {
            return Err(CodegenError::generation(format!(
                "type '{}' collides with a built-in type; list it as a base type instead",
                ty.ident
            )));
        }
        if RESERVED_IDENTS.contains(&ty.ident.as_str()) {
            return Err(CodegenError::generation(format!(
                "type '{}' collides with a name used by generated code",
                ty.ident
            )));
        }
        if seen.insert(ty.ident.as_str(), index).is_some() {
            return Err(CodegenError::generation(format!(
                "two schema types map to identifier '{}'",
                ty.ident
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/"
                    xmlns:tns="urn:test" TargetNamespace="urn:test">
  <opc:StructuredType Name="Envelope">
    <opc:Field Name="Header" TypeName="tns:Header" />
    <opc:Field Name="Class" TypeName="tns:NodeClass" />
  </opc:StructuredType>
  <opc:StructuredType Name="Header">
    <opc:Field Name="Id" TypeName="opc:UInt32" />
  </opc:StructuredType>
  <opc:EnumeratedType Name="NodeClass" LengthInBits="32">
    <opc:EnumeratedValue Name="Object" Value="1" />
  </opc:EnumeratedType>
  <opc:AliasType Name="Counter" TypeName="opc:UInt32" />
</opc:TypeDictionary>"#;

    fn emit(
        xml: &str,
        base: BaseTypes,
        base_schema_mode: bool,
    ) -> Result<Vec<EmittedType>, CodegenError> {
        let config = CodeGenConfig::default().with_base_schema_mode(base_schema_mode);
        let generator = Generator::new(config).with_base_types(base);
        let document = parse_schema(xml)?;
        let schema = resolve(&document, &generator.base_types, base_schema_mode)?;
        let layouts = plan(&schema)?;
        generator.emit(&schema, &layouts)
    }

    #[test]
    fn test_emission_order() {
        let emitted = emit(SCHEMA, BaseTypes::default(), false).expect("Failed to emit");
        let idents: Vec<_> = emitted.iter().map(|t| t.ident.as_str()).collect();
        assert_eq!(idents, ["Header", "NodeClass", "Envelope", "Counter"]);
        assert_eq!(emitted[1].kind, EmittedKind::Enum);
        assert_eq!(emitted[3].kind, EmittedKind::Alias);
    }

    #[test]
    fn test_base_schema_mode_suppresses_base_types() {
        let emitted = emit(SCHEMA, BaseTypes::new(["Header"]), true).expect("Failed to emit");
        let idents: Vec<_> = emitted.iter().map(|t| t.ident.as_str()).collect();
        assert_eq!(idents, ["NodeClass", "Envelope", "Counter"]);
        assert!(emitted[1].code.contains("pub header: Header,"));
    }

    #[test]
    fn test_deterministic_output() {
        let generator = Generator::new(CodeGenConfig::default());
        let first = generator.generate(SCHEMA, "test.bsd").expect("Failed to generate");
        let second = generator.generate(SCHEMA, "test.bsd").expect("Failed to generate");
        assert_eq!(first, second);
    }

    #[test]
    fn test_builtin_collision_rejected() {
        let xml = r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/">
  <opc:StructuredType Name="Guid"><opc:Field Name="Data1" TypeName="opc:UInt32" /></opc:StructuredType>
</opc:TypeDictionary>"#;
        let err = emit(xml, BaseTypes::default(), false).unwrap_err();
        assert!(matches!(err, CodegenError::Generation { .. }));

        let emitted = emit(xml, BaseTypes::new(["Guid"]), true).expect("Failed to emit");
        assert!(emitted.is_empty());
    }

    #[test]
    fn test_type_ident_clash_rejected() {
        let xml = r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/">
  <opc:StructuredType Name="node_id_list" />
  <opc:StructuredType Name="NodeIdList" />
</opc:TypeDictionary>"#;
        assert!(matches!(
            emit(xml, BaseTypes::default(), false),
            Err(CodegenError::Generation { .. })
        ));
    }

    #[test]
    fn test_errors_surface_before_output() {
        let xml = r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/" xmlns:tns="urn:t">
  <opc:StructuredType Name="A"><opc:Field Name="B" TypeName="tns:B" /></opc:StructuredType>
  <opc:StructuredType Name="B"><opc:Field Name="A" TypeName="tns:A" /></opc:StructuredType>
</opc:TypeDictionary>"#;
        let result = Generator::default().generate(xml, "cycle.bsd");
        assert!(matches!(result, Err(CodegenError::Schema(_))));
    }

    #[test]
    fn test_library_name_collision_rejected() {
        for name in ["EncodingResult", "BinaryEncoder", "Identifier", "Option"] {
            let xml = format!(
                r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/">
  <opc:StructuredType Name="{name}"><opc:Field Name="Id" TypeName="opc:UInt32" /></opc:StructuredType>
</opc:TypeDictionary>"#
            );
            let err = emit(&xml, BaseTypes::default(), false).unwrap_err();
            assert!(
                matches!(err, CodegenError::Generation { .. }),
                "{name} was accepted"
            );
        }

        let xml = r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/">
  <opc:EnumeratedType Name="EncodingError" LengthInBits="8">
    <opc:EnumeratedValue Name="None" Value="0" />
  </opc:EnumeratedType>
</opc:TypeDictionary>"#;
        let emitted = emit(xml, BaseTypes::new(["EncodingError"]), true).expect("Failed to emit");
        assert!(emitted.is_empty());
    }
}
