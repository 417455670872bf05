//! Binary schema XML parser.
//!
//! This module turns a type dictionary document into a [`SchemaDocument`].
//! Element names are matched on their local part, so `opc:StructuredType`
//! and `StructuredType` are equivalent.

use crate::error::ParseError;
use crate::types::{
    AliasType, EnumType, EnumVariant, Field, SchemaDocument, StructType, SwitchRef,
    TypeDeclaration, TypeRef,
};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashSet;

/// Enum width used when `LengthInBits` is absent.
const DEFAULT_ENUM_WIDTH: u32 = 32;

/// Parses a binary schema from a string.
///
/// # Arguments
/// * `xml` - Type dictionary content
///
/// # Returns
/// Parsed document or parse error. No partial document is ever returned.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or a declaration is
/// incomplete or inconsistent.
pub fn parse_schema(xml: &str) -> Result<SchemaDocument, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut document: Option<SchemaDocument> = None;
    let mut names = HashSet::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = local_name(e)?;
                if name == "TypeDictionary" {
                    document = Some(parse_dictionary(e)?);
                } else if let Some(doc) = document.as_mut() {
                    if let Some(decl) = parse_declaration(&mut reader, e, &name, false)? {
                        push_declaration(doc, &mut names, decl)?;
                    }
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = local_name(e)?;
                if name == "TypeDictionary" {
                    document = Some(parse_dictionary(e)?);
                } else if let Some(doc) = document.as_mut() {
                    if let Some(decl) = parse_declaration(&mut reader, e, &name, true)? {
                        push_declaration(doc, &mut names, decl)?;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    let document = document.ok_or_else(|| ParseError::InvalidStructure {
        message: "missing TypeDictionary root element".to_string(),
    })?;

    tracing::debug!(
        declarations = document.declarations.len(),
        "parsed type dictionary"
    );
    Ok(document)
}

/// Adds a declaration, rejecting duplicate names.
fn push_declaration(
    document: &mut SchemaDocument,
    names: &mut HashSet<String>,
    declaration: TypeDeclaration,
) -> Result<(), ParseError> {
    if !names.insert(declaration.name().to_string()) {
        return Err(ParseError::duplicate("type", declaration.name()));
    }
    document.declarations.push(declaration);
    Ok(())
}

/// Dispatches on a top-level element. Unknown elements are skipped.
fn parse_declaration(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    name: &str,
    empty: bool,
) -> Result<Option<TypeDeclaration>, ParseError> {
    let declaration = match name {
        "StructuredType" => TypeDeclaration::Struct(parse_struct(reader, e, empty)?),
        "EnumeratedType" => TypeDeclaration::Enum(parse_enum(reader, e, empty)?),
        "AliasType" | "OpaqueType" => TypeDeclaration::Alias(parse_alias(reader, e, name, empty)?),
        _ => {
            if !empty {
                skip_element(reader, e)?;
            }
            return Ok(None);
        }
    };
    Ok(Some(declaration))
}

/// Parses the TypeDictionary element attributes.
fn parse_dictionary(e: &BytesStart<'_>) -> Result<SchemaDocument, ParseError> {
    let mut document = SchemaDocument::default();

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "TargetNamespace" => document.target_namespace = Some(value),
            "DefaultByteOrder" if value != "LittleEndian" => {
                return Err(ParseError::invalid_attr(
                    "TypeDictionary",
                    "DefaultByteOrder",
                    value,
                ));
            }
            _ => {}
        }
    }

    Ok(document)
}

/// Parses a structured type declaration.
fn parse_struct(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<StructType, ParseError> {
    let name = required_name(e, "StructuredType")?;
    let mut declaration = StructType::new(name);

    if !empty {
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match local_name(e)?.as_str() {
                    "Documentation" => declaration.documentation = read_text(reader)?,
                    "Field" => {
                        let mut field = parse_field(e, &declaration.name)?;
                        field.documentation = read_child_documentation(reader)?;
                        declaration.fields.push(field);
                    }
                    _ => skip_element(reader, e)?,
                },
                Ok(Event::Empty(ref e)) => {
                    if local_name(e)? == "Field" {
                        declaration.fields.push(parse_field(e, &declaration.name)?);
                    }
                }
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => return Err(unexpected_eof("StructuredType")),
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    validate_struct(&declaration)?;
    Ok(declaration)
}

/// Parses a field element's attributes.
fn parse_field(e: &BytesStart<'_>, type_name: &str) -> Result<Field, ParseError> {
    let mut name = None;
    let mut type_ref = None;
    let mut length_field = None;
    let mut switch_field = None;
    let mut switch_bit = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "Name" => name = Some(value),
            "TypeName" => type_ref = Some(TypeRef::parse(&value)),
            "LengthField" => length_field = Some(value),
            "SwitchField" => switch_field = Some(value),
            "SwitchBit" => {
                switch_bit = Some(
                    value
                        .parse::<u32>()
                        .map_err(|_| ParseError::invalid_attr("Field", "SwitchBit", &value))?,
                )
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseError::missing_attr(format!("{type_name}.Field"), "Name"))?;
    let type_ref = type_ref
        .filter(|t| !t.name.is_empty())
        .ok_or_else(|| ParseError::missing_attr(format!("{type_name}.{name}"), "TypeName"))?;

    if switch_bit.is_some() && switch_field.is_none() {
        return Err(ParseError::missing_attr(
            format!("{type_name}.{name}"),
            "SwitchField",
        ));
    }

    let mut field = Field::new(name, type_ref);
    field.length_field = length_field;
    field.switch = switch_field.map(|field| SwitchRef {
        field,
        bit: switch_bit,
    });

    Ok(field)
}

/// Checks field name uniqueness and that length/switch attributes name
/// fields of the same struct.
fn validate_struct(declaration: &StructType) -> Result<(), ParseError> {
    let mut seen = HashSet::new();
    for field in &declaration.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(ParseError::duplicate(
                "field",
                format!("{}.{}", declaration.name, field.name),
            ));
        }
    }

    for field in &declaration.fields {
        let references = [
            ("LengthField", field.length_field.as_deref()),
            ("SwitchField", field.switch.as_ref().map(|s| s.field.as_str())),
        ];
        for (attribute, target) in references {
            if let Some(target) = target
                && !seen.contains(target)
            {
                return Err(ParseError::UnknownField {
                    type_name: declaration.name.clone(),
                    field: field.name.clone(),
                    attribute: attribute.to_string(),
                    target: target.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Parses an enumerated type declaration.
fn parse_enum(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    empty: bool,
) -> Result<EnumType, ParseError> {
    let name = required_name(e, "EnumeratedType")?;
    let mut width = DEFAULT_ENUM_WIDTH;
    let mut default_variant = None;

    for (key, value) in attributes(e)? {
        match key.as_str() {
            "LengthInBits" => {
                width = match value.parse::<u32>() {
                    Ok(bits @ (8 | 16 | 32 | 64)) => bits,
                    _ => {
                        return Err(ParseError::invalid_attr(
                            "EnumeratedType",
                            "LengthInBits",
                            value,
                        ));
                    }
                }
            }
            "DefaultVariant" => default_variant = Some(value),
            _ => {}
        }
    }

    let mut enum_def = EnumType::new(name, width);
    enum_def.default_variant = default_variant;

    if !empty {
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match local_name(e)?.as_str() {
                    "Documentation" => enum_def.documentation = read_text(reader)?,
                    "EnumeratedValue" => {
                        let mut variant = parse_enum_value(e, &enum_def)?;
                        variant.documentation = read_child_documentation(reader)?;
                        enum_def.variants.push(variant);
                    }
                    _ => skip_element(reader, e)?,
                },
                Ok(Event::Empty(ref e)) => {
                    if local_name(e)? == "EnumeratedValue" {
                        let variant = parse_enum_value(e, &enum_def)?;
                        enum_def.variants.push(variant);
                    }
                }
                Ok(Event::End(_)) => break,
                Ok(Event::Eof) => return Err(unexpected_eof("EnumeratedType")),
                Err(e) => return Err(ParseError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }
    }

    validate_enum(&enum_def)?;
    Ok(enum_def)
}

/// Parses an enum value element's attributes.
fn parse_enum_value(e: &BytesStart<'_>, enum_def: &EnumType) -> Result<EnumVariant, ParseError> {
    let mut label = None;
    let mut value = None;

    for (key, raw) in attributes(e)? {
        match key.as_str() {
            "Name" => label = Some(raw),
            "Value" => {
                let parsed = raw
                    .parse::<i64>()
                    .ok()
                    .filter(|v| enum_def.fits(*v))
                    .ok_or_else(|| {
                        ParseError::invalid_attr(
                            format!("{}.EnumeratedValue", enum_def.name),
                            "Value",
                            &raw,
                        )
                    })?;
                value = Some(parsed);
            }
            _ => {}
        }
    }

    let label = label.filter(|l| !l.is_empty()).ok_or_else(|| {
        ParseError::missing_attr(format!("{}.EnumeratedValue", enum_def.name), "Name")
    })?;
    let value = value.ok_or_else(|| {
        ParseError::missing_attr(format!("{}.{}", enum_def.name, label), "Value")
    })?;

    Ok(EnumVariant::new(label, value))
}

/// Checks that an enum has variants with unique labels and values.
fn validate_enum(enum_def: &EnumType) -> Result<(), ParseError> {
    if enum_def.variants.is_empty() {
        return Err(ParseError::InvalidStructure {
            message: format!("enum '{}' declares no values", enum_def.name),
        });
    }

    let mut labels = HashSet::new();
    let mut values = HashSet::new();

    for variant in &enum_def.variants {
        if !labels.insert(variant.label.as_str()) {
            return Err(ParseError::duplicate(
                "variant label",
                format!("{}.{}", enum_def.name, variant.label),
            ));
        }
        if !values.insert(variant.value) {
            return Err(ParseError::duplicate(
                "variant value",
                format!("{}.{} = {}", enum_def.name, variant.label, variant.value),
            ));
        }
    }

    if let Some(default) = &enum_def.default_variant
        && !labels.contains(default.as_str())
    {
        return Err(ParseError::invalid_attr(
            enum_def.name.clone(),
            "DefaultVariant",
            default.clone(),
        ));
    }

    Ok(())
}

/// Parses an alias or opaque type declaration.
///
/// An opaque type has no `TypeName` and aliases the byte string built-in.
fn parse_alias(
    reader: &mut Reader<&[u8]>,
    e: &BytesStart<'_>,
    element: &str,
    empty: bool,
) -> Result<AliasType, ParseError> {
    let name = required_name(e, element)?;
    let mut target = None;

    for (key, value) in attributes(e)? {
        if key == "TypeName" {
            target = Some(TypeRef::parse(&value));
        }
    }

    let target = match (element, target) {
        (_, Some(target)) if !target.name.is_empty() => target,
        ("OpaqueType", None) => TypeRef::parse("opc:ByteString"),
        _ => return Err(ParseError::missing_attr(name, "TypeName")),
    };

    let documentation = if empty {
        None
    } else {
        read_child_documentation(reader)?
    };

    Ok(AliasType {
        name,
        documentation,
        target,
    })
}

/// Reads the required, non-empty `Name` attribute.
fn required_name(e: &BytesStart<'_>, element: &str) -> Result<String, ParseError> {
    attributes(e)?
        .into_iter()
        .find(|(key, _)| key == "Name")
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ParseError::missing_attr(element, "Name"))
}

/// Collects attributes as (local name, value) pairs.
fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, ParseError> {
    let mut pairs = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.local_name().as_ref())?.to_string();
        let value = attr.unescape_value()?.into_owned();
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Returns the element's local name.
fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    Ok(std::str::from_utf8(e.local_name().as_ref())?.to_string())
}

/// Reads the text content up to the current element's end tag.
///
/// Entity and character references are resolved in place. Returns `None`
/// when the element holds no text.
fn read_text(reader: &mut Reader<&[u8]>) -> Result<Option<String>, ParseError> {
    reader.config_mut().trim_text(false);
    let text = collect_text(reader);
    reader.config_mut().trim_text(true);

    let text = text?;
    let text = text.trim();
    Ok(if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    })
}

fn collect_text(reader: &mut Reader<&[u8]>) -> Result<String, ParseError> {
    let mut buf = Vec::new();
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(ref t)) => {
                text.push_str(&t.xml_content().map_err(quick_xml::Error::from)?);
            }
            Ok(Event::CData(ref t)) => {
                text.push_str(&t.xml_content().map_err(quick_xml::Error::from)?);
            }
            Ok(Event::GeneralRef(ref r)) => {
                if let Some(ch) = r.resolve_char_ref()? {
                    text.push(ch);
                } else {
                    let name = r.decode().map_err(quick_xml::Error::from)?;
                    let resolved = resolve_predefined_entity(&name).ok_or_else(|| {
                        ParseError::InvalidStructure {
                            message: format!("unknown entity '&{name};' in documentation"),
                        }
                    })?;
                    text.push_str(resolved);
                }
            }
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Err(unexpected_eof("Documentation")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

/// Consumes the children of a non-empty element, keeping its documentation.
fn read_child_documentation(reader: &mut Reader<&[u8]>) -> Result<Option<String>, ParseError> {
    let mut buf = Vec::new();
    let mut documentation = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if local_name(e)? == "Documentation" {
                    documentation = read_text(reader)?;
                } else {
                    skip_element(reader, e)?;
                }
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => return Err(unexpected_eof("element")),
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(documentation)
}

/// Skips an element and all of its children.
fn skip_element(reader: &mut Reader<&[u8]>, e: &BytesStart<'_>) -> Result<(), ParseError> {
    let mut buf = Vec::new();
    reader.read_to_end_into(e.name(), &mut buf)?;
    Ok(())
}

fn unexpected_eof(element: &str) -> ParseError {
    ParseError::InvalidStructure {
        message: format!("unexpected end of document inside '{element}'"),
    }
}
