//! Reference resolution and dependency ordering.
//!
//! The resolver maps every type reference to a built-in, a declared type or
//! a base type the target library already provides, builds the reference
//! graph between declarations and sorts it so that every type is emitted
//! after the types it depends on.

use crate::builtins::BuiltinType;
use crate::error::SchemaError;
use crate::types::{SchemaDocument, TypeDeclaration, TypeRef};
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Names of types the target library already provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseTypes {
    names: BTreeSet<String>,
}

impl BaseTypes {
    /// Creates a base type table from a list of names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `name` is a base type.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns the number of base types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if no base types are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// What a type reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    /// Built-in primitive.
    Builtin(BuiltinType),
    /// Type declared in this schema and generated alongside it.
    Declared(String),
    /// Type provided by the target library.
    Base(String),
}

impl ResolvedRef {
    /// Returns the built-in, if this reference resolved to one.
    #[must_use]
    pub const fn builtin(&self) -> Option<BuiltinType> {
        match self {
            Self::Builtin(b) => Some(*b),
            _ => None,
        }
    }
}

/// A declaration together with its resolved references.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedType {
    /// The declaration as parsed.
    pub declaration: TypeDeclaration,
    /// Resolved references, parallel to `declaration.references()`.
    pub field_refs: Vec<ResolvedRef>,
    /// Position in the schema document.
    pub order: usize,
    /// Already provided by the target library; not emitted.
    pub skipped: bool,
}

impl ResolvedType {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.declaration.name()
    }
}

/// A fully resolved schema in emission order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSchema {
    /// Types in emission order (dependencies first).
    pub types: Vec<ResolvedType>,
    index: HashMap<String, usize>,
}

impl ResolvedSchema {
    /// Looks up a resolved type by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ResolvedType> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Iterates over the types that are to be emitted.
    pub fn emitted(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.iter().filter(|t| !t.skipped)
    }

    /// Returns the emission order as type names.
    #[must_use]
    pub fn emission_order(&self) -> Vec<&str> {
        self.emitted().map(ResolvedType::name).collect()
    }
}

/// Resolves references and orders declarations.
///
/// # Arguments
/// * `document` - Parsed schema
/// * `base_types` - Names the target library already provides
/// * `base_schema_mode` - Suppress declarations that are base types
///
/// # Errors
/// Returns `SchemaError::UnresolvedReference` for a reference that matches
/// nothing and `SchemaError::CyclicDependency` if declarations reference
/// each other in a loop.
pub fn resolve(
    document: &SchemaDocument,
    base_types: &BaseTypes,
    base_schema_mode: bool,
) -> Result<ResolvedSchema, SchemaError> {
    let declared: HashMap<&str, usize> = document
        .declarations
        .iter()
        .enumerate()
        .map(|(i, decl)| (decl.name(), i))
        .collect();
    let skipped = |name: &str| base_schema_mode && base_types.contains(name);

    // Resolve every reference and record edges between declarations.
    let mut refs = Vec::with_capacity(document.len());
    let mut edges: Vec<Vec<usize>> = vec![Vec::new(); document.len()];

    for (index, decl) in document.declarations.iter().enumerate() {
        let field_names = reference_sites(decl);
        let mut resolved = Vec::new();

        for (type_ref, site) in decl.references().zip(field_names) {
            let (target, dependency) =
                lookup(type_ref, &declared, base_types, skipped).ok_or_else(|| {
                    SchemaError::UnresolvedReference {
                        type_name: decl.name().to_string(),
                        field: site.to_string(),
                        reference: type_ref.to_string(),
                    }
                })?;
            if let Some(dep) = dependency
                && !edges[index].contains(&dep)
            {
                edges[index].push(dep);
            }
            resolved.push(target);
        }

        refs.push(resolved);
    }

    let order = topological_order(document, &edges)?;

    let mut types = Vec::with_capacity(order.len());
    let mut index = HashMap::with_capacity(order.len());
    let mut refs: Vec<Option<Vec<ResolvedRef>>> = refs.into_iter().map(Some).collect();

    for position in order {
        let declaration = document.declarations[position].clone();
        index.insert(declaration.name().to_string(), types.len());
        types.push(ResolvedType {
            skipped: skipped(declaration.name()),
            field_refs: refs[position].take().unwrap_or_default(),
            order: position,
            declaration,
        });
    }

    let schema = ResolvedSchema { types, index };
    tracing::debug!(
        types = schema.types.len(),
        emitted = schema.emitted().count(),
        "resolved schema"
    );
    Ok(schema)
}

/// Labels for each reference site, parallel to `references()`.
fn reference_sites(decl: &TypeDeclaration) -> Vec<&str> {
    match decl {
        TypeDeclaration::Struct(s) => s.fields.iter().map(|f| f.name.as_str()).collect(),
        TypeDeclaration::Enum(_) => Vec::new(),
        TypeDeclaration::Alias(_) => vec!["<alias>"],
    }
}

/// Looks up one reference.
///
/// Returns the resolved target plus the index of the declaration it depends
/// on, if any.
fn lookup(
    type_ref: &TypeRef,
    declared: &HashMap<&str, usize>,
    base_types: &BaseTypes,
    skipped: impl Fn(&str) -> bool,
) -> Option<(ResolvedRef, Option<usize>)> {
    if type_ref.is_builtin_namespace() {
        return BuiltinType::from_schema_name(&type_ref.name).map(|b| (ResolvedRef::Builtin(b), None));
    }

    let name = type_ref.name.as_str();
    if let Some(&index) = declared.get(name) {
        let target = if skipped(name) {
            ResolvedRef::Base(name.to_string())
        } else {
            ResolvedRef::Declared(name.to_string())
        };
        return Some((target, Some(index)));
    }
    if base_types.contains(name) {
        return Some((ResolvedRef::Base(name.to_string()), None));
    }
    BuiltinType::from_schema_name(name).map(|b| (ResolvedRef::Builtin(b), None))
}

/// Kahn's algorithm with ties broken by schema order.
fn topological_order(
    document: &SchemaDocument,
    edges: &[Vec<usize>],
) -> Result<Vec<usize>, SchemaError> {
    let count = document.len();
    let mut pending = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (node, deps) in edges.iter().enumerate() {
        for &dep in deps {
            if dep == node {
                return Err(SchemaError::CyclicDependency {
                    cycle: vec![document.declarations[node].name().to_string()],
                });
            }
            pending[node] += 1;
            dependents[dep].push(node);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|(_, n)| **n == 0)
        .map(|(i, _)| Reverse(i))
        .collect();
    let mut order = Vec::with_capacity(count);

    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        for &dependent in &dependents[node] {
            pending[dependent] -= 1;
            if pending[dependent] == 0 {
                ready.push(Reverse(dependent));
            }
        }
    }

    if order.len() < count {
        let placed: HashSet<usize> = order.iter().copied().collect();
        let cycle = find_cycle(edges, &placed)
            .into_iter()
            .map(|i| document.declarations[i].name().to_string())
            .collect();
        return Err(SchemaError::CyclicDependency { cycle });
    }

    Ok(order)
}

/// Extracts one cycle from the nodes Kahn's algorithm could not place.
fn find_cycle(edges: &[Vec<usize>], placed: &HashSet<usize>) -> Vec<usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        OnPath,
        Done,
    }

    let mut marks = vec![Mark::Unvisited; edges.len()];

    for start in (0..edges.len()).filter(|n| !placed.contains(n)) {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        // Iterative DFS keeping the current path and each node's next edge.
        let mut path = vec![start];
        let mut cursor = vec![0usize];
        marks[start] = Mark::OnPath;

        while let Some(&node) = path.last() {
            let depth = path.len() - 1;
            let next = edges[node]
                .get(cursor[depth])
                .copied()
                .filter(|n| !placed.contains(n));
            cursor[depth] += 1;

            if cursor[depth] > edges[node].len() {
                marks[node] = Mark::Done;
                path.pop();
                cursor.pop();
                continue;
            }

            let Some(next) = next else { continue };
            match marks[next] {
                Mark::OnPath => {
                    let from = path.iter().position(|&n| n == next).unwrap_or(0);
                    return path[from..].to_vec();
                }
                Mark::Unvisited => {
                    marks[next] = Mark::OnPath;
                    path.push(next);
                    cursor.push(0);
                }
                Mark::Done => {}
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    fn dictionary(body: &str) -> String {
        format!(
            r#"<opc:TypeDictionary xmlns:opc="http://opcfoundation.org/BinarySchema/"
                xmlns:tns="urn:demo" TargetNamespace="urn:demo">{body}</opc:TypeDictionary>"#
        )
    }

    fn resolve_xml(body: &str) -> Result<ResolvedSchema, SchemaError> {
        let doc = parse_schema(&dictionary(body))?;
        resolve(&doc, &BaseTypes::default(), false)
    }

    #[test]
    fn test_forward_reference_ordering() {
        let schema = resolve_xml(
            r#"
            <opc:StructuredType Name="Outer"><opc:Field Name="Inner" TypeName="tns:Inner" /></opc:StructuredType>
            <opc:StructuredType Name="Inner"><opc:Field Name="X" TypeName="opc:Int32" /></opc:StructuredType>"#,
        )
        .expect("Failed to resolve");

        assert_eq!(schema.emission_order(), ["Inner", "Outer"]);
        let outer = schema.get("Outer").expect("Outer missing");
        assert_eq!(outer.order, 0);
        assert_eq!(outer.field_refs, [ResolvedRef::Declared("Inner".to_string())]);
    }

    #[test]
    fn test_independent_types_keep_schema_order() {
        let schema = resolve_xml(
            r#"
            <opc:StructuredType Name="C" />
            <opc:StructuredType Name="A" />
            <opc:StructuredType Name="B"><opc:Field Name="C" TypeName="tns:C" /></opc:StructuredType>"#,
        )
        .expect("Failed to resolve");

        assert_eq!(schema.emission_order(), ["C", "A", "B"]);
    }

    #[test]
    fn test_ties_broken_by_schema_order() {
        let schema = resolve_xml(
            r#"
            <opc:StructuredType Name="Top">
              <opc:Field Name="B" TypeName="tns:B" />
              <opc:Field Name="A" TypeName="tns:A" />
            </opc:StructuredType>
            <opc:StructuredType Name="B" />
            <opc:StructuredType Name="A" />"#,
        )
        .expect("Failed to resolve");

        assert_eq!(schema.emission_order(), ["B", "A", "Top"]);
    }

    #[test]
    fn test_alias_chain_ordering() {
        let schema = resolve_xml(
            r#"
            <opc:AliasType Name="Outer" TypeName="tns:Inner" />
            <opc:AliasType Name="Inner" TypeName="opc:Double" />"#,
        )
        .expect("Failed to resolve");

        assert_eq!(schema.emission_order(), ["Inner", "Outer"]);
        assert_eq!(
            schema.get("Inner").map(|t| t.field_refs.clone()),
            Some(vec![ResolvedRef::Builtin(BuiltinType::Double)])
        );
    }

    #[test]
    fn test_builtin_lookup() {
        let schema = resolve_xml(
            r#"
            <opc:StructuredType Name="A">
              <opc:Field Name="X" TypeName="opc:Int32" />
              <opc:Field Name="S" TypeName="opc:CharArray" />
              <opc:Field Name="G" TypeName="ua:Guid" />
            </opc:StructuredType>"#,
        )
        .expect("Failed to resolve");

        let a = schema.get("A").expect("A missing");
        assert_eq!(
            a.field_refs,
            [
                ResolvedRef::Builtin(BuiltinType::Int32),
                ResolvedRef::Builtin(BuiltinType::String),
                ResolvedRef::Builtin(BuiltinType::Guid),
            ]
        );
    }

    #[test]
    fn test_opc_prefix_is_builtin_only() {
        let err = resolve_xml(
            r#"
            <opc:StructuredType Name="Point" />
            <opc:StructuredType Name="A"><opc:Field Name="P" TypeName="opc:Point" /></opc:StructuredType>"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SchemaError::UnresolvedReference { ref reference, .. } if reference == "opc:Point"
        ));
    }

    #[test]
    fn test_unresolved_reference() {
        let err = resolve_xml(
            r#"<opc:StructuredType Name="A"><opc:Field Name="B" TypeName="tns:Missing" /></opc:StructuredType>"#,
        )
        .unwrap_err();

        match err {
            SchemaError::UnresolvedReference {
                type_name,
                field,
                reference,
            } => {
                assert_eq!(type_name, "A");
                assert_eq!(field, "B");
                assert_eq!(reference, "tns:Missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unresolved_alias_target() {
        let err = resolve_xml(r#"<opc:AliasType Name="A" TypeName="tns:Nowhere" />"#).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnresolvedReference { ref field, .. } if field == "<alias>"
        ));
    }

    #[test]
    fn test_cycle_detection() {
        let err = resolve_xml(
            r#"
            <opc:StructuredType Name="Free" />
            <opc:StructuredType Name="A"><opc:Field Name="B" TypeName="tns:B" /></opc:StructuredType>
            <opc:StructuredType Name="B"><opc:Field Name="A" TypeName="tns:A" /></opc:StructuredType>"#,
        )
        .unwrap_err();

        match err {
            SchemaError::CyclicDependency { cycle } => {
                assert_eq!(cycle, ["A", "B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_through_dependent() {
        let err = resolve_xml(
            r#"
            <opc:StructuredType Name="Top"><opc:Field Name="A" TypeName="tns:A" /></opc:StructuredType>
            <opc:StructuredType Name="A"><opc:Field Name="B" TypeName="tns:B" /></opc:StructuredType>
            <opc:StructuredType Name="B"><opc:Field Name="C" TypeName="tns:C" /></opc:StructuredType>
            <opc:StructuredType Name="C"><opc:Field Name="A" TypeName="tns:A" /></opc:StructuredType>"#,
        )
        .unwrap_err();

        match err {
            SchemaError::CyclicDependency { cycle } => {
                assert_eq!(cycle, ["A", "B", "C"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let err = resolve_xml(
            r#"<opc:StructuredType Name="Node"><opc:Field Name="Next" TypeName="tns:Node" /></opc:StructuredType>"#,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            SchemaError::CyclicDependency { ref cycle } if cycle == &["Node".to_string()]
        ));
    }

    #[test]
    fn test_base_types_resolve_without_declaration() {
        let doc = parse_schema(&dictionary(
            r#"<opc:StructuredType Name="A"><opc:Field Name="H" TypeName="tns:RequestHeader" /></opc:StructuredType>"#,
        ))
        .expect("Failed to parse");

        let schema = resolve(&doc, &BaseTypes::new(["RequestHeader"]), false)
            .expect("Failed to resolve");
        assert_eq!(
            schema.get("A").map(|t| t.field_refs.clone()),
            Some(vec![ResolvedRef::Base("RequestHeader".to_string())])
        );
    }

    #[test]
    fn test_base_schema_mode_skips_declared_base_types() {
        let doc = parse_schema(&dictionary(
            r#"
            <opc:StructuredType Name="A"><opc:Field Name="H" TypeName="tns:Header" /></opc:StructuredType>
            <opc:StructuredType Name="Header"><opc:Field Name="Id" TypeName="opc:UInt32" /></opc:StructuredType>"#,
        ))
        .expect("Failed to parse");
        let base = BaseTypes::new(["Header"]);

        let schema = resolve(&doc, &base, true).expect("Failed to resolve");
        assert_eq!(schema.emission_order(), ["A"]);
        assert!(schema.get("Header").is_some_and(|t| t.skipped));
        assert_eq!(
            schema.get("A").map(|t| t.field_refs.clone()),
            Some(vec![ResolvedRef::Base("Header".to_string())])
        );

        let schema = resolve(&doc, &base, false).expect("Failed to resolve");
        assert_eq!(schema.emission_order(), ["Header", "A"]);
    }
}
