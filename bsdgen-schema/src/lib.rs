//! # bsdgen Schema
//!
//! Binary schema parsing and analysis.
//!
//! This crate provides:
//! - XML type dictionary parsing into a [`SchemaDocument`]
//! - The shared built-in primitive table
//! - Reference resolution and dependency ordering
//! - Layout planning for length-determinant and switch fields

pub mod builtins;
pub mod error;
pub mod layout;
pub mod parser;
pub mod resolver;
pub mod types;

pub use builtins::BuiltinType;
pub use error::{ParseError, SchemaError};
pub use layout::{FieldLayout, FieldRole, StructLayout, plan, plan_struct};
pub use parser::parse_schema;
pub use resolver::{BaseTypes, ResolvedRef, ResolvedSchema, ResolvedType, resolve};
pub use types::{
    AliasType, EnumType, EnumVariant, Field, FieldId, SchemaDocument, StructType, SwitchRef,
    TypeDeclaration, TypeRef,
};
