//! # cdsts Schema
//!
//! Compiled CDS schema (CSN) model and namespace grouping.
//!
//! This crate provides:
//! - Classification of raw CSN definitions into typed definitions
//! - Element and type reference definitions
//! - Namespace containers for namespaces, services and the root scope
//! - The schema IR: the namespace forest used by code generation
//! - Naming policy (singular/plural names, identifier sanitizing)

pub mod elements;
pub mod error;
pub mod ir;
pub mod namespace;
pub mod naming;
pub mod parser;
pub mod types;

pub use elements::{Association, Cardinality, Element, TypeRef};
pub use error::{ParseError, SchemaError};
pub use ir::SchemaIr;
pub use namespace::{NamespaceKind, NamespaceModel, ROOT_NAMESPACE};
pub use naming::{names, pluralize, sanitize_identifier, singularize};
pub use parser::{parse_csn, parse_csn_file};
pub use types::{Annotations, CompiledSchema, Definition, DefinitionKind, EnumLiteral, EnumValue};
