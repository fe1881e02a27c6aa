//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions.
//!
//! ```ignore
//! use cdsts::prelude::*;
//! ```

// Schema types
pub use cdsts_schema::{
    CompiledSchema, Definition, DefinitionKind, NamespaceKind, NamespaceModel, ParseError,
    SchemaError, SchemaIr, parse_csn, parse_csn_file,
};

// Generation
pub use cdsts_codegen::{
    CodegenError, Diagnostic, DiagnosticKind, Diagnostics, Generation, Generator,
    GeneratorConfig, OutputUnit, generate_from_csn, generate_from_file, write_units,
};

// Schema compiler
pub use crate::compile::{DEFAULT_COMPILER, load_csn};
