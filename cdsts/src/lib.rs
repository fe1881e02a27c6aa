//! # cdsts
//!
//! TypeScript declarations from CDS models.
//!
//! cdsts reads a compiled CDS schema (CSN), groups its definitions by
//! namespace and emits one TypeScript file per namespace, with imports for
//! every referenced namespace.
//!
//! ## Features
//!
//! - **Structural and runtime forms** - Interfaces keep multiple `extends`,
//!   runtime classes are flattened with conflict-aware property merging
//! - **Cross-namespace references** - Deterministic import aliases and
//!   relative import paths
//! - **Total generation** - Gaps in the schema become `any` plus a diagnostic
//!
//! ## Quick Start
//!
//! ```ignore
//! use cdsts::prelude::*;
//!
//! let config = GeneratorConfig::new().prefix("I");
//! let generation = generate_from_csn(&csn, &config)?;
//! generation.write(Path::new("gen"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - CSN parsing, namespace grouping and naming policy
//! - [`codegen`] - Reference resolution, flattening and TypeScript emission
//! - [`compile`] - External schema compiler invocation

pub mod compile;
pub mod prelude;

/// CSN parsing, namespace grouping and naming policy.
pub mod schema {
    pub use cdsts_schema::*;
}

/// Reference resolution, flattening and TypeScript emission.
pub mod codegen {
    pub use cdsts_codegen::*;
}

// Re-export commonly used items at the crate root
pub use cdsts_codegen::{
    CodegenError, Generation, Generator, GeneratorConfig, generate_from_csn, generate_from_file,
};
pub use cdsts_schema::{SchemaIr, parse_csn};
