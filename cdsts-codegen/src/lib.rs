//! # cdsts Codegen
//!
//! TypeScript code generation from compiled CDS schemas.
//!
//! This crate generates, per namespace:
//! - Interfaces that keep their ancestors as `extends` clauses
//! - Flattened runtime classes without `extends`
//! - Enums, type aliases and action signatures
//! - Import statements for every referenced namespace

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod flatten;
pub mod generator;
pub mod resolver;
pub mod typescript;
pub mod unit;
pub mod writer;

pub use config::GeneratorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::CodegenError;
pub use flatten::{Flattener, merge_members};
pub use generator::{Generation, Generator};
pub use resolver::{Qualifier, ReferenceResolver, alias, namespace_alias, relative_path};
pub use unit::OutputUnit;
pub use writer::write_units;

use cdsts_schema::{SchemaIr, parse_csn, parse_csn_file};
use std::path::Path;

/// Generates TypeScript units from a CSN document.
///
/// # Arguments
/// * `json` - CSN document
/// * `config` - Generator options
///
/// # Errors
/// Returns `CodegenError::Parse` if the document is not valid CSN.
pub fn generate_from_csn(json: &str, config: &GeneratorConfig) -> Result<Generation, CodegenError> {
    let schema = parse_csn(json)?;
    let ir = SchemaIr::from_schema(&schema);
    Ok(Generator::new(&ir, config).generate())
}

/// Generates TypeScript units from a CSN file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn generate_from_file(path: &Path, config: &GeneratorConfig) -> Result<Generation, CodegenError> {
    let schema = parse_csn_file(path)?;
    let ir = SchemaIr::from_schema(&schema);
    Ok(Generator::new(&ir, config).generate())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOKSHOP: &str = r#"{
        "namespace": "my.bookshop",
        "definitions": {
            "my.bookshop.Books": { "kind": "entity", "includes": ["sap.common.managed"], "elements": {
                "ID": { "key": true, "type": "cds.Integer" },
                "title": { "type": "cds.String" },
                "currency": { "type": "cds.Association", "target": "sap.common.Currencies", "keys": [{ "ref": ["code"] }] }
            } },
            "my.bookshop.Categories": { "kind": "entity", "elements": { "ID": { "key": true, "type": "cds.UUID" } } },
            "sap.common.managed": { "kind": "aspect", "elements": { "createdAt": { "type": "cds.Timestamp" } } },
            "sap.common.Currencies": { "kind": "entity", "elements": { "code": { "key": true, "type": "cds.String" } } },
            "Price": { "kind": "type", "type": "cds.Decimal" }
        }
    }"#;

    #[test]
    fn test_generate_from_csn() {
        let generation =
            generate_from_csn(BOOKSHOP, &GeneratorConfig::default()).expect("Failed to generate");
        let names: Vec<_> = generation.units.iter().map(|u| u.namespace.as_str()).collect();
        assert_eq!(names, vec!["", "my.bookshop", "sap.common"]);
        assert!(generation.diagnostics.is_empty());

        let bookshop = generation.unit("my.bookshop").expect("bookshop").render();
        assert!(bookshop.contains("import * as _sap_common from \"../../sap/common\";\n"));
        assert!(bookshop.contains("export type Categories = Category[];\n"));
        assert!(bookshop.contains("    currency_code?: string;\n"));
        assert!(bookshop.contains(
            "    export class Book {\n        ID!: number;\n        title?: string;\n        currency?: _sap_common.Currency;\n        currency_code?: string;\n        createdAt?: string;\n    }\n"
        ));
    }

    #[test]
    fn test_flatten_idempotent_across_runs() {
        let config = GeneratorConfig::default();
        let first = generate_from_csn(BOOKSHOP, &config).expect("Failed to generate");
        let second = generate_from_csn(BOOKSHOP, &config).expect("Failed to generate");
        let first: Vec<String> = first.units.iter().map(OutputUnit::render).collect();
        let second: Vec<String> = second.units.iter().map(OutputUnit::render).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_from_csn_invalid() {
        let result = generate_from_csn("[]", &GeneratorConfig::default());
        assert!(matches!(result, Err(CodegenError::Parse(_))));
    }

    #[test]
    fn test_generate_from_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("model.json");
        std::fs::write(&path, BOOKSHOP).expect("Failed to write");

        let generation =
            generate_from_file(&path, &GeneratorConfig::default()).expect("Failed to generate");
        let written = generation.write(dir.path()).expect("Failed to write units");
        assert_eq!(written.len(), 3);
        assert!(dir.path().join("sap").join("common").join("index.ts").exists());
    }
}
