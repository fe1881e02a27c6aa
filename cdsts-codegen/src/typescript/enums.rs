//! Enum generation.

use super::types::{escape_string, property_key};
use super::{Declaration, doc_comment};
use crate::resolver::declaration_name;
use cdsts_schema::{Definition, EnumLiteral, EnumValue, SchemaIr};

/// `export enum Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    /// Doc comment.
    pub doc: Option<String>,
}

impl EnumDecl {
    /// Renders the enum.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = doc_comment(self.doc.as_deref(), "");
        output.push_str(&format!("export enum {} {{\n", self.name));
        for value in &self.values {
            output.push_str(&doc_comment(value.doc.as_deref(), "    "));
            let literal = match &value.value {
                EnumLiteral::String(s) => format!("\"{}\"", escape_string(s)),
                EnumLiteral::Number(n) => n.clone(),
            };
            output.push_str(&format!("    {} = {},\n", property_key(&value.name), literal));
        }
        output.push_str("}\n");
        output
    }
}

/// Generator for enum definitions.
pub struct EnumGenerator<'a> {
    ir: &'a SchemaIr,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self { ir }
    }

    /// Generates all enum declarations.
    #[must_use]
    pub fn generate(&self, enums: &[Definition]) -> Vec<Declaration> {
        enums
            .iter()
            .map(|definition| {
                Declaration::Enum(EnumDecl {
                    name: declaration_name(self.ir, definition, ""),
                    values: definition.enum_values.clone(),
                    doc: definition.doc.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsts_schema::parse_csn;

    #[test]
    fn test_generate_enums() {
        let csn = r#"{
            "definitions": {
                "shop.Genre": { "kind": "type", "type": "cds.Integer", "enum": {
                    "Fiction": { "val": 1, "doc": "Made up." },
                    "Poetry": { "val": 2 }
                } },
                "shop.Status": { "kind": "type", "type": "cds.String", "enum": {
                    "open": {},
                    "in-review": { "val": "review \"pending\"" }
                } }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let namespace = ir.namespace("shop").expect("shop");
        let rendered: Vec<String> = EnumGenerator::new(&ir)
            .generate(&namespace.enums)
            .iter()
            .map(Declaration::render)
            .collect();

        assert_eq!(
            rendered[0],
            "export enum Genre {\n    /** Made up. */\n    Fiction = 1,\n    Poetry = 2,\n}\n"
        );
        assert_eq!(
            rendered[1],
            "export enum Status {\n    open = \"open\",\n    \"in-review\" = \"review \\\"pending\\\"\",\n}\n"
        );
    }
}
