//! Interface generation for entities, aspects and structured types.

use super::aliases::TypeAliasDecl;
use super::types::{Member, TsType, TypeMapper};
use super::{Declaration, doc_comment};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::resolver::{ReferenceResolver, Resolution, TypeReference, declaration_name};
use cdsts_schema::Definition;
use cdsts_schema::naming::sanitize_identifier;

/// `export interface Name extends ... { ... }`
///
/// The structural form keeps its ancestors as `extends` clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    /// Interface name.
    pub name: String,
    /// Ancestors in declaration order.
    pub extends: Vec<TypeReference>,
    /// Own members.
    pub members: Vec<Member>,
    /// Doc comment.
    pub doc: Option<String>,
}

impl InterfaceDecl {
    /// Renders the interface.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = doc_comment(self.doc.as_deref(), "");
        output.push_str(&format!("export interface {}", self.name));
        if !self.extends.is_empty() {
            let extends: Vec<String> = self.extends.iter().map(TypeReference::render).collect();
            output.push_str(&format!(" extends {}", extends.join(", ")));
        }
        output.push_str(" {\n");
        for member in &self.members {
            output.push_str(&format!("    {}\n", member.text));
        }
        output.push_str("}\n");
        output
    }
}

/// Generator for entity interfaces.
pub struct InterfaceGenerator<'a> {
    resolver: &'a ReferenceResolver<'a>,
}

impl<'a> InterfaceGenerator<'a> {
    /// Creates a new interface generator.
    #[must_use]
    pub fn new(resolver: &'a ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Generates the interfaces, each followed by its plural array alias
    /// when enabled.
    pub fn generate(&self, entities: &[Definition], diagnostics: &mut Diagnostics) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for entity in entities {
            let interface = self.generate_interface(entity, diagnostics);
            let plural = self.plural_alias(entity, &interface.name);
            declarations.push(Declaration::Interface(interface));
            declarations.extend(plural.map(Declaration::TypeAlias));
        }
        declarations
    }

    /// Generates the interface of one entity.
    pub fn generate_interface(
        &self,
        entity: &Definition,
        diagnostics: &mut Diagnostics,
    ) -> InterfaceDecl {
        let ir = self.resolver.ir();
        let mut extends = Vec::new();
        for include in &entity.includes {
            match self.resolver.resolve(include, false) {
                Resolution::Found(reference) => extends.push(reference),
                Resolution::Unresolved(name) => diagnostics.report(
                    DiagnosticKind::UnresolvedReference,
                    self.resolver.source(),
                    entity.name.clone(),
                    format!("ancestor '{}' not found", name),
                ),
            }
        }

        InterfaceDecl {
            name: declaration_name(ir, entity, self.resolver.config().entity_prefix()),
            extends,
            members: TypeMapper::new(self.resolver).members(&entity.elements, &entity.name, diagnostics),
            doc: entity.doc.clone(),
        }
    }

    /// Builds `export type <Plural> = <Singular>[];`.
    ///
    /// Skipped when disabled or when the plural collides with the singular.
    fn plural_alias(&self, entity: &Definition, singular: &str) -> Option<TypeAliasDecl> {
        let config = self.resolver.config();
        if !config.plural_aliases_enabled() {
            return None;
        }
        let (_, plural) = self.resolver.ir().names(&entity.name);
        let name = format!("{}{}", config.entity_prefix(), sanitize_identifier(&plural));
        if name == singular {
            return None;
        }
        match self.resolver.resolve(&entity.name, true) {
            Resolution::Found(reference) => Some(TypeAliasDecl {
                name,
                ty: TsType::Reference(reference),
                doc: None,
            }),
            Resolution::Unresolved(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use cdsts_schema::{SchemaIr, parse_csn};

    const CSN: &str = r#"{
        "definitions": {
            "shop.managed": { "kind": "aspect", "elements": { "modifiedAt": { "type": "cds.Timestamp" } } },
            "shop.Books": { "kind": "entity", "doc": "A book.", "includes": ["shop.managed", "people.Tagged", "gone.Aspect"], "elements": {
                "ID": { "key": true, "type": "cds.Integer" },
                "title": { "type": "cds.String", "notNull": true }
            } },
            "shop.Species": { "kind": "entity" },
            "people.Tagged": { "kind": "aspect" }
        }
    }"#;

    fn generate(config: &GeneratorConfig, diagnostics: &mut Diagnostics) -> Vec<String> {
        let ir = SchemaIr::from_schema(&parse_csn(CSN).expect("Failed to parse"));
        let resolver = ReferenceResolver::new(&ir, "shop", config);
        let namespace = ir.namespace("shop").expect("shop");
        InterfaceGenerator::new(&resolver)
            .generate(&namespace.entities, diagnostics)
            .iter()
            .map(Declaration::render)
            .collect()
    }

    #[test]
    fn test_interface_keeps_extends() {
        let mut diagnostics = Diagnostics::new();
        let rendered = generate(&GeneratorConfig::default(), &mut diagnostics);

        assert_eq!(
            rendered[2],
            "/** A book. */\nexport interface Book extends managed, _people.Tagged {\n    ID: number;\n    title: string;\n}\n"
        );
        assert_eq!(rendered[3], "export type Books = Book[];\n");
        assert_eq!(diagnostics.count(DiagnosticKind::UnresolvedReference), 1);
    }

    #[test]
    fn test_plural_alias_skipped_on_collision() {
        let mut diagnostics = Diagnostics::new();
        let rendered = generate(&GeneratorConfig::default(), &mut diagnostics);
        // managed/manageds, Book/Books, then Species has no alias
        assert_eq!(rendered.len(), 5);
        assert_eq!(rendered[4], "export interface Species {\n}\n");
    }

    #[test]
    fn test_prefix_and_disabled_plurals() {
        let mut diagnostics = Diagnostics::new();
        let config = GeneratorConfig::new().prefix("I").plural_aliases(false);
        let rendered = generate(&config, &mut diagnostics);

        assert_eq!(rendered.len(), 3);
        assert!(rendered[1].starts_with("/** A book. */\nexport interface IBook extends Imanaged, _people.ITagged {"));
    }
}
