//! Type alias generation.

use super::types::{TsType, TypeMapper};
use super::{Declaration, doc_comment};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::resolver::{ReferenceResolver, declaration_name};
use cdsts_schema::Definition;

/// `export type Name = Type;`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    pub ty: TsType,
    /// Doc comment.
    pub doc: Option<String>,
}

impl TypeAliasDecl {
    /// Renders the alias.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{}export type {} = {};\n",
            doc_comment(self.doc.as_deref(), ""),
            self.name,
            self.ty.render()
        )
    }
}

/// Generator for scalar type aliases.
pub struct AliasGenerator<'a> {
    resolver: &'a ReferenceResolver<'a>,
}

impl<'a> AliasGenerator<'a> {
    /// Creates a new alias generator.
    #[must_use]
    pub fn new(resolver: &'a ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Generates all alias declarations.
    pub fn generate(&self, aliases: &[Definition], diagnostics: &mut Diagnostics) -> Vec<Declaration> {
        let mapper = TypeMapper::new(self.resolver);
        let ir = self.resolver.ir();

        aliases
            .iter()
            .map(|alias| {
                let ty = match &alias.type_ref {
                    Some(type_ref) => mapper.map(type_ref, &alias.name, diagnostics),
                    None => {
                        diagnostics.report(
                            DiagnosticKind::UnresolvedReference,
                            self.resolver.source(),
                            alias.name.clone(),
                            "alias without an underlying type",
                        );
                        TsType::Opaque
                    }
                };
                Declaration::TypeAlias(TypeAliasDecl {
                    name: declaration_name(ir, alias, ""),
                    ty,
                    doc: alias.doc.clone(),
                })
            })
            .collect()
    }
}
