//! Action and function signature generation.

use super::types::{Member, TsType, TypeMapper};
use super::{Declaration, doc_comment};
use crate::diagnostics::Diagnostics;
use crate::resolver::{ReferenceResolver, declaration_name};
use cdsts_schema::Definition;

/// Signature of an unbound action or function.
///
/// Renders as a parameter interface, a return alias and a function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Signature name.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<Member>,
    /// Return type, `void` when nothing is returned.
    pub returns: TsType,
    /// Doc comment.
    pub doc: Option<String>,
}

impl FunctionDecl {
    /// Returns the name of the parameter interface.
    #[must_use]
    pub fn params_name(&self) -> String {
        format!("{}Params", self.name)
    }

    /// Returns the name of the return alias.
    #[must_use]
    pub fn return_name(&self) -> String {
        format!("{}Return", self.name)
    }

    /// Returns the three exported names.
    #[must_use]
    pub fn exported_names(&self) -> Vec<String> {
        vec![self.params_name(), self.return_name(), self.name.clone()]
    }

    /// Renders the signature.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = format!("export interface {} {{\n", self.params_name());
        for param in &self.params {
            output.push_str(&format!("    {}\n", param.text));
        }
        output.push_str("}\n");
        output.push_str(&format!(
            "export type {} = {};\n",
            self.return_name(),
            self.returns.render()
        ));
        output.push_str(&doc_comment(self.doc.as_deref(), ""));
        output.push_str(&format!(
            "export type {} = (params: {}) => {};\n",
            self.name,
            self.params_name(),
            self.return_name()
        ));
        output
    }
}

/// Generator for unbound actions and functions.
pub struct ActionGenerator<'a> {
    resolver: &'a ReferenceResolver<'a>,
}

impl<'a> ActionGenerator<'a> {
    /// Creates a new action generator.
    #[must_use]
    pub fn new(resolver: &'a ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Generates all signatures.
    pub fn generate(&self, actions: &[Definition], diagnostics: &mut Diagnostics) -> Vec<Declaration> {
        let mapper = TypeMapper::new(self.resolver);
        let ir = self.resolver.ir();

        actions
            .iter()
            .map(|action| {
                let params = mapper.members(&action.params, &action.name, diagnostics);
                let returns = match &action.returns {
                    Some(returns) => mapper.map(&returns.type_ref, &action.name, diagnostics),
                    None => TsType::Primitive("void"),
                };
                Declaration::Function(FunctionDecl {
                    name: declaration_name(ir, action, ""),
                    params,
                    returns,
                    doc: action.doc.clone(),
                })
            })
            .collect()
    }
}
