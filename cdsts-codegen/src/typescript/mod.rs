//! TypeScript declaration generation.

pub mod actions;
pub mod aliases;
pub mod classes;
pub mod entities;
pub mod enums;
pub mod types;

use crate::resolver::TypeReference;

pub use actions::{ActionGenerator, FunctionDecl};
pub use aliases::{AliasGenerator, TypeAliasDecl};
pub use classes::{ClassDecl, render_runtime_block};
pub use entities::{InterfaceDecl, InterfaceGenerator};
pub use enums::{EnumDecl, EnumGenerator};
pub use types::{Member, TsType, TypeMapper};

/// Top-level declaration of an output unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `export type X = ...;`
    TypeAlias(TypeAliasDecl),
    /// `export enum X { ... }`
    Enum(EnumDecl),
    /// `export interface X extends ... { ... }`
    Interface(InterfaceDecl),
    /// Parameter interface, return alias and signature of an action.
    Function(FunctionDecl),
}

impl Declaration {
    /// Returns the names this declaration exports.
    #[must_use]
    pub fn exported_names(&self) -> Vec<String> {
        match self {
            Self::TypeAlias(decl) => vec![decl.name.clone()],
            Self::Enum(decl) => vec![decl.name.clone()],
            Self::Interface(decl) => vec![decl.name.clone()],
            Self::Function(decl) => decl.exported_names(),
        }
    }

    /// Renders the declaration.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::TypeAlias(decl) => decl.render(),
            Self::Enum(decl) => decl.render(),
            Self::Interface(decl) => decl.render(),
            Self::Function(decl) => decl.render(),
        }
    }

    /// Returns the declaration references used by this declaration.
    #[must_use]
    pub fn references(&self) -> Vec<&TypeReference> {
        let mut out = Vec::new();
        match self {
            Self::TypeAlias(decl) => decl.ty.collect_references(&mut out),
            Self::Enum(_) => {}
            Self::Interface(decl) => {
                out.extend(decl.extends.iter());
                collect_member_references(&decl.members, &mut out);
            }
            Self::Function(decl) => {
                collect_member_references(&decl.params, &mut out);
                decl.returns.collect_references(&mut out);
            }
        }
        out
    }
}

pub(crate) fn collect_member_references<'a>(
    members: &'a [Member],
    out: &mut Vec<&'a TypeReference>,
) {
    for member in members {
        if let Some(ty) = &member.ty {
            ty.collect_references(out);
        }
    }
}

/// Renders a doc comment at the given indentation.
pub(crate) fn doc_comment(doc: Option<&str>, indent: &str) -> String {
    let Some(doc) = doc.map(str::trim).filter(|d| !d.is_empty()) else {
        return String::new();
    };
    let doc = doc.replace("*/", "*\\/");
    let lines: Vec<&str> = doc.lines().collect();
    if lines.len() == 1 {
        return format!("{}/** {} */\n", indent, lines[0]);
    }
    let mut output = format!("{}/**\n", indent);
    for line in lines {
        output.push_str(&format!("{} * {}\n", indent, line.trim_end()));
    }
    output.push_str(&format!("{} */\n", indent));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_comment() {
        assert_eq!(doc_comment(None, ""), "");
        assert_eq!(doc_comment(Some("  "), ""), "");
        assert_eq!(doc_comment(Some("A book."), "    "), "    /** A book. */\n");
        assert_eq!(
            doc_comment(Some("First\nSecond"), ""),
            "/**\n * First\n * Second\n */\n"
        );
        assert_eq!(doc_comment(Some("a */ b"), ""), "/** a *\\/ b */\n");
    }
}
