//! Runtime class rendering.

use super::doc_comment;
use super::types::Member;

/// Flattened runtime class. Carries no `extends` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name.
    pub name: String,
    /// Own and inherited members.
    pub members: Vec<Member>,
    /// Doc comment.
    pub doc: Option<String>,
}

impl ClassDecl {
    /// Renders the class at the given indentation.
    #[must_use]
    pub fn render(&self, indent: &str) -> String {
        let mut output = doc_comment(self.doc.as_deref(), indent);
        output.push_str(&format!("{}export class {} {{\n", indent, self.name));
        for member in &self.members {
            output.push_str(&format!("{}    {}\n", indent, member.render_field()));
        }
        output.push_str(&format!("{}}}\n", indent));
        output
    }
}

/// Renders the block holding the runtime classes.
#[must_use]
pub fn render_runtime_block(name: &str, classes: &[ClassDecl]) -> String {
    let mut output = format!("export namespace {} {{\n", name);
    let bodies: Vec<String> = classes.iter().map(|c| c.render("    ")).collect();
    output.push_str(&bodies.join("\n"));
    output.push_str("}\n");
    output
}
