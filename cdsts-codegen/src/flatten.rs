//! Inheritance flattening.
//!
//! The runtime form of an entity carries no `extends` clause. Its members
//! are its own members followed by the flattened members of every ancestor,
//! merged so that each property appears once and conflicting types widen
//! to a union.

use crate::config::GeneratorConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::resolver::{ReferenceResolver, declaration_name};
use crate::typescript::classes::ClassDecl;
use crate::typescript::types::{Member, TsType, TypeMapper};
use cdsts_schema::SchemaIr;
use std::collections::HashMap;

/// Where a member's type came from.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeLookup {
    /// The member carries a structured type.
    Structured(TsType),
    /// Recovered from the member's declaration text.
    Textual(String),
    /// Neither was available.
    Opaque,
}

impl TypeLookup {
    /// Returns the looked-up type, `any` when nothing was found.
    #[must_use]
    pub fn into_type(self) -> TsType {
        match self {
            Self::Structured(ty) => ty,
            Self::Textual(text) => TsType::Text(text),
            Self::Opaque => TsType::Opaque,
        }
    }
}

/// Looks up the type of a member as seen from `namespace`.
///
/// The structured type wins. Otherwise the declaration text is split at
/// its first `:` or `=`, which only holds when the text was rendered in
/// `namespace`.
#[must_use]
pub fn member_type(member: &Member, namespace: &str) -> TypeLookup {
    if let Some(ty) = &member.ty {
        return TypeLookup::Structured(ty.clone());
    }
    if member.namespace != namespace {
        return TypeLookup::Opaque;
    }
    match type_text(&member.text) {
        Some(text) => TypeLookup::Textual(text.to_string()),
        None => TypeLookup::Opaque,
    }
}

/// Extracts the type part of a declaration such as `name?: T;`.
fn type_text(declaration: &str) -> Option<&str> {
    // Skip a quoted key, which may itself contain separators
    let start = match declaration.strip_prefix('"') {
        Some(rest) => closing_quote(rest).map_or(0, |end| end + 2),
        None => 0,
    };
    let split = declaration[start..].find([':', '='])? + start;
    let text = declaration[split + 1..]
        .trim()
        .trim_end_matches(';')
        .trim();
    (!text.is_empty()).then_some(text)
}

/// Returns the byte offset of the first unescaped `"` in `text`.
fn closing_quote(text: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Resolves a member's type for merging, reporting a fallback to `any`.
fn resolved_type(member: &Member, namespace: &str, diagnostics: &mut Diagnostics) -> TsType {
    let lookup = member_type(member, namespace);
    if let TypeLookup::Textual(text) = &lookup {
        tracing::trace!("Recovered type of '{}' from text: {}", member.name, text);
    }
    if lookup == TypeLookup::Opaque {
        diagnostics.report(
            DiagnosticKind::TypeTextFallback,
            namespace,
            member.name.clone(),
            "type could not be recovered from declaration text",
        );
    }
    lookup.into_type()
}

/// Merges inherited members into `target`.
///
/// A property missing from `target` is appended. A property present with
/// an identically rendered type is left alone. A property present with a
/// different type widens to a union, existing branches first. Optionality
/// is never changed. Merging the same members twice has no further effect.
pub fn merge_members(
    target: &mut Vec<Member>,
    inherited: &[Member],
    namespace: &str,
    diagnostics: &mut Diagnostics,
) {
    for member in inherited {
        let Some(existing) = target.iter_mut().find(|m| m.name == member.name) else {
            target.push(member.clone());
            continue;
        };
        let current = resolved_type(existing, namespace, diagnostics);
        let incoming = resolved_type(member, namespace, diagnostics);
        if current.render() == incoming.render() {
            continue;
        }
        *existing = existing.with_type(current.union_with(&incoming));
    }
}

/// Flattens ancestor chains into runtime class declarations.
///
/// Results are cached per definition, so shared ancestors are flattened
/// once per run. A result computed while a cycle was cut is incomplete and
/// stays out of the cache.
pub struct Flattener<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
    cache: HashMap<String, Vec<Member>>,
    in_progress: Vec<String>,
    /// Stack depth a cut cycle loops back to; deeper frames are incomplete.
    cut_at: Option<usize>,
}

impl<'a> Flattener<'a> {
    /// Creates a new flattener.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GeneratorConfig) -> Self {
        Self {
            ir,
            config,
            cache: HashMap::new(),
            in_progress: Vec::new(),
            cut_at: None,
        }
    }

    /// Builds the runtime class of a structured definition.
    ///
    /// Returns `None` if the name is not a structured definition.
    pub fn flatten(&mut self, fqn: &str, diagnostics: &mut Diagnostics) -> Option<ClassDecl> {
        let definition = self.ir.definition(fqn)?;
        if !definition.is_structured() {
            return None;
        }
        let name = declaration_name(self.ir, definition, self.config.entity_prefix());
        let doc = definition.doc.clone();
        let members = self.flattened_members(fqn, diagnostics);
        Some(ClassDecl { name, members, doc })
    }

    /// Returns the flattened members of a definition, typed as seen from
    /// its own namespace.
    pub fn flattened_members(&mut self, fqn: &str, diagnostics: &mut Diagnostics) -> Vec<Member> {
        if let Some(cached) = self.cache.get(fqn) {
            return cached.clone();
        }
        let ir = self.ir;
        let namespace = ir.owner_of(fqn);
        let Some(definition) = ir.definition(fqn) else {
            return Vec::new();
        };
        if let Some(depth) = self.in_progress.iter().position(|f| f == fqn) {
            self.cut_at = Some(self.cut_at.map_or(depth, |cut| cut.min(depth)));
            diagnostics.report(
                DiagnosticKind::InheritanceCycle,
                &namespace,
                fqn,
                "ancestor chain loops back to this definition",
            );
            return Vec::new();
        }
        let depth = self.in_progress.len();
        self.in_progress.push(fqn.to_string());

        let resolver = ReferenceResolver::new(ir, &namespace, self.config);
        let mapper = TypeMapper::new(&resolver);
        let mut members: Vec<Member> = mapper
            .members(&definition.elements, fqn, diagnostics)
            .iter()
            .map(|m| m.with_type(resolved_type(m, &namespace, diagnostics)))
            .collect();

        for include in &definition.includes {
            let ancestor = match ir.require_definition(include) {
                Ok(ancestor) if ancestor.is_structured() => ancestor,
                Ok(_) => {
                    diagnostics.report(
                        DiagnosticKind::UnresolvedReference,
                        &namespace,
                        fqn,
                        format!("ancestor '{}' is not a structured type", include),
                    );
                    continue;
                }
                Err(e) => {
                    diagnostics.report(
                        DiagnosticKind::UnresolvedReference,
                        &namespace,
                        fqn,
                        format!("ancestor skipped: {}", e),
                    );
                    continue;
                }
            };
            let inherited: Vec<Member> = self
                .flattened_members(&ancestor.name, diagnostics)
                .iter()
                .map(|m| self.carry(m, &namespace, diagnostics))
                .collect();
            merge_members(&mut members, &inherited, &namespace, diagnostics);
        }

        self.in_progress.pop();
        match self.cut_at {
            Some(cut) if cut < depth => {
                tracing::debug!("Not caching {} flattened inside a cycle", fqn);
            }
            cut => {
                if cut == Some(depth) {
                    self.cut_at = None;
                }
                self.cache.insert(fqn.to_string(), members.clone());
            }
        }
        members
    }

    /// Carries an ancestor member into a descendant namespace.
    ///
    /// Literal type text cannot cross namespaces and falls back to `any`.
    fn carry(&self, member: &Member, namespace: &str, diagnostics: &mut Diagnostics) -> Member {
        let textual = member.ty.as_ref().is_none_or(TsType::contains_text);
        if textual && member.namespace != namespace {
            diagnostics.report(
                DiagnosticKind::TypeTextFallback,
                namespace,
                member.name.clone(),
                format!(
                    "type text rendered in '{}' is not valid here",
                    member.namespace
                ),
            );
            return Member::typed(member.name.clone(), member.optional, TsType::Opaque, namespace);
        }
        member.rebase(namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdsts_schema::parse_csn;

    const EMPLOYEES: &str = r#"{
        "definitions": {
            "a.Person": { "kind": "aspect", "elements": { "id": { "type": "cds.String" } } },
            "b.Named": { "kind": "aspect", "elements": {
                "id": { "type": "cds.String" },
                "name": { "type": "cds.String" }
            } },
            "c.Employees": { "kind": "entity", "includes": ["a.Person", "b.Named"] }
        }
    }"#;

    fn member(name: &str, ty: TsType) -> Member {
        Member::typed(name, true, ty, "ns")
    }

    fn render(members: &[Member]) -> Vec<String> {
        members.iter().map(|m| m.text.clone()).collect()
    }

    #[test]
    fn test_flatten_multiple_ancestors() {
        let ir = SchemaIr::from_schema(&parse_csn(EMPLOYEES).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let class = flattener
            .flatten("c.Employees", &mut diagnostics)
            .expect("class");
        assert_eq!(class.name, "Employee");
        assert_eq!(render(&class.members), vec!["id?: string;", "name?: string;"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_flatten_is_cached() {
        let ir = SchemaIr::from_schema(&parse_csn(EMPLOYEES).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let first = flattener.flattened_members("c.Employees", &mut diagnostics);
        let second = flattener.flattened_members("c.Employees", &mut diagnostics);
        assert_eq!(first, second);
    }

    #[test]
    fn test_flatten_rebases_references() {
        let csn = r#"{
            "definitions": {
                "a.Codes": { "kind": "entity", "elements": { "code": { "key": true, "type": "cds.String" } } },
                "a.Coded": { "kind": "aspect", "elements": {
                    "kind": { "type": "cds.Association", "target": "a.Codes" }
                } },
                "b.Orders": { "kind": "entity", "includes": ["a.Coded"] }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let ancestor = flattener.flattened_members("a.Coded", &mut diagnostics);
        assert_eq!(render(&ancestor), vec!["kind?: Code;"]);
        let orders = flattener.flattened_members("b.Orders", &mut diagnostics);
        assert_eq!(render(&orders), vec!["kind?: _a.Code;"]);
    }

    #[test]
    fn test_missing_ancestor_is_reported() {
        let csn = r#"{
            "definitions": {
                "Orders": { "kind": "entity", "includes": ["Nowhere"], "elements": { "ID": { "type": "cds.UUID" } } }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let members = flattener.flattened_members("Orders", &mut diagnostics);
        assert_eq!(render(&members), vec!["ID?: string;"]);
        assert_eq!(diagnostics.count(DiagnosticKind::UnresolvedReference), 1);
    }

    #[test]
    fn test_inheritance_cycle() {
        let csn = r#"{
            "definitions": {
                "A": { "kind": "aspect", "includes": ["B"], "elements": { "a": { "type": "cds.String" } } },
                "B": { "kind": "aspect", "includes": ["A"], "elements": { "b": { "type": "cds.String" } } }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let members = flattener.flattened_members("A", &mut diagnostics);
        assert_eq!(render(&members), vec!["a?: string;", "b?: string;"]);
        assert_eq!(diagnostics.count(DiagnosticKind::InheritanceCycle), 1);
    }

    #[test]
    fn test_cycle_result_independent_of_order() {
        let csn = r#"{
            "definitions": {
                "A": { "kind": "aspect", "includes": ["B"], "elements": { "a": { "type": "cds.String" } } },
                "B": { "kind": "aspect", "includes": ["A"], "elements": { "b": { "type": "cds.String" } } }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();

        let mut fresh = Flattener::new(&ir, &config);
        let alone = fresh.flattened_members("B", &mut diagnostics);
        assert_eq!(render(&alone), vec!["b?: string;", "a?: string;"]);

        let mut flattener = Flattener::new(&ir, &config);
        flattener.flattened_members("A", &mut diagnostics);
        let after_a = flattener.flattened_members("B", &mut diagnostics);
        assert_eq!(after_a, alone);

        // Both ends of the cycle are cached once complete
        let again = flattener.flattened_members("A", &mut diagnostics);
        assert_eq!(render(&again), vec!["a?: string;", "b?: string;"]);
    }

    #[test]
    fn test_cycle_below_shared_ancestor() {
        let csn = r#"{
            "definitions": {
                "Base": { "kind": "aspect", "includes": ["Mid"], "elements": { "base": { "type": "cds.String" } } },
                "Mid": { "kind": "aspect", "includes": ["Base"], "elements": { "mid": { "type": "cds.String" } } },
                "Top": { "kind": "entity", "includes": ["Mid"], "elements": { "top": { "type": "cds.String" } } }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();

        let mut fresh = Flattener::new(&ir, &config);
        let mid_alone = fresh.flattened_members("Mid", &mut diagnostics);

        let mut flattener = Flattener::new(&ir, &config);
        let top = flattener.flattened_members("Top", &mut diagnostics);
        assert_eq!(render(&top), vec!["top?: string;", "mid?: string;", "base?: string;"]);
        assert_eq!(flattener.flattened_members("Mid", &mut diagnostics), mid_alone);
    }

    #[test]
    fn test_merge_adds_missing() {
        let mut diagnostics = Diagnostics::new();
        let mut target = vec![member("id", TsType::Primitive("string"))];
        merge_members(
            &mut target,
            &[member("name", TsType::Primitive("string"))],
            "ns",
            &mut diagnostics,
        );
        assert_eq!(render(&target), vec!["id?: string;", "name?: string;"]);
    }

    #[test]
    fn test_merge_order_decides_union_order() {
        let mut diagnostics = Diagnostics::new();
        let a = [member("x", TsType::Primitive("string"))];
        let b = [member("x", TsType::Primitive("number"))];

        let mut forward = Vec::new();
        merge_members(&mut forward, &a, "ns", &mut diagnostics);
        merge_members(&mut forward, &b, "ns", &mut diagnostics);
        assert_eq!(render(&forward), vec!["x?: string | number;"]);

        let mut backward = Vec::new();
        merge_members(&mut backward, &b, "ns", &mut diagnostics);
        merge_members(&mut backward, &a, "ns", &mut diagnostics);
        assert_eq!(render(&backward), vec!["x?: number | string;"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut diagnostics = Diagnostics::new();
        let inherited = [
            member("x", TsType::Primitive("number")),
            member("y", TsType::Primitive("boolean")),
        ];
        let mut target = vec![member("x", TsType::Primitive("string"))];

        merge_members(&mut target, &inherited, "ns", &mut diagnostics);
        let once = target.clone();
        merge_members(&mut target, &inherited, "ns", &mut diagnostics);
        assert_eq!(target, once);
    }

    #[test]
    fn test_merge_keeps_optionality() {
        let mut diagnostics = Diagnostics::new();
        let mut target = vec![Member::typed("id", false, TsType::Primitive("string"), "ns")];
        merge_members(
            &mut target,
            &[member("id", TsType::Primitive("number"))],
            "ns",
            &mut diagnostics,
        );
        assert_eq!(render(&target), vec!["id: string | number;"]);
    }

    #[test]
    fn test_member_type_lookup() {
        let textual = Member::textual("title", true, "_a.Book[\"title\"]", "b");
        assert_eq!(
            member_type(&textual, "b"),
            TypeLookup::Textual("_a.Book[\"title\"]".to_string())
        );
        assert_eq!(member_type(&textual, "c"), TypeLookup::Opaque);

        let quoted = Member::textual("a:b", true, "string", "b");
        assert_eq!(
            member_type(&quoted, "b"),
            TypeLookup::Textual("string".to_string())
        );

        let escaped = Member::textual("a\"b:c", true, "number", "b");
        assert_eq!(escaped.text, "\"a\\\"b:c\"?: number;");
        assert_eq!(
            member_type(&escaped, "b"),
            TypeLookup::Textual("number".to_string())
        );

        let typed = member("id", TsType::Primitive("string"));
        assert_eq!(
            member_type(&typed, "elsewhere"),
            TypeLookup::Structured(TsType::Primitive("string"))
        );
    }

    #[test]
    fn test_only_unrecovered_types_are_reported() {
        let mut diagnostics = Diagnostics::new();
        let textual = Member::textual("title", true, "Book[\"title\"]", "ns");
        let opaque = Member::textual("title", true, "", "ns");
        let mut target = vec![member("title", TsType::Primitive("string"))];

        merge_members(&mut target, &[textual], "ns", &mut diagnostics);
        assert!(diagnostics.is_empty());
        assert_eq!(render(&target), vec!["title?: string | Book[\"title\"];"]);

        merge_members(&mut target, &[opaque], "ns", &mut diagnostics);
        assert_eq!(diagnostics.count(DiagnosticKind::TypeTextFallback), 1);
    }

    #[test]
    fn test_textual_member_does_not_cross_namespaces() {
        let csn = r#"{
            "definitions": {
                "a.Books": { "kind": "entity", "elements": { "title": { "type": "cds.String" } } },
                "a.Titled": { "kind": "aspect", "elements": {
                    "title": { "type": { "ref": ["a.Books", "title"] } }
                } },
                "a.Posters": { "kind": "entity", "includes": ["a.Titled"] },
                "b.Films": { "kind": "entity", "includes": ["a.Titled"] }
            }
        }"#;
        let ir = SchemaIr::from_schema(&parse_csn(csn).expect("Failed to parse"));
        let config = GeneratorConfig::default();
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(&ir, &config);

        let posters = flattener.flattened_members("a.Posters", &mut diagnostics);
        assert_eq!(render(&posters), vec!["title?: Book[\"title\"];"]);
        assert!(diagnostics.is_empty());

        let films = flattener.flattened_members("b.Films", &mut diagnostics);
        assert_eq!(render(&films), vec!["title?: any;"]);
        assert_eq!(diagnostics.count(DiagnosticKind::TypeTextFallback), 1);
    }
}
