//! TypeScript type expressions and members.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::resolver::{RESERVED_ELEMENTS, ReferenceResolver, Resolution, TypeReference};
use cdsts_schema::{Cardinality, Element, TypeRef};

/// TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive (`string`, `number`, `boolean`, `Buffer`).
    Primitive(&'static str),
    /// Reference to an emitted declaration.
    Reference(TypeReference),
    /// Array of items.
    Array(Box<TsType>),
    /// Union of alternatives, first-seen order.
    Union(Vec<TsType>),
    /// Inline object type.
    Object(Vec<Member>),
    /// Literal type text, valid only in the namespace it was rendered in.
    Text(String),
    /// Unknown type (`any`).
    Opaque,
}

impl TsType {
    /// Renders the type expression.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Primitive(name) => (*name).to_string(),
            Self::Reference(reference) => reference.render(),
            Self::Array(items) => match items.as_ref() {
                Self::Union(_) => format!("({})[]", items.render()),
                other => format!("{}[]", other.render()),
            },
            Self::Union(branches) => branches
                .iter()
                .map(Self::render)
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Object(members) if members.is_empty() => "{}".to_string(),
            Self::Object(members) => {
                let body: Vec<&str> = members.iter().map(|m| m.text.as_str()).collect();
                format!("{{ {} }}", body.join(" "))
            }
            Self::Text(text) => text.clone(),
            Self::Opaque => "any".to_string(),
        }
    }

    /// Returns the type as used from another namespace.
    ///
    /// Literal text is not rewritten.
    #[must_use]
    pub fn rebase(&self, source: &str) -> Self {
        match self {
            Self::Reference(reference) => Self::Reference(reference.rebase(source)),
            Self::Array(items) => Self::Array(Box::new(items.rebase(source))),
            Self::Union(branches) => {
                Self::Union(branches.iter().map(|b| b.rebase(source)).collect())
            }
            Self::Object(members) => {
                Self::Object(members.iter().map(|m| m.rebase(source)).collect())
            }
            other => other.clone(),
        }
    }

    /// Returns true if the type carries literal text anywhere.
    #[must_use]
    pub fn contains_text(&self) -> bool {
        match self {
            Self::Text(_) => true,
            Self::Array(items) => items.contains_text(),
            Self::Union(branches) => branches.iter().any(Self::contains_text),
            Self::Object(members) => members
                .iter()
                .any(|m| m.ty.as_ref().is_none_or(Self::contains_text)),
            Self::Primitive(_) | Self::Reference(_) | Self::Opaque => false,
        }
    }

    /// Collects all declaration references in the type.
    pub fn collect_references<'a>(&'a self, out: &mut Vec<&'a TypeReference>) {
        match self {
            Self::Reference(reference) => out.push(reference),
            Self::Array(items) => items.collect_references(out),
            Self::Union(branches) => {
                for branch in branches {
                    branch.collect_references(out);
                }
            }
            Self::Object(members) => {
                for member in members {
                    if let Some(ty) = &member.ty {
                        ty.collect_references(out);
                    }
                }
            }
            Self::Primitive(_) | Self::Text(_) | Self::Opaque => {}
        }
    }

    /// Widens this type with another into a union.
    ///
    /// Branches of `other` that render identically to an existing branch
    /// are dropped; existing branches keep their position.
    #[must_use]
    pub fn union_with(&self, other: &Self) -> Self {
        let mut branches = self.branches();
        for branch in other.branches() {
            let rendered = branch.render();
            if !branches.iter().any(|b| b.render() == rendered) {
                branches.push(branch);
            }
        }
        if branches.len() == 1 {
            branches.remove(0)
        } else {
            Self::Union(branches)
        }
    }

    fn branches(&self) -> Vec<Self> {
        match self {
            Self::Union(branches) => branches.clone(),
            other => vec![other.clone()],
        }
    }
}

/// Property of an interface, class or inline object.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    /// Property name.
    pub name: String,
    /// True if the property may be absent.
    pub optional: bool,
    /// Structured type, if one is known.
    pub ty: Option<TsType>,
    /// Declaration text, e.g. `title?: string;`.
    pub text: String,
    /// Namespace the text was rendered in.
    pub namespace: String,
}

impl Member {
    /// Creates a member with a structured type.
    #[must_use]
    pub fn typed(name: impl Into<String>, optional: bool, ty: TsType, namespace: &str) -> Self {
        let name = name.into();
        let text = declaration_text(&name, optional, &ty.render());
        Self {
            name,
            optional,
            ty: Some(ty),
            text,
            namespace: namespace.to_string(),
        }
    }

    /// Creates a member known only by its rendered type text.
    #[must_use]
    pub fn textual(
        name: impl Into<String>,
        optional: bool,
        type_text: &str,
        namespace: &str,
    ) -> Self {
        let name = name.into();
        let text = declaration_text(&name, optional, type_text);
        Self {
            name,
            optional,
            ty: None,
            text,
            namespace: namespace.to_string(),
        }
    }

    /// Returns a copy with a different type.
    #[must_use]
    pub fn with_type(&self, ty: TsType) -> Self {
        Self::typed(self.name.clone(), self.optional, ty, &self.namespace)
    }

    /// Returns the member as used from another namespace.
    ///
    /// Members carrying literal text are returned unchanged, still marked
    /// with their original namespace.
    #[must_use]
    pub fn rebase(&self, source: &str) -> Self {
        match &self.ty {
            Some(ty) if !ty.contains_text() => {
                Self::typed(self.name.clone(), self.optional, ty.rebase(source), source)
            }
            _ => self.clone(),
        }
    }

    /// Renders the member as a class field.
    #[must_use]
    pub fn render_field(&self) -> String {
        let ty = self
            .ty
            .as_ref()
            .map_or_else(|| "any".to_string(), TsType::render);
        let marker = if self.optional { "?" } else { "!" };
        format!("{}{}: {};", property_key(&self.name), marker, ty)
    }
}

fn declaration_text(name: &str, optional: bool, type_text: &str) -> String {
    let marker = if optional { "?" } else { "" };
    format!("{}{}: {};", property_key(name), marker, type_text)
}

/// Returns the property key, quoted unless it is a plain identifier.
#[must_use]
pub fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", escape_string(name))
    }
}

/// Escapes a string for a double-quoted TypeScript literal.
#[must_use]
pub fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Maps a built-in CDS type to its TypeScript primitive.
#[must_use]
pub fn builtin_type(name: &str) -> Option<&'static str> {
    let short = name.strip_prefix("cds.").unwrap_or(name);
    let ts = match short {
        "String" | "LargeString" | "UUID" | "Date" | "Time" | "DateTime" | "Timestamp" => {
            "string"
        }
        "Integer" | "Int16" | "Int32" | "Int64" | "Integer64" | "UInt8" | "Decimal"
        | "DecimalFloat" | "Double" => "number",
        "Boolean" => "boolean",
        "Binary" | "LargeBinary" => "Buffer",
        _ => return None,
    };
    Some(ts)
}

/// Maps schema types to TypeScript types from one source namespace.
pub struct TypeMapper<'a> {
    resolver: &'a ReferenceResolver<'a>,
}

impl<'a> TypeMapper<'a> {
    /// Creates a new type mapper.
    #[must_use]
    pub fn new(resolver: &'a ReferenceResolver<'a>) -> Self {
        Self { resolver }
    }

    /// Maps a type reference. Gaps fall back to `any` with a diagnostic.
    pub fn map(&self, type_ref: &TypeRef, subject: &str, diagnostics: &mut Diagnostics) -> TsType {
        match type_ref {
            TypeRef::Builtin(name) => match builtin_type(name) {
                Some(primitive) => TsType::Primitive(primitive),
                None => {
                    diagnostics.report(
                        DiagnosticKind::OpaqueBuiltin,
                        self.resolver.source(),
                        subject,
                        format!("no TypeScript mapping for '{}'", name),
                    );
                    TsType::Opaque
                }
            },
            TypeRef::Named(name) => self.reference(name, false, subject, diagnostics),
            TypeRef::Association(assoc) => self.reference(
                &assoc.target,
                assoc.cardinality == Cardinality::Many,
                subject,
                diagnostics,
            ),
            TypeRef::Array(items) => TsType::Array(Box::new(self.map(items, subject, diagnostics))),
            TypeRef::Inline(elements) => TsType::Object(self.members(elements, subject, diagnostics)),
            TypeRef::Expression { target, path } => {
                match self.reference(target, false, subject, diagnostics) {
                    TsType::Opaque => TsType::Opaque,
                    base => TsType::Text(indexed_access(&base.render(), path)),
                }
            }
            TypeRef::Unknown => {
                diagnostics.report(
                    DiagnosticKind::UnresolvedReference,
                    self.resolver.source(),
                    subject,
                    "no type information",
                );
                TsType::Opaque
            }
        }
    }

    /// Maps elements to members, foreign keys following their association.
    pub fn members(
        &self,
        elements: &[Element],
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Member> {
        let mut members = Vec::with_capacity(elements.len());
        for element in elements {
            members.push(self.member(element, subject, diagnostics));
            members.extend(self.foreign_keys(element, subject, diagnostics));
        }
        members
    }

    /// Maps one element to a member.
    pub fn member(&self, element: &Element, subject: &str, diagnostics: &mut Diagnostics) -> Member {
        let source = self.resolver.source();
        let optional = element.is_nullable();
        let element_subject = format!("{}.{}", subject, element.name);

        if RESERVED_ELEMENTS.contains(&element.name.as_str()) && self.leaves_namespace(element) {
            return Member::typed(element.name.clone(), optional, TsType::Opaque, source);
        }

        match &element.type_ref {
            TypeRef::Expression { target, path } => {
                match self.reference(target, false, &element_subject, diagnostics) {
                    TsType::Opaque => {
                        Member::typed(element.name.clone(), optional, TsType::Opaque, source)
                    }
                    base => Member::textual(
                        element.name.clone(),
                        optional,
                        &indexed_access(&base.render(), path),
                        source,
                    ),
                }
            }
            type_ref => {
                let ty = self.map(type_ref, &element_subject, diagnostics);
                Member::typed(element.name.clone(), optional, ty, source)
            }
        }
    }

    /// Builds the foreign key members of a managed to-one association.
    ///
    /// Each key `k` of association `a` yields `a_k`, typed like the
    /// target's key element.
    pub fn foreign_keys(
        &self,
        element: &Element,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> Vec<Member> {
        let Some(assoc) = element.association() else {
            return Vec::new();
        };
        if !assoc.is_managed_to_one() {
            return Vec::new();
        }
        let target = self.resolver.ir().definition(&assoc.target);

        assoc
            .keys
            .iter()
            .map(|key| {
                let name = format!("{}_{}", element.name, key);
                let key_subject = format!("{}.{}", subject, name);
                let ty = match target.and_then(|t| t.element(key)) {
                    Some(key_element) => self.map(&key_element.type_ref, &key_subject, diagnostics),
                    None => {
                        diagnostics.report(
                            DiagnosticKind::UnresolvedReference,
                            self.resolver.source(),
                            key_subject,
                            format!("key '{}' not found on '{}'", key, assoc.target),
                        );
                        TsType::Opaque
                    }
                };
                Member::typed(name, element.is_nullable(), ty, self.resolver.source())
            })
            .collect()
    }

    fn reference(
        &self,
        fqn: &str,
        collection: bool,
        subject: &str,
        diagnostics: &mut Diagnostics,
    ) -> TsType {
        match self.resolver.resolve(fqn, collection) {
            Resolution::Found(reference) => TsType::Reference(reference),
            Resolution::Unresolved(name) => {
                diagnostics.report(
                    DiagnosticKind::UnresolvedReference,
                    self.resolver.source(),
                    subject,
                    format!("'{}' not found", name),
                );
                TsType::Opaque
            }
        }
    }

    fn leaves_namespace(&self, element: &Element) -> bool {
        let ir = self.resolver.ir();
        element
            .type_ref
            .referenced_names()
            .into_iter()
            .any(|name| ir.owner_of(name) != self.resolver.source())
    }
}

fn indexed_access(base: &str, path: &[String]) -> String {
    let mut text = base.to_string();
    for segment in path {
        text.push_str(&format!("[\"{}\"]", escape_string(segment)));
    }
    text
}
