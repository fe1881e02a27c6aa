//! Cross-namespace reference resolution.
//!
//! Every type reference that leaves the namespace being emitted becomes an
//! import of the target namespace under a deterministic alias, plus a
//! qualified use site `alias.TypeName`.

use crate::config::GeneratorConfig;
use cdsts_schema::ir::SchemaIr;
use cdsts_schema::namespace::{NamespaceModel, namespace_segments};
use cdsts_schema::naming::{sanitize_identifier, to_pascal_case};
use cdsts_schema::types::{Definition, DefinitionKind};
use cdsts_schema::{Element, TypeRef};
use std::collections::HashSet;

/// Element names that never produce imports.
pub const RESERVED_ELEMENTS: &[&str] = &["texts", "localized"];

/// A namespace-qualified name as seen from one source namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Qualifier {
    /// Target namespace.
    pub namespace: String,
    /// Local type name inside the target namespace, if any.
    pub type_name: Option<String>,
    /// Relative path from the source namespace to the target.
    pub path: String,
}

impl Qualifier {
    /// Returns the identifier under which the target is referenced.
    #[must_use]
    pub fn alias(&self) -> String {
        alias(self)
    }

    /// Returns the module specifier used by the import statement.
    #[must_use]
    pub fn module_specifier(&self) -> String {
        if self.path.starts_with("..") {
            self.path.clone()
        } else {
            format!("./{}", self.path)
        }
    }

    /// Renders the import statement for this namespace.
    #[must_use]
    pub fn import_statement(&self) -> String {
        format!(
            "import * as {} from \"{}\";",
            namespace_alias(&self.namespace),
            self.module_specifier()
        )
    }
}

/// Computes the relative path between two namespaces.
///
/// Both names are split into dotted segments. The path climbs one `..`
/// per source segment below the common prefix, then descends into the
/// remaining target segments. Equal namespaces yield the empty string.
#[must_use]
pub fn relative_path(from: &str, to: &str) -> String {
    let from = namespace_segments(from);
    let to = namespace_segments(to);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from.len() - common];
    parts.extend(&to[common..]);
    parts.join("/")
}

/// Returns the import alias of a namespace.
///
/// Segments are joined with `_` behind a leading `_`. Characters other
/// than ASCII letters and digits are escaped as `$<hex>$`, so distinct
/// namespaces always get distinct aliases (`a.b` and `a_b` included).
#[must_use]
pub fn namespace_alias(namespace: &str) -> String {
    let segments: Vec<String> = namespace_segments(namespace)
        .into_iter()
        .map(escape_segment)
        .collect();
    format!("_{}", segments.join("_"))
}

/// Returns the qualified name of a qualifier: its namespace alias, followed
/// by `.TypeName` when a type name is present.
#[must_use]
pub fn alias(qualifier: &Qualifier) -> String {
    let base = namespace_alias(&qualifier.namespace);
    match &qualifier.type_name {
        Some(type_name) => format!("{}.{}", base, type_name),
        None => base,
    }
}

fn escape_segment(segment: &str) -> String {
    let mut escaped = String::with_capacity(segment.len());
    for c in segment.chars() {
        if c.is_ascii_alphanumeric() {
            escaped.push(c);
        } else {
            escaped.push_str(&format!("${:x}$", u32::from(c)));
        }
    }
    escaped
}

/// Returns the emitted identifier of a definition.
///
/// Structured definitions use their singular name behind the entity
/// prefix, actions and functions PascalCase, everything else the sanitized
/// local name.
#[must_use]
pub fn declaration_name(ir: &SchemaIr, definition: &Definition, prefix: &str) -> String {
    if definition.is_structured() {
        let (singular, _) = ir.names(&definition.name);
        return format!("{}{}", prefix, sanitize_identifier(&singular));
    }
    let local = ir.local_name(&definition.name);
    match definition.kind {
        DefinitionKind::Action | DefinitionKind::Function => {
            sanitize_identifier(&to_pascal_case(local))
        }
        _ => sanitize_identifier(local),
    }
}

/// Resolved reference to an emitted declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeReference {
    /// Namespace the reference is used from.
    pub source: String,
    /// Namespace declaring the target.
    pub target: String,
    /// Emitted identifier of the target.
    pub type_name: String,
    /// Relative path from source to target.
    pub path: String,
    /// True for to-many uses (`Name[]`).
    pub collection: bool,
}

impl TypeReference {
    /// Returns true if the target lives in the source namespace.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.source == self.target
    }

    /// Renders the use site.
    #[must_use]
    pub fn render(&self) -> String {
        let base = if self.is_local() {
            self.type_name.clone()
        } else {
            alias(&Qualifier {
                namespace: self.target.clone(),
                type_name: Some(self.type_name.clone()),
                path: self.path.clone(),
            })
        };
        if self.collection {
            format!("{}[]", base)
        } else {
            base
        }
    }

    /// Returns this reference as used from another namespace.
    #[must_use]
    pub fn rebase(&self, source: &str) -> Self {
        Self {
            source: source.to_string(),
            path: relative_path(source, &self.target),
            ..self.clone()
        }
    }

    /// Returns the namespace qualifier needed to import the target.
    #[must_use]
    pub fn namespace_qualifier(&self) -> Qualifier {
        Qualifier {
            namespace: self.target.clone(),
            type_name: None,
            path: self.path.clone(),
        }
    }
}

/// Outcome of resolving a fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The name refers to an emitted declaration.
    Found(TypeReference),
    /// The name is absent from the schema or not emitted.
    Unresolved(String),
}

/// Resolves references from one source namespace.
pub struct ReferenceResolver<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
    source: String,
}

impl<'a> ReferenceResolver<'a> {
    /// Creates a resolver for the given source namespace.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, source: &str, config: &'a GeneratorConfig) -> Self {
        Self {
            ir,
            config,
            source: source.to_string(),
        }
    }

    /// Returns the source namespace.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the schema IR.
    #[must_use]
    pub fn ir(&self) -> &'a SchemaIr {
        self.ir
    }

    /// Returns the generator configuration.
    #[must_use]
    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    /// Splits a dotted path into namespace and type name.
    ///
    /// With `contains_type_name` the owning namespace comes from the schema
    /// and the remainder is the type name; otherwise the whole path is a
    /// namespace.
    #[must_use]
    pub fn qualify(&self, path: &str, contains_type_name: bool) -> Qualifier {
        let (namespace, type_name) = if contains_type_name {
            let namespace = self.ir.owner_of(path);
            let type_name = self.ir.local_name(path).to_string();
            (namespace, Some(type_name))
        } else {
            (path.to_string(), None)
        };
        Qualifier {
            path: relative_path(&self.source, &namespace),
            namespace,
            type_name,
        }
    }

    /// Resolves a fully-qualified name to an emitted declaration.
    #[must_use]
    pub fn resolve(&self, fqn: &str, collection: bool) -> Resolution {
        let Some(definition) = self.ir.definition(fqn) else {
            return Resolution::Unresolved(fqn.to_string());
        };
        let target = self.ir.owner_of(fqn);
        if definition.kind.is_grouping() || !self.ir.has_namespace(&target) {
            return Resolution::Unresolved(fqn.to_string());
        }
        Resolution::Found(TypeReference {
            source: self.source.clone(),
            path: relative_path(&self.source, &target),
            target,
            type_name: declaration_name(self.ir, definition, self.config.entity_prefix()),
            collection,
        })
    }

    /// Computes the namespaces referenced by a namespace's declarations.
    ///
    /// Scans ancestors and property types of entities (properties looked up
    /// by entity name in the full schema), foreign key types, alias types
    /// and action signatures. Absent targets and reserved element names are
    /// skipped. The result holds each external namespace once, in discovery
    /// order, and never the namespace itself.
    #[must_use]
    pub fn resolve_references(&self, namespace: &NamespaceModel) -> Vec<Qualifier> {
        let mut seen = HashSet::new();
        let mut imports = Vec::new();

        for entity in &namespace.entities {
            for include in &entity.includes {
                self.note(include, &mut seen, &mut imports);
            }
            let Some(definition) = self.ir.definition(&entity.name) else {
                continue;
            };
            for element in &definition.elements {
                if RESERVED_ELEMENTS.contains(&element.name.as_str()) {
                    continue;
                }
                self.note_element(element, &mut seen, &mut imports);
            }
        }

        for alias in &namespace.type_aliases {
            if let Some(type_ref) = &alias.type_ref {
                for name in type_ref.referenced_names() {
                    self.note(name, &mut seen, &mut imports);
                }
            }
        }

        for action in &namespace.action_functions {
            for element in action.params.iter().chain(action.returns.iter()) {
                self.note_element(element, &mut seen, &mut imports);
            }
        }

        imports
    }

    fn note_element(
        &self,
        element: &Element,
        seen: &mut HashSet<String>,
        imports: &mut Vec<Qualifier>,
    ) {
        for name in element.type_ref.referenced_names() {
            self.note(name, seen, imports);
        }
        // Foreign keys are typed after the target's key elements
        let TypeRef::Association(assoc) = &element.type_ref else {
            return;
        };
        if !assoc.is_managed_to_one() {
            return;
        }
        let Some(target) = self.ir.definition(&assoc.target) else {
            return;
        };
        for key_element in assoc.keys.iter().filter_map(|key| target.element(key)) {
            for name in key_element.type_ref.referenced_names() {
                self.note(name, seen, imports);
            }
        }
    }

    fn note(&self, fqn: &str, seen: &mut HashSet<String>, imports: &mut Vec<Qualifier>) {
        if self.ir.definition(fqn).is_none() {
            return;
        }
        let namespace = self.ir.owner_of(fqn);
        if namespace == self.source || !self.ir.has_namespace(&namespace) {
            return;
        }
        if seen.insert(namespace.clone()) {
            imports.push(self.qualify(&namespace, false));
        }
    }
}
