//! Namespace containers.
//!
//! A [`NamespaceModel`] groups the definitions owned by one namespace, one
//! service, or the unnamed root scope and classifies them into entities,
//! enums, type aliases and actions/functions.

use crate::naming::sanitize_identifier;
use crate::types::{Definition, DefinitionKind, EnumLiteral, EnumValue};
use std::collections::HashSet;
use std::path::PathBuf;

/// Name of the root scope. No legal namespace name is empty.
pub const ROOT_NAMESPACE: &str = "";

/// Name of the generated enumeration of fully-qualified entity names.
pub const ENTITY_ENUM: &str = "Entity";

/// Name of the generated enumeration of sanitized entity names.
pub const SANITIZED_ENTITY_ENUM: &str = "SanitizedEntity";

/// Kind of scope a namespace model represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Unnamed root scope.
    Root,
    /// Namespace or context.
    Namespace,
    /// Service.
    Service,
}

/// Definitions belonging to one namespace, service, or the root scope.
#[derive(Debug, Clone)]
pub struct NamespaceModel {
    /// Namespace name ([`ROOT_NAMESPACE`] for the root scope).
    pub name: String,
    /// Scope kind.
    pub kind: NamespaceKind,
    /// Entities, aspects and structured types.
    pub entities: Vec<Definition>,
    /// Enumerations.
    pub enums: Vec<Definition>,
    /// Scalar type aliases.
    pub type_aliases: Vec<Definition>,
    /// Unbound actions and functions.
    pub action_functions: Vec<Definition>,
    /// Number of generated enums at the tail of `enums`.
    derived_enums: usize,
}

impl NamespaceModel {
    /// Creates an empty namespace model.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: NamespaceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            entities: Vec::new(),
            enums: Vec::new(),
            type_aliases: Vec::new(),
            action_functions: Vec::new(),
            derived_enums: 0,
        }
    }

    /// Creates the root scope model.
    #[must_use]
    pub fn root() -> Self {
        Self::new(ROOT_NAMESPACE, NamespaceKind::Root)
    }

    /// Builds a namespace model by classifying the given definitions.
    #[must_use]
    pub fn from_definitions<'a>(
        name: impl Into<String>,
        kind: NamespaceKind,
        definitions: impl IntoIterator<Item = &'a Definition>,
    ) -> Self {
        let mut model = Self::new(name, kind);
        for definition in definitions {
            model.classify(definition);
        }
        model
    }

    /// Returns true for the root scope.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name == ROOT_NAMESPACE
    }

    /// Classifies a definition into one of the four lists.
    ///
    /// Returns false for groupings, which are not declarations.
    pub fn classify(&mut self, definition: &Definition) -> bool {
        let target = match definition.kind {
            DefinitionKind::Enum => &mut self.enums,
            DefinitionKind::Action | DefinitionKind::Function => &mut self.action_functions,
            DefinitionKind::Service | DefinitionKind::Context => return false,
            _ if definition.is_structured() => &mut self.entities,
            _ => &mut self.type_aliases,
        };
        target.push(definition.clone());
        true
    }

    /// Returns the name of a definition relative to this namespace.
    #[must_use]
    pub fn local_name<'a>(&self, fqn: &'a str) -> &'a str {
        if self.is_root() {
            return fqn;
        }
        fqn.strip_prefix(self.name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(fqn)
    }

    /// Returns the dotted segments of the name. Empty for the root scope.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        namespace_segments(&self.name)
    }

    /// Returns the output directory relative to the output root.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        self.segments().into_iter().collect()
    }

    /// Returns true if the namespace declares nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.enums.is_empty()
            && self.type_aliases.is_empty()
            && self.action_functions.is_empty()
    }

    /// Builds the two entity-name enumerations.
    ///
    /// The first maps each entity to its fully-qualified name, the second to
    /// its sanitized identifier. Names that sanitize to the same identifier
    /// get a numeric suffix (`Books_texts_2`) in first-seen order.
    #[must_use]
    pub fn entity_name_enums(&self) -> [Definition; 2] {
        let mut raw = Definition::new(self.qualify(ENTITY_ENUM), DefinitionKind::Enum);
        let mut sanitized =
            Definition::new(self.qualify(SANITIZED_ENTITY_ENUM), DefinitionKind::Enum);
        let mut seen = HashSet::new();

        for entity in self
            .entities
            .iter()
            .filter(|e| e.kind == DefinitionKind::Entity)
        {
            let base = sanitize_identifier(self.local_name(&entity.name));
            let mut identifier = base.clone();
            let mut n = 1;
            while !seen.insert(identifier.clone()) {
                n += 1;
                identifier = format!("{}_{}", base, n);
            }
            raw.enum_values.push(EnumValue::new(
                identifier.clone(),
                EnumLiteral::String(entity.name.clone()),
            ));
            sanitized.enum_values.push(EnumValue::new(
                identifier.clone(),
                EnumLiteral::String(identifier),
            ));
        }

        [raw, sanitized]
    }

    /// Appends the entity-name enumerations to the enum list.
    ///
    /// Calling this more than once has no further effect.
    pub fn append_entity_name_enums(&mut self) {
        if self.derived_enums > 0 {
            return;
        }
        let derived = self.entity_name_enums();
        self.derived_enums = derived.len();
        self.enums.extend(derived);
    }

    /// Returns the enums declared by the schema.
    #[must_use]
    pub fn declared_enums(&self) -> &[Definition] {
        &self.enums[..self.enums.len() - self.derived_enums]
    }

    /// Returns the generated entity-name enums, empty until appended.
    #[must_use]
    pub fn derived_enums(&self) -> &[Definition] {
        &self.enums[self.enums.len() - self.derived_enums..]
    }

    fn qualify(&self, local: &str) -> String {
        if self.is_root() {
            local.to_string()
        } else {
            format!("{}.{}", self.name, local)
        }
    }
}

/// Splits a namespace name into segments without empty leading segments.
#[must_use]
pub fn namespace_segments(name: &str) -> Vec<&str> {
    name.split('.').filter(|s| !s.is_empty()).collect()
}
