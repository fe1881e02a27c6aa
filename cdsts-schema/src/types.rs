//! Schema definition types.
//!
//! This module contains the data structures representing classified CSN
//! definitions: entities, structured types, type aliases, enums, actions
//! and functions, together with the compiled schema that owns them.

use crate::elements::{Element, TypeRef};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;

/// Complete compiled schema.
#[derive(Debug, Clone, Default)]
pub struct CompiledSchema {
    /// Top-level namespace declared by the schema, if any.
    pub namespace: Option<String>,
    /// Definitions in declaration order.
    pub definitions: Vec<Definition>,
    /// Definition lookup map (built while adding).
    index: HashMap<String, usize>,
}

impl CompiledSchema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition to the schema.
    ///
    /// A definition with an already known name replaces the previous one in
    /// place so declaration order stays stable.
    pub fn add_definition(&mut self, definition: Definition) {
        if let Some(&idx) = self.index.get(&definition.name) {
            self.definitions[idx] = definition;
            return;
        }
        let index = self.definitions.len();
        self.index.insert(definition.name.clone(), index);
        self.definitions.push(definition);
    }

    /// Looks up a definition by fully-qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&idx| &self.definitions[idx])
    }

    /// Returns true if a definition with the given name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Builds the lookup map from the definitions vector.
    pub fn build_index(&mut self) {
        self.index.clear();
        for (idx, definition) in self.definitions.iter().enumerate() {
            self.index.insert(definition.name.clone(), idx);
        }
    }

    /// Returns the number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the schema holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Definition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    /// Persisted entity (also views).
    Entity,
    /// Aspect, a reusable structural fragment.
    Aspect,
    /// Structured type or scalar type alias.
    Type,
    /// Enumeration type.
    Enum,
    /// Unbound action.
    Action,
    /// Unbound function.
    Function,
    /// Service grouping.
    Service,
    /// Context or namespace grouping.
    Context,
}

impl DefinitionKind {
    /// Classifies a CSN `kind` string.
    ///
    /// Types carrying an `enum` become [`DefinitionKind::Enum`]. Unknown kinds
    /// yield `None`.
    #[must_use]
    pub fn classify(kind: &str, has_enum: bool) -> Option<Self> {
        match kind {
            "entity" | "view" => Some(Self::Entity),
            "aspect" => Some(Self::Aspect),
            "type" if has_enum => Some(Self::Enum),
            "type" => Some(Self::Type),
            "action" => Some(Self::Action),
            "function" => Some(Self::Function),
            "service" => Some(Self::Service),
            "context" | "namespace" => Some(Self::Context),
            _ => None,
        }
    }

    /// Returns true for services and contexts.
    #[must_use]
    pub const fn is_grouping(&self) -> bool {
        matches!(self, Self::Service | Self::Context)
    }

    /// Returns true for actions and functions.
    #[must_use]
    pub const fn is_action_function(&self) -> bool {
        matches!(self, Self::Action | Self::Function)
    }
}

/// Single classified schema definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Fully-qualified name.
    pub name: String,
    /// Definition kind.
    pub kind: DefinitionKind,
    /// Elements in declaration order.
    pub elements: Vec<Element>,
    /// Declared ancestors (fully-qualified names).
    pub includes: Vec<String>,
    /// Underlying type of aliases and enums.
    pub type_ref: Option<TypeRef>,
    /// Values of an enum.
    pub enum_values: Vec<EnumValue>,
    /// Parameters of an action or function.
    pub params: Vec<Element>,
    /// Result of an action or function.
    pub returns: Option<Element>,
    /// Definition annotations.
    pub annotations: Annotations,
    /// Doc comment.
    pub doc: Option<String>,
}

impl Definition {
    /// Creates a new empty definition.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DefinitionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            elements: Vec::new(),
            includes: Vec::new(),
            type_ref: None,
            enum_values: Vec::new(),
            params: Vec::new(),
            returns: None,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Looks up an element by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Returns the key elements.
    pub fn key_elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.key)
    }

    /// Returns true if the definition is emitted as a structural type.
    ///
    /// Entities, aspects and types with elements qualify.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        match self.kind {
            DefinitionKind::Entity | DefinitionKind::Aspect => true,
            DefinitionKind::Type => self.type_ref.is_none() || !self.elements.is_empty(),
            _ => false,
        }
    }

    /// Returns the last dotted segment of the name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Literal value.
    pub value: EnumLiteral,
    /// Doc comment.
    pub doc: Option<String>,
}

impl EnumValue {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: EnumLiteral) -> Self {
        Self {
            name: name.into(),
            value,
            doc: None,
        }
    }
}

/// Literal value of an enum member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumLiteral {
    /// String literal.
    String(String),
    /// Numeric literal, kept in its source text form.
    Number(String),
}

/// Annotations attached to a definition or element (`@key: value`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    entries: IndexMap<String, Value>,
}

impl Annotations {
    /// Creates an empty annotation set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an annotation. The key is stored with its leading `@`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let key = if key.starts_with('@') {
            key
        } else {
            format!("@{key}")
        };
        self.entries.insert(key, value);
    }

    /// Returns the raw annotation value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        if key.starts_with('@') {
            self.entries.get(key)
        } else {
            self.entries.get(&format!("@{key}"))
        }
    }

    /// Returns a string-valued annotation.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns true if no annotations are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_kind() {
        assert_eq!(
            DefinitionKind::classify("entity", false),
            Some(DefinitionKind::Entity)
        );
        assert_eq!(
            DefinitionKind::classify("view", false),
            Some(DefinitionKind::Entity)
        );
        assert_eq!(
            DefinitionKind::classify("type", true),
            Some(DefinitionKind::Enum)
        );
        assert_eq!(
            DefinitionKind::classify("type", false),
            Some(DefinitionKind::Type)
        );
        assert_eq!(
            DefinitionKind::classify("function", false),
            Some(DefinitionKind::Function)
        );
        assert_eq!(DefinitionKind::classify("annotation", false), None);
    }

    #[test]
    fn test_schema_lookup() {
        let mut schema = CompiledSchema::new();
        schema.add_definition(Definition::new("a.Books", DefinitionKind::Entity));
        schema.add_definition(Definition::new("a.Genre", DefinitionKind::Enum));

        assert!(schema.contains("a.Books"));
        assert!(!schema.contains("a.Authors"));
        assert_eq!(schema.get("a.Genre").map(|d| d.kind), Some(DefinitionKind::Enum));
        assert_eq!(schema.len(), 2);
    }

    #[test]
    fn test_schema_replace_keeps_order() {
        let mut schema = CompiledSchema::new();
        schema.add_definition(Definition::new("a.X", DefinitionKind::Type));
        schema.add_definition(Definition::new("a.Y", DefinitionKind::Type));
        schema.add_definition(Definition::new("a.X", DefinitionKind::Entity));

        assert_eq!(schema.len(), 2);
        assert_eq!(schema.definitions[0].name, "a.X");
        assert_eq!(schema.definitions[0].kind, DefinitionKind::Entity);
    }

    #[test]
    fn test_schema_build_index() {
        let mut schema = CompiledSchema::new();
        schema
            .definitions
            .push(Definition::new("s.Orders", DefinitionKind::Entity));
        assert!(!schema.contains("s.Orders"));

        schema.build_index();
        assert!(schema.contains("s.Orders"));
    }

    #[test]
    fn test_is_structured() {
        let entity = Definition::new("a.Books", DefinitionKind::Entity);
        assert!(entity.is_structured());

        let mut alias = Definition::new("a.Price", DefinitionKind::Type);
        alias.type_ref = Some(TypeRef::Builtin("cds.Decimal".to_string()));
        assert!(!alias.is_structured());

        let enum_def = Definition::new("a.Genre", DefinitionKind::Enum);
        assert!(!enum_def.is_structured());
    }

    #[test]
    fn test_annotations() {
        let mut annotations = Annotations::new();
        annotations.insert("@singular", json!("Book"));
        annotations.insert("plural", json!("Books"));
        annotations.insert("@readonly", json!(true));

        assert_eq!(annotations.get_str("singular"), Some("Book"));
        assert_eq!(annotations.get_str("@plural"), Some("Books"));
        assert_eq!(annotations.get_str("@readonly"), None);
        assert!(annotations.get("@readonly").is_some());
    }

    #[test]
    fn test_short_name() {
        let def = Definition::new("sap.common.Countries", DefinitionKind::Entity);
        assert_eq!(def.short_name(), "Countries");
    }
}
