//! Intermediate representation for code generation.
//!
//! This module groups the compiled schema into its namespace forest: every
//! definition is assigned to exactly one namespace, service, or the root
//! scope. The full compiled schema stays available for lookups that cross
//! namespace boundaries.

use crate::error::SchemaError;
use crate::namespace::{NamespaceKind, NamespaceModel, ROOT_NAMESPACE};
use crate::naming;
use crate::types::{CompiledSchema, Definition, DefinitionKind};
use std::collections::HashMap;

/// Prefix of the generated localized shadow definitions.
pub const LOCALIZED_PREFIX: &str = "localized.";

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// The complete compiled schema (read-only lookups).
    pub schema: CompiledSchema,
    /// Namespaces, root scope first, then in first-seen order.
    pub namespaces: Vec<NamespaceModel>,
    /// Declared groupings (services, contexts, top-level namespace).
    groups: HashMap<String, NamespaceKind>,
    /// Namespace lookup map.
    namespace_index: HashMap<String, usize>,
}

impl SchemaIr {
    /// Creates an intermediate representation from a compiled schema.
    #[must_use]
    pub fn from_schema(schema: &CompiledSchema) -> Self {
        let mut ir = Self {
            schema: schema.clone(),
            namespaces: Vec::new(),
            groups: HashMap::new(),
            namespace_index: HashMap::new(),
        };

        if let Some(namespace) = &schema.namespace {
            ir.groups
                .insert(namespace.clone(), NamespaceKind::Namespace);
        }
        for definition in &schema.definitions {
            match definition.kind {
                DefinitionKind::Service => {
                    ir.groups
                        .insert(definition.name.clone(), NamespaceKind::Service);
                }
                DefinitionKind::Context => {
                    ir.groups
                        .entry(definition.name.clone())
                        .or_insert(NamespaceKind::Namespace);
                }
                _ => {}
            }
        }

        let mut owned: Vec<(String, Vec<&Definition>)> = Vec::new();
        for definition in &schema.definitions {
            if definition.kind.is_grouping() {
                continue;
            }
            if definition.name.starts_with(LOCALIZED_PREFIX) {
                tracing::debug!("Skipping localized shadow definition {}", definition.name);
                continue;
            }
            let owner = ir.owner_of(&definition.name);
            match owned.iter_mut().find(|(name, _)| *name == owner) {
                Some((_, defs)) => defs.push(definition),
                None => owned.push((owner, vec![definition])),
            }
        }

        // Root scope first, the rest keeps first-seen order
        owned.sort_by_key(|(name, _)| name.as_str() != ROOT_NAMESPACE);

        for (name, definitions) in owned {
            let kind = if name == ROOT_NAMESPACE {
                NamespaceKind::Root
            } else {
                ir.group_kind(&name).unwrap_or(NamespaceKind::Namespace)
            };
            let model = NamespaceModel::from_definitions(name.clone(), kind, definitions);
            ir.namespace_index.insert(name, ir.namespaces.len());
            ir.namespaces.push(model);
        }

        ir
    }

    /// Returns the name of the namespace owning `fqn`.
    ///
    /// The longest declared grouping that prefixes the name wins. Without
    /// one, the name is split at its last dot; a prefix that is itself a
    /// definition (e.g. `Books` for `Books.texts`) defers to that
    /// definition's owner. Names without a dot belong to the root scope.
    /// Works for names absent from the schema.
    #[must_use]
    pub fn owner_of(&self, fqn: &str) -> String {
        let declared = self
            .groups
            .keys()
            .filter(|group| is_dotted_prefix(group, fqn))
            .max_by_key(|group| group.len());
        if let Some(group) = declared {
            return group.clone();
        }

        match fqn.rsplit_once('.') {
            Some((prefix, _))
                if self
                    .schema
                    .get(prefix)
                    .is_some_and(|d| !d.kind.is_grouping()) =>
            {
                self.owner_of(prefix)
            }
            Some((prefix, _)) => prefix.to_string(),
            None => ROOT_NAMESPACE.to_string(),
        }
    }

    /// Returns the name of `fqn` relative to its owning namespace.
    #[must_use]
    pub fn local_name<'a>(&self, fqn: &'a str) -> &'a str {
        let owner = self.owner_of(fqn);
        if owner.is_empty() {
            return fqn;
        }
        fqn.strip_prefix(owner.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(fqn)
    }

    /// Gets a namespace model by name.
    #[must_use]
    pub fn namespace(&self, name: &str) -> Option<&NamespaceModel> {
        self.namespace_index
            .get(name)
            .map(|&idx| &self.namespaces[idx])
    }

    /// Returns true if a namespace with the given name is emitted.
    #[must_use]
    pub fn has_namespace(&self, name: &str) -> bool {
        self.namespace_index.contains_key(name)
    }

    /// Gets a definition by fully-qualified name.
    #[must_use]
    pub fn definition(&self, fqn: &str) -> Option<&Definition> {
        self.schema.get(fqn)
    }

    /// Gets a definition by fully-qualified name.
    ///
    /// # Errors
    /// Returns `SchemaError::DefinitionNotFound` if the name is unknown.
    pub fn require_definition(&self, fqn: &str) -> Result<&Definition, SchemaError> {
        self.definition(fqn)
            .ok_or_else(|| SchemaError::definition_not_found(fqn))
    }

    /// Returns the singular and plural names of an entity.
    ///
    /// Uses the annotations of the definition when it exists.
    #[must_use]
    pub fn names(&self, fqn: &str) -> (String, String) {
        let local = self.local_name(fqn);
        match self.definition(fqn) {
            Some(definition) => naming::names(local, &definition.annotations),
            None => naming::names(local, &Default::default()),
        }
    }

    /// Returns the kind of a declared grouping.
    #[must_use]
    pub fn group_kind(&self, name: &str) -> Option<NamespaceKind> {
        self.groups.get(name).copied()
    }
}

fn is_dotted_prefix(prefix: &str, name: &str) -> bool {
    !prefix.is_empty()
        && name.len() > prefix.len()
        && name.starts_with(prefix)
        && name.as_bytes()[prefix.len()] == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csn;

    const CSN: &str = r#"{
        "namespace": "my.bookshop",
        "definitions": {
            "my.bookshop.Books": { "kind": "entity", "elements": { "ID": { "key": true, "type": "cds.Integer" } } },
            "my.bookshop.Books.texts": { "kind": "entity", "elements": { "locale": { "key": true, "type": "cds.String" } } },
            "localized.my.bookshop.Books": { "kind": "entity" },
            "sap.common.Countries": { "kind": "entity", "@plural": "CountryList" },
            "CatalogService": { "kind": "service" },
            "CatalogService.Books": { "kind": "entity" },
            "CatalogService.submitOrder": { "kind": "action" },
            "Currency": { "kind": "type", "type": "cds.String" }
        }
    }"#;

    fn ir() -> SchemaIr {
        let schema = parse_csn(CSN).expect("Failed to parse");
        SchemaIr::from_schema(&schema)
    }

    #[test]
    fn test_namespace_order() {
        let ir = ir();
        let names: Vec<_> = ir.namespaces.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["", "my.bookshop", "sap.common", "CatalogService"]);
        assert_eq!(ir.namespaces[0].kind, NamespaceKind::Root);
        assert_eq!(
            ir.namespace("CatalogService").map(|n| n.kind),
            Some(NamespaceKind::Service)
        );
        assert_eq!(ir.group_kind("CatalogService"), Some(NamespaceKind::Service));
        assert_eq!(ir.group_kind("my.bookshop"), Some(NamespaceKind::Namespace));
        assert_eq!(ir.group_kind("my.bookshop.Books"), None);
    }

    #[test]
    fn test_owner_of() {
        let ir = ir();
        assert_eq!(ir.owner_of("my.bookshop.Books"), "my.bookshop");
        assert_eq!(ir.owner_of("my.bookshop.Books.texts"), "my.bookshop");
        assert_eq!(ir.owner_of("sap.common.Countries"), "sap.common");
        assert_eq!(ir.owner_of("CatalogService.submitOrder"), "CatalogService");
        assert_eq!(ir.owner_of("Currency"), ROOT_NAMESPACE);
        assert_eq!(ir.owner_of("unknown.ns.Thing"), "unknown.ns");
    }

    #[test]
    fn test_every_definition_has_one_owner() {
        let ir = ir();
        let total: usize = ir
            .namespaces
            .iter()
            .map(|n| {
                n.entities.len() + n.enums.len() + n.type_aliases.len() + n.action_functions.len()
            })
            .sum();
        // Everything except the service and the localized shadow
        assert_eq!(total, ir.schema.len() - 2);
    }

    #[test]
    fn test_local_name() {
        let ir = ir();
        assert_eq!(ir.local_name("my.bookshop.Books.texts"), "Books.texts");
        assert_eq!(ir.local_name("Currency"), "Currency");
    }

    #[test]
    fn test_localized_skipped() {
        let ir = ir();
        assert!(!ir.has_namespace("localized.my.bookshop"));
        assert!(ir.definition("localized.my.bookshop.Books").is_some());
    }

    #[test]
    fn test_names_lookup() {
        let ir = ir();
        assert_eq!(
            ir.names("my.bookshop.Books"),
            ("Book".to_string(), "Books".to_string())
        );
        assert_eq!(
            ir.names("sap.common.Countries"),
            ("Country".to_string(), "CountryList".to_string())
        );
    }

    #[test]
    fn test_require_definition() {
        let ir = ir();
        assert!(ir.require_definition("Currency").is_ok());
        assert!(matches!(
            ir.require_definition("Nope"),
            Err(SchemaError::DefinitionNotFound { .. })
        ));
    }
}
