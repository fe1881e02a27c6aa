//! Element definitions.
//!
//! Elements are the named members of entities, structured types, and the
//! parameters and results of actions and functions.

use crate::types::Annotations;

/// Element representing a property of a structured definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element name.
    pub name: String,
    /// Type of the element.
    pub type_ref: TypeRef,
    /// Whether the element is part of the primary key.
    pub key: bool,
    /// Whether the element is declared `not null`.
    pub not_null: bool,
    /// Number of values the element holds.
    pub cardinality: Cardinality,
    /// Element annotations.
    pub annotations: Annotations,
    /// Doc comment.
    pub doc: Option<String>,
}

impl Element {
    /// Creates a new single-valued, nullable element.
    #[must_use]
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            key: false,
            not_null: false,
            cardinality: Cardinality::One,
            annotations: Annotations::default(),
            doc: None,
        }
    }

    /// Returns true if the element may hold no value.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        !self.key && !self.not_null
    }

    /// Returns true if the element holds a collection.
    #[must_use]
    pub fn is_many(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// Returns the association if this element is one.
    #[must_use]
    pub fn association(&self) -> Option<&Association> {
        match &self.type_ref {
            TypeRef::Association(assoc) => Some(assoc),
            _ => None,
        }
    }
}

/// Element cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cardinality {
    /// Single value.
    #[default]
    One,
    /// Collection of values.
    Many,
}

impl Cardinality {
    /// Parses the `max` value of a CSN cardinality.
    ///
    /// `"*"` and any number greater than one are to-many.
    #[must_use]
    pub fn from_max(max: &str) -> Self {
        match max.trim() {
            "*" => Self::Many,
            n => match n.parse::<u64>() {
                Ok(count) if count > 1 => Self::Many,
                _ => Self::One,
            },
        }
    }
}

/// Reference to the type of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// Built-in CDS type (`cds.String`, `cds.Integer`, ...).
    Builtin(String),
    /// Fully-qualified reference to another definition.
    Named(String),
    /// Association or composition.
    Association(Association),
    /// Array of items.
    Array(Box<TypeRef>),
    /// Anonymous structured type.
    Inline(Vec<Element>),
    /// Type expressed as a path into another definition (`{ref: [...]}`).
    Expression {
        /// Definition the path starts from.
        target: String,
        /// Element path within the target.
        path: Vec<String>,
    },
    /// No usable type information.
    Unknown,
}

impl TypeRef {
    /// Returns true if this is a built-in CDS type.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Returns the fully-qualified names this type refers to.
    #[must_use]
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Named(name) => names.push(name),
            Self::Association(assoc) => names.push(&assoc.target),
            Self::Array(items) => items.collect_names(names),
            Self::Inline(elements) => {
                for element in elements {
                    element.type_ref.collect_names(names);
                }
            }
            Self::Expression { target, .. } => names.push(target),
            Self::Builtin(_) | Self::Unknown => {}
        }
    }
}

/// Association or composition to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    /// Fully-qualified target entity name.
    pub target: String,
    /// To-one or to-many.
    pub cardinality: Cardinality,
    /// True for compositions.
    pub composition: bool,
    /// Foreign key element names of a managed association.
    pub keys: Vec<String>,
}

impl Association {
    /// Creates a new to-one association.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            cardinality: Cardinality::One,
            composition: false,
            keys: Vec::new(),
        }
    }

    /// Returns true for managed to-one associations that carry foreign keys.
    #[must_use]
    pub fn is_managed_to_one(&self) -> bool {
        self.cardinality == Cardinality::One && !self.keys.is_empty()
    }
}
