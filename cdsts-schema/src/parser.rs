//! CSN parser.
//!
//! This module deserializes compiled CDS schemas (CSN JSON) and classifies
//! every raw definition into a typed [`Definition`].

use crate::elements::{Association, Cardinality, Element, TypeRef};
use crate::error::ParseError;
use crate::types::{Annotations, CompiledSchema, Definition, DefinitionKind, EnumLiteral, EnumValue};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Parses a CSN document from a string.
///
/// # Arguments
/// * `json` - CSN content
///
/// # Returns
/// Compiled schema with all classifiable definitions.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed or the document is not an object.
pub fn parse_csn(json: &str) -> Result<CompiledSchema, ParseError> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Object(mut root) = document else {
        return Err(ParseError::invalid_structure("CSN root is not an object"));
    };

    let mut schema = CompiledSchema::new();
    schema.namespace = root
        .get("namespace")
        .and_then(Value::as_str)
        .filter(|ns| !ns.is_empty())
        .map(str::to_string);

    let definitions = match root.remove("definitions") {
        Some(Value::Object(map)) => map,
        Some(Value::Null) | None => serde_json::Map::new(),
        Some(_) => {
            return Err(ParseError::invalid_structure(
                "'definitions' must be an object",
            ));
        }
    };

    for (name, value) in definitions {
        if value.is_null() {
            tracing::debug!("Skipping undefined definition {}", name);
            continue;
        }
        match serde_json::from_value::<RawDefinition>(value) {
            Ok(raw) => match classify(&name, raw) {
                Some(definition) => schema.add_definition(definition),
                None => tracing::debug!("Skipping unclassified definition {}", name),
            },
            Err(e) => tracing::debug!("Skipping malformed definition {}: {}", name, e),
        }
    }

    Ok(schema)
}

/// Parses a CSN document from a file.
///
/// # Errors
/// Returns `ParseError` if reading or parsing fails.
pub fn parse_csn_file(path: &Path) -> Result<CompiledSchema, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_csn(&json)
}

#[derive(Debug, Default, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default, rename = "type")]
    type_: Option<Value>,
    #[serde(default)]
    elements: Option<IndexMap<String, RawElement>>,
    #[serde(default)]
    items: Option<Box<RawElement>>,
    #[serde(default)]
    includes: Vec<String>,
    #[serde(default, rename = "enum")]
    enum_: Option<IndexMap<String, RawEnumValue>>,
    #[serde(default)]
    params: Option<IndexMap<String, RawElement>>,
    #[serde(default)]
    returns: Option<Box<RawElement>>,
    #[serde(default)]
    doc: Option<String>,
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawElement {
    #[serde(default, rename = "type")]
    type_: Option<Value>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    cardinality: Option<RawCardinality>,
    #[serde(default)]
    keys: Option<Vec<RawForeignKey>>,
    #[serde(default)]
    items: Option<Box<RawElement>>,
    #[serde(default)]
    elements: Option<IndexMap<String, RawElement>>,
    #[serde(default)]
    key: bool,
    #[serde(default, rename = "notNull")]
    not_null: bool,
    #[serde(default)]
    doc: Option<String>,
    #[serde(flatten)]
    extra: IndexMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCardinality {
    #[serde(default)]
    max: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawForeignKey {
    #[serde(default, rename = "ref")]
    path: Vec<String>,
    #[serde(default, rename = "as")]
    alias: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEnumValue {
    #[serde(default)]
    val: Option<Value>,
    #[serde(default)]
    doc: Option<String>,
}

/// Classifies a raw definition. Returns `None` for kinds that are not emitted.
fn classify(name: &str, raw: RawDefinition) -> Option<Definition> {
    let kind = DefinitionKind::classify(raw.kind.as_deref()?, raw.enum_.is_some())?;
    let mut definition = Definition::new(name, kind);
    definition.doc = raw.doc;
    definition.annotations = annotations(raw.extra);
    definition.includes = raw.includes;

    if let Some(elements) = raw.elements {
        definition.elements = parse_elements(elements);
    }

    match kind {
        DefinitionKind::Type | DefinitionKind::Enum => {
            if let Some(items) = raw.items {
                definition.type_ref = Some(TypeRef::Array(Box::new(element_type(*items).0)));
            } else if let Some(type_) = raw.type_ {
                definition.type_ref = Some(type_from_value(&type_));
            }
            if let Some(values) = raw.enum_ {
                let numeric = matches!(
                    &definition.type_ref,
                    Some(TypeRef::Builtin(b)) if is_numeric_builtin(b)
                );
                definition.enum_values = parse_enum(values, numeric);
            }
        }
        DefinitionKind::Action | DefinitionKind::Function => {
            if let Some(params) = raw.params {
                definition.params = parse_elements(params);
            }
            if let Some(returns) = raw.returns {
                definition.returns = Some(parse_element("returns", *returns));
            }
        }
        _ => {}
    }

    Some(definition)
}

fn parse_elements(raw: IndexMap<String, RawElement>) -> Vec<Element> {
    raw.into_iter()
        .map(|(name, element)| parse_element(&name, element))
        .collect()
}

fn parse_element(name: &str, mut raw: RawElement) -> Element {
    let key = raw.key;
    let not_null = raw.not_null;
    let doc = raw.doc.take();
    let extra = std::mem::take(&mut raw.extra);
    let (type_ref, cardinality) = element_type(raw);

    let mut element = Element::new(name, type_ref);
    element.key = key;
    element.not_null = not_null;
    element.cardinality = cardinality;
    element.doc = doc;
    element.annotations = annotations(extra);
    element
}

/// Derives the type and cardinality of a raw element.
fn element_type(raw: RawElement) -> (TypeRef, Cardinality) {
    if let Some(items) = raw.items {
        let (item_type, _) = element_type(*items);
        return (TypeRef::Array(Box::new(item_type)), Cardinality::Many);
    }
    if let Some(elements) = raw.elements {
        return (TypeRef::Inline(parse_elements(elements)), Cardinality::One);
    }

    let Some(type_) = raw.type_ else {
        return (TypeRef::Unknown, Cardinality::One);
    };

    match type_.as_str() {
        Some(t @ ("cds.Association" | "cds.Composition")) => {
            let cardinality = raw
                .cardinality
                .and_then(|c| c.max)
                .map(|max| match max {
                    Value::String(s) => Cardinality::from_max(&s),
                    other => Cardinality::from_max(&other.to_string()),
                })
                .unwrap_or_default();
            let keys = raw
                .keys
                .unwrap_or_default()
                .into_iter()
                .filter_map(|k| k.alias.or_else(|| k.path.last().cloned()))
                .collect();
            let assoc = Association {
                target: raw.target.unwrap_or_default(),
                cardinality,
                composition: t == "cds.Composition",
                keys,
            };
            (TypeRef::Association(assoc), cardinality)
        }
        _ => (type_from_value(&type_), Cardinality::One),
    }
}

/// Converts a CSN `type` value into a type reference.
fn type_from_value(value: &Value) -> TypeRef {
    match value {
        Value::String(s) if s.starts_with("cds.") => TypeRef::Builtin(s.clone()),
        Value::String(s) if !s.is_empty() => TypeRef::Named(s.clone()),
        Value::Object(obj) => {
            let path: Vec<String> = obj
                .get("ref")
                .and_then(Value::as_array)
                .map(|segments| {
                    segments
                        .iter()
                        .filter_map(|s| s.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            match path.split_first() {
                Some((target, rest)) => TypeRef::Expression {
                    target: target.clone(),
                    path: rest.to_vec(),
                },
                None => TypeRef::Unknown,
            }
        }
        _ => TypeRef::Unknown,
    }
}

fn parse_enum(raw: IndexMap<String, RawEnumValue>, numeric: bool) -> Vec<EnumValue> {
    raw.into_iter()
        .map(|(name, value)| {
            let literal = match value.val {
                Some(Value::Number(n)) => EnumLiteral::Number(n.to_string()),
                Some(Value::String(s)) if numeric && s.parse::<f64>().is_ok() => {
                    EnumLiteral::Number(s)
                }
                Some(Value::String(s)) => EnumLiteral::String(s),
                Some(other) if !other.is_null() => EnumLiteral::String(other.to_string()),
                _ => EnumLiteral::String(name.clone()),
            };
            let mut enum_value = EnumValue::new(name, literal);
            enum_value.doc = value.doc;
            enum_value
        })
        .collect()
}

fn annotations(extra: IndexMap<String, Value>) -> Annotations {
    let mut annotations = Annotations::new();
    for (key, value) in extra {
        if key.starts_with('@') {
            annotations.insert(key, value);
        }
    }
    annotations
}

fn is_numeric_builtin(name: &str) -> bool {
    matches!(
        name,
        "cds.Integer"
            | "cds.Int16"
            | "cds.Int32"
            | "cds.Int64"
            | "cds.Integer64"
            | "cds.UInt8"
            | "cds.Decimal"
            | "cds.DecimalFloat"
            | "cds.Double"
    )
}
