//! Naming policy.
//!
//! Singular and plural display names come from `@singular`/`@plural`
//! annotations when present, otherwise from a best-effort English suffix
//! heuristic. This is not a linguistic guarantee.

use crate::types::Annotations;

/// Words whose plural equals the singular.
const UNCOUNTABLE: &[&str] = &["species", "series", "news", "data", "information"];

/// Singular words that end in `s`.
const SINGULAR_WORDS: &[&str] = &[
    "status", "bus", "campus", "bonus", "virus", "analysis", "axis", "basis", "crisis", "thesis",
];

/// Words that cannot be used as TypeScript identifiers.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
    "true", "try", "typeof", "var", "void", "while", "with",
];

/// Computes the singular and plural names of an entity.
///
/// Annotations are used verbatim. A missing singular is derived from
/// `entity_name`, a missing plural from the singular.
#[must_use]
pub fn names(entity_name: &str, annotations: &Annotations) -> (String, String) {
    let singular = annotations
        .get_str("@singular")
        .map_or_else(|| singularize(entity_name), str::to_string);
    let plural = annotations
        .get_str("@plural")
        .map_or_else(|| pluralize(&singular), str::to_string);
    (singular, plural)
}

/// Derives a singular form by stripping common English plural suffixes.
#[must_use]
pub fn singularize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    if lower.ends_with("ss")
        || UNCOUNTABLE
            .iter()
            .chain(SINGULAR_WORDS)
            .any(|word| ends_with_word(name, word))
    {
        return name.to_string();
    }
    if lower.ends_with("ees") {
        return drop_suffix(name, 1);
    }
    if ["ses", "zes", "xes", "ches", "shes"]
        .iter()
        .any(|s| lower.ends_with(s))
    {
        return drop_suffix(name, 2);
    }
    if lower.ends_with("ies") && preceded_by_consonant(&lower, 3) {
        return format!("{}y", drop_suffix(name, 3));
    }
    if lower.ends_with('s') && lower.len() > 1 {
        return drop_suffix(name, 1);
    }
    name.to_string()
}

/// Derives a plural form with the forward English suffix rules.
#[must_use]
pub fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();

    if UNCOUNTABLE.iter().any(|word| ends_with_word(name, word)) {
        return name.to_string();
    }
    if lower.ends_with('y') && preceded_by_consonant(&lower, 1) {
        return format!("{}ies", drop_suffix(name, 1));
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{name}es");
    }
    format!("{name}s")
}

/// Sanitizes a name into a legal TypeScript identifier.
///
/// Illegal characters become `_`, a leading digit gets a `_` prefix and
/// reserved words get a `_` suffix.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' || c == '.' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Returns true if `name` ends with `word` as a whole word.
///
/// A word starts the name, follows a `_`, or starts with an uppercase
/// letter as in `OrderStatus`.
fn ends_with_word(name: &str, word: &str) -> bool {
    let Some(start) = name.len().checked_sub(word.len()) else {
        return false;
    };
    let bytes = name.as_bytes();
    if !bytes[start..].eq_ignore_ascii_case(word.as_bytes()) {
        return false;
    }
    start == 0 || bytes[start].is_ascii_uppercase() || bytes[start - 1] == b'_'
}

fn drop_suffix(name: &str, len: usize) -> String {
    name[..name.len().saturating_sub(len)].to_string()
}

/// Returns true if the character before the last `suffix_len` bytes is a consonant.
fn preceded_by_consonant(lower: &str, suffix_len: usize) -> bool {
    lower
        .len()
        .checked_sub(suffix_len + 1)
        .and_then(|idx| lower.as_bytes().get(idx))
        .is_some_and(|&b| b.is_ascii_alphabetic() && !b"aeiou".contains(&b))
}
