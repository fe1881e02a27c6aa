//! Diagnostics for non-fatal generation fallbacks.
//!
//! Generation never aborts on schema gaps. Each fallback to a placeholder
//! is recorded here and logged, so callers can report it.

use std::fmt;

/// Kind of fallback that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A property, ancestor or parameter names a type absent from the schema.
    UnresolvedReference,
    /// A built-in type without a TypeScript mapping.
    OpaqueBuiltin,
    /// A type could not be recovered from literal declaration text and became `any`.
    TypeTextFallback,
    /// An ancestor chain loops back on itself.
    InheritanceCycle,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UnresolvedReference => "unresolved reference",
            Self::OpaqueBuiltin => "opaque builtin",
            Self::TypeTextFallback => "type text fallback",
            Self::InheritanceCycle => "inheritance cycle",
        };
        f.write_str(label)
    }
}

/// Single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Fallback kind.
    pub kind: DiagnosticKind,
    /// Namespace being emitted.
    pub namespace: String,
    /// Definition or member the fallback applies to.
    pub subject: String,
    /// Human-readable detail.
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let namespace = if self.namespace.is_empty() {
            "<root>"
        } else {
            &self.namespace
        };
        write!(
            f,
            "[{}] {} ({}): {}",
            namespace, self.kind, self.subject, self.detail
        )
    }
}

/// Collected diagnostics of one generation run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        namespace: &str,
        subject: impl Into<String>,
        detail: impl Into<String>,
    ) {
        let diagnostic = Diagnostic {
            kind,
            namespace: namespace.to_string(),
            subject: subject.into(),
            detail: detail.into(),
        };
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Returns the number of diagnostics of the given kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Returns an iterator over all diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
