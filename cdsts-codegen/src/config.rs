//! Generator configuration.

/// Default name of the block holding the runtime classes.
pub const DEFAULT_RUNTIME_NAMESPACE: &str = "runtime";

/// Default name of the export manifest constant.
pub const DEFAULT_MANIFEST_NAME: &str = "EXPORTS";

/// Options controlling what the generator emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    prefix: String,
    emit_classes: bool,
    runtime_namespace: String,
    manifest_name: String,
    entity_enums: bool,
    plural_aliases: bool,
}

impl GeneratorConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            prefix: String::new(),
            emit_classes: true,
            runtime_namespace: DEFAULT_RUNTIME_NAMESPACE.to_string(),
            manifest_name: DEFAULT_MANIFEST_NAME.to_string(),
            entity_enums: true,
            plural_aliases: true,
        }
    }

    /// Sets the prefix prepended to entity identifiers.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Enables or disables the flattened runtime classes.
    #[must_use]
    pub fn emit_classes(mut self, enabled: bool) -> Self {
        self.emit_classes = enabled;
        self
    }

    /// Sets the name of the block holding the runtime classes.
    #[must_use]
    pub fn runtime_namespace(mut self, name: impl Into<String>) -> Self {
        self.runtime_namespace = name.into();
        self
    }

    /// Sets the name of the export manifest constant.
    #[must_use]
    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    /// Enables or disables the entity-name enumerations.
    #[must_use]
    pub fn entity_enums(mut self, enabled: bool) -> Self {
        self.entity_enums = enabled;
        self
    }

    /// Enables or disables the plural array aliases.
    #[must_use]
    pub fn plural_aliases(mut self, enabled: bool) -> Self {
        self.plural_aliases = enabled;
        self
    }

    /// Returns the entity identifier prefix.
    #[must_use]
    pub fn entity_prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns true if runtime classes are emitted.
    #[must_use]
    pub const fn classes_enabled(&self) -> bool {
        self.emit_classes
    }

    /// Returns the runtime block name.
    #[must_use]
    pub fn runtime_block(&self) -> &str {
        &self.runtime_namespace
    }

    /// Returns the export manifest name.
    #[must_use]
    pub fn manifest(&self) -> &str {
        &self.manifest_name
    }

    /// Returns true if entity-name enumerations are emitted.
    #[must_use]
    pub const fn entity_enums_enabled(&self) -> bool {
        self.entity_enums
    }

    /// Returns true if plural array aliases are emitted.
    #[must_use]
    pub const fn plural_aliases_enabled(&self) -> bool {
        self.plural_aliases
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.entity_prefix(), "");
        assert!(config.classes_enabled());
        assert_eq!(config.runtime_block(), "runtime");
        assert_eq!(config.manifest(), "EXPORTS");
        assert!(config.entity_enums_enabled());
        assert!(config.plural_aliases_enabled());
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .prefix("I")
            .emit_classes(false)
            .runtime_namespace("models")
            .manifest_name("NAMES")
            .entity_enums(false)
            .plural_aliases(false);

        assert_eq!(config.entity_prefix(), "I");
        assert!(!config.classes_enabled());
        assert_eq!(config.runtime_block(), "models");
        assert_eq!(config.manifest(), "NAMES");
        assert!(!config.entity_enums_enabled());
        assert!(!config.plural_aliases_enabled());
    }
}
