//! Emission driver.
//!
//! Walks every namespace of the schema IR and produces one output unit per
//! namespace. Imports are computed before the unit is finalized and are
//! extended with any namespace a rendered type turns out to reference.

use crate::config::GeneratorConfig;
use crate::diagnostics::Diagnostics;
use crate::error::CodegenError;
use crate::flatten::Flattener;
use crate::resolver::ReferenceResolver;
use crate::typescript::{
    ActionGenerator, AliasGenerator, ClassDecl, Declaration, EnumGenerator, InterfaceGenerator,
    collect_member_references,
};
use crate::unit::OutputUnit;
use crate::writer::write_units;
use cdsts_schema::{NamespaceModel, SchemaIr};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// One unit per emitted namespace, root scope first.
    pub units: Vec<OutputUnit>,
    /// Fallbacks applied along the way.
    pub diagnostics: Diagnostics,
}

impl Generation {
    /// Gets the unit of a namespace.
    #[must_use]
    pub fn unit(&self, namespace: &str) -> Option<&OutputUnit> {
        self.units.iter().find(|u| u.namespace == namespace)
    }

    /// Writes all units below `root`.
    ///
    /// # Errors
    /// Returns `CodegenError::OutputPath` if a directory or file cannot be
    /// written.
    pub fn write(&self, root: &Path) -> Result<Vec<PathBuf>, CodegenError> {
        write_units(root, &self.units)
    }
}

/// Main code generator.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new code generator.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Generates the output units of all namespaces.
    #[must_use]
    pub fn generate(&self) -> Generation {
        let mut diagnostics = Diagnostics::new();
        let mut flattener = Flattener::new(self.ir, self.config);

        let units: Vec<OutputUnit> = self
            .ir
            .namespaces
            .iter()
            .map(|namespace| self.generate_namespace(namespace, &mut flattener, &mut diagnostics))
            .collect();

        tracing::info!(
            "Generated {} unit(s) with {} diagnostic(s)",
            units.len(),
            diagnostics.len()
        );
        Generation { units, diagnostics }
    }

    /// Generates the output unit of one namespace.
    ///
    /// Declaration order: aliases, enums, entities (each followed by its
    /// plural alias), actions and functions, entity-name enums.
    pub fn generate_namespace(
        &self,
        namespace: &NamespaceModel,
        flattener: &mut Flattener<'_>,
        diagnostics: &mut Diagnostics,
    ) -> OutputUnit {
        tracing::debug!(
            "Generating namespace '{}' ({} entities)",
            namespace.name,
            namespace.entities.len()
        );
        let resolver = ReferenceResolver::new(self.ir, &namespace.name, self.config);
        let mut unit = OutputUnit::new(namespace.name.clone(), namespace.directory(), self.config);
        for qualifier in resolver.resolve_references(namespace) {
            unit.add_import(qualifier);
        }

        let mut model = namespace.clone();
        if self.config.entity_enums_enabled() {
            model.append_entity_name_enums();
        }

        let enums = EnumGenerator::new(self.ir);
        unit.declarations
            .extend(AliasGenerator::new(&resolver).generate(&model.type_aliases, diagnostics));
        unit.declarations.extend(enums.generate(model.declared_enums()));
        unit.declarations
            .extend(InterfaceGenerator::new(&resolver).generate(&model.entities, diagnostics));
        unit.declarations
            .extend(ActionGenerator::new(&resolver).generate(&model.action_functions, diagnostics));
        let derived = enums.generate(model.derived_enums());
        unit.declarations.extend(avoid_collisions(&unit.declarations, derived));

        if self.config.classes_enabled() {
            unit.classes = model
                .entities
                .iter()
                .filter_map(|entity| flattener.flatten(&entity.name, diagnostics))
                .collect();
        }

        for qualifier in referenced_namespaces(&unit.declarations, &unit.classes) {
            if unit.add_import(qualifier) {
                tracing::debug!("Added import discovered while emitting '{}'", namespace.name);
            }
        }

        unit
    }
}

/// Renames generated enums whose names are already declared in the unit.
fn avoid_collisions(declared: &[Declaration], mut derived: Vec<Declaration>) -> Vec<Declaration> {
    let taken: HashSet<String> = declared.iter().flat_map(Declaration::exported_names).collect();
    for declaration in &mut derived {
        if let Declaration::Enum(decl) = declaration {
            let original = decl.name.clone();
            while taken.contains(&decl.name) {
                decl.name.push('_');
            }
            if decl.name != original {
                tracing::debug!("Renamed generated enum {} to {}", original, decl.name);
            }
        }
    }
    derived
}

fn referenced_namespaces(
    declarations: &[Declaration],
    classes: &[ClassDecl],
) -> Vec<crate::resolver::Qualifier> {
    let mut references = Vec::new();
    for declaration in declarations {
        references.extend(declaration.references());
    }
    for class in classes {
        collect_member_references(&class.members, &mut references);
    }
    references
        .into_iter()
        .filter(|r| !r.is_local())
        .map(|r| r.namespace_qualifier())
        .collect()
}
