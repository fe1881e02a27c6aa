//! Output units: one generated file per namespace.

use crate::config::GeneratorConfig;
use crate::resolver::Qualifier;
use crate::typescript::{ClassDecl, Declaration, render_runtime_block};
use std::path::PathBuf;

/// File name of every output unit inside its directory.
pub const UNIT_FILE: &str = "index.ts";

/// Header comment of generated files.
pub const HEADER: &str = "// This file is generated by cdsts. Do not edit.\n";

/// Generated content of one namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputUnit {
    /// Namespace name.
    pub namespace: String,
    /// Directory relative to the output root.
    pub directory: PathBuf,
    /// Imported namespaces, each once.
    pub imports: Vec<Qualifier>,
    /// Declarations in emission order.
    pub declarations: Vec<Declaration>,
    /// Flattened runtime classes.
    pub classes: Vec<ClassDecl>,
    runtime_block: Option<String>,
    manifest_name: String,
}

impl OutputUnit {
    /// Creates an empty unit for a namespace.
    #[must_use]
    pub fn new(namespace: impl Into<String>, directory: PathBuf, config: &GeneratorConfig) -> Self {
        Self {
            namespace: namespace.into(),
            directory,
            imports: Vec::new(),
            declarations: Vec::new(),
            classes: Vec::new(),
            runtime_block: config
                .classes_enabled()
                .then(|| config.runtime_block().to_string()),
            manifest_name: config.manifest().to_string(),
        }
    }

    /// Returns the file path relative to the output root.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(UNIT_FILE)
    }

    /// Adds an import unless the namespace is already imported.
    ///
    /// Returns true if the import was added.
    pub fn add_import(&mut self, qualifier: Qualifier) -> bool {
        if qualifier.namespace == self.namespace
            || self.imports.iter().any(|q| q.namespace == qualifier.namespace)
        {
            return false;
        }
        self.imports.push(qualifier);
        true
    }

    /// Returns the names listed in the export manifest.
    ///
    /// Empty when runtime classes are disabled.
    #[must_use]
    pub fn manifest(&self) -> Vec<String> {
        let Some(block) = &self.runtime_block else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .declarations
            .iter()
            .flat_map(Declaration::exported_names)
            .collect();
        names.push(block.clone());
        names
    }

    /// Renders the file content.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::from(HEADER);
        output.push('\n');

        if !self.imports.is_empty() {
            for import in &self.imports {
                output.push_str(&import.import_statement());
                output.push('\n');
            }
            output.push('\n');
        }

        let declarations: Vec<String> = self.declarations.iter().map(Declaration::render).collect();
        output.push_str(&declarations.join("\n"));

        if let Some(block) = &self.runtime_block {
            if !declarations.is_empty() {
                output.push('\n');
            }
            output.push_str(&render_runtime_block(block, &self.classes));
            output.push('\n');

            let names: Vec<String> = self.manifest().iter().map(|n| format!("\"{}\"", n)).collect();
            output.push_str(&format!(
                "export const {} = [{}] as const;\n",
                self.manifest_name,
                names.join(", ")
            ));
        }

        output
    }
}
