//! Writes output units to disk.

use crate::error::CodegenError;
use crate::unit::OutputUnit;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes every unit to `<root>/<namespace dirs>/index.ts`.
///
/// Directories are created as needed and existing files are overwritten.
///
/// # Arguments
/// * `root` - Output root directory
/// * `units` - Units to write
///
/// # Errors
/// Returns `CodegenError::OutputPath` naming the first directory or file
/// that could not be created or written.
pub fn write_units(root: &Path, units: &[OutputUnit]) -> Result<Vec<PathBuf>, CodegenError> {
    let mut written = Vec::with_capacity(units.len());

    for unit in units {
        let directory = root.join(&unit.directory);
        fs::create_dir_all(&directory).map_err(|e| CodegenError::output_path(&directory, e))?;

        let path = root.join(unit.file_path());
        fs::write(&path, unit.render()).map_err(|e| CodegenError::output_path(&path, e))?;
        tracing::info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;

    fn units(config: &GeneratorConfig) -> Vec<OutputUnit> {
        vec![
            OutputUnit::new("", PathBuf::new(), config),
            OutputUnit::new("my.bookshop", PathBuf::from("my").join("bookshop"), config),
        ]
    }

    #[test]
    fn test_write_units() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = GeneratorConfig::default();

        let written = write_units(dir.path(), &units(&config)).expect("Failed to write");

        assert_eq!(
            written,
            vec![
                dir.path().join("index.ts"),
                dir.path().join("my").join("bookshop").join("index.ts"),
            ]
        );
        let content = fs::read_to_string(&written[1]).expect("Failed to read");
        assert!(content.starts_with("// This file is generated by cdsts."));
    }

    #[test]
    fn test_overwrites_existing_files() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = GeneratorConfig::default();
        fs::write(dir.path().join("index.ts"), "stale").expect("Failed to seed");

        write_units(dir.path(), &units(&config)).expect("Failed to write");

        let content = fs::read_to_string(dir.path().join("index.ts")).expect("Failed to read");
        assert_ne!(content, "stale");
    }

    #[test]
    fn test_unwritable_output_path() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = GeneratorConfig::default();
        // A file where the namespace directory should go
        fs::write(dir.path().join("my"), "").expect("Failed to seed");

        let err = write_units(dir.path(), &units(&config)).expect_err("should fail");
        match err {
            CodegenError::OutputPath { path, .. } => {
                assert_eq!(path, dir.path().join("my").join("bookshop"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
