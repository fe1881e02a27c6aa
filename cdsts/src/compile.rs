//! External schema compiler invocation.
//!
//! Compiled CSN is read as is. Any other input is handed once to the CDS
//! compiler, which prints CSN on stdout.

use cdsts_codegen::CodegenError;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Default schema compiler command.
pub const DEFAULT_COMPILER: &str = "cds";

/// Returns true if the input is already compiled CSN.
#[must_use]
pub fn is_csn(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Loads the CSN document for an input file.
///
/// # Arguments
/// * `input` - CSN (`.json`) or CDS source file
/// * `compiler` - Compiler command for non-CSN input
///
/// # Errors
/// Returns `CodegenError::Io` if the file cannot be read, or
/// `CodegenError::Compiler` if compilation fails.
pub fn load_csn(input: &Path, compiler: &str) -> Result<String, CodegenError> {
    if is_csn(input) {
        tracing::debug!("Reading compiled model {}", input.display());
        return Ok(fs::read_to_string(input)?);
    }
    compile(input, compiler)
}

/// Runs `<compiler> compile <input> --to csn` and returns its output.
///
/// # Errors
/// Returns `CodegenError::Compiler` if the command cannot be started, exits
/// unsuccessfully or prints something other than UTF-8.
pub fn compile(input: &Path, compiler: &str) -> Result<String, CodegenError> {
    tracing::info!("Compiling {} with '{}'", input.display(), compiler);

    let output = Command::new(compiler)
        .arg("compile")
        .arg(input)
        .args(["--to", "csn"])
        .output()
        .map_err(|e| CodegenError::compiler(compiler, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CodegenError::compiler(
            compiler,
            format!("{} ({})", stderr.trim(), output.status),
        ));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| CodegenError::compiler(compiler, format!("output is not UTF-8: {}", e)))
}
