use anyhow::{Context, Result};
use cdsts::codegen::config::DEFAULT_RUNTIME_NAMESPACE;
use cdsts::prelude::*;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cdsts")]
#[command(about = "Generate TypeScript declarations from CDS models")]
#[command(version)]
struct Args {
    /// Input model: compiled CSN (.json) or CDS source
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Prefix for entity identifiers
    #[arg(long, default_value = "")]
    prefix: String,

    /// Skip the flattened runtime classes
    #[arg(long)]
    no_classes: bool,

    /// Skip the entity-name enumerations
    #[arg(long)]
    no_entity_enums: bool,

    /// Skip the plural array aliases
    #[arg(long)]
    no_plural_aliases: bool,

    /// Name of the block holding the runtime classes
    #[arg(long, default_value = DEFAULT_RUNTIME_NAMESPACE)]
    runtime_namespace: String,

    /// Schema compiler for non-JSON input
    #[arg(long, default_value = DEFAULT_COMPILER)]
    compiler: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .prefix(self.prefix.clone())
            .emit_classes(!self.no_classes)
            .entity_enums(!self.no_entity_enums)
            .plural_aliases(!self.no_plural_aliases)
            .runtime_namespace(self.runtime_namespace.clone())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let csn = load_csn(&args.input, &args.compiler)
        .with_context(|| format!("Failed to load model {}", args.input.display()))?;
    let generation =
        generate_from_csn(&csn, &args.config()).context("Failed to parse compiled model")?;
    let written = generation
        .write(&args.output)
        .with_context(|| format!("Failed to write output to {}", args.output.display()))?;

    println!(
        "Wrote {} file(s) to {} with {} diagnostic(s)",
        written.len(),
        args.output.display(),
        generation.diagnostics.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cdsts", "-i", "model.json", "-o", "gen"])
            .expect("Failed to parse args");
        assert_eq!(args.compiler, "cds");
        assert!(!args.verbose);
        assert_eq!(args.config(), GeneratorConfig::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let args = Args::try_parse_from([
            "cdsts",
            "--input",
            "db/schema.cds",
            "--output",
            "gen",
            "--prefix",
            "I",
            "--no-classes",
            "--no-entity-enums",
            "--runtime-namespace",
            "models",
            "--compiler",
            "/opt/cds/bin/cds",
        ])
        .expect("Failed to parse args");

        let expected = GeneratorConfig::new()
            .prefix("I")
            .emit_classes(false)
            .entity_enums(false)
            .runtime_namespace("models");
        assert_eq!(args.config(), expected);
        assert_eq!(args.compiler, "/opt/cds/bin/cds");
    }

    #[test]
    fn test_input_required() {
        assert!(Args::try_parse_from(["cdsts", "-o", "gen"]).is_err());
    }
}
