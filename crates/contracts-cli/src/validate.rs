//! # Example Validation
//!
//! Validates each `*.json` example against the schema its file name names.
//!
//! ## Schema Matching
//!
//! An example uses the first registered schema, in name order, whose name
//! occurs anywhere in the example's file name: `context.pack.example.json`
//! matches the `context` schema. This is a plain substring test. When more
//! than one schema matches, the first still wins and a warning lists the
//! candidates; when none matches the example fails.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use contracts_schema::{Schema, SchemaRegistry};

/// Arguments for `validate-contracts`.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Directory holding the `*.json` schema files.
    #[arg(long, value_name = "DIR", default_value = "contracts/schemas")]
    pub schemas: PathBuf,

    /// Directory holding the `*.json` example documents.
    #[arg(long, value_name = "DIR", default_value = "contracts/examples")]
    pub examples: PathBuf,
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            schemas: PathBuf::from("contracts/schemas"),
            examples: PathBuf::from("contracts/examples"),
        }
    }
}

/// Result of checking one example.
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleReport {
    /// The example satisfied its schema.
    Passed,
    /// The example failed; one line per reason.
    Failed(Vec<String>),
}

/// Execute the batch validation, writing the report to `out`.
///
/// Returns `Ok(true)` if every example passed. Errors are operational:
/// the schema or example directory could not be read, or a schema failed
/// to load.
pub fn run_validate(args: &ValidateArgs, root: &Path, out: &mut impl Write) -> Result<bool> {
    let schema_dir = crate::resolve_path(&args.schemas, root);
    let registry = SchemaRegistry::load(&schema_dir)
        .with_context(|| format!("failed to load schemas from {}", schema_dir.display()))?;

    let examples_dir = crate::resolve_path(&args.examples, root);
    let examples = find_examples(&examples_dir)
        .with_context(|| format!("failed to list examples in {}", examples_dir.display()))?;

    if examples.is_empty() {
        tracing::warn!(dir = %examples_dir.display(), "no example documents found");
    }

    let mut all_passed = true;

    for file_name in &examples {
        let shown = args.examples.join(file_name);
        let report = check_example(&registry, &examples_dir.join(file_name), file_name);

        match &report {
            ExampleReport::Passed => {
                writeln!(out, "[OK]   {}", shown.display())?;
            }
            ExampleReport::Failed(reasons) => {
                all_passed = false;
                writeln!(out, "[FAIL] {}", shown.display())?;
                for reason in reasons {
                    writeln!(out, "  - {reason}")?;
                }
            }
        }
    }

    tracing::info!(
        examples = examples.len(),
        passed = all_passed,
        "example validation complete"
    );

    Ok(all_passed)
}

/// Validate a single example file.
pub fn check_example(registry: &SchemaRegistry, path: &Path, file_name: &str) -> ExampleReport {
    let document = match read_example(path) {
        Ok(document) => document,
        Err(e) => return ExampleReport::Failed(vec![format!("{e:#}")]),
    };

    let Some(schema) = match_schema(registry, file_name) else {
        return ExampleReport::Failed(vec![format!("no schema matches '{file_name}'")]);
    };
    tracing::debug!(example = file_name, schema = schema.name(), "matched schema");

    let outcome = schema.validate(&document);
    if outcome.is_valid() {
        ExampleReport::Passed
    } else {
        ExampleReport::Failed(
            outcome
                .into_violations()
                .into_iter()
                .map(|v| v.message)
                .collect(),
        )
    }
}

/// First schema, in registry order, whose name occurs in `file_name`.
pub fn match_schema<'r>(registry: &'r SchemaRegistry, file_name: &str) -> Option<&'r Arc<Schema>> {
    let candidates: Vec<&Arc<Schema>> = registry
        .iter()
        .filter(|schema| file_name.contains(schema.name()))
        .collect();

    if candidates.len() > 1 {
        let names: Vec<&str> = candidates.iter().map(|s| s.name()).collect();
        tracing::warn!(
            example = file_name,
            candidates = ?names,
            chosen = names[0],
            "example file name matches more than one schema"
        );
    }

    candidates.into_iter().next()
}

fn read_example(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid JSON in {}", path.display()))
}

/// File names of the `*.json` examples in `dir`, sorted.
fn find_examples(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
