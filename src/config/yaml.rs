//! YAML configuration loading, parsing and discovery

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde_json::Value;
use tracing::debug;

use crate::config::validation::ROOT_PATH;
use crate::config::{ForgeConfig, Validated};
use crate::error::{ForgeError, ValidationError, ValidationErrorKind, ValidationErrors, join_path};
use crate::system::System;
use crate::utils::path::absolutize;

/// File name of the feedstock configuration
pub const FORGE_YAML: &str = "conda-forge.yml";

/// Parse YAML text into the generic value tree the validator works on
///
/// An empty document parses to `null`, which validates like `{}`. `.inf`
/// and `.nan` have no JSON form and are rejected as validation errors.
pub fn parse_yaml(content: &str, name: &str) -> Result<Value> {
    let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        let message = if let Some(location) = e.location() {
            format!(
                "Failed to parse {name} at line {}, column {}: {e}",
                location.line(),
                location.column(),
            )
        } else {
            format!("Failed to parse {name}: {e}")
        };
        ForgeError::configuration(message)
    })?;

    let mut non_finite = Vec::new();
    collect_non_finite(&document, "", &mut non_finite);
    if !non_finite.is_empty() {
        return Err(validation_failure(ValidationErrors::new(non_finite)));
    }

    serde_json::to_value(document).map_err(|e| {
        ForgeError::configuration(format!("Unsupported YAML content in {name}: {e}")).into()
    })
}

fn collect_non_finite(value: &serde_yaml::Value, path: &str, errors: &mut Vec<ValidationError>) {
    match value {
        serde_yaml::Value::Number(number) if number.is_nan() || number.is_infinite() => {
            let written = if number.is_nan() {
                ".nan"
            } else if number.as_f64().is_some_and(f64::is_sign_negative) {
                "-.inf"
            } else {
                ".inf"
            };
            let path = if path.is_empty() { ROOT_PATH } else { path };
            errors.push(ValidationError::new(
                path,
                ValidationErrorKind::TypeMismatch,
                format!("expected a finite number, got {written}"),
            ));
        }
        serde_yaml::Value::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                collect_non_finite(item, &format!("{path}[{index}]"), errors);
            }
        }
        serde_yaml::Value::Mapping(mapping) => {
            for (key, item) in mapping {
                let key = match key {
                    serde_yaml::Value::String(text) => text.clone(),
                    serde_yaml::Value::Number(number) => number.to_string(),
                    serde_yaml::Value::Bool(flag) => flag.to_string(),
                    _ => "?".to_owned(),
                };
                collect_non_finite(item, &join_path(path, &key), errors);
            }
        }
        serde_yaml::Value::Tagged(tagged) => collect_non_finite(&tagged.value, path, errors),
        _ => {}
    }
}

/// Wrap validation errors so they carry the validation exit code
pub fn validation_failure(errors: ValidationErrors) -> anyhow::Error {
    let summary = format!("{} problem(s) found in {FORGE_YAML}", errors.len());
    anyhow::Error::new(errors).context(ForgeError::validation(summary))
}

/// Validate a parsed document, attaching the exit-code category on failure
pub fn validate_raw(raw: &Value) -> Result<Validated> {
    ForgeConfig::validate_value(raw).map_err(validation_failure)
}

/// Read and parse a configuration file without validating it
pub fn load_raw(system: &dyn System, path: &str) -> Result<Value> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj) {
        return Err(ForgeError::configuration(format!(
            "Configuration file not found: {path}\n\
            Create a {FORGE_YAML} file or specify a different path with --config"
        ))
        .into());
    }

    let content = system
        .read_to_string(path_obj)
        .map_err(|e| ForgeError::filesystem(format!("Failed to read {path}: {e}")))?;

    debug!(path, bytes = content.len(), "Read configuration file");
    parse_yaml(&content, path)
}

/// Load, parse and validate a configuration file
pub fn load_config(system: &dyn System, path: &str) -> Result<Validated> {
    let raw = load_raw(system, path)?;
    validate_raw(&raw).with_context(|| format!("Invalid configuration in {path}"))
}

/// Locate the `conda-forge.yml` belonging to a recipe directory
///
/// Candidates, first match wins: the recipe directory's parent (the usual
/// feedstock layout), the recipe directory itself, then its grandparent.
pub fn find_forge_yaml(system: &dyn System, recipe_dir: &Path) -> Result<Option<PathBuf>> {
    let cwd = system
        .current_dir()
        .map_err(|e| ForgeError::filesystem(format!("Cannot determine working directory: {e}")))?;
    let recipe_dir = absolutize(recipe_dir, &cwd);

    let parent = recipe_dir.parent();
    let candidates = [
        parent.map(|dir| dir.join(FORGE_YAML)),
        Some(recipe_dir.join(FORGE_YAML)),
        parent.and_then(Path::parent).map(|dir| dir.join(FORGE_YAML)),
    ];

    let found = candidates
        .into_iter()
        .flatten()
        .find(|candidate| system.is_file(candidate));

    match &found {
        Some(path) => debug!(path = %path.display(), "Found {FORGE_YAML}"),
        None => debug!(recipe_dir = %recipe_dir.display(), "No {FORGE_YAML} next to recipe"),
    }
    Ok(found)
}
