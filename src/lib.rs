//! `forgeyml` - validation and normalization of `conda-forge.yml`
//!
//! This library checks a feedstock configuration against the recognized
//! options, resolves platform aliases, rejects deprecated fields and fills in
//! every default, producing a fully normalized configuration plus warnings.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use config::yaml::{self, FORGE_YAML};
use config::{ForgeConfig, Validated};
use error::ValidationErrors;
use operations::lint::LintReport;
use operations::render::{OutputFormat, render_config};
use system::System;

/// Where the configuration comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// An explicit file, which must exist
    File(String),
    /// A recipe directory; a missing `conda-forge.yml` means all defaults
    RecipeDir(String),
}

impl ConfigSource {
    /// Name used in messages
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File(path) | Self::RecipeDir(path) => path,
        }
    }

    /// Read and parse the document without validating it
    pub fn load_raw(&self, system: &dyn System) -> Result<Value> {
        match self {
            Self::File(path) => yaml::load_raw(system, path),
            Self::RecipeDir(dir) => match yaml::find_forge_yaml(system, Path::new(dir))? {
                Some(path) => yaml::load_raw(system, &path.to_string_lossy()),
                None => {
                    info!("No {FORGE_YAML} found for {dir}, using defaults");
                    Ok(Value::Null)
                }
            },
        }
    }

    /// Read, parse and validate
    pub fn load(&self, system: &dyn System) -> Result<Validated> {
        let raw = self.load_raw(system)?;
        yaml::validate_raw(&raw)
    }
}

/// Validate the configuration and describe the outcome
pub fn run_validate(system: &dyn System, source: &ConfigSource) -> Result<String> {
    let validated = source.load(system)?;
    let warnings = validated.warnings.len();
    debug!(warnings, "Validation succeeded");

    Ok(if warnings == 0 {
        format!("{} is valid", source.name())
    } else {
        format!("{} is valid ({warnings} warning(s))", source.name())
    })
}

/// Validate the configuration and render the normalized form
pub fn run_normalized(
    system: &dyn System,
    source: &ConfigSource,
    format: OutputFormat,
) -> Result<String> {
    let validated = source.load(system)?;
    render_config(&validated.config, format)
}

/// Lint the configuration
///
/// Validation problems are part of the report, not an error; only a file
/// that cannot be read or parsed fails.
pub fn run_lint(system: &dyn System, source: &ConfigSource) -> Result<LintReport> {
    let result = match source.load_raw(system) {
        Ok(raw) => ForgeConfig::validate_value(&raw),
        Err(e) => match e.downcast_ref::<ValidationErrors>() {
            Some(errors) => Err(errors.clone()),
            None => return Err(e),
        },
    };
    let report = LintReport::from_result(&result);
    debug!(lints = report.lints.len(), hints = report.hints.len(), "Lint finished");
    Ok(report)
}

/// Markdown reference of every field
#[must_use]
pub fn run_docs() -> String {
    config::docs::config_docs_markdown()
}

/// JSON schema of the configuration file
pub fn run_schema() -> Result<String> {
    Ok(serde_json::to_string_pretty(&config::schema::config_schema())?)
}
