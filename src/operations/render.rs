//! Canonical serialization of the normalized configuration

use core::str::FromStr;

use anyhow::{Context as _, Result};

use crate::config::ForgeConfig;

/// Output format for the normalized configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML, the format of `conda-forge.yml` itself
    #[default]
    Yaml,
    /// Pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'yaml' or 'json'")),
        }
    }
}

/// Serialize a normalized configuration
///
/// Fields appear in declaration order and every default is written out, so
/// feeding the output back through validation yields the same configuration.
///
/// # Errors
///
/// Returns an error if serialization fails
pub fn render_config(config: &ForgeConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")
        }
        OutputFormat::Json => serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration to JSON"),
    }
}
