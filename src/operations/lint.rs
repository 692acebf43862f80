//! Lint and hint messages for pull-request comments
//!
//! Validation errors become lints and warnings become hints. Each message
//! names the offending field, links its reference entry and quotes the
//! problem as a markdown block.

use std::fmt::Write as _;

use serde_json::Value;

use crate::config::Validated;
use crate::config::docs::help_url;
use crate::config::schema::config_schema;
use crate::error::{ValidationError, ValidationErrors, ValidationWarning};

/// Lints (blocking) and hints (advisory) for one configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub lints: Vec<String>,
    pub hints: Vec<String>,
}

impl LintReport {
    /// Build the report from a validation outcome
    #[must_use]
    pub fn from_result(result: &Result<Validated, ValidationErrors>) -> Self {
        match result {
            Ok(validated) => Self {
                lints: Vec::new(),
                hints: validated.warnings.iter().map(format_warning).collect(),
            },
            Err(errors) => Self {
                lints: errors.iter().map(format_error).collect(),
                hints: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.lints.is_empty() && self.hints.is_empty()
    }

    /// Markdown bullets under a `For **<name>**:` heading, lints first
    #[must_use]
    pub fn to_markdown(&self, name: &str) -> String {
        let mut out = String::new();
        for group in [&self.lints, &self.hints] {
            if group.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\nFor **{name}**:\n");
            for message in group {
                let _ = writeln!(out, "* {message}");
            }
        }
        out
    }
}

/// Markdown message for one field
///
/// `value` is shown next to the path when known, strings without quotes.
/// The schema of the top-level key is attached in a collapsed block,
/// without descriptions.
#[must_use]
pub fn format_validation_msg(path: &str, value: Option<&Value>, message: &str) -> String {
    let url = help_url(path);
    let mut out = match value {
        Some(Value::String(text)) => format!("In conda-forge.yml: [`{path}`]({url}) `=` `{text}`.\n"),
        Some(value) => format!("In conda-forge.yml: [`{path}`]({url}) `=` `{value}`.\n"),
        None => format!("In conda-forge.yml: [`{path}`]({url}).\n"),
    };
    for line in message.lines() {
        let _ = writeln!(out, "> {line}");
    }

    if let Some(subschema) = top_level_schema(path) {
        let _ = write!(
            out,
            "<details>\n<summary>Schema</summary>\n\n```json\n{subschema}\n```\n\n</details>"
        );
    }
    out.trim_end().to_owned()
}

fn format_error(error: &ValidationError) -> String {
    format_validation_msg(&error.path, error.value.as_ref(), &error.message)
}

fn format_warning(warning: &ValidationWarning) -> String {
    format_validation_msg(&warning.path, None, &warning.message)
}

fn top_level_schema(path: &str) -> Option<String> {
    let top = path.split(['.', '[']).next()?;
    let mut schema = config_schema();
    let property = schema.get_mut("properties")?.get_mut(top)?.take();
    let Value::Object(mut property) = property else {
        return None;
    };
    property.remove("description");
    serde_json::to_string_pretty(&property).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForgeConfig;
    use serde_json::json;

    #[test]
    fn test_message_links_top_level_key() {
        let message = format_validation_msg(
            "bot.automerge",
            Some(&json!("always")),
            "'always' is not one of 'version', 'migration'",
        );
        assert!(message.starts_with(
            "In conda-forge.yml: [`bot.automerge`](https://conda-forge.org/docs/maintainer/conda_forge_yml/#bot) `=` `always`."
        ));
        assert!(message.contains("\n> 'always' is not one of"));
        assert!(message.contains("<summary>Schema</summary>"));
    }

    #[test]
    fn test_non_string_values_keep_json_form() {
        let message = format_validation_msg("bot.check_solvable", Some(&json!(["yes"])), "wrong type");
        assert!(message.contains("`=` `[\"yes\"]`."), "{message}");
    }

    #[test]
    fn test_errors_become_lints() {
        let result = ForgeConfig::validate_value(&json!({"conda_solver": "pip"}));
        let report = LintReport::from_result(&result);

        assert_eq!(report.lints.len(), 1);
        assert!(report.hints.is_empty());
        assert!(report.lints[0].contains("#conda-solver"));
    }

    #[test]
    fn test_warnings_become_hints() {
        let result = ForgeConfig::validate_value(&json!({"travis": {"enabled": true}}));
        let report = LintReport::from_result(&result);

        assert!(report.lints.is_empty());
        assert_eq!(report.hints.len(), 1);
        assert!(report.hints[0].contains("[`travis.enabled`]"));
    }

    #[test]
    fn test_markdown_groups_bullets() {
        let report = LintReport {
            lints: vec!["first".to_owned()],
            hints: vec!["second".to_owned()],
        };
        let markdown = report.to_markdown("recipe");
        assert_eq!(markdown, "\nFor **recipe**:\n\n* first\n\nFor **recipe**:\n\n* second\n");
        assert!(LintReport::from_result(&ForgeConfig::validate_value(&json!({}))).is_clean());
    }
}
