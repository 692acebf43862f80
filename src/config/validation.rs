//! Configuration validation pipeline
//!
//! Validation runs as an ordered sequence of rules over the raw mapping:
//!
//! 1. platform alias resolution (`win`, `osx`, `linux`)
//! 2. deprecated-field rejection, on raw values before any defaulting
//! 3. CI provider `enabled` warnings
//! 4. JSON Schema check of every field's shape and choice set
//! 5. typed decoding, with defaults for absent or `null` fields
//! 6. cross-field checks (disabled platform used as a build platform,
//!    `test` together with `test_on_native_only`)
//!
//! Problems are accumulated; the caller either gets the normalized
//! configuration or every error found. Cross-field checks only run on a
//! document whose fields are individually valid.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::choices::{Choice as _, Platform};
use super::providers::AzureConfig;
use super::schema;
use super::{ForgeConfig, Validated};
use crate::error::{ValidationError, ValidationErrorKind, ValidationErrors, ValidationWarning};

/// Path used for problems with the document as a whole
pub const ROOT_PATH: &str = "(root)";

/// CI provider blocks checked for a misplaced `enabled` key
pub const CI_PROVIDER_KEYS: &[&str] = &[
    "travis",
    "circle",
    "appveyor",
    "drone",
    "azure",
    "github_actions",
    "woodpecker",
];

/// Every top-level key understood by this crate, deprecated ones included
pub const ROOT_KEYS: &[&str] = &[
    "conda_build",
    "conda_build_tool",
    "conda_solver",
    "conda_install_tool",
    "conda_forge_output_validation",
    "github",
    "bot",
    "build_platform",
    "build_with_mambabuild",
    "channel_priority",
    "channels",
    "choco",
    "docker",
    "idle_timeout_minutes",
    "win_64",
    "osx_64",
    "osx_arm64",
    "linux_64",
    "linux_aarch64",
    "linux_ppc64le",
    "linux_s390x",
    "linux_armv7l",
    "noarch_platforms",
    "os_version",
    "provider",
    "package",
    "recipe_dir",
    "remote_ci_setup",
    "shellcheck",
    "skip_render",
    "templates",
    "test_on_native_only",
    "test",
    "upload_on_branch",
    "config_version",
    "exclusive_config_file",
    "compiler_stack",
    "min_py_ver",
    "max_py_ver",
    "min_r_ver",
    "max_r_ver",
    "private_upload",
    "secrets",
    "clone_depth",
    "timeout_minutes",
    "travis",
    "circle",
    "appveyor",
    "azure",
    "drone",
    "github_actions",
    "woodpecker",
    "matrix",
];

const MATRIX_MESSAGE: &str = "Cannot rerender with matrix in conda-forge.yml. \
    Please migrate matrix to conda_build_config.yaml and try again. \
    See https://github.com/conda-forge/conda-smithy/wiki/Release-Notes-3.0.0.rc1 for more info.";

const DOCKER_IMAGE_MESSAGE: &str = "Setting the Docker image in conda-forge.yml is no longer supported. \
    Please use conda_build_config.yaml to specify Docker images.";

/// Problems collected while validating one document
#[derive(Debug, Default)]
pub struct Issues {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl Issues {
    #[inline]
    pub fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    #[inline]
    pub fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether `path` or a field below it already has an error
    fn covers(&self, path: &str) -> bool {
        self.errors.iter().any(|error| {
            path.strip_prefix(error.path.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['.', '[']))
        })
    }
}

/// Validate a raw document and build the normalized configuration
///
/// # Errors
///
/// Returns every hard error found; warnings never cause a failure
pub fn validate(raw: &Value) -> Result<Validated, ValidationErrors> {
    let document = match raw {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => {
            return Err(ValidationErrors::new(vec![ValidationError::type_mismatch(
                ROOT_PATH,
                "a mapping",
                other,
            )]));
        }
    };

    let mut issues = Issues::default();

    let mut document = resolve_platform_aliases(document, &mut issues);
    reject_deprecated_fields(&document, &mut issues);
    warn_on_provider_enabled(&document, &mut issues);

    if let Err(errors) = schema::validate_against_schema(&Value::Object(document.clone())) {
        for error in errors {
            if !issues.covers(&error.path) {
                issues.error(error);
            }
        }
    }
    if issues.has_errors() {
        return Err(rejected(issues));
    }

    log_unknown_keys(&document);
    drop_null_fields(&mut document);

    let decoded: Result<ForgeConfig, _> = serde_path_to_error::deserialize(Value::Object(document));
    let mut config = match decoded {
        Ok(config) => config,
        Err(error) => {
            let path = match error.path().to_string() {
                path if path == "." => ROOT_PATH.to_owned(),
                path => path,
            };
            issues.error(ValidationError::new(
                path,
                ValidationErrorKind::TypeMismatch,
                error.inner().to_string(),
            ));
            return Err(rejected(issues));
        }
    };
    config.remote_ci_setup = config
        .remote_ci_setup
        .iter()
        .map(|package| sanitize_remote_ci_setup(package))
        .collect();

    check_build_platform_conflicts(&config, &mut issues);
    warn_on_superseded_test_field(&config, &mut issues);

    if issues.has_errors() {
        return Err(rejected(issues));
    }

    Ok(Validated {
        config,
        warnings: issues.warnings,
    })
}

fn rejected(issues: Issues) -> ValidationErrors {
    debug!(errors = issues.errors.len(), "Configuration rejected");
    ValidationErrors::new(issues.errors)
}

/// Move `win`, `osx` and `linux` blocks to their canonical keys
///
/// Writing both an alias and its canonical key is a conflict; the canonical
/// block is kept so that the remaining rules still see it.
#[must_use]
pub fn resolve_platform_aliases(mut document: Map<String, Value>, issues: &mut Issues) -> Map<String, Value> {
    for &(alias, platform) in Platform::ALIASES {
        let Some(value) = document.remove(alias) else {
            continue;
        };
        let canonical = platform.as_str();
        if document.contains_key(canonical) {
            issues.error(ValidationError::conflicting(
                alias,
                format!(
                    "'{alias}' is an alias of '{canonical}' and both are set. \
                    Keep only one of them."
                ),
            ));
        } else {
            debug!(alias, canonical, "Resolved platform alias");
            document.insert(canonical.to_owned(), value);
        }
    }
    document
}

/// Any non-null `matrix` or `docker.image` is an error, whatever it holds
pub fn reject_deprecated_fields(document: &Map<String, Value>, issues: &mut Issues) {
    if let Some(matrix) = document.get("matrix").filter(|matrix| !matrix.is_null()) {
        issues.error(ValidationError::deprecated("matrix", matrix, MATRIX_MESSAGE));
    }

    if let Some(Value::Object(docker)) = document.get("docker")
        && let Some(image) = docker.get("image").filter(|image| !image.is_null())
    {
        issues.error(ValidationError::deprecated(
            "docker.image",
            image,
            DOCKER_IMAGE_MESSAGE,
        ));
    }
}

/// CI providers cannot be switched off from `conda-forge.yml`; say so, but
/// accept the block
pub fn warn_on_provider_enabled(document: &Map<String, Value>, issues: &mut Issues) {
    for &provider in CI_PROVIDER_KEYS {
        let Some(Value::Object(settings)) = document.get(provider) else {
            continue;
        };
        if !settings.contains_key("enabled") {
            continue;
        }
        let message = format!(
            "It is not allowed to set the `enabled` parameter for {provider}. \
            All CIs are enabled by default. To disable a CI, please add `skip: true` \
            to the `build` section of `meta.yaml` and an appropriate selector so as \
            to disable the build."
        );
        warn!(provider, "{message}");
        issues.warn(ValidationWarning::new(format!("{provider}.enabled"), message));
    }
}

/// Quote a `remote_ci_setup` entry that YAML would otherwise misread
///
/// Entries already starting with a quote are left alone, which makes the
/// transformation idempotent.
#[must_use]
pub fn sanitize_remote_ci_setup(package: &str) -> String {
    if package.starts_with(['\'', '"']) {
        package.to_owned()
    } else if package.contains(['<', '>', '|']) {
        format!("\"{package}\"")
    } else {
        package.to_owned()
    }
}

/// A platform explicitly disabled must not be a key of `build_platform`
///
/// Each platform is checked on its own and every conflict is reported. A
/// platform block that never sets `enabled` does not conflict.
pub fn check_build_platform_conflicts(config: &ForgeConfig, issues: &mut Issues) {
    for &platform in Platform::ALL {
        if !config.build_platform.contains_key(&platform) {
            continue;
        }
        if config.platform_config(platform).enabled == Some(false) {
            issues.error(ValidationError::conflicting(
                format!("{}.enabled", platform.as_str()),
                format!(
                    "Platform {platform} is disabled but is also a build platform. \
                    Please enable the platform or remove it from build_platform."
                ),
            ));
        }
    }
}

/// `test` supersedes `test_on_native_only`; both are kept as written and
/// the overlap is reported as a warning
fn warn_on_superseded_test_field(config: &ForgeConfig, issues: &mut Issues) {
    if config.test_on_native_only && let Some(test) = config.test {
        let message = format!(
            "Both `test_on_native_only` and `test: {test}` are set. \
            `test_on_native_only` is superseded by `test`; remove it."
        );
        warn!("{message}");
        issues.warn(ValidationWarning::new("test_on_native_only", message));
    }
}

fn log_unknown_keys(document: &Map<String, Value>) {
    for key in document.keys().filter(|key| !ROOT_KEYS.contains(&key.as_str())) {
        debug!(key, "Ignoring unrecognized configuration key");
    }
}

/// Blocks whose `null` members mean "use the default"
const NULLABLE_BLOCKS: &[&str] = &["github", "bot", "channels", "docker", "shellcheck"];

/// Remove `null` where it stands for the default, so decoding falls back to it
///
/// `conda_build.pkg_format: null` is a value of its own, as are the `null`
/// entries of `os_version` and `provider`. Unknown Azure keys pass through
/// untouched.
fn drop_null_fields(document: &mut Map<String, Value>) {
    document.retain(|_, value| !value.is_null());

    let blocks = NULLABLE_BLOCKS
        .iter()
        .copied()
        .chain(Platform::ALL.iter().map(|platform| platform.as_str()));
    for key in blocks {
        if let Some(Value::Object(block)) = document.get_mut(key) {
            block.retain(|_, value| !value.is_null());
        }
    }

    if let Some(Value::Object(conda_build)) = document.get_mut("conda_build") {
        conda_build.retain(|key, value| key == "pkg_format" || !value.is_null());
    }

    if let Some(Value::Object(azure)) = document.get_mut("azure") {
        azure.retain(|key, value| !(value.is_null() && AzureConfig::FIELDS.contains(&key.as_str())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_quotes_version_constraints() {
        assert_eq!(sanitize_remote_ci_setup("foo>=1.0"), "\"foo>=1.0\"");
        assert_eq!(sanitize_remote_ci_setup("foo<2"), "\"foo<2\"");
        assert_eq!(sanitize_remote_ci_setup("foo=1|2"), "\"foo=1|2\"");
    }

    #[test]
    fn test_sanitize_leaves_plain_and_quoted_entries() {
        assert_eq!(sanitize_remote_ci_setup("foo"), "foo");
        assert_eq!(sanitize_remote_ci_setup("conda-forge::foo=3"), "conda-forge::foo=3");
        assert_eq!(sanitize_remote_ci_setup("\"foo\""), "\"foo\"");
        assert_eq!(sanitize_remote_ci_setup("'foo>=1'"), "'foo>=1'");
    }

    #[test]
    fn test_alias_moves_to_canonical_key() {
        let Value::Object(document) = json!({"osx": {"enabled": true}}) else {
            unreachable!()
        };
        let mut issues = Issues::default();

        let resolved = resolve_platform_aliases(document, &mut issues);

        assert!(!resolved.contains_key("osx"));
        assert_eq!(resolved.get("osx_64"), Some(&json!({"enabled": true})));
        assert!(!issues.has_errors());
    }

    #[test]
    fn test_alias_and_canonical_together_conflict() {
        let Value::Object(document) = json!({
            "linux": {"enabled": true},
            "linux_64": {"enabled": false},
        }) else {
            unreachable!()
        };
        let mut issues = Issues::default();

        let resolved = resolve_platform_aliases(document, &mut issues);

        assert_eq!(resolved.get("linux_64"), Some(&json!({"enabled": false})));
        assert_eq!(issues.errors.len(), 1);
        assert_eq!(issues.errors[0].path, "linux");
    }

    #[test]
    fn test_null_means_default_except_where_meaningful() {
        let Value::Object(mut document) = json!({
            "recipe_dir": null,
            "bot": {"inspection": null, "check_solvable": true},
            "conda_build": {"pkg_format": null, "zstd_compression_level": null},
            "os_version": {"linux_64": null},
            "azure": {"timeout_minutes": null, "custom": null},
            "osx_64": {"enabled": null},
        }) else {
            unreachable!()
        };

        drop_null_fields(&mut document);

        assert!(!document.contains_key("recipe_dir"));
        assert_eq!(document["bot"], json!({"check_solvable": true}));
        assert_eq!(document["conda_build"], json!({"pkg_format": null}));
        assert_eq!(document["os_version"], json!({"linux_64": null}));
        assert_eq!(document["azure"], json!({"custom": null}));
        assert_eq!(document["osx_64"], json!({}));
    }

    #[test]
    fn test_nested_errors_are_covered_by_their_parent() {
        let mut issues = Issues::default();
        issues.error(ValidationError::deprecated("matrix", &json!({}), "gone"));

        assert!(issues.covers("matrix"));
        assert!(issues.covers("matrix.python"));
        assert!(issues.covers("matrix[0]"));
        assert!(!issues.covers("matrix_extra"));
    }

    #[test]
    fn test_unset_platform_toggle_does_not_conflict() {
        let mut config = ForgeConfig::default();
        config.build_platform.insert(Platform::OsxArm64, Platform::Osx64);
        let mut issues = Issues::default();

        check_build_platform_conflicts(&config, &mut issues);
        assert!(!issues.has_errors());

        config.osx_arm64.enabled = Some(false);
        check_build_platform_conflicts(&config, &mut issues);
        assert_eq!(issues.errors[0].path, "osx_arm64.enabled");
    }

    #[test]
    fn test_root_keys_cover_serialized_fields() {
        let Value::Object(serialized) = ForgeConfig::default().to_value().unwrap() else {
            unreachable!()
        };
        for key in serialized.keys() {
            assert!(ROOT_KEYS.contains(&key.as_str()), "missing root key {key}");
        }
    }
}
