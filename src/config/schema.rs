//! JSON Schema for `conda-forge.yml`
//!
//! Generated from the choice sets and the field documentation so that it
//! cannot drift from what the validator accepts. The schema describes the
//! input form: explicit `null` is allowed wherever it falls back to a default.
//! Validation runs the document through it before any typed decoding.

use std::sync::LazyLock;

use jsonschema::error::ValidationErrorKind as SchemaErrorKind;
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value, json};

use super::choices::{
    AutomergeChoice, ChannelPriority, Choice, CiService, CondaBuildTool, CondaInstallTool,
    CondaSolver, DiskSpaceTarget, Inspection, PkgFormat, Platform, SkipRender, TestPlatforms,
};
use super::docs::field_doc;
use super::validation::ROOT_PATH;
use crate::error::{ValidationError, ValidationErrorKind, join_path};

static VALIDATOR: LazyLock<Result<Validator, String>> = LazyLock::new(|| {
    jsonschema::options()
        .with_draft(Draft::Draft7)
        .build(&config_schema())
        .map_err(|e| format!("Failed to compile JSON schema: {e}"))
});

/// Draft 7 JSON Schema accepting every valid `conda-forge.yml`
#[must_use]
pub fn config_schema() -> Value {
    let mut pkg_formats: Vec<Value> = PkgFormat::allowed().into_iter().map(Value::from).collect();
    pkg_formats.extend([json!(1), json!(2), Value::Null]);

    let mut automerge = vec![Value::Bool(true), Value::Bool(false)];
    automerge.extend(AutomergeChoice::allowed().into_iter().map(Value::from));
    automerge.push(Value::Null);

    let mut provider = vec![Value::Bool(true), Value::Bool(false), Value::Null];
    provider.extend(CiService::allowed().into_iter().map(Value::from));

    let mut properties = Map::new();
    let mut add = |path: &'static str, schema: Value| {
        properties.insert(path.to_owned(), documented(path, schema));
    };

    add("conda_build", object(vec![
        ("conda_build.pkg_format", json!({"enum": pkg_formats})),
        ("conda_build.zstd_compression_level", integer()),
        ("conda_build.error_overlinking", boolean()),
    ]));
    add("conda_build_tool", nullable_choice::<CondaBuildTool>());
    add("conda_solver", nullable_choice::<CondaSolver>());
    add("conda_install_tool", nullable_choice::<CondaInstallTool>());
    add("conda_forge_output_validation", boolean());
    add("github", object(vec![
        ("github.user_or_org", string()),
        ("github.repo_name", string()),
        ("github.branch_name", string()),
        ("github.tooling_branch_name", string()),
    ]));
    add("bot", object(vec![
        ("bot.automerge", json!({"enum": automerge})),
        ("bot.check_solvable", boolean()),
        ("bot.inspection", nullable_choice::<Inspection>()),
        ("bot.abi_migration_branches", string_list()),
        ("bot.version_updates_random_fraction_to_keep", json!({"type": ["number", "null"]})),
    ]));
    add("build_platform", platform_map(choice::<Platform>()));
    add("build_with_mambabuild", boolean());
    add("channel_priority", nullable_choice::<ChannelPriority>());
    add("channels", object(vec![
        ("channels.sources", string_list()),
        (
            "channels.targets",
            json!({
                "type": ["array", "null"],
                "items": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": 2,
                    "maxItems": 2,
                },
            }),
        ),
    ]));
    add("choco", string_list());
    add("docker", object(vec![
        ("docker.executable", string()),
        ("docker.fallback_image", string()),
        ("docker.command", string()),
        ("docker.image", json!({"type": "null"})),
    ]));
    add("idle_timeout_minutes", integer());
    for platform in Platform::ALL {
        add(platform.as_str(), platform_block(*platform));
    }
    add("noarch_platforms", one_or_many(choice::<Platform>(), nullable_choice::<Platform>()));
    add("os_version", platform_map(string()));
    add(
        "provider",
        platform_map(one_or_many(choice::<CiService>(), json!({"enum": provider}))),
    );
    add("package", string());
    add("recipe_dir", string());
    add(
        "remote_ci_setup",
        json!({"type": ["string", "array", "null"], "items": {"type": "string"}}),
    );
    add("shellcheck", object(vec![("shellcheck.enabled", boolean())]));
    add("skip_render", json!({"type": ["array", "null"], "items": choice::<SkipRender>()}));
    add(
        "templates",
        json!({"type": ["object", "null"], "additionalProperties": {"type": "string"}}),
    );
    add("test_on_native_only", boolean());
    add("test", nullable_choice::<TestPlatforms>());
    add("upload_on_branch", string());
    add("config_version", version());
    add("exclusive_config_file", string());
    add("compiler_stack", string());
    add("min_py_ver", version());
    add("max_py_ver", version());
    add("min_r_ver", version());
    add("max_r_ver", version());
    add("private_upload", boolean());
    add("secrets", string_list());
    add("clone_depth", integer());
    add("timeout_minutes", integer());
    add("travis", free_form());
    add("circle", free_form());
    add("appveyor", free_form());
    add("azure", object(vec![
        ("azure.force", boolean()),
        (
            "azure.free_disk_space",
            one_or_many(choice::<DiskSpaceTarget>(), boolean()),
        ),
        ("azure.max_parallel", integer()),
        ("azure.project_id", string()),
        ("azure.project_name", string()),
        ("azure.settings_linux", free_form()),
        ("azure.settings_osx", free_form()),
        ("azure.settings_win", free_form()),
        ("azure.store_build_artifacts", boolean()),
        ("azure.timeout_minutes", integer()),
        ("azure.upload_packages", boolean()),
        ("azure.user_or_org", string()),
    ]));
    add("drone", scalar_map());
    add("github_actions", free_form());
    add("woodpecker", scalar_map());
    add("matrix", json!({"type": "null"}));

    for &(alias, platform) in Platform::ALIASES {
        properties.insert(
            alias.to_owned(),
            json!({
                "description": format!("Alias of `{platform}`."),
                "$ref": format!("#/properties/{platform}"),
            }),
        );
    }

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "conda-forge.yml",
        "type": ["object", "null"],
        "properties": properties,
    })
}

/// Check a document against [`config_schema`], reporting every violation
///
/// # Errors
///
/// Returns one [`ValidationError`] per violation, with dotted paths
pub fn validate_against_schema(document: &Value) -> Result<(), Vec<ValidationError>> {
    let validator = match &*VALIDATOR {
        Ok(validator) => validator,
        Err(message) => {
            return Err(vec![ValidationError::new(
                ROOT_PATH,
                ValidationErrorKind::TypeMismatch,
                message.clone(),
            )]);
        }
    };

    let errors: Vec<ValidationError> = validator
        .iter_errors(document)
        .flat_map(|error| {
            let path = pointer_to_path(&error.instance_path.to_string());
            let instance: &Value = &error.instance;
            match &error.kind {
                SchemaErrorKind::Enum { options } => {
                    let allowed = options.as_array().map_or(&[][..], Vec::as_slice);
                    vec![ValidationError::unknown_value(path, instance, allowed)]
                }
                // Only platform maps close their key set
                SchemaErrorKind::AdditionalProperties { unexpected } => {
                    let platforms: Vec<Value> =
                        Platform::allowed().into_iter().map(Value::from).collect();
                    unexpected
                        .iter()
                        .map(|key| {
                            ValidationError::unknown_value(
                                join_path(&path, key),
                                &Value::from(key.as_str()),
                                &platforms,
                            )
                        })
                        .collect()
                }
                _ => vec![
                    ValidationError::new(path, ValidationErrorKind::TypeMismatch, error.to_string())
                        .with_value(instance),
                ],
            }
        })
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// `/channels/targets/0` becomes `channels.targets[0]`
fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').filter(|segment| !segment.is_empty()) {
        if segment.bytes().all(|byte| byte.is_ascii_digit()) {
            path.push('[');
            path.push_str(segment);
            path.push(']');
        } else {
            let key = segment.replace("~1", "/").replace("~0", "~");
            path = join_path(&path, &key);
        }
    }
    if path.is_empty() { ROOT_PATH.to_owned() } else { path }
}

fn documented(path: &str, mut schema: Value) -> Value {
    if let (Some(doc), Value::Object(map)) = (field_doc(path), &mut schema) {
        map.insert("description".to_owned(), Value::from(doc.description));
        if doc.deprecated {
            map.insert("deprecated".to_owned(), Value::Bool(true));
        }
    }
    schema
}

fn boolean() -> Value {
    json!({"type": ["boolean", "null"]})
}

fn integer() -> Value {
    json!({"type": ["integer", "null"]})
}

fn string() -> Value {
    json!({"type": ["string", "null"]})
}

/// Written as text or as a bare number
fn version() -> Value {
    json!({"type": ["string", "integer", "null"]})
}

fn string_list() -> Value {
    json!({"type": ["array", "null"], "items": {"type": "string"}})
}

/// A list of `items`, or a single value matching `scalar`
fn one_or_many(items: Value, scalar: Value) -> Value {
    json!({
        "if": {"type": "array"},
        "then": {"items": items},
        "else": scalar,
    })
}

fn choice<C: Choice>() -> Value {
    json!({"enum": C::allowed()})
}

fn nullable_choice<C: Choice>() -> Value {
    let mut values: Vec<Value> = C::allowed().into_iter().map(Value::from).collect();
    values.push(Value::Null);
    json!({"enum": values})
}

fn free_form() -> Value {
    json!({"type": ["object", "null"]})
}

fn scalar_map() -> Value {
    json!({
        "type": ["object", "null"],
        "additionalProperties": {"type": ["string", "number", "boolean"]},
    })
}

/// Mapping keyed by platform; any other key is rejected
fn platform_map(values: Value) -> Value {
    let properties: Map<String, Value> = Platform::ALL
        .iter()
        .map(|platform| (platform.as_str().to_owned(), values.clone()))
        .collect();
    json!({
        "type": ["object", "null"],
        "properties": properties,
        "additionalProperties": false,
    })
}

fn platform_block(platform: Platform) -> Value {
    let enabled = format!("{platform}.enabled");
    object(vec![(enabled.as_str(), boolean())])
}

/// Mapping with documented properties; keys are dotted paths
fn object(properties: Vec<(&str, Value)>) -> Value {
    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(path, schema)| {
            let key = path.rsplit('.').next().unwrap_or(path);
            (key.to_owned(), documented(path, schema))
        })
        .collect();
    json!({"type": ["object", "null"], "properties": properties})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_top_level_field_is_described() {
        let schema = config_schema();
        let properties = schema["properties"].as_object().unwrap();
        for (key, property) in properties {
            assert!(
                property.get("description").is_some(),
                "property {key} has no description"
            );
        }
    }

    #[test]
    fn test_choice_sets_are_enumerated() {
        let schema = config_schema();
        assert_eq!(
            schema["properties"]["channel_priority"]["enum"],
            json!(["strict", "flexible", "disabled", null])
        );
        assert_eq!(
            schema["properties"]["bot"]["properties"]["inspection"]["description"],
            json!("How the bot derives dependency hints or recipe updates.")
        );
    }

    #[test]
    fn test_pointer_to_dotted_path() {
        assert_eq!(pointer_to_path(""), ROOT_PATH);
        assert_eq!(pointer_to_path("/conda_solver"), "conda_solver");
        assert_eq!(pointer_to_path("/channels/targets/0"), "channels.targets[0]");
        assert_eq!(pointer_to_path("/provider/osx_arm64/1"), "provider.osx_arm64[1]");
        assert_eq!(pointer_to_path("/templates/a~1b"), "templates.a/b");
    }

    #[test]
    fn test_schema_errors_carry_kind_and_path() {
        let errors = validate_against_schema(&json!({
            "conda_solver": "pip",
            "bot": {"check_solvable": "yes"},
            "build_platform": {"linux_riscv64": "linux_64"},
        }))
        .unwrap_err();

        let solver = errors.iter().find(|e| e.path == "conda_solver").unwrap();
        assert_eq!(solver.kind, ValidationErrorKind::UnknownValue);
        assert_eq!(solver.message, "'pip' is not one of 'libmamba', 'classic'");

        let solvable = errors.iter().find(|e| e.path == "bot.check_solvable").unwrap();
        assert_eq!(solvable.kind, ValidationErrorKind::TypeMismatch);
        assert_eq!(solvable.value, Some(json!("yes")));

        let platform = errors
            .iter()
            .find(|e| e.path == "build_platform.linux_riscv64")
            .unwrap();
        assert_eq!(platform.kind, ValidationErrorKind::UnknownValue);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_scalar_or_list_choices() {
        assert!(validate_against_schema(&json!({"noarch_platforms": "win_64"})).is_ok());
        assert!(validate_against_schema(&json!({"provider": {"linux_64": ["azure", "travis"]}})).is_ok());
        assert!(validate_against_schema(&json!({"azure": {"free_disk_space": ["apt"]}})).is_ok());

        let errors =
            validate_against_schema(&json!({"provider": {"linux_64": ["azure", "jenkins"]}}))
                .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "provider.linux_64[1]");
    }
}
