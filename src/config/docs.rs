//! Field documentation for `conda-forge.yml`
//!
//! [`FIELDS`] is the single table of per-field descriptions. The JSON schema
//! pulls its descriptions from it and [`config_docs_markdown`] renders it as
//! the markdown reference page.

use std::fmt::Write as _;

use super::choices::{Choice, Platform};

/// Base URL of the published reference; anchors are top-level keys with `_`
/// replaced by `-`
pub const DOCS_URL: &str = "https://conda-forge.org/docs/maintainer/conda_forge_yml/";

/// Documentation for one configuration field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDoc {
    /// Dotted path, e.g. `bot.automerge`
    pub path: &'static str,
    pub description: &'static str,
    /// YAML snippet showing typical use
    pub example: Option<&'static str>,
    /// Still recognized, but any value is rejected
    pub deprecated: bool,
}

const fn field(path: &'static str, description: &'static str) -> FieldDoc {
    FieldDoc {
        path,
        description,
        example: None,
        deprecated: false,
    }
}

const fn with_example(path: &'static str, description: &'static str, example: &'static str) -> FieldDoc {
    FieldDoc {
        path,
        description,
        example: Some(example),
        deprecated: false,
    }
}

const fn deprecated(path: &'static str, description: &'static str) -> FieldDoc {
    FieldDoc {
        path,
        description,
        example: None,
        deprecated: true,
    }
}

/// Every documented field, top-level keys in file order with their nested
/// keys right after them
pub static FIELDS: &[FieldDoc] = &[
    field("conda_build", "Settings passed to `conda build` through the generated pipeline."),
    field(
        "conda_build.pkg_format",
        "Artifact format: `1` or `tar` for `.tar.bz2`, `2` for `.conda`. `null` also produces `.tar.bz2`.",
    ),
    field(
        "conda_build.zstd_compression_level",
        "zstd compression level for `.conda` artifacts. 16 trades a little compression for much faster packaging.",
    ),
    field(
        "conda_build.error_overlinking",
        "Fail the build when shared libraries of transitive dependencies are linked directly.",
    ),
    with_example(
        "conda_build_tool",
        "Build backend used in CI.",
        "conda_build_tool: rattler-build",
    ),
    field("conda_solver", "Solver used by the conda build backend."),
    field("conda_install_tool", "Tool used to install the build tooling on the CI runner."),
    field(
        "conda_forge_output_validation",
        "Validate built artifacts against the feedstock outputs allowed to upload.",
    ),
    field("github", "Location of the feedstock repository on GitHub."),
    field("github.user_or_org", "GitHub user or organization owning the feedstock."),
    field("github.repo_name", "Repository name; normally filled in when rendering."),
    field("github.branch_name", "Default branch of the feedstock."),
    field(
        "github.tooling_branch_name",
        "Branch used by rerender and webservices actions and by ci-setup references.",
    ),
    field("bot", "Behavior of the auto-tick bot."),
    with_example(
        "bot.automerge",
        "Merge bot pull requests automatically once CI passes: `true`, or only `version` or `migration` PRs.",
        "bot:\n  automerge: version",
    ),
    field("bot.check_solvable", "Open pull requests only if the resulting environment is solvable."),
    field("bot.inspection", "How the bot derives dependency hints or recipe updates."),
    field(
        "bot.abi_migration_branches",
        "Branches that receive bot migration pull requests in addition to the default branch.",
    ),
    field(
        "bot.version_updates_random_fraction_to_keep",
        "Fraction of new versions the bot keeps for frequently released packages.",
    ),
    with_example(
        "build_platform",
        "Platform each target platform is built on, for cross-compilation.",
        "build_platform:\n  osx_arm64: osx_64\n  linux_aarch64: linux_64",
    ),
    field(
        "build_with_mambabuild",
        "Use mambabuild for builds with conda-build. Superseded by `conda_build_tool`.",
    ),
    field("channel_priority", "Channel priority used by the solver."),
    field("channels", "Channels used to resolve dependencies and to upload packages."),
    field("channels.sources", "Channels to pull packages from, in priority order."),
    with_example(
        "channels.targets",
        "Channel and label pairs built packages are uploaded to.",
        "channels:\n  targets:\n    - [conda-forge, main]",
    ),
    field("choco", "Chocolatey packages installed on Windows runners before the build."),
    field("docker", "Docker settings for Linux builds."),
    field("docker.executable", "Container engine executable."),
    field("docker.fallback_image", "Image used when the pinning does not name one."),
    field("docker.command", "Command run inside the container."),
    deprecated(
        "docker.image",
        "No longer supported; set Docker images in `conda_build_config.yaml`.",
    ),
    field("idle_timeout_minutes", "Minutes without output before a CI job is cancelled."),
    field("win_64", "Windows x86-64 settings. `win` is accepted as an alias."),
    field("win_64.enabled", "Use extra platform-specific configuration options."),
    field("osx_64", "macOS x86-64 settings. `osx` is accepted as an alias."),
    field("osx_64.enabled", "Use extra platform-specific configuration options."),
    field("osx_arm64", "macOS arm64 settings."),
    field("osx_arm64.enabled", "Use extra platform-specific configuration options."),
    field("linux_64", "Linux x86-64 settings. `linux` is accepted as an alias."),
    field("linux_64.enabled", "Use extra platform-specific configuration options."),
    field("linux_aarch64", "Linux aarch64 settings."),
    field("linux_aarch64.enabled", "Use extra platform-specific configuration options."),
    field("linux_ppc64le", "Linux ppc64le settings."),
    field("linux_ppc64le.enabled", "Use extra platform-specific configuration options."),
    field("linux_s390x", "Linux s390x settings."),
    field("linux_s390x.enabled", "Use extra platform-specific configuration options."),
    field("linux_armv7l", "Linux armv7l settings."),
    field("linux_armv7l.enabled", "Use extra platform-specific configuration options."),
    with_example(
        "noarch_platforms",
        "Platforms noarch packages are built on. A single platform may be written without a list.",
        "noarch_platforms:\n  - linux_64\n  - win_64",
    ),
    with_example(
        "os_version",
        "OS image version per platform; `null` keeps the platform default.",
        "os_version:\n  linux_64: cos7",
    ),
    with_example(
        "provider",
        "CI services per build platform: a service, a list of services, `true` for the default or `null`/`false` to disable.",
        "provider:\n  linux_aarch64: default\n  osx_arm64: [azure, github_actions]",
    ),
    field("package", "Name of the package feedstock directory."),
    field("recipe_dir", "Directory holding the recipe, relative to the feedstock root."),
    with_example(
        "remote_ci_setup",
        "Packages installed to set up CI. Entries containing `<`, `>` or `|` are quoted.",
        "remote_ci_setup:\n  - conda-forge-ci-setup=4\n  - \"conda-build>=24\"",
    ),
    field("shellcheck", "Lint build and activation scripts with shellcheck."),
    field("shellcheck.enabled", "Run shellcheck on shell scripts."),
    with_example(
        "skip_render",
        "Files that rendering leaves untouched.",
        "skip_render:\n  - .gitignore\n  - LICENSE.txt",
    ),
    field("templates", "Template name to template path overrides."),
    field(
        "test_on_native_only",
        "Run tests only on native platforms. Superseded by `test`.",
    ),
    field("test", "Platforms on which tests run."),
    field("upload_on_branch", "Upload packages only from this branch."),
    field("config_version", "Version of the configuration format."),
    field("exclusive_config_file", "Variant config file used instead of the global pinning."),
    field("compiler_stack", "Compiler stack; kept for older feedstocks."),
    field("min_py_ver", "Minimum Python version, without dots."),
    field("max_py_ver", "Maximum Python version, without dots."),
    field("min_r_ver", "Minimum R version, without dots."),
    field("max_r_ver", "Maximum R version, without dots."),
    field("private_upload", "Upload to a private channel."),
    field("secrets", "Names of CI secrets exposed to the build."),
    field("clone_depth", "Depth of the git clone on CI; `null` clones everything."),
    field("timeout_minutes", "Overall CI job timeout in minutes."),
    field("travis", "Travis CI settings, passed through unchanged."),
    field("circle", "CircleCI settings, passed through unchanged."),
    field("appveyor", "AppVeyor settings, passed through unchanged."),
    field("azure", "Azure Pipelines settings. Unknown keys are passed through."),
    field("azure.force", "Build on every supported provider."),
    with_example(
        "azure.free_disk_space",
        "Free disk space on the Linux runner before the build: `true` or a list of `apt`, `cache`, `docker`.",
        "azure:\n  free_disk_space: [apt, docker]",
    ),
    field("azure.max_parallel", "Maximum concurrent jobs, split between operating systems."),
    field("azure.project_id", "Azure DevOps project ID."),
    field("azure.project_name", "Azure DevOps project name."),
    with_example(
        "azure.settings_linux",
        "Linux pipeline settings (pool, timeout, variables and so on).",
        "azure:\n  settings_linux:\n    timeoutInMinutes: 720",
    ),
    field("azure.settings_osx", "macOS pipeline settings."),
    field("azure.settings_win", "Windows pipeline settings."),
    field("azure.store_build_artifacts", "Publish the build artifacts directory as a pipeline artifact."),
    field("azure.timeout_minutes", "Azure job timeout in minutes."),
    field("azure.upload_packages", "Upload packages built on Azure."),
    field("azure.user_or_org", "Azure organization; the GitHub organization when unset."),
    field("drone", "Drone CI settings; values are kept as strings."),
    field("github_actions", "GitHub Actions settings, passed through unchanged."),
    field("woodpecker", "Woodpecker CI settings; values are kept as strings."),
    deprecated(
        "matrix",
        "No longer supported; migrate the build matrix to `conda_build_config.yaml`.",
    ),
];

/// Documentation for a dotted field path
#[must_use]
pub fn field_doc(path: &str) -> Option<&'static FieldDoc> {
    FIELDS.iter().find(|doc| doc.path == path)
}

/// Link to the reference entry of a top-level key
#[must_use]
pub fn help_url(path: &str) -> String {
    let top = path
        .split(['.', '['])
        .next()
        .unwrap_or(path);
    let top = Platform::ALIASES
        .iter()
        .find(|(alias, _)| *alias == top)
        .map_or(top, |(_, platform)| platform.as_str());
    format!("{DOCS_URL}#{}", top.replace('_', "-"))
}

/// Markdown reference for every documented field
#[must_use]
pub fn config_docs_markdown() -> String {
    let mut out = String::new();
    out.push_str("# conda-forge.yml Reference\n\n");
    out.push_str(
        "Every key is optional. Absent keys take the default shown by \
        `forgeyml --normalized` on an empty file.\n\n",
    );

    for doc in FIELDS {
        let depth = doc.path.matches('.').count();
        let heading = if depth == 0 { "##" } else { "###" };
        let _ = writeln!(out, "{heading} `{}`\n", doc.path);
        if doc.deprecated {
            out.push_str("**Deprecated.** ");
        }
        out.push_str(doc.description);
        out.push_str("\n\n");
        if let Some(example) = doc.example {
            let _ = writeln!(out, "```yaml\n{example}\n```\n");
        }
    }

    out
}
