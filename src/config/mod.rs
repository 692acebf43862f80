//! Configuration management module
//!
//! Handles loading `conda-forge.yml`, validating it against the recognized
//! options, and producing the normalized, fully defaulted configuration

pub mod choices;
pub mod de;
pub mod docs;
pub mod providers;
pub mod schema;
pub mod sections;
pub mod validation;
pub mod yaml;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ValidationErrors, ValidationWarning};
use crate::system::System;
use choices::{
    ChannelPriority, CondaBuildTool, CondaInstallTool, CondaSolver, Platform, SkipRender,
    TestPlatforms,
};
use providers::{AzureConfig, GithubConfig, ProviderSelection};
use sections::{
    BotConfig, ChannelsConfig, CondaBuildConfig, DockerConfig, PlatformUniqueConfig, ShellCheck,
};

/// Normalized `conda-forge.yml`
///
/// Every field holds either what the user wrote or its documented default.
/// Deprecated fields are not represented: they only exist in the raw
/// input, where any value is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub conda_build: CondaBuildConfig,
    pub conda_build_tool: CondaBuildTool,
    pub conda_solver: CondaSolver,
    pub conda_install_tool: CondaInstallTool,
    pub conda_forge_output_validation: bool,
    pub github: GithubConfig,
    pub bot: BotConfig,

    /// Target platform to the platform it is built on (cross-compilation)
    pub build_platform: BTreeMap<Platform, Platform>,

    pub build_with_mambabuild: bool,
    pub channel_priority: ChannelPriority,
    pub channels: ChannelsConfig,

    /// Chocolatey packages installed on Windows runners
    pub choco: Vec<String>,

    pub docker: DockerConfig,
    pub idle_timeout_minutes: Option<i64>,

    pub win_64: PlatformUniqueConfig,
    pub osx_64: PlatformUniqueConfig,
    pub osx_arm64: PlatformUniqueConfig,
    pub linux_64: PlatformUniqueConfig,
    pub linux_aarch64: PlatformUniqueConfig,
    pub linux_ppc64le: PlatformUniqueConfig,
    pub linux_s390x: PlatformUniqueConfig,
    pub linux_armv7l: PlatformUniqueConfig,

    #[serde(deserialize_with = "de::one_or_many")]
    pub noarch_platforms: Vec<Platform>,

    /// OS version per platform; `None` requests the platform default
    pub os_version: BTreeMap<Platform, Option<String>>,

    /// Build platform to CI services; see [`ForgeConfig::provider_for`]
    pub provider: BTreeMap<Platform, ProviderSelection>,

    pub package: Option<String>,
    pub recipe_dir: String,

    /// Packages installed to set up CI, quoted where YAML would misread them
    #[serde(deserialize_with = "de::one_or_many")]
    pub remote_ci_setup: Vec<String>,

    pub shellcheck: Option<ShellCheck>,
    pub skip_render: Vec<SkipRender>,
    pub templates: BTreeMap<String, String>,

    /// Superseded by `test`; the two are not reconciled here
    pub test_on_native_only: bool,

    pub test: Option<TestPlatforms>,
    pub upload_on_branch: Option<String>,
    #[serde(deserialize_with = "de::version_string")]
    pub config_version: String,
    pub exclusive_config_file: Option<String>,
    pub compiler_stack: String,
    #[serde(deserialize_with = "de::version_string")]
    pub min_py_ver: String,
    #[serde(deserialize_with = "de::version_string")]
    pub max_py_ver: String,
    #[serde(deserialize_with = "de::version_string")]
    pub min_r_ver: String,
    #[serde(deserialize_with = "de::version_string")]
    pub max_r_ver: String,
    pub private_upload: bool,
    pub secrets: Vec<String>,
    pub clone_depth: Option<i64>,
    pub timeout_minutes: Option<i64>,

    pub travis: Map<String, Value>,
    pub circle: Map<String, Value>,
    pub appveyor: Map<String, Value>,
    pub azure: AzureConfig,
    #[serde(deserialize_with = "de::scalar_strings")]
    pub drone: Map<String, Value>,
    pub github_actions: Map<String, Value>,
    #[serde(deserialize_with = "de::scalar_strings")]
    pub woodpecker: Map<String, Value>,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            conda_build: CondaBuildConfig::default(),
            conda_build_tool: CondaBuildTool::CondaBuild,
            conda_solver: CondaSolver::Libmamba,
            conda_install_tool: CondaInstallTool::Mamba,
            conda_forge_output_validation: true,
            github: GithubConfig::default(),
            bot: BotConfig::default(),
            build_platform: BTreeMap::new(),
            build_with_mambabuild: true,
            channel_priority: ChannelPriority::Strict,
            channels: ChannelsConfig::default(),
            choco: Vec::new(),
            docker: DockerConfig::default(),
            idle_timeout_minutes: None,
            win_64: PlatformUniqueConfig::default(),
            osx_64: PlatformUniqueConfig::default(),
            osx_arm64: PlatformUniqueConfig::default(),
            linux_64: PlatformUniqueConfig::default(),
            linux_aarch64: PlatformUniqueConfig::default(),
            linux_ppc64le: PlatformUniqueConfig::default(),
            linux_s390x: PlatformUniqueConfig::default(),
            linux_armv7l: PlatformUniqueConfig::default(),
            noarch_platforms: vec![Platform::Linux64],
            os_version: BTreeMap::new(),
            provider: BTreeMap::new(),
            package: None,
            recipe_dir: "recipe".to_owned(),
            remote_ci_setup: vec!["conda-forge-ci-setup=3".to_owned()],
            shellcheck: None,
            skip_render: Vec::new(),
            templates: BTreeMap::new(),
            test_on_native_only: false,
            test: None,
            upload_on_branch: None,
            config_version: "2".to_owned(),
            exclusive_config_file: None,
            compiler_stack: "comp7".to_owned(),
            min_py_ver: "27".to_owned(),
            max_py_ver: "37".to_owned(),
            min_r_ver: "34".to_owned(),
            max_r_ver: "34".to_owned(),
            private_upload: false,
            secrets: Vec::new(),
            clone_depth: None,
            timeout_minutes: None,
            travis: Map::new(),
            circle: Map::new(),
            appveyor: Map::new(),
            azure: AzureConfig::default(),
            drone: Map::new(),
            github_actions: Map::new(),
            woodpecker: Map::new(),
        }
    }
}

/// Successful validation: the normalized configuration plus any warnings
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub config: ForgeConfig,
    pub warnings: Vec<ValidationWarning>,
}

impl ForgeConfig {
    /// Validate a raw mapping as decoded from YAML
    ///
    /// # Errors
    ///
    /// Returns every independent problem found in the document
    #[inline]
    pub fn validate_value(raw: &Value) -> Result<Validated, ValidationErrors> {
        validation::validate(raw)
    }

    /// Parse YAML text and validate it
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Validated> {
        let raw = yaml::parse_yaml(content, "conda-forge.yml")?;
        yaml::validate_raw(&raw)
    }

    /// Load and validate a configuration file
    pub fn load_from_file(system: &dyn System, path: &str) -> anyhow::Result<Validated> {
        yaml::load_config(system, path)
    }

    /// Per-platform block for `platform`
    #[must_use]
    pub const fn platform_config(&self, platform: Platform) -> &PlatformUniqueConfig {
        match platform {
            Platform::Linux64 => &self.linux_64,
            Platform::LinuxAarch64 => &self.linux_aarch64,
            Platform::LinuxPpc64le => &self.linux_ppc64le,
            Platform::LinuxArmv7l => &self.linux_armv7l,
            Platform::LinuxS390x => &self.linux_s390x,
            Platform::Win64 => &self.win_64,
            Platform::Osx64 => &self.osx_64,
            Platform::OsxArm64 => &self.osx_arm64,
        }
    }

    /// Platform that `target` is built on; native unless cross-compiled
    #[must_use]
    pub fn build_platform_for(&self, target: Platform) -> Platform {
        self.build_platform.get(&target).copied().unwrap_or(target)
    }

    /// CI services for a build platform, falling back to the per-platform default
    #[must_use]
    pub fn provider_for(&self, build_platform: Platform) -> ProviderSelection {
        self.provider
            .get(&build_platform)
            .cloned()
            .unwrap_or_else(|| ProviderSelection::default_for(build_platform))
    }

    /// Canonical mapping form, suitable for diffing against the user's file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}
