//! CI provider settings and the per-platform provider selection

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::choices::{CiService, DiskSpaceTarget, Platform};

/// CI services handling one build platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<RawProvider>")]
pub enum ProviderSelection {
    /// `null` or `false`: the platform is not built
    Disabled,
    /// `true`: let the renderer choose an available service
    Default,
    /// One or more explicitly named services
    Services(Vec<CiService>),
}

impl ProviderSelection {
    /// Selection used for a build platform that has no `provider` entry
    #[must_use]
    pub fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Linux64 | Platform::Osx64 | Platform::Win64 => {
                Self::Services(vec![CiService::Azure])
            }
            Platform::LinuxAarch64
            | Platform::LinuxPpc64le
            | Platform::LinuxArmv7l
            | Platform::LinuxS390x
            | Platform::OsxArm64 => Self::Disabled,
        }
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProvider {
    Flag(bool),
    One(CiService),
    Many(Vec<CiService>),
}

impl From<Option<RawProvider>> for ProviderSelection {
    fn from(raw: Option<RawProvider>) -> Self {
        match raw {
            None | Some(RawProvider::Flag(false)) => Self::Disabled,
            Some(RawProvider::Flag(true)) => Self::Default,
            Some(RawProvider::One(service)) => Self::Services(vec![service]),
            Some(RawProvider::Many(services)) => Self::Services(services),
        }
    }
}

impl Serialize for ProviderSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Disabled => serializer.serialize_none(),
            Self::Default => serializer.serialize_bool(true),
            Self::Services(services) => match services.as_slice() {
                [single] => single.serialize(serializer),
                many => many.serialize(serializer),
            },
        }
    }
}

/// GitHub organization, repository and branches of the feedstock
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub user_or_org: String,

    /// Usually filled in by the renderer
    pub repo_name: String,

    pub branch_name: String,

    /// Branch for rerender/webservices actions and ci-setup references
    pub tooling_branch_name: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            user_or_org: "conda-forge".to_owned(),
            repo_name: String::new(),
            branch_name: "main".to_owned(),
            tooling_branch_name: "main".to_owned(),
        }
    }
}

/// Disk cleanup on the Azure Linux image before the build container starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawFreeDiskSpace")]
pub enum FreeDiskSpace {
    #[default]
    Off,
    All,
    Targets(Vec<DiskSpaceTarget>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFreeDiskSpace {
    Flag(bool),
    Targets(Vec<DiskSpaceTarget>),
}

impl From<RawFreeDiskSpace> for FreeDiskSpace {
    fn from(raw: RawFreeDiskSpace) -> Self {
        match raw {
            RawFreeDiskSpace::Flag(false) => Self::Off,
            RawFreeDiskSpace::Flag(true) => Self::All,
            RawFreeDiskSpace::Targets(targets) => Self::Targets(targets),
        }
    }
}

impl Serialize for FreeDiskSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => serializer.serialize_bool(false),
            Self::All => serializer.serialize_bool(true),
            Self::Targets(targets) => targets.serialize(serializer),
        }
    }
}

/// Azure Pipelines settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    /// Build on every supported provider
    pub force: bool,

    pub free_disk_space: FreeDiskSpace,

    /// Concurrent jobs, shared proportionally between OSes
    pub max_parallel: i64,

    pub project_id: String,

    pub project_name: String,

    /// Per-OS pipeline settings (pool, workspace, strategy, swapfile, ...)
    pub settings_linux: Map<String, Value>,

    pub settings_osx: Map<String, Value>,

    pub settings_win: Map<String, Value>,

    /// Publish the build artifacts directory as a pipeline artifact
    pub store_build_artifacts: bool,

    pub timeout_minutes: Option<i64>,

    pub upload_packages: bool,

    /// Azure organization; the GitHub organization is used when unset
    pub user_or_org: Option<String>,

    /// Keys this crate does not interpret, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            force: false,
            free_disk_space: FreeDiskSpace::Off,
            max_parallel: 50,
            project_id: "84710dde-1620-425b-80d0-4cf5baca359d".to_owned(),
            project_name: "feedstock-builds".to_owned(),
            settings_linux: runner_settings(json!({
                "pool": {"vmImage": "ubuntu-latest"},
                "timeoutInMinutes": 360,
            })),
            settings_osx: runner_settings(json!({
                "pool": {"vmImage": "macOS-13"},
                "timeoutInMinutes": 360,
            })),
            settings_win: runner_settings(json!({
                "pool": {"vmImage": "windows-2022"},
                "timeoutInMinutes": 360,
                "variables": {
                    "CONDA_BLD_PATH": "D:\\\\bld\\\\",
                    "UPLOAD_TEMP": "D:\\\\tmp",
                },
            })),
            store_build_artifacts: false,
            timeout_minutes: None,
            upload_packages: true,
            user_or_org: None,
            extra: Map::new(),
        }
    }
}

fn runner_settings(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl AzureConfig {
    /// Keys read into named fields; anything else lands in `extra`
    pub const FIELDS: &'static [&'static str] = &[
        "force",
        "free_disk_space",
        "max_parallel",
        "project_id",
        "project_name",
        "settings_linux",
        "settings_osx",
        "settings_win",
        "store_build_artifacts",
        "timeout_minutes",
        "upload_packages",
        "user_or_org",
    ];
}
