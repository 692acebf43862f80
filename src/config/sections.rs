//! Nested configuration blocks: per-platform toggles, bot behavior,
//! channels, conda-build, Docker and shellcheck settings

use serde::{Deserialize, Serialize, Serializer};

use super::choices::{AutomergeChoice, Inspection, PkgFormat};
use super::de;

/// Extra platform-specific configuration, one per platform key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformUniqueConfig {
    /// Whether to use extra platform-specific configuration options;
    /// left out of the output when never set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl PlatformUniqueConfig {
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }
}

/// Which bot pull requests may be merged without review
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawAutomerge")]
pub enum Automerge {
    #[default]
    Disabled,
    Enabled,
    /// Only pull requests of this class
    Only(AutomergeChoice),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAutomerge {
    Flag(bool),
    Only(AutomergeChoice),
}

impl From<RawAutomerge> for Automerge {
    fn from(raw: RawAutomerge) -> Self {
        match raw {
            RawAutomerge::Flag(true) => Self::Enabled,
            RawAutomerge::Flag(false) => Self::Disabled,
            RawAutomerge::Only(choice) => Self::Only(choice),
        }
    }
}

impl Serialize for Automerge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Enabled => serializer.serialize_bool(true),
            Self::Only(choice) => choice.serialize(serializer),
        }
    }
}

/// Behavior of the auto-tick bot that opens version update and migration PRs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Automatically merge PRs if possible
    pub automerge: Automerge,

    /// Open PRs only if resulting environment is solvable
    pub check_solvable: bool,

    /// Method for generating hints or updating recipe
    pub inspection: Option<Inspection>,

    /// Branches that get bot migration PRs in addition to the default branch
    pub abi_migration_branches: Option<Vec<String>>,

    /// Fraction of versions to keep for frequently updated packages
    pub version_updates_random_fraction_to_keep: Option<f64>,
}

/// Upload destination: a channel and a label on that channel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct ChannelTarget {
    pub channel: String,
    pub label: String,
}

impl ChannelTarget {
    #[must_use]
    pub fn new(channel: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            label: label.into(),
        }
    }
}

impl From<(String, String)> for ChannelTarget {
    fn from((channel, label): (String, String)) -> Self {
        Self { channel, label }
    }
}

impl Serialize for ChannelTarget {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.channel, &self.label).serialize(serializer)
    }
}

/// Channels to pull packages from and channel/label pairs to upload to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    /// Channels to pull packages from, in priority order
    pub sources: Vec<String>,

    /// Channel/label pairs to push built packages to
    pub targets: Vec<ChannelTarget>,
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            sources: vec!["conda-forge".to_owned()],
            targets: vec![ChannelTarget::new("conda-forge", "main")],
        }
    }
}

/// How `conda build` runs and packages artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CondaBuildConfig {
    /// Artifact format; `None` produces `.tar.bz2` artifacts
    #[serde(deserialize_with = "de::pkg_format")]
    pub pkg_format: Option<PkgFormat>,

    /// zstd level for `.conda` artifacts
    pub zstd_compression_level: i64,

    /// Fail when transitive shared libraries are linked directly
    pub error_overlinking: bool,
}

impl Default for CondaBuildConfig {
    fn default() -> Self {
        Self {
            pkg_format: Some(PkgFormat::V2),
            zstd_compression_level: 16,
            error_overlinking: false,
        }
    }
}

/// Docker settings for Linux builds
///
/// The deprecated `image` key is rejected before this is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    pub executable: String,

    /// Image used when the pinning does not name one
    pub fallback_image: String,

    pub command: String,

    /// Run the container interactively; local builds only, never written out
    #[serde(skip_serializing)]
    pub interactive: bool,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            executable: "docker".to_owned(),
            fallback_image: "quay.io/condaforge/linux-anvil-comp7".to_owned(),
            command: "bash".to_owned(),
            interactive: false,
        }
    }
}

/// Shellcheck linting of build and activation scripts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellCheck {
    pub enabled: bool,
}
