//! Closed vocabularies used throughout `conda-forge.yml`
//!
//! Every enumeration matches its input exactly: no case folding and no
//! whitespace trimming. Adding a platform or a CI service means extending
//! exactly one `choice_enum!` invocation below.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// A closed set of string literals
pub trait Choice: Copy + Sized + 'static {
    /// Human readable name of the set, used in documentation
    const NAME: &'static str;

    /// Every member, in declaration order
    const ALL: &'static [Self];

    /// The literal written in `conda-forge.yml`
    fn as_str(self) -> &'static str;

    /// Exact-match lookup
    #[inline]
    fn from_choice(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|choice| choice.as_str() == value)
    }

    /// All literals, in declaration order
    #[inline]
    fn allowed() -> Vec<&'static str> {
        Self::ALL.iter().map(|choice| choice.as_str()).collect()
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl Choice for $name {
            const NAME: &'static str = $label;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[inline]
            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            #[inline]
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_choice(s).ok_or_else(|| {
                    format!(
                        "Invalid {}: '{s}'. Use one of: {}",
                        $label,
                        Self::allowed().join(", ")
                    )
                })
            }
        }
    };
}

choice_enum! {
    /// Target or build platform, an OS/architecture pair
    Platform ("platform") {
        Linux64 => "linux_64",
        LinuxAarch64 => "linux_aarch64",
        LinuxPpc64le => "linux_ppc64le",
        LinuxArmv7l => "linux_armv7l",
        LinuxS390x => "linux_s390x",
        Win64 => "win_64",
        Osx64 => "osx_64",
        OsxArm64 => "osx_arm64",
    }
}

impl Platform {
    /// Short aliases accepted for the per-platform blocks of the root mapping
    pub const ALIASES: &'static [(&'static str, Self)] = &[
        ("win", Self::Win64),
        ("osx", Self::Osx64),
        ("linux", Self::Linux64),
    ];
}

choice_enum! {
    /// CI service able to run a build platform
    CiService ("CI service") {
        Azure => "azure",
        Circle => "circle",
        Travis => "travis",
        Appveyor => "appveyor",
        /// Let the renderer pick an available service
        Default => "default",
        Native => "native",
        Emulated => "emulated",
        Drone => "drone",
        GithubActions => "github_actions",
        Woodpecker => "woodpecker",
    }
}

choice_enum! {
    /// Tool used to build the recipe
    CondaBuildTool ("build tool") {
        CondaBuild => "conda-build",
        CondaBuildClassic => "conda-build+classic",
        CondaBuildLibmamba => "conda-build+conda-libmamba-solver",
        Mambabuild => "mambabuild",
        RattlerBuild => "rattler-build",
    }
}

choice_enum! {
    /// Solver plugin used by conda
    CondaSolver ("solver") {
        Libmamba => "libmamba",
        Classic => "classic",
    }
}

choice_enum! {
    /// Tool used to provision the CI environment
    CondaInstallTool ("install tool") {
        Conda => "conda",
        Mamba => "mamba",
    }
}

choice_enum! {
    /// Restricts bot automerge to one class of pull requests
    AutomergeChoice ("automerge mode") {
        Version => "version",
        Migration => "migration",
    }
}

choice_enum! {
    /// How the bot derives hints or recipe updates
    Inspection ("inspection mode") {
        Hint => "hint",
        HintAll => "hint-all",
        HintSource => "hint-source",
        HintGrayskull => "hint-grayskull",
        UpdateAll => "update-all",
        UpdateSource => "update-source",
        UpdateGrayskull => "update-grayskull",
    }
}

choice_enum! {
    /// Generated file the renderer may be told to leave alone
    SkipRender ("skip-render target") {
        Gitignore => ".gitignore",
        Gitattributes => ".gitattributes",
        Readme => "README.md",
        License => "LICENSE.txt",
        Workflows => ".github/workflows",
    }
}

choice_enum! {
    /// Channel priority level for the solver
    ChannelPriority ("channel priority") {
        Strict => "strict",
        Flexible => "flexible",
        Disabled => "disabled",
    }
}

choice_enum! {
    /// Platforms on which the recipe's tests run
    TestPlatforms ("test mode") {
        All => "all",
        Native => "native",
        NativeAndEmulated => "native_and_emulated",
    }
}

choice_enum! {
    /// Package artifact format produced by conda-build
    PkgFormat ("package format") {
        V1 => "1",
        V2 => "2",
        Tar => "tar",
    }
}

choice_enum! {
    /// Area of the Azure Linux image to clean before building
    DiskSpaceTarget ("disk space target") {
        Apt => "apt",
        Cache => "cache",
        Docker => "docker",
    }
}
