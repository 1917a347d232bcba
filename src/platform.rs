//! Platform tags and host detection.
//!
//! Every action declares the operating-system families it may run on. The
//! plan builder compares that set against the single tag of the current host.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::{GumError, Result};

/// Operating-system family an action can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    /// macOS
    #[strum(to_string = "darwin", serialize = "macos")]
    Darwin,
    /// Linux distributions
    Linux,
}

impl Platform {
    /// Resolve the platform gum is running on.
    ///
    /// Fails on operating systems gum has no actions for.
    pub fn current() -> Result<Self> {
        Self::from_os(std::env::consts::OS)
    }

    /// Map a Rust target OS name (`std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Result<Self> {
        match os {
            "macos" => Ok(Self::Darwin),
            "linux" => Ok(Self::Linux),
            other => Err(GumError::platform(other)),
        }
    }
}

/// Non-empty set of platforms an action supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformSet {
    darwin: bool,
    linux: bool,
}

impl PlatformSet {
    /// Every platform gum knows about
    pub const ALL: Self = Self {
        darwin: true,
        linux: true,
    };

    /// Set containing exactly one platform
    pub const fn only(platform: Platform) -> Self {
        match platform {
            Platform::Darwin => Self {
                darwin: true,
                linux: false,
            },
            Platform::Linux => Self {
                darwin: false,
                linux: true,
            },
        }
    }

    /// Whether an action with this set may run on `platform`
    pub fn contains(&self, platform: Platform) -> bool {
        match platform {
            Platform::Darwin => self.darwin,
            Platform::Linux => self.linux,
        }
    }

    /// Platforms in the set, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Platform> {
        let set = *self;
        Platform::iter().filter(move |p| set.contains(*p))
    }
}

impl fmt::Display for PlatformSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", names.join(", "))
    }
}
