//! Package scope
//!
//! The scope decides which distributions a snapshot records, from the
//! narrowest (what one object graph touches) to the broadest (everything
//! installed).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use verpack_core::Error;

/// Policy selecting which distributions populate a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageScope {
    /// Distributions backing the types reachable from the serialized object
    #[default]
    Object,
    /// Distributions backing every currently loaded module
    Loaded,
    /// Every installed distribution
    Installed,
}

impl PackageScope {
    /// All scopes, narrowest first
    pub const ALL: [PackageScope; 3] = [
        PackageScope::Object,
        PackageScope::Loaded,
        PackageScope::Installed,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageScope::Object => "object",
            PackageScope::Loaded => "loaded",
            PackageScope::Installed => "installed",
        }
    }
}

impl fmt::Display for PackageScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "object" => Ok(PackageScope::Object),
            "loaded" => Ok(PackageScope::Loaded),
            "installed" => Ok(PackageScope::Installed),
            other => Err(Error::InvalidScope(format!(
                "'{}' (expected \"object\", \"loaded\" or \"installed\")",
                other
            ))),
        }
    }
}
