//! Environment snapshots
//!
//! A snapshot captures, at one point in time, the installed version of each
//! distribution in a [`ModuleUsageSet`] plus the runtime version. Snapshots
//! are built fresh for every frame and never change afterwards.

use crate::index::DistributionIndex;
use crate::tracker::ModuleUsageSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Distribution → version mapping plus runtime version
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    runtime_version: String,
    packages: BTreeMap<String, String>,
}

impl Snapshot {
    /// Snapshot from already-known parts (decoded headers, fixtures)
    pub fn new(runtime_version: impl Into<String>, packages: BTreeMap<String, String>) -> Self {
        Snapshot {
            runtime_version: runtime_version.into(),
            packages,
        }
    }

    /// Resolve the installed version of every name in `names`
    ///
    /// All versions come from a single [`DistributionIndex::versions`] call.
    /// Names the index has no version for are dropped. The runtime version
    /// is recorded verbatim.
    pub fn build(
        names: &ModuleUsageSet,
        runtime_version: impl Into<String>,
        index: &dyn DistributionIndex,
    ) -> Self {
        let packages = index.versions(names.as_set());
        for name in names.iter().filter(|name| !packages.contains_key(*name)) {
            trace!(distribution = %name, "No installed version, dropped from snapshot");
        }
        Snapshot::new(runtime_version, packages)
    }

    /// Runtime version at capture time
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    /// Distribution → version, ordered by name
    pub fn packages(&self) -> &BTreeMap<String, String> {
        &self.packages
    }

    /// Recorded version of one distribution
    pub fn version_of(&self, distribution: &str) -> Option<&str> {
        self.packages.get(distribution).map(String::as_str)
    }

    /// Number of recorded distributions
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True if no distribution was recorded
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
