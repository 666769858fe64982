//! Environment handle
//!
//! Bundles the collaborators a frame needs to describe "this environment":
//! the distribution index, the loaded module registry and the runtime
//! version. Cloning is cheap and shares the collaborators.

use crate::index::{DistributionIndex, ModuleRegistry};
use crate::lockfile::LockfileIndex;
use crate::modules::LoadedModules;
use crate::snapshot::Snapshot;
use crate::tracker::{ModuleUsageSet, ModuleUsageTracker};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use verpack_core::GraphCodec;

/// Runtime version recorded when none is configured
pub const RUNTIME_VERSION: &str = concat!("verpack/", env!("CARGO_PKG_VERSION"));

/// Runtime version of the running library
pub fn current_runtime_version() -> &'static str {
    RUNTIME_VERSION
}

/// Live view of the environment a frame is written or read in
#[derive(Clone)]
pub struct Environment {
    index: Arc<dyn DistributionIndex>,
    modules: Arc<dyn ModuleRegistry>,
    runtime_version: String,
}

impl Environment {
    /// Environment over explicit collaborators
    pub fn new(index: Arc<dyn DistributionIndex>, modules: Arc<dyn ModuleRegistry>) -> Self {
        Environment {
            index,
            modules,
            runtime_version: current_runtime_version().to_string(),
        }
    }

    /// Environment described by a `Cargo.lock`, with the global module registry
    pub fn from_lockfile(path: impl Into<PathBuf>) -> Self {
        Environment::new(
            Arc::new(LockfileIndex::new(path)),
            LoadedModules::global(),
        )
    }

    /// Override the recorded runtime version
    pub fn with_runtime_version(mut self, runtime_version: impl Into<String>) -> Self {
        self.runtime_version = runtime_version.into();
        self
    }

    /// Distribution index
    pub fn index(&self) -> &dyn DistributionIndex {
        self.index.as_ref()
    }

    /// Loaded module registry
    pub fn modules(&self) -> &dyn ModuleRegistry {
        self.modules.as_ref()
    }

    /// Runtime version recorded in snapshots
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    /// Tracker over this environment, traversing with `codec`
    pub fn tracker<'a>(&'a self, codec: &'a dyn GraphCodec) -> ModuleUsageTracker<'a> {
        ModuleUsageTracker::new(self.index(), self.modules(), codec)
    }

    /// Snapshot of `names` as installed right now
    pub fn snapshot(&self, names: &ModuleUsageSet) -> Snapshot {
        Snapshot::build(names, self.runtime_version.as_str(), self.index())
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("runtime_version", &self.runtime_version)
            .finish_non_exhaustive()
    }
}
