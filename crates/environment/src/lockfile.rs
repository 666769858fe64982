//! Distribution index backed by a `Cargo.lock`
//!
//! Every locked package is an installed distribution. A crate named
//! `geo-types` provides the root package `geo_types`, the same way the
//! compiler maps crate names to paths.
//!
//! The lockfile is re-read on every query so the answers always describe the
//! file as it is now. Batch queries read it once, so one snapshot never mixes
//! two states of the file. An unreadable or unparsable lockfile is logged and
//! treated as an empty environment.

use crate::index::DistributionIndex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::warn;
use verpack_core::{Error, Result};

/// Lockfile name looked for by default.
pub const LOCKFILE_NAME: &str = "Cargo.lock";

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

/// Root package provided by a crate name
pub fn crate_root_package(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}

/// [`DistributionIndex`] reading a `Cargo.lock` file
#[derive(Debug, Clone)]
pub struct LockfileIndex {
    path: PathBuf,
}

impl LockfileIndex {
    /// Index over the lockfile at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LockfileIndex { path: path.into() }
    }

    /// Path of the lockfile
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the lockfile now, failing loudly
    ///
    /// Returns crate name → locked versions (a lockfile may pin several
    /// versions of one crate).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn read(&self) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read lockfile '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        let lockfile: Lockfile = toml::from_str(&content).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to parse lockfile '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let mut locked: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for package in lockfile.package {
            locked.entry(package.name).or_default().insert(package.version);
        }
        Ok(locked)
    }

    fn load(&self) -> BTreeMap<String, BTreeSet<String>> {
        match self.read() {
            Ok(locked) => locked,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Lockfile unavailable, treating environment as empty");
                BTreeMap::new()
            }
        }
    }
}

/// Several locked versions of one crate, sorted and joined with `", "`
fn joined(versions: &BTreeSet<String>) -> String {
    versions
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DistributionIndex for LockfileIndex {
    fn version(&self, distribution: &str) -> Option<String> {
        self.load().get(distribution).map(joined)
    }

    fn versions(&self, distributions: &BTreeSet<String>) -> BTreeMap<String, String> {
        let locked = self.load();
        distributions
            .iter()
            .filter_map(|name| locked.get(name).map(|v| (name.clone(), joined(v))))
            .collect()
    }

    fn distributions_providing(&self, root_packages: &BTreeSet<&str>) -> BTreeSet<String> {
        self.load()
            .into_keys()
            .filter(|name| root_packages.contains(crate_root_package(name).as_str()))
            .collect()
    }

    fn all_installed(&self) -> BTreeSet<String> {
        self.load().into_keys().collect()
    }

    fn distributions_for(&self, root_package: &str) -> Vec<String> {
        self.load()
            .into_keys()
            .filter(|name| crate_root_package(name) == root_package)
            .collect()
    }
}
