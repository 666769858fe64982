//! Environment collaborator traits
//!
//! These traits are the seam between snapshot capture and wherever the
//! environment's package metadata actually lives. Implementations must answer
//! from live state on every call; callers never cache the answers.

use std::collections::{BTreeMap, BTreeSet};

/// Index of installed distributions and the root packages they provide
pub trait DistributionIndex: Send + Sync {
    /// Installed version of a distribution, or `None` if it is not installed
    fn version(&self, distribution: &str) -> Option<String>;

    /// Names of every installed distribution
    fn all_installed(&self) -> BTreeSet<String>;

    /// Distributions that provide the given root package
    ///
    /// Empty if no installed distribution provides it (standard library,
    /// script-local code).
    fn distributions_for(&self, root_package: &str) -> Vec<String>;

    /// Installed versions of several distributions, from one view of the index
    ///
    /// Distributions that are not installed are left out. Indexes that load
    /// their state per query should override this so a whole snapshot is
    /// answered from a single load.
    fn versions(&self, distributions: &BTreeSet<String>) -> BTreeMap<String, String> {
        distributions
            .iter()
            .filter_map(|name| self.version(name).map(|version| (name.clone(), version)))
            .collect()
    }

    /// Distributions providing any of the given root packages, from one view of the index
    fn distributions_providing(&self, root_packages: &BTreeSet<&str>) -> BTreeSet<String> {
        root_packages
            .iter()
            .flat_map(|root| self.distributions_for(root))
            .collect()
    }
}

/// Registry of modules currently loaded in the running program
pub trait ModuleRegistry: Send + Sync {
    /// Full paths of every loaded module
    fn currently_loaded(&self) -> BTreeSet<String>;
}

/// One entry of a [`StaticIndex`]
#[derive(Debug, Clone, PartialEq, Eq)]
struct InstalledDistribution {
    version: String,
    packages: BTreeSet<String>,
}

/// In-memory distribution index
///
/// # Example
///
/// ```
/// use verpack_environment::{DistributionIndex, StaticIndex};
///
/// let index = StaticIndex::new()
///     .with_distribution("geo-types", "0.7.13", ["geo_types"]);
/// assert_eq!(index.version("geo-types").as_deref(), Some("0.7.13"));
/// assert_eq!(index.distributions_for("geo_types"), vec!["geo-types".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    distributions: BTreeMap<String, InstalledDistribution>,
}

impl StaticIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a distribution providing the given root packages
    pub fn with_distribution<'a>(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        packages: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.insert(name, version, packages);
        self
    }

    /// Add (or replace) a distribution providing the given root packages
    pub fn insert<'a>(
        &mut self,
        name: impl Into<String>,
        version: impl Into<String>,
        packages: impl IntoIterator<Item = &'a str>,
    ) {
        self.distributions.insert(
            name.into(),
            InstalledDistribution {
                version: version.into(),
                packages: packages.into_iter().map(str::to_string).collect(),
            },
        );
    }

    /// Remove a distribution. Returns false if it was not installed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.distributions.remove(name).is_some()
    }
}

impl DistributionIndex for StaticIndex {
    fn version(&self, distribution: &str) -> Option<String> {
        self.distributions
            .get(distribution)
            .map(|d| d.version.clone())
    }

    fn all_installed(&self) -> BTreeSet<String> {
        self.distributions.keys().cloned().collect()
    }

    fn distributions_for(&self, root_package: &str) -> Vec<String> {
        self.distributions
            .iter()
            .filter(|(_, d)| d.packages.contains(root_package))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
