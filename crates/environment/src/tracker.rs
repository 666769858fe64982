//! Module usage tracking
//!
//! Answers "which distributions matter for this frame" under a
//! [`PackageScope`]:
//!
//! - Object: run the encoder's own traversal over the graph and map the
//!   defining module of every visited object to its distributions
//! - Loaded: map every currently loaded module, plus every module the
//!   object itself uses, to its distributions
//! - Installed: every installed distribution
//!
//! Modules no installed distribution provides (`core`, script-local code)
//! are skipped without error.

use crate::index::{DistributionIndex, ModuleRegistry};
use crate::scope::PackageScope;
use std::collections::BTreeSet;
use std::io;
use verpack_core::{root_package, GraphCodec, Node, ObjectGraph, ObjectId, Result, TraversalObserver};

/// Set of distinct distribution names
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModuleUsageSet(BTreeSet<String>);

impl ModuleUsageSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Whether the name is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every name here is also in `other`
    pub fn is_subset(&self, other: &ModuleUsageSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Names as a set
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.0
    }

    /// Underlying set
    pub fn into_inner(self) -> BTreeSet<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for ModuleUsageSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ModuleUsageSet(iter.into_iter().map(Into::into).collect())
    }
}

/// Observer recording the defining module of every visited object
#[derive(Debug, Default)]
struct ModuleRecorder {
    modules: BTreeSet<String>,
}

impl TraversalObserver for ModuleRecorder {
    fn visit(&mut self, _id: ObjectId, node: &Node) {
        let module = node.defining_module();
        if !self.modules.contains(module) {
            self.modules.insert(module.to_string());
        }
    }
}

/// Determines the relevant distributions for a scope
pub struct ModuleUsageTracker<'a> {
    index: &'a dyn DistributionIndex,
    modules: &'a dyn ModuleRegistry,
    codec: &'a dyn GraphCodec,
}

impl<'a> ModuleUsageTracker<'a> {
    /// Tracker over the given environment collaborators and encoder
    pub fn new(
        index: &'a dyn DistributionIndex,
        modules: &'a dyn ModuleRegistry,
        codec: &'a dyn GraphCodec,
    ) -> Self {
        ModuleUsageTracker {
            index,
            modules,
            codec,
        }
    }

    /// Relevant distributions for `root` under `scope`
    ///
    /// `Loaded` reads the module registry and adds the object's own modules,
    /// so each scope contains the narrower one. `Installed` ignores `root`.
    ///
    /// # Errors
    ///
    /// In `Object` and `Loaded` scope, fails if the encoder rejects the graph.
    pub fn discover(&self, root: &ObjectGraph, scope: PackageScope) -> Result<ModuleUsageSet> {
        match scope {
            PackageScope::Object => {
                let modules = self.object_modules(root)?;
                Ok(self.distributions_of(modules.iter().map(String::as_str)))
            }
            PackageScope::Loaded => {
                // Types inside the object are loaded by definition of being used
                let mut modules = self.modules.currently_loaded();
                modules.extend(self.object_modules(root)?);
                Ok(self.distributions_of(modules.iter().map(String::as_str)))
            }
            PackageScope::Installed => Ok(self.discover_installed()),
        }
    }

    /// Every installed distribution
    pub fn discover_installed(&self) -> ModuleUsageSet {
        ModuleUsageSet(self.index.all_installed())
    }

    /// Defining module paths of every object the encoder visits
    ///
    /// The graph is encoded into a sink so the traversal is exactly the
    /// encoder's, including its identity-based memoization.
    pub fn object_modules(&self, root: &ObjectGraph) -> Result<BTreeSet<String>> {
        let mut recorder = ModuleRecorder::default();
        self.codec.encode_unit(root, &mut io::sink(), &mut recorder)?;
        Ok(recorder.modules)
    }

    fn distributions_of<'m>(&self, modules: impl Iterator<Item = &'m str>) -> ModuleUsageSet {
        let roots: BTreeSet<&str> = modules.map(root_package).collect();
        ModuleUsageSet(self.index.distributions_providing(&roots))
    }
}
