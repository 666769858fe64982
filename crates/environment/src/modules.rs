//! Loaded module registries
//!
//! - LoadedModules: explicit registration, shareable, with a process-wide instance
//! - TypeRegistry: the modules that define its registered types count as loaded

use crate::index::ModuleRegistry;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use verpack_core::TypeRegistry;

static GLOBAL: Lazy<Arc<LoadedModules>> = Lazy::new(|| Arc::new(LoadedModules::new()));

/// Registry of modules a program declares as loaded
///
/// Reads always reflect the current registrations.
#[derive(Debug, Default)]
pub struct LoadedModules {
    modules: RwLock<BTreeSet<String>>,
}

impl LoadedModules {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> Arc<LoadedModules> {
        Arc::clone(&GLOBAL)
    }

    /// Record a module as loaded. Returns false if it already was.
    pub fn mark_loaded(&self, module: impl Into<String>) -> bool {
        self.modules.write().insert(module.into())
    }

    /// Record several modules as loaded
    pub fn mark_all<I, S>(&self, modules: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.modules.write();
        guard.extend(modules.into_iter().map(Into::into));
    }

    /// Forget a module. Returns false if it was not loaded.
    pub fn mark_unloaded(&self, module: &str) -> bool {
        self.modules.write().remove(module)
    }

    /// Whether the module is currently loaded
    pub fn is_loaded(&self, module: &str) -> bool {
        self.modules.read().contains(module)
    }
}

impl ModuleRegistry for LoadedModules {
    fn currently_loaded(&self) -> BTreeSet<String> {
        self.modules.read().clone()
    }
}

impl ModuleRegistry for TypeRegistry {
    fn currently_loaded(&self) -> BTreeSet<String> {
        self.modules()
    }
}
