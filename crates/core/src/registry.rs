//! Type resolution for decoded payloads
//!
//! A decoded payload names its types by module path. Instead of looking
//! those names up implicitly, the decoder is handed a [`TypeResolver`] that
//! decides which names are acceptable in the receiving program.

use crate::error::{Error, Result};
use crate::graph::{ObjectGraph, TypeRef};
use std::collections::BTreeSet;

/// Decides whether a type named in a payload can be reconstructed here
pub trait TypeResolver {
    /// Returns true if objects of this type can be rebuilt
    fn resolve(&self, type_ref: &TypeRef) -> bool;
}

/// How a [`TypeRegistry`] treats types it has not seen registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolveMode {
    /// Every type resolves
    #[default]
    Open,
    /// Only registered types resolve
    Strict,
}

/// Set of known types plus a resolution policy
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    mode: ResolveMode,
    types: BTreeSet<TypeRef>,
}

impl TypeRegistry {
    /// Registry that accepts every type
    pub fn open() -> Self {
        TypeRegistry {
            mode: ResolveMode::Open,
            types: BTreeSet::new(),
        }
    }

    /// Registry that accepts only registered types
    pub fn strict() -> Self {
        TypeRegistry {
            mode: ResolveMode::Strict,
            types: BTreeSet::new(),
        }
    }

    /// Register a type. Returns false if it was already known.
    pub fn register(&mut self, type_ref: TypeRef) -> bool {
        self.types.insert(type_ref)
    }

    /// Builder-style [`TypeRegistry::register`]
    pub fn with_type(mut self, type_ref: TypeRef) -> Self {
        self.register(type_ref);
        self
    }

    /// Resolution policy
    pub fn mode(&self) -> ResolveMode {
        self.mode
    }

    /// Whether the type has been registered (regardless of mode)
    pub fn contains(&self, type_ref: &TypeRef) -> bool {
        self.types.contains(type_ref)
    }

    /// Registered types in order
    pub fn types(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.iter()
    }

    /// Distinct defining modules of the registered types
    pub fn modules(&self) -> BTreeSet<String> {
        self.types.iter().map(|t| t.module.clone()).collect()
    }
}

impl TypeResolver for TypeRegistry {
    fn resolve(&self, type_ref: &TypeRef) -> bool {
        match self.mode {
            ResolveMode::Open => true,
            ResolveMode::Strict => self.types.contains(type_ref),
        }
    }
}

/// Check every type named anywhere in the graph against the resolver
///
/// # Errors
///
/// Returns `UnknownType` for the first type the resolver rejects.
pub fn resolve_graph(graph: &ObjectGraph, resolver: &dyn TypeResolver) -> Result<()> {
    for (_, node) in graph.nodes() {
        if let Some(type_ref) = node.type_ref() {
            if !resolver.resolve(type_ref) {
                return Err(Error::UnknownType(type_ref.clone()));
            }
        }
    }
    Ok(())
}
