//! Environment metadata for verpack
//!
//! This crate answers "what does the environment look like right now":
//! - PackageScope: which distributions a snapshot should cover
//! - DistributionIndex / ModuleRegistry: collaborator traits over live state
//! - StaticIndex / LockfileIndex: in-memory and `Cargo.lock` indexes
//! - LoadedModules: explicit loaded-module registry
//! - ModuleUsageTracker: scope → relevant distributions
//! - Snapshot: distribution → version mapping at one point in time
//! - Environment: the collaborators bundled together

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod environment;
pub mod index;
pub mod lockfile;
pub mod modules;
pub mod scope;
pub mod snapshot;
pub mod tracker;

pub use environment::{current_runtime_version, Environment, RUNTIME_VERSION};
pub use index::{DistributionIndex, ModuleRegistry, StaticIndex};
pub use lockfile::{crate_root_package, LockfileIndex, LOCKFILE_NAME};
pub use modules::LoadedModules;
pub use scope::PackageScope;
pub use snapshot::Snapshot;
pub use tracker::{ModuleUsageSet, ModuleUsageTracker};
