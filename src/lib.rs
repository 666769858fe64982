//! verpack - serialization that remembers where it came from
//!
//! verpack writes an object graph together with a header describing the
//! environment it was written in: the runtime version and the version of
//! every relevant installed distribution. On read, the header is compared
//! with the reading environment and differences are reported as warnings.
//! They never fail the read.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use verpack::{Environment, GraphBuilder, LoadedModules, PackageScope, StaticIndex, TypeRef, Verpack};
//!
//! let index = StaticIndex::new().with_distribution("geo-types", "0.7.13", ["geo_types"]);
//! let env = Environment::new(Arc::new(index), Arc::new(LoadedModules::new()));
//! let vp = Verpack::new(env).with_scope(PackageScope::Object);
//!
//! let mut b = GraphBuilder::new();
//! let x = b.int(3);
//! let root = b.instance(TypeRef::new("geo_types::point", "Point"), [("x", x)]);
//! let point = b.finish(root)?;
//!
//! let bytes = vp.dumps(&point)?;
//! let (back, report) = vp.loads(&bytes)?;
//! assert_eq!(back, point);
//! assert!(report.map_or(true, |r| r.is_empty()));
//! # Ok::<(), verpack::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `verpack-core`: object graphs, traversal, type resolution, unit codec
//! - `verpack-environment`: scopes, distribution indexes, snapshots
//! - `verpack-frame`: header, comparison, reader/writer, config, facade
//!
//! Everything public is re-exported here.

pub use verpack_frame::*;
