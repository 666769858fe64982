//! Frame header
//!
//! The header is the optional first unit of a frame. It is written as an
//! ordinary object graph (a string-keyed map of scalars) so that a decoder
//! that knows nothing about frames reads it as a plain value.
//!
//! ## Layout
//!
//! ```text
//! {
//!   "marker":          "verpack/environment-metadata",
//!   "format_version":  1,
//!   "runtime_version": "verpack/0.1.0",
//!   "package_scope":   "object",            (optional)
//!   "packages":        { "geo-types": "0.7.13", ... }
//! }
//! ```
//!
//! ## Recognition
//!
//! A first unit is a header only if the root is a map whose `marker` entry is
//! the exact marker string, whose `format_version` is a positive integer and
//! whose `packages` entry is a map of strings with no repeated name. `runtime_version` and
//! `package_scope` may be absent but must be strings when present. Anything
//! else is user data.

use std::collections::BTreeMap;
use verpack_core::{GraphBuilder, ObjectGraph, Result};
use verpack_environment::{PackageScope, Snapshot};

/// Marker value identifying a header unit
pub const HEADER_MARKER: &str = "verpack/environment-metadata";

/// Current header format version
pub const HEADER_FORMAT_VERSION: u32 = 1;

/// Field names of the header map
pub mod fields {
    /// Marker string
    pub const MARKER: &str = "marker";
    /// Header format version
    pub const FORMAT_VERSION: &str = "format_version";
    /// Runtime version of the writer
    pub const RUNTIME_VERSION: &str = "runtime_version";
    /// Scope the writer used
    pub const PACKAGE_SCOPE: &str = "package_scope";
    /// Distribution → version map
    pub const PACKAGES: &str = "packages";
}

/// Decoded frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header format version
    pub format_version: u32,
    /// Runtime version of the writer
    pub runtime_version: String,
    /// Distribution → version in the writing environment
    pub packages: BTreeMap<String, String>,
    /// Scope the writer used (absent in headers from writers that do not record it)
    pub package_scope: Option<PackageScope>,
}

impl Header {
    /// Header describing `snapshot`, captured under `scope`
    pub fn from_snapshot(snapshot: &Snapshot, scope: PackageScope) -> Self {
        Header {
            format_version: HEADER_FORMAT_VERSION,
            runtime_version: snapshot.runtime_version().to_string(),
            packages: snapshot.packages().clone(),
            package_scope: Some(scope),
        }
    }

    /// Snapshot of the writing environment
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.runtime_version.clone(), self.packages.clone())
    }

    /// Whether this header was written by a newer format than this library reads
    pub fn is_newer_format(&self) -> bool {
        self.format_version > HEADER_FORMAT_VERSION
    }

    /// Header as a plain object graph
    pub fn to_graph(&self) -> Result<ObjectGraph> {
        let mut b = GraphBuilder::new();
        let marker = b.str(HEADER_MARKER);
        let format_version = b.int(i64::from(self.format_version));
        let runtime_version = b.str(self.runtime_version.as_str());

        let package_entries: Vec<_> = self
            .packages
            .iter()
            .map(|(name, version)| (name.clone(), b.str(version.as_str())))
            .collect();
        let packages = b.map(package_entries);

        let mut entries = vec![
            (fields::MARKER, marker),
            (fields::FORMAT_VERSION, format_version),
            (fields::RUNTIME_VERSION, runtime_version),
        ];
        if let Some(scope) = self.package_scope {
            entries.push((fields::PACKAGE_SCOPE, b.str(scope.as_str())));
        }
        entries.push((fields::PACKAGES, packages));

        let root = b.map(entries);
        b.finish(root)
    }

    /// Recognize a header in a decoded first unit
    ///
    /// Returns `None` for anything that fails the structural check; the
    /// caller then treats the unit as the payload.
    pub fn from_graph(graph: &ObjectGraph) -> Option<Self> {
        let root = graph.root_node().as_map()?;
        let field = |key: &str| {
            root.iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, id)| graph.get(*id))
        };

        if field(fields::MARKER)?.as_str()? != HEADER_MARKER {
            return None;
        }

        let format_version = u32::try_from(field(fields::FORMAT_VERSION)?.as_int()?).ok()?;
        if format_version == 0 {
            return None;
        }

        let mut packages = BTreeMap::new();
        for (name, id) in field(fields::PACKAGES)?.as_map()? {
            let version = graph.get(*id)?.as_str()?;
            // A distribution listed twice is not a header this library wrote
            if packages.insert(name.clone(), version.to_string()).is_some() {
                return None;
            }
        }

        let runtime_version = match field(fields::RUNTIME_VERSION) {
            Some(node) => node.as_str()?.to_string(),
            None => String::new(),
        };

        // Scopes this library does not know are dropped rather than rejected
        let package_scope = match field(fields::PACKAGE_SCOPE) {
            Some(node) => node.as_str()?.parse::<PackageScope>().ok(),
            None => None,
        };

        Some(Header {
            format_version,
            runtime_version,
            packages,
            package_scope,
        })
    }
}
