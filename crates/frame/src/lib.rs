//! Framed, versioned serialization for verpack
//!
//! A frame is two consecutive units on one stream:
//! - a header recording the writing environment's distributions
//! - the payload object graph
//!
//! Modules:
//! - header: header layout and recognition
//! - checker: snapshot comparison and mismatch reports
//! - sink: where mismatch reports go
//! - writer / reader: frame encoding and decoding
//! - config: `verpack.toml`
//! - api: the `Verpack` facade

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod checker;
pub mod config;
pub mod header;
pub mod reader;
pub mod sink;
pub mod writer;

pub use api::Verpack;
pub use checker::{CompatibilityChecker, Mismatch, MismatchKind, MismatchReport};
pub use config::{VerpackConfig, CONFIG_FILE_NAME};
pub use header::{Header, HEADER_FORMAT_VERSION, HEADER_MARKER};
pub use reader::{Frame, FrameReader};
pub use sink::{CollectingSink, SilentSink, TracingSink, WarningSink, MISMATCH_TARGET};
pub use writer::FrameWriter;

pub use verpack_core::{
    Error, GraphBuilder, GraphCodec, MsgPackCodec, Node, NoopObserver, ObjectGraph, ObjectId, ResolveMode,
    Result, TypeRef, TypeRegistry, TypeResolver,
};
pub use verpack_environment::{
    current_runtime_version, DistributionIndex, Environment, LoadedModules, LockfileIndex,
    ModuleRegistry, ModuleUsageSet, ModuleUsageTracker, PackageScope, Snapshot, StaticIndex,
    RUNTIME_VERSION,
};
