//! Core types and traits for verpack
//!
//! This crate defines the object graph engine the framing layer builds on:
//! - Error: Error type hierarchy
//! - ObjectGraph / Node / ObjectId / TypeRef: the serialized value model
//! - GraphBuilder: graph construction, including cycles
//! - TraversalObserver / walk: identity-memoized traversal with a per-object hook
//! - TypeResolver / TypeRegistry: explicit type resolution for decoded payloads
//! - GraphCodec / MsgPackCodec: self-delimiting unit encoding

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod graph;
pub mod registry;
pub mod traversal;

pub use codec::{decode_resolved, GraphCodec, MsgPackCodec};
pub use error::{Error, Result};
pub use graph::{
    root_package, GraphBuilder, Node, ObjectGraph, ObjectId, TypeRef, CORE_MODULE, MAX_NODES,
};
pub use registry::{resolve_graph, ResolveMode, TypeRegistry, TypeResolver};
pub use traversal::{walk, NoopObserver, TraversalObserver};
