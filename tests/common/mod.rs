//! Shared fixtures for the integration test suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use std::sync::{Arc, Once};
use verpack::{
    CollectingSink, Environment, GraphBuilder, LoadedModules, Node, ObjectGraph, StaticIndex,
    TypeRef, TypeRegistry, Verpack,
};

static INIT_TRACING: Once = Once::new();

/// Route tracing output through the test harness (once per process).
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

// ============================================================================
// Environments
// ============================================================================

/// Distributions installed where frames are written.
pub fn writing_index() -> StaticIndex {
    StaticIndex::new()
        .with_distribution("geo-types", "0.7.13", ["geo_types"])
        .with_distribution("toolbox", "2.1.0", ["toolbox", "numbers"])
        .with_distribution("itoa", "1.0.11", ["itoa"])
}

/// Environment over `index` with the given modules loaded.
pub fn environment(index: StaticIndex, loaded: &[&str]) -> Environment {
    let modules = LoadedModules::new();
    modules.mark_all(loaded.iter().copied());
    Environment::new(Arc::new(index), Arc::new(modules)).with_runtime_version("verpack-tests/1")
}

/// Facade over `env` that collects mismatch reports into the returned sink.
pub fn collecting(env: Environment) -> (Verpack, Arc<CollectingSink>) {
    init_tracing();
    let sink = Arc::new(CollectingSink::new());
    let vp = Verpack::new(env).with_sink(sink.clone());
    (vp, sink)
}

/// Facade in the writing environment.
pub fn writer() -> Verpack {
    collecting(environment(writing_index(), &["itoa::fmt"])).0
}

// ============================================================================
// Objects
// ============================================================================

/// Point type from the `geo-types` distribution.
pub fn point_type() -> TypeRef {
    TypeRef::new("geo_types::point", "Point")
}

/// Ratio type from the `toolbox` distribution.
pub fn ratio_type() -> TypeRef {
    TypeRef::new("numbers::ratio", "Ratio")
}

/// `Point { x, y }`
pub fn point(x: i64, y: i64) -> ObjectGraph {
    let mut b = GraphBuilder::new();
    let x = b.int(x);
    let y = b.int(y);
    let root = b.instance(point_type(), [("x", x), ("y", y)]);
    b.finish(root).expect("valid graph")
}

/// A list holding a point and a ratio, with the list appended to itself.
pub fn shapes_with_cycle() -> ObjectGraph {
    let mut b = GraphBuilder::new();
    let list = b.reserve();
    let x = b.int(1);
    let point = b.instance(point_type(), [("x", x)]);
    let num = b.int(2);
    let den = b.int(3);
    let ratio = b.instance(ratio_type(), [("num", num), ("den", den)]);
    b.set(list, Node::List(vec![point, ratio, point, list]))
        .expect("reserved id");
    b.finish(list).expect("valid graph")
}

/// Plain string graph with no foreign types.
pub fn plain(text: &str) -> ObjectGraph {
    ObjectGraph::single(Node::Str(text.to_string())).expect("valid graph")
}

/// Strict registry knowing the fixture types.
pub fn fixture_types() -> TypeRegistry {
    TypeRegistry::strict()
        .with_type(point_type())
        .with_type(ratio_type())
}
