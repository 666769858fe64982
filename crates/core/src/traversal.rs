//! Graph traversal with a per-object observation hook
//!
//! The encoder walks the graph before writing a unit, and anything that
//! needs to see "every object the encoder touches" plugs in as a
//! [`TraversalObserver`]. Visited tracking is by [`ObjectId`], never by value,
//! so shared references and cycles terminate and two equal-but-distinct
//! objects are both visited.

use crate::error::{Error, Result};
use crate::graph::{Node, ObjectGraph, ObjectId};
use rustc_hash::FxHashSet;

/// Hook invoked once for every distinct object visited during encoding
pub trait TraversalObserver {
    /// Called in depth-first pre-order, at most once per object
    fn visit(&mut self, id: ObjectId, node: &Node);
}

impl<F> TraversalObserver for F
where
    F: FnMut(ObjectId, &Node),
{
    fn visit(&mut self, id: ObjectId, node: &Node) {
        self(id, node)
    }
}

/// Observer that ignores every visit
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl TraversalObserver for NoopObserver {
    fn visit(&mut self, _id: ObjectId, _node: &Node) {}
}

/// Walk every object reachable from the root, depth-first
///
/// Children are visited in encoding order (list order, map/field order,
/// reduction arguments). Returns the number of distinct objects visited.
///
/// # Errors
///
/// Returns `InvalidGraph` if a reference points outside the arena.
pub fn walk(graph: &ObjectGraph, observer: &mut dyn TraversalObserver) -> Result<usize> {
    let mut visited: FxHashSet<ObjectId> = FxHashSet::default();
    let mut stack = vec![graph.root()];

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let node = graph
            .get(id)
            .ok_or_else(|| Error::InvalidGraph(format!("dangling reference {}", id)))?;
        observer.visit(id, node);

        // Reverse so the first child is popped first
        stack.extend(node.children().into_iter().rev());
    }

    Ok(visited.len())
}
