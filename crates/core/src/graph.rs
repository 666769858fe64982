//! Object graph model
//!
//! This module defines the value model carried by every unit:
//! - ObjectId: identity of a node inside one graph
//! - TypeRef: a named type, function or callable and its defining module
//! - Node: one object (scalar, container, instance, type or reduction)
//! - ObjectGraph: arena of nodes plus a root, possibly cyclic
//! - GraphBuilder: incremental construction with reference validation
//!
//! ## Identity
//!
//! Two nodes are the same object only if they have the same `ObjectId`.
//! Equal values stored at different ids are distinct objects, which is what
//! lets a graph express both shared references and cycles.
//!
//! ## Validity
//!
//! Every `ObjectGraph` in existence references only nodes it owns, and owns
//! only nodes reachable from its root. The builder enforces this in `finish`
//! and deserialization goes through the same step, so consumers never see a
//! dangling `ObjectId` and the encoded arena is exactly what a traversal
//! visits. A graph holds at most [`MAX_NODES`] nodes.
//!
//! ## Equality
//!
//! Floats compare by bit pattern, so a NaN payload equals itself after a
//! round trip and `0.0` differs from `-0.0`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Module that defines scalars, lists and maps.
///
/// No installed distribution backs it, so it never shows up in a snapshot.
pub const CORE_MODULE: &str = "core";

/// Largest number of nodes one graph may hold.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Separator between segments of a module path.
pub const MODULE_SEPARATOR: &str = "::";

/// Return the first segment of a module path.
///
/// `"chrono::naive::date"` → `"chrono"`. A path without separators is its
/// own root package.
pub fn root_package(module: &str) -> &str {
    module.split(MODULE_SEPARATOR).next().unwrap_or(module)
}

/// Identity of a node within an [`ObjectGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(u32);

impl ObjectId {
    /// Position of the node in the graph arena
    pub fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(ObjectId)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named type, function or callable together with its defining module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeRef {
    /// Defining module path, e.g. `"geo::shapes"`
    pub module: String,
    /// Item name within the module, e.g. `"Polygon"`
    pub name: String,
}

impl TypeRef {
    /// Create a new type reference
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Root package of the defining module
    pub fn root_package(&self) -> &str {
        root_package(&self.module)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}{}{}", self.module, MODULE_SEPARATOR, self.name)
        }
    }
}

/// One object in a graph
///
/// Containers refer to their elements by [`ObjectId`], never by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Absence of a value
    None,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Str(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// Ordered sequence of objects
    List(Vec<ObjectId>),
    /// String-keyed mapping, insertion order preserved
    Map(Vec<(String, ObjectId)>),
    /// Instance of a user type with named fields
    Instance {
        /// Type of the instance
        type_ref: TypeRef,
        /// Field name → value
        fields: Vec<(String, ObjectId)>,
    },
    /// Reference to a type object itself
    Type(TypeRef),
    /// Reference to a named function
    Function(TypeRef),
    /// Object rebuilt on decode by calling `callable` with `args`
    Reduce {
        /// Constructor or factory to call
        callable: TypeRef,
        /// Arguments passed to the callable
        args: Vec<ObjectId>,
    },
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::None, Node::None) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Int(a), Node::Int(b)) => a == b,
            (Node::Float(a), Node::Float(b)) => a.to_bits() == b.to_bits(),
            (Node::Str(a), Node::Str(b)) => a == b,
            (Node::Bytes(a), Node::Bytes(b)) => a == b,
            (Node::List(a), Node::List(b)) => a == b,
            (Node::Map(a), Node::Map(b)) => a == b,
            (
                Node::Instance { type_ref: ta, fields: fa },
                Node::Instance { type_ref: tb, fields: fb },
            ) => ta == tb && fa == fb,
            (Node::Type(a), Node::Type(b)) => a == b,
            (Node::Function(a), Node::Function(b)) => a == b,
            (
                Node::Reduce { callable: ca, args: aa },
                Node::Reduce { callable: cb, args: ab },
            ) => ca == cb && aa == ab,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Node {
    /// Module that defines this object's type
    ///
    /// Instances report their type's module, type and function references
    /// report their own module, reductions report the callable's module.
    pub fn defining_module(&self) -> &str {
        match self.type_ref() {
            Some(type_ref) => &type_ref.module,
            None => CORE_MODULE,
        }
    }

    /// Type reference carried by this node, if any
    pub fn type_ref(&self) -> Option<&TypeRef> {
        match self {
            Node::Instance { type_ref, .. } => Some(type_ref),
            Node::Type(type_ref) | Node::Function(type_ref) => Some(type_ref),
            Node::Reduce { callable, .. } => Some(callable),
            _ => None,
        }
    }

    /// Direct references held by this node, in encoding order
    pub fn children(&self) -> Vec<ObjectId> {
        match self {
            Node::List(items) => items.clone(),
            Node::Reduce { args, .. } => args.clone(),
            Node::Map(entries) | Node::Instance { fields: entries, .. } => {
                entries.iter().map(|(_, id)| *id).collect()
            }
            _ => Vec::new(),
        }
    }

    fn remap_children(&mut self, map: impl Fn(ObjectId) -> ObjectId) {
        match self {
            Node::List(items) | Node::Reduce { args: items, .. } => {
                for id in items.iter_mut() {
                    *id = map(*id);
                }
            }
            Node::Map(entries) | Node::Instance { fields: entries, .. } => {
                for (_, id) in entries.iter_mut() {
                    *id = map(*id);
                }
            }
            _ => {}
        }
    }

    /// Get the node kind as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Node::None => "None",
            Node::Bool(_) => "Bool",
            Node::Int(_) => "Int",
            Node::Float(_) => "Float",
            Node::Str(_) => "Str",
            Node::Bytes(_) => "Bytes",
            Node::List(_) => "List",
            Node::Map(_) => "Map",
            Node::Instance { .. } => "Instance",
            Node::Type(_) => "Type",
            Node::Function(_) => "Function",
            Node::Reduce { .. } => "Reduce",
        }
    }

    /// Get as &str if this is a Str node
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as i64 if this is an Int node
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the entries if this is a Map node
    pub fn as_map(&self) -> Option<&[(String, ObjectId)]> {
        match self {
            Node::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// An object graph: arena of nodes plus the root object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGraph")]
pub struct ObjectGraph {
    root: ObjectId,
    nodes: Vec<Node>,
}

/// Unvalidated wire shape of an [`ObjectGraph`]
#[derive(Deserialize)]
struct RawGraph {
    root: ObjectId,
    nodes: Vec<Node>,
}

impl TryFrom<RawGraph> for ObjectGraph {
    type Error = Error;

    fn try_from(raw: RawGraph) -> Result<Self> {
        let (root, nodes) = compact(raw.root, raw.nodes)?;
        Ok(ObjectGraph { root, nodes })
    }
}

fn check_capacity(len: usize) -> Result<()> {
    if len > MAX_NODES {
        return Err(Error::InvalidGraph(format!(
            "{} nodes exceed the limit of {}",
            len, MAX_NODES
        )));
    }
    Ok(())
}

fn validate(root: ObjectId, nodes: &[Node]) -> Result<()> {
    check_capacity(nodes.len())?;
    if root.index() >= nodes.len() {
        return Err(Error::InvalidGraph(format!(
            "root {} out of range ({} nodes)",
            root,
            nodes.len()
        )));
    }
    for (index, node) in nodes.iter().enumerate() {
        if let Some(bad) = node.children().into_iter().find(|c| c.index() >= nodes.len()) {
            return Err(Error::InvalidGraph(format!(
                "node #{} ({}) references missing node {}",
                index,
                node.kind(),
                bad
            )));
        }
    }
    Ok(())
}

/// Validate, then drop nodes unreachable from `root`
///
/// Surviving nodes keep their arena order and are renumbered densely.
fn compact(root: ObjectId, nodes: Vec<Node>) -> Result<(ObjectId, Vec<Node>)> {
    validate(root, &nodes)?;

    let mut reachable = vec![false; nodes.len()];
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if std::mem::replace(&mut reachable[id.index()], true) {
            continue;
        }
        stack.extend(nodes[id.index()].children());
    }
    if reachable.iter().all(|r| *r) {
        return Ok((root, nodes));
    }

    let mut remap = vec![ObjectId(0); nodes.len()];
    let mut next = 0u32;
    for (slot, keep) in remap.iter_mut().zip(&reachable) {
        if *keep {
            *slot = ObjectId(next);
            next += 1;
        }
    }

    let kept = nodes
        .into_iter()
        .zip(reachable)
        .filter(|(_, keep)| *keep)
        .map(|(mut node, _)| {
            node.remap_children(|id| remap[id.index()]);
            node
        })
        .collect();
    Ok((remap[root.index()], kept))
}

impl ObjectGraph {
    /// Graph consisting of a single childless node
    ///
    /// # Errors
    ///
    /// Returns `InvalidGraph` if the node refers to other nodes.
    pub fn single(node: Node) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        let root = builder.add(node);
        builder.finish(root)
    }

    /// Root object id
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Root object
    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root.index()]
    }

    /// Look up a node by id
    pub fn get(&self, id: ObjectId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena, all reachable from the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes with their ids, in arena order
    pub fn nodes(&self) -> impl Iterator<Item = (ObjectId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, node)| ObjectId::from_index(i).map(|id| (id, node)))
    }
}

/// Incremental [`ObjectGraph`] construction
///
/// Cycles are built by reserving a slot, referring to it, then filling it:
///
/// ```
/// use verpack_core::{GraphBuilder, Node};
///
/// let mut b = GraphBuilder::new();
/// let list = b.reserve();
/// b.set(list, Node::List(vec![list])).unwrap();
/// let graph = b.finish(list).unwrap();
/// assert_eq!(graph.node_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
}

impl GraphBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id
    ///
    /// Past [`MAX_NODES`] the returned ids are meaningless and `finish`
    /// rejects the graph.
    pub fn add(&mut self, node: Node) -> ObjectId {
        let id = ObjectId::from_index(self.nodes.len()).unwrap_or(ObjectId(u32::MAX));
        self.nodes.push(node);
        id
    }

    /// Reserve a slot to be filled later with [`GraphBuilder::set`]
    pub fn reserve(&mut self) -> ObjectId {
        self.add(Node::None)
    }

    /// Replace the node stored at `id`
    pub fn set(&mut self, id: ObjectId, node: Node) -> Result<()> {
        match self.nodes.get_mut(id.index()) {
            Some(slot) => {
                *slot = node;
                Ok(())
            }
            None => Err(Error::InvalidGraph(format!("cannot set unknown node {}", id))),
        }
    }

    /// Append a string node
    pub fn str(&mut self, value: impl Into<String>) -> ObjectId {
        self.add(Node::Str(value.into()))
    }

    /// Append an integer node
    pub fn int(&mut self, value: i64) -> ObjectId {
        self.add(Node::Int(value))
    }

    /// Append a list node
    pub fn list(&mut self, items: Vec<ObjectId>) -> ObjectId {
        self.add(Node::List(items))
    }

    /// Append a map node
    pub fn map<K: Into<String>>(&mut self, entries: impl IntoIterator<Item = (K, ObjectId)>) -> ObjectId {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.add(Node::Map(entries))
    }

    /// Append an instance node
    pub fn instance<K: Into<String>>(
        &mut self,
        type_ref: TypeRef,
        fields: impl IntoIterator<Item = (K, ObjectId)>,
    ) -> ObjectId {
        let fields = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.add(Node::Instance { type_ref, fields })
    }

    /// Validate every reference and produce the graph rooted at `root`
    ///
    /// Nodes not reachable from `root` are dropped and the rest renumbered,
    /// so ids handed out by the builder stay valid only when every node is
    /// reachable.
    pub fn finish(self, root: ObjectId) -> Result<ObjectGraph> {
        let (root, nodes) = compact(root, self.nodes)?;
        Ok(ObjectGraph { root, nodes })
    }
}
