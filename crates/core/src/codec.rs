//! Unit codec
//!
//! A unit is one complete, independently decodable encoding of an
//! [`ObjectGraph`]. Units are self-delimiting, so several can be written to
//! the same stream back to back and read again one at a time by a decoder
//! that knows nothing about what comes next.

use crate::error::Result;
use crate::graph::ObjectGraph;
use crate::registry::{resolve_graph, TypeResolver};
use crate::traversal::{walk, TraversalObserver};
use std::io::{Read, Write};
use tracing::trace;

/// Object graph codec trait.
///
/// Encoding walks the graph exactly once through the supplied observer
/// before anything is written, so observers see the same traversal the
/// encoder performs.
pub trait GraphCodec: Send + Sync {
    /// Encode `graph` as one unit appended to `out`.
    fn encode_unit(
        &self,
        graph: &ObjectGraph,
        out: &mut dyn Write,
        observer: &mut dyn TraversalObserver,
    ) -> Result<()>;

    /// Decode exactly one unit from `input`.
    ///
    /// Consumes only the bytes of that unit; a following unit stays in the
    /// stream.
    fn decode_unit(&self, input: &mut dyn Read) -> Result<ObjectGraph>;

    /// Unique codec identifier.
    fn codec_id(&self) -> &str;
}

/// MessagePack codec (one MessagePack value per unit)
#[derive(Debug, Default, Clone, Copy)]
pub struct MsgPackCodec;

impl GraphCodec for MsgPackCodec {
    fn encode_unit(
        &self,
        graph: &ObjectGraph,
        mut out: &mut dyn Write,
        observer: &mut dyn TraversalObserver,
    ) -> Result<()> {
        let visited = walk(graph, observer)?;
        rmp_serde::encode::write_named(&mut out, graph)?;
        trace!(codec = self.codec_id(), visited, nodes = graph.node_count(), "Encoded unit");
        Ok(())
    }

    fn decode_unit(&self, input: &mut dyn Read) -> Result<ObjectGraph> {
        let graph: ObjectGraph = rmp_serde::decode::from_read(input)?;
        trace!(codec = self.codec_id(), nodes = graph.node_count(), "Decoded unit");
        Ok(graph)
    }

    fn codec_id(&self) -> &str {
        "msgpack"
    }
}

/// Decode one unit and check its types against `resolver`
pub fn decode_resolved(
    codec: &dyn GraphCodec,
    input: &mut dyn Read,
    resolver: &dyn TypeResolver,
) -> Result<ObjectGraph> {
    let graph = codec.decode_unit(input)?;
    resolve_graph(&graph, resolver)?;
    Ok(graph)
}
