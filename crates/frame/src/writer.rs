//! Frame writer
//!
//! Writes `[header unit][payload unit]` to a stream. The header describes
//! the distributions relevant under the chosen scope, as installed at write
//! time.

use crate::header::Header;
use std::io::Write;
use tracing::debug;
use verpack_core::{GraphCodec, NoopObserver, ObjectGraph, Result};
use verpack_environment::{Environment, PackageScope};

/// Writes frames in one environment with one codec
pub struct FrameWriter<'a> {
    env: &'a Environment,
    codec: &'a dyn GraphCodec,
}

impl<'a> FrameWriter<'a> {
    /// Writer over `env`, encoding with `codec`
    pub fn new(env: &'a Environment, codec: &'a dyn GraphCodec) -> Self {
        FrameWriter { env, codec }
    }

    /// Header `object` would be written with under `scope`
    ///
    /// # Errors
    ///
    /// In `Object` and `Loaded` scope, fails if the encoder rejects the graph.
    pub fn header_for(&self, object: &ObjectGraph, scope: PackageScope) -> Result<Header> {
        let names = self.env.tracker(self.codec).discover(object, scope)?;
        let snapshot = self.env.snapshot(&names);
        Ok(Header::from_snapshot(&snapshot, scope))
    }

    /// Write one frame
    ///
    /// Nothing is written if discovery fails. If the payload fails to
    /// encode after the header was written the stream holds a partial frame
    /// and the error is returned.
    pub fn write(&self, stream: &mut dyn Write, object: &ObjectGraph, scope: PackageScope) -> Result<()> {
        let header = self.header_for(object, scope)?;
        let header_graph = header.to_graph()?;

        self.codec.encode_unit(&header_graph, stream, &mut NoopObserver)?;
        self.codec.encode_unit(object, stream, &mut NoopObserver)?;

        debug!(
            scope = %scope,
            codec = self.codec.codec_id(),
            packages = header.packages.len(),
            nodes = object.node_count(),
            "Wrote frame"
        );
        Ok(())
    }
}
