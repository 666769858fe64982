//! Frame reader
//!
//! Reads one frame from a stream. The first unit is decoded and checked
//! for the header shape:
//!
//! - header: compare its snapshot with the reading environment, hand a
//!   non-empty report to the sink, then decode the payload unit
//! - anything else: the stream was written without a header and that
//!   unit is the payload itself
//!
//! Mismatches never fail a read. Payload decode errors propagate unchanged,
//! after the report (if any) has been delivered.

use crate::checker::{CompatibilityChecker, MismatchReport};
use crate::header::{Header, HEADER_FORMAT_VERSION};
use crate::sink::WarningSink;
use std::io::Read;
use tracing::{debug, warn};
use verpack_core::{decode_resolved, resolve_graph, GraphCodec, ObjectGraph, Result, TypeResolver};
use verpack_environment::{Environment, PackageScope};

/// Everything read from one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Decoded payload
    pub payload: ObjectGraph,
    /// Mismatches against the reading environment; `None` for headerless streams
    pub report: Option<MismatchReport>,
    /// Header, if the stream carried one
    pub header: Option<Header>,
}

/// Reads frames in one environment
pub struct FrameReader<'a> {
    env: &'a Environment,
    codec: &'a dyn GraphCodec,
    resolver: &'a dyn TypeResolver,
    sink: &'a dyn WarningSink,
}

impl<'a> FrameReader<'a> {
    /// Reader over `env`, decoding with `codec` and resolving payload types with `resolver`
    pub fn new(
        env: &'a Environment,
        codec: &'a dyn GraphCodec,
        resolver: &'a dyn TypeResolver,
        sink: &'a dyn WarningSink,
    ) -> Self {
        FrameReader {
            env,
            codec,
            resolver,
            sink,
        }
    }

    /// Read one frame, returning the payload and the mismatch report
    ///
    /// The report is `None` when the stream carried no header.
    pub fn read(&self, stream: &mut dyn Read) -> Result<(ObjectGraph, Option<MismatchReport>)> {
        let frame = self.read_frame(stream)?;
        Ok((frame.payload, frame.report))
    }

    /// Read one frame, keeping the header
    ///
    /// # Errors
    ///
    /// Fails if the first unit cannot be decoded, if the payload unit cannot
    /// be decoded, or if a payload references a type the resolver rejects.
    pub fn read_frame(&self, stream: &mut dyn Read) -> Result<Frame> {
        let first = self.codec.decode_unit(stream)?;

        let header = match Header::from_graph(&first) {
            Some(header) => header,
            None => {
                debug!(nodes = first.node_count(), "No header, first unit is the payload");
                resolve_graph(&first, self.resolver)?;
                return Ok(Frame {
                    payload: first,
                    report: None,
                    header: None,
                });
            }
        };

        if header.is_newer_format() {
            warn!(
                format_version = header.format_version,
                supported = HEADER_FORMAT_VERSION,
                "Header written by a newer format, reading anyway"
            );
        }

        let report = self.check(&header);

        let payload = match decode_resolved(self.codec, stream, self.resolver) {
            Ok(payload) => payload,
            Err(e) => {
                // The report usually explains why the payload is unreadable
                if !report.is_empty() {
                    self.sink.notify(&report);
                }
                return Err(e);
            }
        };

        if !report.is_empty() {
            self.sink.notify(&report);
        }

        debug!(
            differences = report.len(),
            nodes = payload.node_count(),
            "Read frame"
        );

        Ok(Frame {
            payload,
            report: Some(report),
            header: Some(header),
        })
    }

    /// Compare a header against the reading environment
    ///
    /// The reading side is every installed distribution. Headers captured
    /// under `Object` or `Loaded` scope only list a subset of the writer's
    /// distributions, so distributions present only at read time are not
    /// reported for them.
    pub fn check(&self, header: &Header) -> MismatchReport {
        let installed = self.env.tracker(self.codec).discover_installed();
        let current = self.env.snapshot(&installed);

        if header.runtime_version != current.runtime_version() {
            debug!(
                written = %header.runtime_version,
                current = current.runtime_version(),
                "Runtime version differs"
            );
        }

        let report = CompatibilityChecker::compare(&header.snapshot(), &current);
        match header.package_scope {
            Some(PackageScope::Object) | Some(PackageScope::Loaded) => report.without_missing_then(),
            Some(PackageScope::Installed) | None => report,
        }
    }
}
