//! High-level entry points
//!
//! [`Verpack`] bundles an environment, a codec, a type registry and a
//! warning sink. It is cheap to clone and safe to share between threads.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use verpack_frame::{Environment, GraphBuilder, LoadedModules, StaticIndex, TypeRef, Verpack};
//!
//! let index = StaticIndex::new().with_distribution("geo-types", "0.7.13", ["geo_types"]);
//! let env = Environment::new(Arc::new(index), Arc::new(LoadedModules::new()));
//! let vp = Verpack::new(env);
//!
//! let mut b = GraphBuilder::new();
//! let x = b.int(1);
//! let root = b.instance(TypeRef::new("geo_types::point", "Point"), [("x", x)]);
//! let point = b.finish(root).unwrap();
//!
//! let bytes = vp.dumps(&point).unwrap();
//! let (back, report) = vp.loads(&bytes).unwrap();
//! assert_eq!(back, point);
//! assert!(report.unwrap().is_empty());
//! ```

use crate::checker::MismatchReport;
use crate::config::VerpackConfig;
use crate::reader::{Frame, FrameReader};
use crate::sink::{SilentSink, TracingSink, WarningSink};
use crate::writer::FrameWriter;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use verpack_core::{GraphCodec, MsgPackCodec, ObjectGraph, Result, TypeRegistry};
use verpack_environment::{Environment, LockfileIndex, LoadedModules, PackageScope};

/// Versioned serialization facade
#[derive(Clone)]
pub struct Verpack {
    env: Environment,
    codec: Arc<dyn GraphCodec>,
    types: TypeRegistry,
    sink: Arc<dyn WarningSink>,
    scope: PackageScope,
}

impl Verpack {
    /// MessagePack codec, open type registry, tracing sink and `Object` scope
    pub fn new(env: Environment) -> Self {
        Verpack {
            env,
            codec: Arc::new(MsgPackCodec),
            types: TypeRegistry::open(),
            sink: Arc::new(TracingSink),
            scope: PackageScope::default(),
        }
    }

    /// Build from a loaded config
    ///
    /// The lockfile is resolved against `base_dir`. Registered `types` are
    /// used as-is in open mode and rebuilt as a strict registry when
    /// `strict_types` is set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidScope` if the configured scope is not recognized.
    pub fn from_config(config: &VerpackConfig, base_dir: &Path, types: TypeRegistry) -> Result<Self> {
        let scope = config.scope()?;
        let index = LockfileIndex::new(config.lockfile_path(base_dir));
        let mut env = Environment::new(Arc::new(index), LoadedModules::global());
        if let Some(runtime_version) = &config.runtime_version {
            env = env.with_runtime_version(runtime_version.as_str());
        }

        let types = if config.strict_types {
            types
                .types()
                .cloned()
                .fold(TypeRegistry::strict(), TypeRegistry::with_type)
        } else {
            types
        };
        let sink: Arc<dyn WarningSink> = if config.emit_warnings {
            Arc::new(TracingSink)
        } else {
            Arc::new(SilentSink)
        };

        debug!(
            scope = %scope,
            strict_types = config.strict_types,
            emit_warnings = config.emit_warnings,
            "Configured verpack"
        );

        Ok(Verpack {
            env,
            codec: Arc::new(MsgPackCodec),
            types,
            sink,
            scope,
        })
    }

    /// Replace the codec
    pub fn with_codec(mut self, codec: Arc<dyn GraphCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Replace the type registry
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    /// Replace the warning sink
    pub fn with_sink(mut self, sink: Arc<dyn WarningSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the default scope for writes
    pub fn with_scope(mut self, scope: PackageScope) -> Self {
        self.scope = scope;
        self
    }

    /// Environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Default scope for writes
    pub fn scope(&self) -> PackageScope {
        self.scope
    }

    /// Type registry
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Frame writer over this facade's environment and codec
    pub fn writer(&self) -> FrameWriter<'_> {
        FrameWriter::new(&self.env, self.codec.as_ref())
    }

    /// Frame reader over this facade's environment, codec, registry and sink
    pub fn reader(&self) -> FrameReader<'_> {
        FrameReader::new(&self.env, self.codec.as_ref(), &self.types, self.sink.as_ref())
    }

    /// Write one frame with the default scope
    pub fn dump(&self, object: &ObjectGraph, stream: &mut dyn Write) -> Result<()> {
        self.dump_with_scope(object, stream, self.scope)
    }

    /// Write one frame with an explicit scope
    pub fn dump_with_scope(
        &self,
        object: &ObjectGraph,
        stream: &mut dyn Write,
        scope: PackageScope,
    ) -> Result<()> {
        self.writer().write(stream, object, scope)
    }

    /// Encode one frame to bytes
    pub fn dumps(&self, object: &ObjectGraph) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.dump(object, &mut buf)?;
        Ok(buf)
    }

    /// Read one frame
    pub fn load(&self, stream: &mut dyn Read) -> Result<(ObjectGraph, Option<MismatchReport>)> {
        self.reader().read(stream)
    }

    /// Read one frame, keeping the header
    pub fn load_with_header(&self, stream: &mut dyn Read) -> Result<Frame> {
        self.reader().read_frame(stream)
    }

    /// Decode one frame from bytes
    pub fn loads(&self, bytes: &[u8]) -> Result<(ObjectGraph, Option<MismatchReport>)> {
        self.load(&mut Cursor::new(bytes))
    }

    /// Write one frame to a new file, replacing any existing one
    pub fn dump_file(&self, object: &ObjectGraph, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.dump(object, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Read one frame from a file
    pub fn load_file(&self, path: &Path) -> Result<(ObjectGraph, Option<MismatchReport>)> {
        let mut input = BufReader::new(File::open(path)?);
        self.load(&mut input)
    }
}

impl fmt::Debug for Verpack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verpack")
            .field("env", &self.env)
            .field("codec", &self.codec.codec_id())
            .field("types", &self.types)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
