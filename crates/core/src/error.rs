//! Error types for verpack
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Only structural failures are errors. Environment differences, unmappable
//! modules and malformed headers are never reported through this type.

use crate::graph::TypeRef;
use std::io;
use thiserror::Error;

/// Result type alias for verpack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for verpack
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error on the underlying stream or file
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// A unit could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A unit could not be decoded (corrupt stream, truncated data)
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// The payload references a type the type resolver does not know
    #[error("Unknown type: {0}")]
    UnknownType(TypeRef),

    /// Graph references a node that does not exist
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Unrecognized package scope
    #[error("Invalid scope: {0}")]
    InvalidScope(String),

    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Whether this error means the payload itself could not be reconstructed.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Error::DecodeError(_) | Error::UnknownType(_))
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::DecodeError(e.to_string())
    }
}
