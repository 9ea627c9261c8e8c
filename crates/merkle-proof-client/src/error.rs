//! Error types for the Merkle validity client.

use thiserror::Error;

use crate::session::BatchReport;

/// Violations of the response framing sent by the authority
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Header announced a negative payload length
    #[error("Negative payload length in response header: {0}")]
    NegativeLength(i32),
    /// Payload cannot be split into whole digests
    #[error("Payload length {length} is not a multiple of the digest width {width}")]
    Misaligned { length: usize, width: usize },
    /// Payload exceeds the configured limit
    #[error("Payload length {length} exceeds the limit of {limit} bytes")]
    PayloadTooLarge { length: usize, limit: usize },
    /// Stream ended before the announced number of bytes arrived
    #[error("Stream closed after {received} of {expected} bytes")]
    Truncated { expected: usize, received: usize },
    /// A digest chunk is not valid UTF-8
    #[error("Proof node {index} is not valid UTF-8: {source}")]
    InvalidEncoding {
        index: usize,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Error types for client sessions
#[derive(Error, Debug)]
pub enum ClientError {
    /// Authority could not be reached
    #[error("Failed to connect to authority at {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },
    /// Stream read/write failure mid-session
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed response from the authority
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// Hasher and request disagree on the digest width
    #[error("Hasher {hasher} produces {hasher_width}-byte digests, request expects {request_width}")]
    DigestWidthMismatch {
        hasher: &'static str,
        hasher_width: usize,
        request_width: usize,
    },
}

/// Validation failures when freezing a batch request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Authority host is empty")]
    EmptyHost,
    #[error("Authority port must be non-zero")]
    InvalidPort,
    #[error("Merkle root is empty")]
    EmptyRoot,
    #[error("Digest width must be non-zero")]
    ZeroDigestWidth,
    #[error("Merkle root is {actual} bytes wide, expected {expected}")]
    RootWidth { expected: usize, actual: usize },
    #[error("Identifier at position {0} is empty")]
    EmptyIdentifier(usize),
    #[error("Identifier at position {0} collides with the session sentinel")]
    ReservedIdentifier(usize),
}

/// A batch that stopped before every identifier was classified
#[derive(Error, Debug)]
#[error("Batch aborted after {} of {} identifiers: {}", .partial.len(), .total, .source)]
pub struct BatchAborted {
    /// Identifiers classified before the failure
    pub partial: BatchReport,
    /// Number of identifiers in the batch
    pub total: usize,
    /// Cause of the abort
    #[source]
    pub source: ClientError,
}
