//! Error types for merkle-proof-verify

use thiserror::Error;

/// Errors that can occur while verifying an inclusion proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// A proof node does not have the hasher's digest width
    #[error("Proof node {index} is {actual} bytes wide, expected {expected}")]
    NodeWidth {
        index: usize,
        expected: usize,
        actual: usize,
    },

    /// The recomputed root differs from the known root
    #[error("Root mismatch: expected {expected}, computed {computed}")]
    RootMismatch { expected: String, computed: String },

    /// Unknown hash algorithm name
    #[error("Unknown hash algorithm: {0}")]
    UnknownAlgorithm(String),
}

/// Result type for proof verification
pub type Result<T> = std::result::Result<T, VerifyError>;
