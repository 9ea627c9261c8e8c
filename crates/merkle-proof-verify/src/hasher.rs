//! Digest capability used to chain proof nodes, and the stock hex-encoded hashers.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::VerifyError;

/// A hash function mapping a string to a fixed-width digest string.
///
/// The digest width must be constant for a given hasher: the wire protocol splits proof
/// payloads into chunks of exactly `digest_width()` bytes.
pub trait DigestHasher: fmt::Debug + Send + Sync {
    /// Short algorithm name used in logs
    fn name(&self) -> &'static str;

    /// Width of every digest produced by `hash`, in bytes
    fn digest_width(&self) -> usize;

    /// Hash `input` into a digest string of `digest_width()` bytes
    fn hash(&self, input: &str) -> String;
}

/// MD5 rendered as 32 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Hasher;

impl DigestHasher for Md5Hasher {
    fn name(&self) -> &'static str {
        "md5"
    }

    fn digest_width(&self) -> usize {
        32
    }

    fn hash(&self, input: &str) -> String {
        hex::encode(md5::compute(input.as_bytes()).0)
    }
}

/// SHA-256 rendered as 64 lowercase hex characters
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl DigestHasher for Sha256Hasher {
    fn name(&self) -> &'static str {
        "sha256"
    }

    fn digest_width(&self) -> usize {
        64
    }

    fn hash(&self, input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}

/// Selects one of the stock hashers by name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha256,
}

impl HashAlgorithm {
    /// Instantiate the hasher for this algorithm
    pub fn hasher(self) -> Arc<dyn DigestHasher> {
        match self {
            HashAlgorithm::Md5 => Arc::new(Md5Hasher),
            HashAlgorithm::Sha256 => Arc::new(Sha256Hasher),
        }
    }

    /// Digest width of this algorithm's hex output
    pub fn digest_width(self) -> usize {
        match self {
            HashAlgorithm::Md5 => Md5Hasher.digest_width(),
            HashAlgorithm::Sha256 => Sha256Hasher.digest_width(),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = VerifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            other => Err(VerifyError::UnknownAlgorithm(other.to_string())),
        }
    }
}
