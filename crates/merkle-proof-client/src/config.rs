//! Client configuration: digest algorithm, timeouts and framing limits.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use merkle_proof_verify::HashAlgorithm;
use serde::{Deserialize, Serialize};

/// Default upper bound on a single proof payload
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1 << 20;

/// Configuration parameters for a client session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Hash algorithm the authority used to build the tree; also fixes the digest width
    pub hash: HashAlgorithm,
    /// Connect timeout in seconds (unset blocks until the OS gives up)
    pub connect_timeout_secs: Option<u64>,
    /// Read timeout in seconds (unset blocks indefinitely)
    pub read_timeout_secs: Option<u64>,
    /// Write timeout in seconds (unset blocks indefinitely)
    pub write_timeout_secs: Option<u64>,
    /// Largest payload length accepted from a response header
    pub max_payload_bytes: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hash: HashAlgorithm::Md5,
            connect_timeout_secs: None,
            read_timeout_secs: None,
            write_timeout_secs: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

impl ClientConfig {
    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn load_from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Configuration preset for a given algorithm
    pub fn for_algorithm(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            ..Self::default()
        }
    }

    /// Width of every digest on the wire, as produced by the configured algorithm
    pub fn digest_width(&self) -> usize {
        self.hash.digest_width()
    }

    /// Zero is treated as unset
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
