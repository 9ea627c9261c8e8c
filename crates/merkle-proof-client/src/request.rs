//! Batch request: authority endpoint, known Merkle root and the identifiers to check.

use std::fmt;

use serde::Serialize;

use crate::codec::SESSION_SENTINEL;
use crate::error::RequestError;

/// Default width of a proof node in bytes (MD5 rendered as hex)
pub const DEFAULT_DIGEST_WIDTH: usize = 32;

/// Address of the authority serving inclusion proofs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AuthorityEndpoint {
    host: String,
    port: u16,
}

impl AuthorityEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for AuthorityEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Validated, immutable batch of identifiers to check against one Merkle root.
///
/// Built once through [`BatchRequestBuilder`] and consumed by a single session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub(crate) endpoint: AuthorityEndpoint,
    pub(crate) merkle_root: String,
    pub(crate) identifiers: Vec<String>,
    pub(crate) digest_width: usize,
}

impl BatchRequest {
    pub fn endpoint(&self) -> &AuthorityEndpoint {
        &self.endpoint
    }

    pub fn merkle_root(&self) -> &str {
        &self.merkle_root
    }

    /// Identifiers in the order they will be requested
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn digest_width(&self) -> usize {
        self.digest_width
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

/// Accumulates identifiers for a [`BatchRequest`]
#[derive(Debug, Clone)]
pub struct BatchRequestBuilder {
    host: String,
    port: u16,
    merkle_root: String,
    identifiers: Vec<String>,
    digest_width: usize,
}

impl BatchRequestBuilder {
    pub fn new(host: impl Into<String>, port: u16, merkle_root: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            merkle_root: merkle_root.into(),
            identifiers: Vec::new(),
            digest_width: DEFAULT_DIGEST_WIDTH,
        }
    }

    /// Queue an identifier; request order is insertion order
    pub fn add_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifiers.push(identifier.into());
        self
    }

    pub fn add_identifiers<I, T>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.identifiers
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    /// Width of digests on the wire, defaults to 32
    pub fn digest_width(mut self, width: usize) -> Self {
        self.digest_width = width;
        self
    }

    /// Validate and freeze the request
    pub fn build(self) -> Result<BatchRequest, RequestError> {
        if self.host.trim().is_empty() {
            return Err(RequestError::EmptyHost);
        }
        if self.port == 0 {
            return Err(RequestError::InvalidPort);
        }
        if self.digest_width == 0 {
            return Err(RequestError::ZeroDigestWidth);
        }
        if self.merkle_root.is_empty() {
            return Err(RequestError::EmptyRoot);
        }
        if self.merkle_root.len() != self.digest_width {
            return Err(RequestError::RootWidth {
                expected: self.digest_width,
                actual: self.merkle_root.len(),
            });
        }
        for (position, identifier) in self.identifiers.iter().enumerate() {
            if identifier.is_empty() {
                return Err(RequestError::EmptyIdentifier(position));
            }
            if identifier == SESSION_SENTINEL {
                return Err(RequestError::ReservedIdentifier(position));
            }
        }

        Ok(BatchRequest {
            endpoint: AuthorityEndpoint::new(self.host, self.port),
            merkle_root: self.merkle_root,
            identifiers: self.identifiers,
            digest_width: self.digest_width,
        })
    }
}
