//! Merkle validity client
//!
//! Asks a trusted authority for Merkle inclusion proofs of transaction identifiers over a
//! raw TCP stream, verifies each proof against a known root and partitions the batch into
//! valid and invalid identifiers.

pub mod codec;
pub mod config;
pub mod error;
pub mod observer;
pub mod request;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use error::{BatchAborted, ClientError, ProtocolError, RequestError};
pub use observer::{NoopObserver, SessionObserver, TracingObserver};
pub use request::{AuthorityEndpoint, BatchRequest, BatchRequestBuilder};
pub use session::{BatchOutcome, BatchReport, MerkleClient, SessionState, VerificationResult};
pub use transport::{Stream, Transport};
