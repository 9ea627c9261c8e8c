//! Session orchestration: one connection, one request/response/verify cycle per identifier.

use std::collections::HashMap;
use std::sync::Arc;

use merkle_proof_verify::{verify, DigestHasher};
use serde::Serialize;
use tracing::{trace, warn};

use crate::codec::{self, HEADER_LEN, SESSION_SENTINEL};
use crate::config::ClientConfig;
use crate::error::{BatchAborted, ClientError};
use crate::observer::{SessionObserver, TracingObserver};
use crate::request::{AuthorityEndpoint, BatchRequest};
use crate::transport::{Stream, Transport};

/// Protocol position of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connected,
    Requesting,
    AwaitingHeader,
    AwaitingPayload,
    Verified,
    Closing,
    Closed,
    /// Terminal state after a transport or protocol error
    Failed,
}

/// Classification of one identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub identifier: String,
    pub valid: bool,
}

/// Identifiers partitioned by verification result, each side in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub valid: Vec<String>,
    pub invalid: Vec<String>,
}

impl BatchReport {
    pub fn record(&mut self, result: VerificationResult) {
        if result.valid {
            self.valid.push(result.identifier);
        } else {
            self.invalid.push(result.identifier);
        }
    }

    /// Number of classified identifiers
    pub fn len(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `{true -> valid, false -> invalid}` mapping
    pub fn into_map(self) -> HashMap<bool, Vec<String>> {
        HashMap::from([(true, self.valid), (false, self.invalid)])
    }
}

/// Result of a session that did not break mid-batch
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every identifier was requested and classified
    Completed(BatchReport),
    /// The authority could not be reached; nothing was requested
    NotAttempted {
        endpoint: AuthorityEndpoint,
        reason: ClientError,
    },
}

impl BatchOutcome {
    pub fn report(&self) -> Option<&BatchReport> {
        match self {
            BatchOutcome::Completed(report) => Some(report),
            BatchOutcome::NotAttempted { .. } => None,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, BatchOutcome::Completed(_))
    }
}

/// Client checking batches of identifiers against an authority
pub struct MerkleClient {
    config: ClientConfig,
    hasher: Arc<dyn DigestHasher>,
    observer: Box<dyn SessionObserver>,
}

impl MerkleClient {
    /// Create a client using the configured hash algorithm and a tracing observer
    pub fn new(config: ClientConfig) -> Self {
        let hasher = config.hash.hasher();
        Self {
            config,
            hasher,
            observer: Box::new(TracingObserver),
        }
    }

    /// Replace the hash function used to chain proof nodes
    pub fn with_hasher(mut self, hasher: Arc<dyn DigestHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_observer(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Connect to the request's authority and classify every identifier.
    ///
    /// Returns `NotAttempted` if the connection cannot be established, and `BatchAborted`
    /// with the identifiers classified so far if the stream breaks mid-batch.
    pub fn run_batch(&self, request: BatchRequest) -> Result<BatchOutcome, BatchAborted> {
        self.check_digest_width(&request)?;

        let transport = match Transport::open(request.endpoint(), &self.config) {
            Ok(transport) => transport,
            Err(reason @ ClientError::Connection { .. }) => {
                self.observer.connection_refused(request.endpoint(), &reason);
                return Ok(BatchOutcome::NotAttempted {
                    endpoint: request.endpoint,
                    reason,
                });
            }
            Err(source) => {
                self.observer.failed(SessionState::Idle, &source);
                return Err(BatchAborted {
                    partial: BatchReport::default(),
                    total: request.len(),
                    source,
                });
            }
        };

        self.run_on(transport, request)
    }

    /// Run a batch over an already-open transport, which is consumed and closed
    pub fn run_on<S: Stream>(
        &self,
        mut transport: Transport<S>,
        request: BatchRequest,
    ) -> Result<BatchOutcome, BatchAborted> {
        self.check_digest_width(&request)?;

        let total = request.len();
        let BatchRequest {
            endpoint,
            merkle_root,
            identifiers,
            digest_width,
        } = request;

        let mut state = SessionState::Connected;
        self.observer.connected(&endpoint);

        let mut report = BatchReport::default();
        for identifier in identifiers {
            let proof = match self.exchange(&mut transport, &identifier, digest_width, &mut state)
            {
                Ok(proof) => proof,
                Err(source) => {
                    self.observer.failed(state, &source);
                    state = SessionState::Failed;
                    trace!(?state, "Session aborted");
                    // Dropping the transport releases the connection
                    drop(transport);
                    return Err(BatchAborted {
                        partial: report,
                        total,
                        source,
                    });
                }
            };

            let valid = verify(self.hasher.as_ref(), &identifier, &proof, &merkle_root);
            state = SessionState::Verified;
            trace!(?state, identifier = %identifier, valid, "Proof checked");

            let result = VerificationResult { identifier, valid };
            self.observer.verified(&result);
            report.record(result);
        }

        state = SessionState::Closing;
        trace!(?state, "Sending session sentinel");
        if let Err(err) = transport.send(SESSION_SENTINEL.as_bytes()) {
            warn!("Failed to send session sentinel to {}: {}", endpoint, err);
        }
        if let Err(err) = transport.close() {
            warn!("Failed to close connection to {}: {}", endpoint, err);
        }
        state = SessionState::Closed;
        trace!(?state, "Session finished");

        self.observer.closed(&report);
        Ok(BatchOutcome::Completed(report))
    }

    /// Request the proof of one identifier and read it back
    fn exchange<S: Stream>(
        &self,
        transport: &mut Transport<S>,
        identifier: &str,
        digest_width: usize,
        state: &mut SessionState,
    ) -> Result<Vec<String>, ClientError> {
        *state = SessionState::Requesting;
        transport.send(codec::encode_request(identifier))?;
        self.observer.request_sent(identifier);

        *state = SessionState::AwaitingHeader;
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&transport.recv_exact(HEADER_LEN)?);
        let payload_len =
            codec::decode_header(&header, digest_width, self.config.max_payload_bytes)?;
        self.observer.response_header(identifier, payload_len);

        *state = SessionState::AwaitingPayload;
        let payload = transport.recv_exact(payload_len)?;
        Ok(codec::decode_proof(&payload, digest_width)?)
    }

    fn check_digest_width(&self, request: &BatchRequest) -> Result<(), BatchAborted> {
        if self.hasher.digest_width() == request.digest_width() {
            return Ok(());
        }
        let source = ClientError::DigestWidthMismatch {
            hasher: self.hasher.name(),
            hasher_width: self.hasher.digest_width(),
            request_width: request.digest_width(),
        };
        self.observer.failed(SessionState::Idle, &source);
        Err(BatchAborted {
            partial: BatchReport::default(),
            total: request.len(),
            source,
        })
    }
}
