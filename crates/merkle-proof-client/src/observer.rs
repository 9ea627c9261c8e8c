//! Observability hook invoked by the session at each protocol step.

use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::request::AuthorityEndpoint;
use crate::session::{BatchReport, SessionState, VerificationResult};

/// Receives session events. Every method defaults to a no-op.
#[cfg_attr(test, mockall::automock)]
pub trait SessionObserver {
    /// The authority could not be reached; the batch will not be attempted
    fn connection_refused(&self, _endpoint: &AuthorityEndpoint, _error: &ClientError) {}

    fn connected(&self, _endpoint: &AuthorityEndpoint) {}

    fn request_sent(&self, _identifier: &str) {}

    /// A response header announced `payload_len` bytes of proof
    fn response_header(&self, _identifier: &str, _payload_len: usize) {}

    fn verified(&self, _result: &VerificationResult) {}

    /// The sentinel was sent and the connection closed
    fn closed(&self, _report: &BatchReport) {}

    /// The session broke while in `state`
    fn failed(&self, _state: SessionState, _error: &ClientError) {}
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Emits every event as a `tracing` record
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn connection_refused(&self, endpoint: &AuthorityEndpoint, error: &ClientError) {
        warn!(%endpoint, "Connection refused, batch not attempted: {}", error);
    }

    fn connected(&self, endpoint: &AuthorityEndpoint) {
        info!(%endpoint, "Connected to authority");
    }

    fn request_sent(&self, identifier: &str) {
        debug!(identifier, "Sending proof request");
    }

    fn response_header(&self, identifier: &str, payload_len: usize) {
        debug!(identifier, payload_len, "Proof size received");
    }

    fn verified(&self, result: &VerificationResult) {
        info!(
            identifier = %result.identifier,
            valid = result.valid,
            "Transaction verified"
        );
    }

    fn closed(&self, report: &BatchReport) {
        info!(
            valid = report.valid.len(),
            invalid = report.invalid.len(),
            "Session closed"
        );
    }

    fn failed(&self, state: SessionState, error: &ClientError) {
        warn!(?state, "Session failed: {}", error);
    }
}
