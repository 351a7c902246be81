//! Ledger gateway port
//!
//! Defines the narrow call contract the orchestrator has with the
//! on-chain oracle router.

use async_trait::async_trait;
use oracle_domain::{REJECTION_SENTINEL, RequestId, VerificationRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Handle to a submitted ledger transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHandle(String);

impl TransactionHandle {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from the ledger boundary
///
/// Fatal for the current run. Retried submissions are request-level
/// re-invocations of the whole orchestration, never a resend of a stale
/// transaction; the ledger contract is the authority on duplicates.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Ledger RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Ledger transport failed: {0}")]
    Transport(String),

    #[error("Ledger returned malformed data: {0}")]
    MalformedResponse(String),
}

/// Gateway to the on-chain oracle router
///
/// `submit_verification` is a single state transition keyed by the
/// request id; the contract requires confidence > 0 and rejects
/// duplicate submissions itself — no local dedup here.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// Commit a verification outcome for a request
    async fn submit_verification(
        &self,
        request_id: &RequestId,
        valuation: u64,
        confidence: u8,
    ) -> Result<TransactionHandle, SubmissionError>;

    /// Requests submitted upstream and awaiting verification
    async fn pending_requests(&self) -> Result<Vec<VerificationRequest>, SubmissionError>;

    /// Fetch one request by id (used by the operational retry path)
    async fn request_by_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<VerificationRequest>, SubmissionError>;

    /// Commit an explicit rejection for a request
    ///
    /// A constrained call into the same primitive as
    /// [`submit_verification`], using the reserved sentinel pair. The
    /// reason never reaches the chain; it is logged and lives on in the
    /// evidence bundle.
    async fn submit_rejection(
        &self,
        request_id: &RequestId,
        reason: &str,
    ) -> Result<TransactionHandle, SubmissionError> {
        let (valuation, confidence) = REJECTION_SENTINEL;
        info!(request = %request_id, reason, "submitting rejection sentinel");
        self.submit_verification(request_id, valuation, confidence)
            .await
    }
}
