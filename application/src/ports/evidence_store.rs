//! Evidence storage and index ports
//!
//! Two seams: the content-addressed store holding the immutable bundle,
//! and the durable request-id index correlating requests to references.

use async_trait::async_trait;
use oracle_domain::{EvidenceBundle, EvidenceReference, RequestId};
use thiserror::Error;

/// Errors from the evidence persistence boundary
///
/// Fatal by design: nothing reaches the ledger without persisted
/// evidence, so every on-chain outcome stays independently auditable.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Evidence upload failed: {0}")]
    Upload(String),

    #[error("Evidence bundle could not be serialized: {0}")]
    Serialize(String),

    #[error("Evidence index write failed: {0}")]
    Index(String),
}

/// Content-addressed storage for evidence bundles
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Persist a bundle, returning its immutable content reference
    async fn put(&self, bundle: &EvidenceBundle) -> Result<EvidenceReference, ArchiveError>;
}

/// Durable request-id to evidence-reference mapping
///
/// Upsert-by-key, last-write-wins, never deletes. The single source of
/// truth correlating a request to its evidence; safe under concurrent
/// orchestration runs for different requests.
#[async_trait]
pub trait EvidenceIndex: Send + Sync {
    /// Record (or overwrite) the reference for a request
    async fn record(
        &self,
        request_id: &RequestId,
        reference: &EvidenceReference,
    ) -> Result<(), ArchiveError>;

    /// Look up the reference for a request, if any run has archived one
    async fn lookup(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<EvidenceReference>, ArchiveError>;
}
