//! Verification request entity

use crate::core::error::DomainError;
use crate::core::request_id::RequestId;
use serde::{Deserialize, Serialize};

/// A claimant's request to verify one real-world asset (Entity)
///
/// Created once from the upstream submission event and read-only for the
/// duration of an orchestration run. Results are attached downstream
/// (evidence bundle, ledger outcome), never merged back into the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    /// Ledger-assigned identifier
    pub request_id: RequestId,
    /// Latitude of the claimed asset, decimal degrees
    pub latitude: f64,
    /// Longitude of the claimed asset, decimal degrees
    pub longitude: f64,
    /// Content-addressed references to submitted evidence documents.
    /// Order is irrelevant to consensus but preserved for audit.
    pub document_references: Vec<String>,
}

impl VerificationRequest {
    /// Create a request, validating the coordinates
    pub fn new(
        request_id: RequestId,
        latitude: f64,
        longitude: f64,
        document_references: Vec<String>,
    ) -> Result<Self, DomainError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            request_id,
            latitude,
            longitude,
            document_references,
        })
    }
}
