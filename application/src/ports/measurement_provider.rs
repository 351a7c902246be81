//! Measurement provider port
//!
//! Defines the interface to the external geospatial data provider.

use async_trait::async_trait;
use oracle_domain::MeasurementRecord;
use thiserror::Error;

/// Errors from the measurement provider boundary
///
/// All of these are fatal to the request: without a measurement there is
/// no evaluable package, so the orchestrator surfaces the failure rather
/// than defaulting.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Measurement request failed: {0}")]
    RequestFailed(String),

    #[error("Measurement provider returned malformed data: {0}")]
    MalformedResponse(String),

    #[error("Measurement provider timed out after {0} seconds")]
    Timeout(u64),
}

/// Gateway to the geospatial measurement provider
///
/// Implementations (adapters) live in the infrastructure layer. The
/// contract is all-or-nothing: a returned record is fully populated.
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    /// Fetch the measurement for a location
    async fn fetch(&self, latitude: f64, longitude: f64)
    -> Result<MeasurementRecord, ProviderError>;
}
