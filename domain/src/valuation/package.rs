//! Evaluation package handed to every valuation agent

use crate::core::request_id::RequestId;
use crate::measurement::MeasurementRecord;
use crate::request::entities::VerificationRequest;
use serde::{Deserialize, Serialize};

/// Everything one agent needs to appraise one asset (Value Object)
///
/// Built once per orchestration run, after the measurement stage, and
/// shared read-only by all concurrent agent invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPackage {
    /// Correlation key for the run
    pub request_id: RequestId,
    /// Latitude of the claimed asset
    pub latitude: f64,
    /// Longitude of the claimed asset
    pub longitude: f64,
    /// Geospatial measurement for the location
    pub measurement: MeasurementRecord,
    /// Number of submitted evidence documents
    pub document_count: usize,
    /// Content-addressed references to the submitted documents
    pub document_references: Vec<String>,
}

impl EvaluationPackage {
    /// Assemble the package from a request and its measurement
    pub fn new(request: &VerificationRequest, measurement: MeasurementRecord) -> Self {
        Self {
            request_id: request.request_id.clone(),
            latitude: request.latitude,
            longitude: request.longitude,
            measurement,
            document_count: request.document_references.len(),
            document_references: request.document_references.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurement() -> MeasurementRecord {
        MeasurementRecord {
            latitude: 1.0,
            longitude: 2.0,
            area_sqm: 31415.0,
            vegetation_index: 0.5,
            cloud_coverage_percent: 0.0,
            resolution_meters: 10.0,
            provider_name: "Sentinel-2".to_string(),
            captured_at: "2026-01-01T00:00:00Z".to_string(),
            rgb_image_url: None,
            vegetation_image_url: None,
        }
    }

    #[test]
    fn test_package_from_request() {
        let request = VerificationRequest::new(
            RequestId::new("7"),
            1.0,
            2.0,
            vec!["QmDoc1".to_string(), "QmDoc2".to_string()],
        )
        .unwrap();

        let package = EvaluationPackage::new(&request, measurement());
        assert_eq!(package.request_id.as_str(), "7");
        assert_eq!(package.document_count, 2);
        assert_eq!(package.document_references, request.document_references);
    }

    #[test]
    fn test_wire_shape() {
        let request =
            VerificationRequest::new(RequestId::new("7"), 1.0, 2.0, vec![]).unwrap();
        let json = serde_json::to_value(EvaluationPackage::new(&request, measurement())).unwrap();
        assert_eq!(json["requestId"], "7");
        assert_eq!(json["documentCount"], 0);
        assert!(json["measurement"]["areaSqm"].is_number());
    }
}
