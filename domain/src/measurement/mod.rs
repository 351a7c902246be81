//! Measurement record from the geospatial data provider

use serde::{Deserialize, Serialize};

/// Geospatial measurement for one asset location (Value Object)
///
/// A record is either fully populated or the provider call failed — the
/// pipeline never accepts partial measurements. The optional image URLs
/// are audit material carried through to the evidence bundle; they play
/// no role in consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Latitude of the measured location, decimal degrees
    pub latitude: f64,
    /// Longitude of the measured location, decimal degrees
    pub longitude: f64,
    /// Measured area in square meters
    pub area_sqm: f64,
    /// Normalized vegetation index in [-1, 1]
    pub vegetation_index: f64,
    /// Cloud coverage of the source imagery, percent
    pub cloud_coverage_percent: f64,
    /// Ground resolution of the source imagery, meters per pixel
    pub resolution_meters: f64,
    /// Name of the imagery provider (e.g., "Sentinel-2")
    pub provider_name: String,
    /// Capture/generation timestamp as reported by the provider
    pub captured_at: String,
    /// Rendered RGB preview of the measured area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rgb_image_url: Option<String>,
    /// Rendered vegetation-index preview of the measured area
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vegetation_image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> MeasurementRecord {
        MeasurementRecord {
            latitude: 12.97,
            longitude: 77.59,
            area_sqm: 40374.96,
            vegetation_index: 0.41,
            cloud_coverage_percent: 3.2,
            resolution_meters: 10.0,
            provider_name: "Sentinel-2".to_string(),
            captured_at: "2026-03-14T08:21:00Z".to_string(),
            rgb_image_url: None,
            vegetation_image_url: None,
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["areaSqm"], 40374.96);
        assert_eq!(json["providerName"], "Sentinel-2");
        assert!(json.get("rgbImageUrl").is_none());
    }

    #[test]
    fn test_roundtrip() {
        let json = serde_json::to_string(&record()).unwrap();
        let back: MeasurementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record());
    }
}
