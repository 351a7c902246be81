//! HTTP adapter for the geospatial measurement provider

use async_trait::async_trait;
use oracle_application::ports::measurement_provider::{MeasurementProvider, ProviderError};
use oracle_domain::MeasurementRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Measurement provider client
///
/// Posts `{latitude, longitude}` to the configured endpoint and parses
/// the provider's measurement record. The contract is all-or-nothing:
/// any missing field, reported error, non-2xx status, or elapsed
/// deadline fails the fetch.
pub struct HttpMeasurementProvider {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpMeasurementProvider {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[derive(Debug, Serialize)]
struct MeasurementQuery {
    latitude: f64,
    longitude: f64,
}

/// Wire shape of the provider's response
#[derive(Debug, Deserialize)]
struct MeasurementWire {
    latitude: f64,
    longitude: f64,
    area_sqm: f64,
    ndvi: f64,
    cloud_coverage: f64,
    resolution_meters: f64,
    image_date: String,
    satellite: String,
    #[serde(default)]
    rgb_image_url: Option<String>,
    #[serde(default)]
    ndvi_image_url: Option<String>,
}

/// The provider reports failures in-band as `{"error": "..."}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MeasurementEnvelope {
    Failure { error: String },
    Record(Box<MeasurementWire>),
}

impl From<MeasurementWire> for MeasurementRecord {
    fn from(wire: MeasurementWire) -> Self {
        MeasurementRecord {
            latitude: wire.latitude,
            longitude: wire.longitude,
            area_sqm: wire.area_sqm,
            vegetation_index: wire.ndvi,
            cloud_coverage_percent: wire.cloud_coverage,
            resolution_meters: wire.resolution_meters,
            provider_name: wire.satellite,
            captured_at: wire.image_date,
            rgb_image_url: wire.rgb_image_url,
            vegetation_image_url: wire.ndvi_image_url,
        }
    }
}

fn parse_measurement_body(body: &str) -> Result<MeasurementRecord, ProviderError> {
    let envelope: MeasurementEnvelope = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    match envelope {
        MeasurementEnvelope::Failure { error } => Err(ProviderError::RequestFailed(error)),
        MeasurementEnvelope::Record(wire) => Ok((*wire).into()),
    }
}

#[async_trait]
impl MeasurementProvider for HttpMeasurementProvider {
    async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MeasurementRecord, ProviderError> {
        debug!(latitude, longitude, "fetching measurement");

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&MeasurementQuery {
                latitude,
                longitude,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(self.timeout.as_secs())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_measurement_body(&body)
    }
}
