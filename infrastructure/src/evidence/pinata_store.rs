//! IPFS pinning adapter for evidence bundles (Pinata API)

use async_trait::async_trait;
use oracle_application::ports::evidence_store::{ArchiveError, EvidenceStore};
use oracle_domain::{EvidenceBundle, EvidenceReference};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Content-addressed evidence store backed by the Pinata pinning API
///
/// The returned CID is immutable and resolvable through any public IPFS
/// gateway, which is what makes the archived trail independently
/// auditable.
pub struct PinataEvidenceStore {
    client: reqwest::Client,
    api_url: String,
    jwt: String,
}

impl PinataEvidenceStore {
    pub fn new(client: reqwest::Client, api_url: impl Into<String>, jwt: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            jwt: jwt.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PinRequest<'a> {
    pinata_content: &'a EvidenceBundle,
    pinata_metadata: PinMetadata,
}

#[derive(Debug, Serialize)]
struct PinMetadata {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

fn parse_pin_response(body: &str) -> Result<EvidenceReference, ArchiveError> {
    let response: PinResponse =
        serde_json::from_str(body).map_err(|e| ArchiveError::Upload(e.to_string()))?;

    if response.ipfs_hash.trim().is_empty() {
        return Err(ArchiveError::Upload(
            "pinning service returned an empty reference".to_string(),
        ));
    }

    Ok(EvidenceReference::new(response.ipfs_hash))
}

#[async_trait]
impl EvidenceStore for PinataEvidenceStore {
    async fn put(&self, bundle: &EvidenceBundle) -> Result<EvidenceReference, ArchiveError> {
        let request = PinRequest {
            pinata_content: bundle,
            pinata_metadata: PinMetadata {
                name: bundle.name_hint(),
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.jwt)
            .json(&request)
            .send()
            .await
            .map_err(|e| ArchiveError::Upload(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ArchiveError::Upload(e.to_string()))?;

        if !status.is_success() {
            return Err(ArchiveError::Upload(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let reference = parse_pin_response(&body)?;
        info!(request = %bundle.request_id, evidence = %reference, "evidence pinned");
        Ok(reference)
    }
}
