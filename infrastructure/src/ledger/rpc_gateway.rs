//! JSON-RPC adapter for the oracle router ledger boundary

use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, METHOD_GET_REQUEST, METHOD_PENDING_REQUESTS,
    METHOD_SUBMIT_VERIFICATION, PendingRequestWire,
};
use async_trait::async_trait;
use oracle_application::ports::ledger_gateway::{
    LedgerGateway, SubmissionError, TransactionHandle,
};
use oracle_domain::{RequestId, VerificationRequest};
use tracing::{info, warn};

/// Ledger gateway speaking JSON-RPC 2.0 to the oracle router service
///
/// The router holds the signing key and fronts the contract; this client
/// never sees transaction construction. Idempotency lives on-chain: a
/// duplicate submission for a request id comes back as an RPC error.
pub struct JsonRpcLedgerGateway {
    client: reqwest::Client,
    rpc_url: String,
}

impl JsonRpcLedgerGateway {
    pub fn new(client: reqwest::Client, rpc_url: impl Into<String>) -> Self {
        Self {
            client,
            rpc_url: rpc_url.into(),
        }
    }

    async fn call(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, SubmissionError> {
        let request = JsonRpcRequest::new(method, params);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubmissionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::Transport(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let body: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(SubmissionError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| SubmissionError::MalformedResponse("missing result".to_string()))
    }
}

/// Parse the `oracle_pendingRequests` result, dropping entries the
/// router should never have emitted.
fn parse_pending(result: serde_json::Value) -> Result<Vec<VerificationRequest>, SubmissionError> {
    let wires: Vec<PendingRequestWire> = serde_json::from_value(result)
        .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

    Ok(wires
        .into_iter()
        .filter_map(|wire| {
            let id = wire.request_id.clone();
            let request = wire.into_request();
            if request.is_none() {
                warn!(request = %id, "dropping malformed pending request");
            }
            request
        })
        .collect())
}

#[async_trait]
impl LedgerGateway for JsonRpcLedgerGateway {
    async fn submit_verification(
        &self,
        request_id: &RequestId,
        valuation: u64,
        confidence: u8,
    ) -> Result<TransactionHandle, SubmissionError> {
        info!(request = %request_id, valuation, confidence, "submitting verification");

        let result = self
            .call(
                METHOD_SUBMIT_VERIFICATION,
                Some(serde_json::json!([request_id.as_str(), valuation, confidence])),
            )
            .await?;

        let hash: String = serde_json::from_value(result)
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

        info!(request = %request_id, tx = %hash, "verification submitted");
        Ok(TransactionHandle::new(hash))
    }

    async fn pending_requests(&self) -> Result<Vec<VerificationRequest>, SubmissionError> {
        let result = self.call(METHOD_PENDING_REQUESTS, None).await?;
        parse_pending(result)
    }

    async fn request_by_id(
        &self,
        request_id: &RequestId,
    ) -> Result<Option<VerificationRequest>, SubmissionError> {
        let result = self
            .call(
                METHOD_GET_REQUEST,
                Some(serde_json::json!([request_id.as_str()])),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let wire: PendingRequestWire = serde_json::from_value(result)
            .map_err(|e| SubmissionError::MalformedResponse(e.to_string()))?;

        wire.into_request()
            .map(Some)
            .ok_or_else(|| {
                SubmissionError::MalformedResponse(format!(
                    "router returned an invalid request for id {request_id}"
                ))
            })
    }
}
