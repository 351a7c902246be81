//! JSON-RPC protocol types for the oracle router service.
//!
//! The router fronts the on-chain contract with a narrow JSON-RPC 2.0
//! surface:
//!
//! - `oracle_submitVerification(requestId, valuation, confidence)` ->
//!   transaction hash. The contract requires `confidence > 0` and
//!   rejects duplicate submissions for a request id itself.
//! - `oracle_pendingRequests()` -> requests awaiting verification
//! - `oracle_getRequest(requestId)` -> one request or null

use oracle_domain::{RequestId, VerificationRequest};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Method names exposed by the oracle router
pub const METHOD_SUBMIT_VERIFICATION: &str = "oracle_submitVerification";
pub const METHOD_PENDING_REQUESTS: &str = "oracle_pendingRequests";
pub const METHOD_GET_REQUEST: &str = "oracle_getRequest";

/// Global request ID counter for JSON-RPC requests.
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique request ID.
fn next_id() -> u64 {
    REQUEST_ID.fetch_add(1, Ordering::SeqCst)
}

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Creates a new JSON-RPC request with an auto-generated ID.
    pub fn new(method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id: next_id(),
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<u64>,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Wire shape of a pending verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestWire {
    pub request_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub document_references: Vec<String>,
}

impl PendingRequestWire {
    /// Validate into a domain request; `None` for requests the router
    /// should never have emitted (empty id, off-globe coordinates).
    pub fn into_request(self) -> Option<VerificationRequest> {
        let request_id = RequestId::try_new(self.request_id)?;
        VerificationRequest::new(
            request_id,
            self.latitude,
            self.longitude,
            self.document_references,
        )
        .ok()
    }
}
