//! Ledger adapters - the oracle router RPC client

pub mod protocol;
pub mod rpc_gateway;

pub use rpc_gateway::JsonRpcLedgerGateway;
