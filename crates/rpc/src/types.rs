// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// JSON-RPC 2.0 WIRE TYPES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        JsonRpcRequest { jsonrpc: "2.0", id, method: method.into(), params }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: u64,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RpcMetrics {
    pub total_calls: u64,
    pub successful_calls: u64,
    pub failed_calls: u64,
    pub retried_calls: u64,
    pub batched_calls: u64,
    /// EWMA of response time in milliseconds, smoothing factor applied
    /// on each observation in `record_latency`.
    pub ewma_latency_ms: f64,
    pub last_error_unix_ms: Option<u64>,
    pub circuit_state: CircuitStateTag,
}

/// Plain-data mirror of [`CircuitState`] so `RpcMetrics` can derive `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CircuitStateTag {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl From<CircuitState> for CircuitStateTag {
    fn from(s: CircuitState) -> Self {
        match s {
            CircuitState::Closed => CircuitStateTag::Closed,
            CircuitState::Open => CircuitStateTag::Open,
            CircuitState::HalfOpen => CircuitStateTag::HalfOpen,
        }
    }
}
