// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RPC ERROR TAXONOMY
//
// Transport failures (`ConnectionError`, `CircuitOpen`) are kept distinct
// from RPC semantic errors so a caller can catch a dead connection without
// masking an on-chain truth like `InsufficientFunds`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt;

#[derive(Debug, Clone)]
pub enum RpcError {
    ConnectionError { url: String, cause: String },
    CircuitOpen { host: String },
    Timeout { url: String, timeout_ms: u64 },

    BlockNotFound,
    TransactionNotFound,
    AccountNotFound,
    InsufficientFunds { have: u128, need: u128 },
    InvalidSignature,
    NonceTooLow { expected: u64, got: u64 },
    NonceTooHigh,
    GasLimitExceeded { limit: u64, required: u64 },
    ContractExecutionError { reason: String },
    RateLimited,
    MempoolFull { current: usize, max: usize },
    StorageError { reason: String },
    InternalError { reason: String },

    InvalidInput { field: &'static str, reason: String },

    Serde { reason: String },
}

impl RpcError {
    /// Whether retry/backoff may recover this without caller intervention.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcError::ConnectionError { .. }
                | RpcError::Timeout { .. }
                | RpcError::RateLimited
                | RpcError::InternalError { .. }
        )
    }

    /// Maps a JSON-RPC `error.code` to the closed error taxonomy. Unknown
    /// codes fall back to `InternalError` (retryable) rather than panicking
    /// on a host that speaks a superset of the known codes.
    pub fn from_rpc_code(code: i64, message: &str) -> Self {
        match code {
            -32000 => RpcError::BlockNotFound,
            -32001 => RpcError::TransactionNotFound,
            -32002 => RpcError::AccountNotFound,
            -32003 => RpcError::InvalidSignature,
            -32004 => RpcError::NonceTooHigh,
            -32005 => RpcError::RateLimited,
            -32006 => RpcError::ContractExecutionError { reason: message.to_string() },
            -32007 => RpcError::StorageError { reason: message.to_string() },
            -32601 => RpcError::InvalidInput { field: "method", reason: message.to_string() },
            _ => RpcError::InternalError { reason: message.to_string() },
        }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ConnectionError { url, cause } => {
                write!(f, "connection error calling {url}: {cause}")
            }
            RpcError::CircuitOpen { host } => write!(f, "circuit open for {host}"),
            RpcError::Timeout { url, timeout_ms } => {
                write!(f, "timeout after {timeout_ms}ms calling {url}")
            }
            RpcError::BlockNotFound => write!(f, "block not found"),
            RpcError::TransactionNotFound => write!(f, "transaction not found"),
            RpcError::AccountNotFound => write!(f, "account not found"),
            RpcError::InsufficientFunds { have, need } => {
                write!(f, "insufficient funds: have {have}, need {need}")
            }
            RpcError::InvalidSignature => write!(f, "invalid signature"),
            RpcError::NonceTooLow { expected, got } => {
                write!(f, "nonce too low: expected {expected}, got {got}")
            }
            RpcError::NonceTooHigh => write!(f, "nonce too high"),
            RpcError::GasLimitExceeded { limit, required } => {
                write!(f, "gas limit exceeded: limit {limit}, required {required}")
            }
            RpcError::ContractExecutionError { reason } => {
                write!(f, "contract execution error: {reason}")
            }
            RpcError::RateLimited => write!(f, "rate limited"),
            RpcError::MempoolFull { current, max } => {
                write!(f, "mempool full: {current}/{max}")
            }
            RpcError::StorageError { reason } => write!(f, "storage error: {reason}"),
            RpcError::InternalError { reason } => write!(f, "internal error: {reason}"),
            RpcError::InvalidInput { field, reason } => {
                write!(f, "invalid input for {field}: {reason}")
            }
            RpcError::Serde { reason } => write!(f, "serde error: {reason}"),
        }
    }
}

impl std::error::Error for RpcError {}

pub type RpcResult<T> = Result<T, RpcError>;
