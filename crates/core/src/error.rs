// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ERROR TAXONOMY — the core-side slice of the closed error set.
//
// Transport and RPC-semantic variants live in `synapse-rpc::RpcError`; this
// enum covers everything the deterministic tokenomics/scoring/signing core
// can raise. Every variant is a plain data carrier — no `thiserror`, no
// `anyhow` (the teacher never pulls either into the workspace); `Display`
// and `std::error::Error` are hand-written, mirroring `los_crypto::CryptoError`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field failed validation: out-of-range BPS, negative amount,
    /// malformed address, unknown pool source, weight sum over 10 000, etc.
    InvalidInput { field: &'static str, reason: String },
    /// A requested record (node, subnet, claim epoch) does not exist.
    NotFound { what: &'static str, key: String },
    /// A record already exists where `register`-style insertion requires absence.
    AlreadyExists { what: &'static str, key: String },
    /// Merkle claim manager: the epoch has no stored claim record.
    InvalidEpoch(u64),
    /// Merkle claim manager: `(addr, amount)` was already present in `claimed`.
    AlreadyClaimed { address: String, amount: u128 },
    /// Merkle claim manager: `amount` does not match the stored reward.
    AmountMismatch { expected: u128, got: u128 },
    /// Merkle claim manager: recomputed root does not match the stored root.
    InvalidProof,
    /// Transaction/staking-message signature failed to verify or recover.
    InvalidSignature,
    /// Strict mode only: a signature with high-S was rejected rather than renormalized.
    LowSViolation,
    /// A transaction receipt claims more gas used than the transaction's gas limit.
    InvalidReceipt { gas_used: u64, gas_limit: u64 },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CoreError::InvalidInput { field, reason } => {
                write!(f, "invalid input for '{field}': {reason}")
            }
            CoreError::NotFound { what, key } => write!(f, "{what} not found: {key}"),
            CoreError::AlreadyExists { what, key } => write!(f, "{what} already exists: {key}"),
            CoreError::InvalidEpoch(epoch) => write!(f, "no claim record for epoch {epoch}"),
            CoreError::AlreadyClaimed { address, amount } => {
                write!(f, "({address}, {amount}) already claimed")
            }
            CoreError::AmountMismatch { expected, got } => {
                write!(f, "amount mismatch: expected {expected}, got {got}")
            }
            CoreError::InvalidProof => write!(f, "merkle proof did not verify"),
            CoreError::InvalidSignature => write!(f, "signature verification failed"),
            CoreError::LowSViolation => write!(f, "signature does not satisfy low-S"),
            CoreError::InvalidReceipt { gas_used, gas_limit } => {
                write!(f, "gas_used {gas_used} exceeds gas_limit {gas_limit}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

pub type CoreResult<T> = Result<T, CoreError>;
