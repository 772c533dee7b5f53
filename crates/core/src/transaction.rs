// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TRANSACTION MODEL
//
// Canonical signing-message construction and EIP-155-style sign/verify.
// Any deviation here breaks cross-node verification, so the byte layout
// is fixed and tested explicitly rather than left to a derive macro.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use synapse_crypto::{keccak256, recover_address, sign_prehash, KeyPair, TxSignature};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub from: String,
    pub to: Option<String>,
    pub value: u128,
    pub gas_price: u64,
    pub gas_limit: u64,
    pub data: Vec<u8>,
    pub signature: Option<TxSignature>,
}

impl Transaction {
    pub fn new(
        chain_id: u64,
        nonce: u64,
        from: impl Into<String>,
        to: Option<String>,
        value: u128,
        gas_price: u64,
        gas_limit: u64,
        data: Vec<u8>,
    ) -> Self {
        Transaction {
            chain_id,
            nonce,
            from: from.into(),
            to,
            value,
            gas_price,
            gas_limit,
            data,
            signature: None,
        }
    }

    /// `nonce(8 BE) || from(20) || to(20) || value(16 BE) || gas_price(8 BE) || gas_limit(8 BE) || data`.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut msg = Vec::with_capacity(8 + 20 + 20 + 16 + 8 + 8 + self.data.len());
        msg.extend_from_slice(&self.nonce.to_be_bytes());
        msg.extend_from_slice(&addr_bytes(&self.from));
        let to = self.to.as_deref().unwrap_or("0x0000000000000000000000000000000000000000");
        msg.extend_from_slice(&addr_bytes(to));
        msg.extend_from_slice(&self.value.to_be_bytes());
        msg.extend_from_slice(&self.gas_price.to_be_bytes());
        msg.extend_from_slice(&self.gas_limit.to_be_bytes());
        msg.extend_from_slice(&self.data);
        msg
    }

    pub fn signing_hash(&self) -> [u8; 32] {
        keccak256(&self.signing_message())
    }

    pub fn sign(&mut self, keypair: &KeyPair) -> CoreResult<()> {
        let hash = self.signing_hash();
        let sig = sign_prehash(&hash, &keypair.secret_key)
            .map_err(|_| CoreError::InvalidSignature)?;
        self.signature = Some(sig);
        Ok(())
    }

    /// `v = recovery_id + 2*chain_id + 35`, per EIP-155.
    pub fn v(&self) -> Option<u64> {
        self.signature.as_ref().map(|sig| sig.v(self.chain_id))
    }

    /// Recovers the signer's address from the stored signature and compares
    /// it case-insensitively to `from`. Any mismatch is `InvalidSignature`.
    pub fn verify(&self) -> CoreResult<bool> {
        let sig = self.signature.as_ref().ok_or(CoreError::InvalidSignature)?;
        let hash = self.signing_hash();
        let recovered = recover_address(&hash, sig).map_err(|_| CoreError::InvalidSignature)?;
        Ok(recovered.eq_ignore_ascii_case(&self.from))
    }
}

fn addr_bytes(addr: &str) -> [u8; 20] {
    let hex_part = addr.trim_start_matches("0x").trim_start_matches("0X");
    let mut out = [0u8; 20];
    hex::decode_to_slice(hex_part, &mut out).unwrap_or_default();
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Failed = 0,
    Success = 1,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub log_type: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub tx_hash: String,
    pub block_hash: String,
    pub block_height: u64,
    pub tx_index: u64,
    pub from: String,
    pub to: Option<String>,
    pub gas_used: u64,
    pub status: u8,
    pub logs: Vec<LogEntry>,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == TxStatus::Success as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_crypto::generate_keypair_from_seed;

    fn sample_tx(chain_id: u64, from: &str) -> Transaction {
        Transaction::new(
            chain_id,
            0,
            from,
            Some("0x0000000000000000000000000000000000000001".to_string()),
            1_000_000_000_000_000_000,
            50,
            21_000,
            Vec::new(),
        )
    }

    #[test]
    fn sign_then_verify_round_trip() {
        let seed = [0xab; 32];
        let kp = generate_keypair_from_seed(&seed);
        let addr = synapse_crypto::public_key_to_address(&kp.public_key).unwrap();

        let mut tx = sample_tx(1337, &addr);
        tx.sign(&kp).unwrap();
        assert!(tx.verify().unwrap());
    }

    #[test]
    fn mutated_value_fails_verification() {
        let seed = [0xab; 32];
        let kp = generate_keypair_from_seed(&seed);
        let addr = synapse_crypto::public_key_to_address(&kp.public_key).unwrap();

        let mut tx = sample_tx(1337, &addr);
        tx.sign(&kp).unwrap();
        tx.value = 999;
        assert!(!tx.verify().unwrap());
    }

    #[test]
    fn signing_message_is_deterministic() {
        let tx = sample_tx(1337, "0x1111111111111111111111111111111111111a");
        assert_eq!(tx.signing_message(), tx.signing_message());
    }
}
