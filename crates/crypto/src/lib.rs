// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SYNAPSE — CRYPTOGRAPHY MODULE
//
// secp256k1 ECDSA signing/verification (EIP-155-style recovery id), Keccak256
// for signing messages and address derivation, SHA-256 for Merkle hashing.
// - Key generation (random and deterministic from a 32-byte seed)
// - Transaction pre-hash signing with low-S enforcement
// - Raw staking-message signing (no chain id, no recovery byte)
// - Address derivation from an uncompressed public key
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use zeroize::Zeroize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    InvalidKey,
    InvalidSignature,
    InvalidMessage,
    RecoveryFailed,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CryptoError::InvalidKey => write!(f, "invalid key format"),
            CryptoError::InvalidSignature => write!(f, "invalid signature"),
            CryptoError::InvalidMessage => write!(f, "invalid message"),
            CryptoError::RecoveryFailed => write!(f, "public key recovery failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// secp256k1 keypair. `secret_key` is zeroized on drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    /// 65-byte uncompressed SEC1 point (0x04 || x || y).
    pub public_key: Vec<u8>,
    /// 32-byte secret scalar.
    pub secret_key: Vec<u8>,
}

/// Zeroize secret key material on drop to prevent recovery via memory dump,
/// swap file, or core dump.
impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret_key.zeroize();
    }
}

/// A secp256k1 ECDSA signature over a transaction pre-hash: low-S enforced,
/// recovery id combined with `chain_id` to form `v` per EIP-155.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
    pub recovery_id: u8,
}

impl TxSignature {
    /// `v = recovery_id + 2*chain_id + 35`.
    pub fn v(&self, chain_id: u64) -> u64 {
        self.recovery_id as u64 + 2 * chain_id + 35
    }

    /// Recover `recovery_id` from a `v` value produced by `Self::v`.
    pub fn recovery_id_from_v(v: u64, chain_id: u64) -> Result<u8, CryptoError> {
        let base = 2 * chain_id + 35;
        if v < base || v - base > 1 {
            return Err(CryptoError::InvalidSignature);
        }
        Ok((v - base) as u8)
    }
}

/// Keccak256 (Ethereum-style), used for signing messages and address derivation.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256, used for Merkle tree nodes and leaves.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Generate a new random secp256k1 key pair.
pub fn generate_keypair() -> KeyPair {
    let signing_key = SigningKey::random(&mut rand::thread_rng());
    keypair_from_signing_key(&signing_key)
}

/// Generate a DETERMINISTIC secp256k1 key pair from a 32+ byte seed.
///
/// Domain separation (mirrors the teacher's `generate_keypair_from_seed`):
///   `salt = sha256("synapse-secp256k1-keygen-v1")`
///   `derived = sha256(salt || seed)`
/// `derived` is reduced modulo the curve order by rejection: on the
/// astronomically unlikely event it is zero or `>= n`, it is rehashed with
/// itself until it lands in range. Same seed always produces the same
/// key pair and address.
///
/// # Panics
/// If `seed` is shorter than 32 bytes.
pub fn generate_keypair_from_seed(seed: &[u8]) -> KeyPair {
    assert!(seed.len() >= 32, "seed must be at least 32 bytes");

    let salt = Sha256::digest(b"synapse-secp256k1-keygen-v1");
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(seed);
    let mut derived: [u8; 32] = hasher.finalize().into();

    let signing_key = loop {
        match SigningKey::from_slice(&derived) {
            Ok(k) => break k,
            Err(_) => {
                let rehashed = Sha256::digest(derived);
                derived.copy_from_slice(&rehashed);
            }
        }
    };

    derived.zeroize();
    keypair_from_signing_key(&signing_key)
}

/// Reconstruct a [`KeyPair`] from a raw 32-byte secret scalar.
pub fn keypair_from_secret(secret_bytes: &[u8]) -> Result<KeyPair, CryptoError> {
    if secret_bytes.len() != 32 {
        return Err(CryptoError::InvalidKey);
    }
    let signing_key =
        SigningKey::from_slice(secret_bytes).map_err(|_| CryptoError::InvalidKey)?;
    Ok(keypair_from_signing_key(&signing_key))
}

fn keypair_from_signing_key(signing_key: &SigningKey) -> KeyPair {
    let verifying_key = VerifyingKey::from(signing_key);
    let encoded = verifying_key.to_encoded_point(false);
    KeyPair {
        public_key: encoded.as_bytes().to_vec(),
        secret_key: signing_key.to_bytes().to_vec(),
    }
}

/// Derive a lower-case `0x`-prefixed 20-byte address from an uncompressed
/// public key: the last 20 bytes of `keccak256(pubkey[1:])` (the `0x04`
/// prefix byte is stripped before hashing).
pub fn public_key_to_address(public_key_bytes: &[u8]) -> Result<String, CryptoError> {
    if public_key_bytes.len() != 65 || public_key_bytes[0] != 0x04 {
        return Err(CryptoError::InvalidKey);
    }
    let hash = keccak256(&public_key_bytes[1..]);
    Ok(format!("0x{}", hex::encode(&hash[12..])))
}

/// Validate address syntax: `0x` prefix, exactly 42 characters, all hex,
/// no embedded control characters. Does not check a checksum (none is
/// defined for this chain — comparisons are case-insensitive).
pub fn validate_address(address: &str) -> bool {
    if address.len() != 42 {
        return false;
    }
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return false;
    }
    address[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Normalize an address to lower-case hex with `0x` prefix. Returns `None`
/// if the address does not pass [`validate_address`].
pub fn normalize_address(address: &str) -> Option<String> {
    if !validate_address(address) {
        return None;
    }
    Some(address.to_ascii_lowercase())
}

/// Sign a 32-byte pre-hash with secp256k1 ECDSA, enforcing low-S: if the
/// raw `s` is greater than `n/2`, it is replaced by `n - s` and the
/// recovery id's parity bit is flipped to match.
pub fn sign_prehash(hash: &[u8; 32], secret_key_bytes: &[u8]) -> Result<TxSignature, CryptoError> {
    let signing_key =
        SigningKey::from_slice(secret_key_bytes).map_err(|_| CryptoError::InvalidKey)?;
    let (signature, recovery_id): (Signature, RecoveryId) = signing_key
        .sign_prehash_recoverable(hash)
        .map_err(|_| CryptoError::InvalidSignature)?;

    let (signature, recovery_id) = match signature.normalize_s() {
        Some(normalized) => {
            let flipped = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
            (normalized, flipped)
        }
        None => (signature, recovery_id),
    };

    let bytes = signature.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(TxSignature {
        r,
        s,
        recovery_id: recovery_id.to_byte(),
    })
}

/// Recover the uncompressed public key from a pre-hash and a low-S signature.
pub fn recover_public_key(
    hash: &[u8; 32],
    sig: &TxSignature,
) -> Result<Vec<u8>, CryptoError> {
    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&sig.r);
    sig_bytes[32..].copy_from_slice(&sig.s);
    let signature = Signature::from_slice(&sig_bytes).map_err(|_| CryptoError::InvalidSignature)?;
    let recovery_id =
        RecoveryId::from_byte(sig.recovery_id).ok_or(CryptoError::InvalidSignature)?;

    let verifying_key = VerifyingKey::recover_from_prehash(hash, &signature, recovery_id)
        .map_err(|_| CryptoError::RecoveryFailed)?;
    Ok(verifying_key.to_encoded_point(false).as_bytes().to_vec())
}

/// Recover the `0x`-prefixed address that produced `sig` over `hash`.
pub fn recover_address(hash: &[u8; 32], sig: &TxSignature) -> Result<String, CryptoError> {
    let pubkey = recover_public_key(hash, sig)?;
    public_key_to_address(&pubkey)
}

/// Sign an arbitrary UTF-8 string with a deterministic 64-byte `(r || s)`
/// signature: no chain id, no recovery byte. Used for off-chain staking
/// authorization messages where a transaction envelope is not appropriate.
pub fn sign_staking_message(message: &str, secret_key_bytes: &[u8]) -> Result<[u8; 64], CryptoError> {
    let hash = keccak256(message.as_bytes());
    let sig = sign_prehash(&hash, secret_key_bytes)?;
    let mut out = [0u8; 64];
    out[..32].copy_from_slice(&sig.r);
    out[32..].copy_from_slice(&sig.s);
    Ok(out)
}

/// Verify a 64-byte `(r || s)` staking-message signature against a known
/// public key. Tries both recovery-id parities since the raw 64-byte form
/// carries no recovery byte.
pub fn verify_staking_message(
    message: &str,
    signature: &[u8; 64],
    public_key_bytes: &[u8],
) -> Result<bool, CryptoError> {
    let hash = keccak256(message.as_bytes());
    let sig_slice = Signature::from_slice(signature).map_err(|_| CryptoError::InvalidSignature)?;
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key_bytes)
        .map_err(|_| CryptoError::InvalidKey)?;
    Ok(verifying_key.verify_prehash(&hash, &sig_slice).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak256_known_vector() {
        // keccak256("") per the Ethereum Yellow Paper test vector.
        let h = keccak256(b"");
        assert_eq!(
            hex::encode(h),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a47"
        );
    }

    #[test]
    fn deterministic_seed_keygen_is_stable() {
        let seed = [7u8; 32];
        let a = generate_keypair_from_seed(&seed);
        let b = generate_keypair_from_seed(&seed);
        assert_eq!(a.public_key, b.public_key);
        assert_eq!(a.secret_key, b.secret_key);
    }

    #[test]
    fn different_seeds_produce_different_keys() {
        let a = generate_keypair_from_seed(&[1u8; 32]);
        let b = generate_keypair_from_seed(&[2u8; 32]);
        assert_ne!(a.public_key, b.public_key);
    }

    #[test]
    fn address_round_trips_through_sign_recover() {
        let keypair = generate_keypair_from_seed(&[0xab; 32]);
        let address = public_key_to_address(&keypair.public_key).unwrap();
        assert!(validate_address(&address));

        let hash = keccak256(b"hello world");
        let sig = sign_prehash(&hash, &keypair.secret_key).unwrap();
        let recovered = recover_address(&hash, &sig).unwrap();
        assert_eq!(recovered.to_ascii_lowercase(), address);
    }

    #[test]
    fn low_s_is_enforced() {
        // secp256k1 order n = 0xFFFF...BAAEDCE6AF48A03BBFD25E8CD0364141; n/2 below.
        // Both sides are 32-byte big-endian unsigned integers, so lexicographic
        // byte comparison is equivalent to numeric comparison.
        const HALF_N: [u8; 32] = [
            0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
            0xff, 0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46,
            0x68, 0x1b, 0x20, 0xa0,
        ];
        let keypair = generate_keypair_from_seed(&[3u8; 32]);
        let hash = keccak256(b"some transaction payload");
        let sig = sign_prehash(&hash, &keypair.secret_key).unwrap();
        assert!(sig.s <= HALF_N, "s must be low (<= n/2)");
    }

    #[test]
    fn tampered_message_fails_recovery_to_same_address() {
        let keypair = generate_keypair_from_seed(&[9u8; 32]);
        let address = public_key_to_address(&keypair.public_key).unwrap();
        let hash = keccak256(b"original message");
        let sig = sign_prehash(&hash, &keypair.secret_key).unwrap();

        let tampered_hash = keccak256(b"tampered message");
        let recovered = recover_address(&tampered_hash, &sig).unwrap_or_default();
        assert_ne!(recovered.to_ascii_lowercase(), address);
    }

    #[test]
    fn staking_message_sign_verify_round_trip() {
        let keypair = generate_keypair_from_seed(&[5u8; 32]);
        let msg = "stake-authorization:validator-7:epoch-42";
        let sig = sign_staking_message(msg, &keypair.secret_key).unwrap();
        assert!(verify_staking_message(msg, &sig, &keypair.public_key).unwrap());
        assert!(!verify_staking_message("different message", &sig, &keypair.public_key).unwrap());
    }

    #[test]
    fn address_validation_rejects_malformed_inputs() {
        assert!(!validate_address(""));
        assert!(!validate_address("1234567890123456789012345678901234567890"));
        assert!(!validate_address("0xZZ34567890123456789012345678901234567890"));
        assert!(!validate_address("0x1234"));
        assert!(!validate_address("0x1234567890123456789012345678901234567890\n"));
        assert!(!validate_address("0x'; DROP TABLE users;--00000000000000000"));
        assert!(!validate_address("0x<script>alert(1)</script>0000000000000"));
    }

    #[test]
    fn recovery_id_v_round_trip() {
        let sig = TxSignature {
            r: [1u8; 32],
            s: [2u8; 32],
            recovery_id: 1,
        };
        let v = sig.v(1337);
        assert_eq!(TxSignature::recovery_id_from_v(v, 1337).unwrap(), 1);
    }
}
