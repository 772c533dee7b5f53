// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MERKLE CLAIM MANAGER
//
// Commits each epoch's reward set as a sha256 Merkle root over
// address-sorted, amount-carrying leaves, and verifies inclusion proofs
// at claim time. Internal nodes hash their children in sorted order so a
// claimant never needs to know which side of the tree they're on.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{CoreError, CoreResult};

fn leaf_hash(addr: &str, amount: u128) -> [u8; 32] {
    // amount is u128 (16 bytes); the 32-byte big-endian amount field the
    // wire format calls for is left-padded with zeros.
    let mut full = Vec::with_capacity(20 + 32);
    full.extend_from_slice(&addr_bytes(addr));
    full.extend_from_slice(&[0u8; 16]);
    full.extend_from_slice(&amount.to_be_bytes());
    synapse_crypto::sha256(&full)
}

fn addr_bytes(addr: &str) -> [u8; 20] {
    let hex_part = addr.trim_start_matches("0x").trim_start_matches("0X");
    let mut out = [0u8; 20];
    hex::decode_to_slice(hex_part, &mut out).unwrap_or_default();
    out
}

fn parent_hash(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(lo);
    buf.extend_from_slice(hi);
    synapse_crypto::sha256(&buf)
}

fn empty_root() -> [u8; 32] {
    synapse_crypto::sha256(b"empty")
}

/// Builds the tree level-by-level and returns every level, leaves first,
/// so a proof for any leaf can be read off by index without rebuilding.
fn build_levels(leaves: &[[u8; 32]]) -> Vec<Vec<[u8; 32]>> {
    if leaves.is_empty() {
        return vec![vec![empty_root()]];
    }
    let mut levels = vec![leaves.to_vec()];
    loop {
        let current = levels.last().unwrap();
        if current.len() == 1 {
            break;
        }
        let mut next = Vec::with_capacity((current.len() + 1) / 2);
        let mut i = 0;
        while i < current.len() {
            if i + 1 < current.len() {
                next.push(parent_hash(&current[i], &current[i + 1]));
                i += 2;
            } else {
                next.push(current[i]);
                i += 1;
            }
        }
        levels.push(next);
    }
    levels
}

fn proof_for_index(levels: &[Vec<[u8; 32]>], mut index: usize) -> Vec<[u8; 32]> {
    let mut proof = Vec::new();
    for level in levels.iter().take(levels.len().saturating_sub(1)) {
        let sibling = if index % 2 == 0 { index + 1 } else { index - 1 };
        if sibling < level.len() {
            proof.push(level[sibling]);
        }
        index /= 2;
    }
    proof
}

fn verify_proof(leaf: [u8; 32], proof: &[[u8; 32]], root: [u8; 32]) -> bool {
    let mut current = leaf;
    for sibling in proof {
        current = parent_hash(&current, sibling);
    }
    current == root
}

#[derive(Debug, Clone)]
struct ClaimEpoch {
    root: [u8; 32],
    rewards: BTreeMap<String, u128>,
    claimed: BTreeSet<(String, u128)>,
}

#[derive(Debug, Clone, Default)]
pub struct ClaimStatus {
    pub epoch_exists: bool,
    pub entitled_amount: Option<u128>,
    pub already_claimed: bool,
}

#[derive(Debug, Default)]
pub struct ClaimManager {
    epochs: BTreeMap<u64, ClaimEpoch>,
}

impl ClaimManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops zero-amount entries, sorts by address, and commits the root.
    pub fn create_claim_tree(&mut self, epoch: u64, rewards: BTreeMap<String, u128>) -> [u8; 32] {
        let rewards: BTreeMap<String, u128> =
            rewards.into_iter().filter(|(_, amt)| *amt > 0).collect();

        let leaves: Vec<[u8; 32]> =
            rewards.iter().map(|(addr, amt)| leaf_hash(addr, *amt)).collect();
        let root = if leaves.is_empty() {
            empty_root()
        } else {
            let levels = build_levels(&leaves);
            *levels.last().unwrap().first().unwrap()
        };

        self.epochs.insert(
            epoch,
            ClaimEpoch { root, rewards, claimed: BTreeSet::new() },
        );
        root
    }

    pub fn get_claim_proof(&self, epoch: u64, addr: &str) -> Option<Vec<[u8; 32]>> {
        let record = self.epochs.get(&epoch)?;
        let index = record.rewards.keys().position(|a| a == addr)?;
        let leaves: Vec<[u8; 32]> = record
            .rewards
            .iter()
            .map(|(a, amt)| leaf_hash(a, *amt))
            .collect();
        let levels = build_levels(&leaves);
        Some(proof_for_index(&levels, index))
    }

    pub fn claim_reward(
        &mut self,
        epoch: u64,
        addr: &str,
        amount: u128,
        proof: &[[u8; 32]],
    ) -> CoreResult<()> {
        let record = self
            .epochs
            .get_mut(&epoch)
            .ok_or(CoreError::InvalidEpoch(epoch))?;

        if record.claimed.contains(&(addr.to_string(), amount)) {
            return Err(CoreError::AlreadyClaimed { address: addr.to_string(), amount });
        }

        let entitled = record
            .rewards
            .get(addr)
            .copied()
            .ok_or_else(|| CoreError::NotFound { what: "claim", key: addr.to_string() })?;
        if entitled != amount {
            return Err(CoreError::AmountMismatch { expected: entitled, got: amount });
        }

        let leaf = leaf_hash(addr, amount);
        if !verify_proof(leaf, proof, record.root) {
            return Err(CoreError::InvalidProof);
        }

        record.claimed.insert((addr.to_string(), amount));
        Ok(())
    }

    pub fn get_claim_status(&self, epoch: u64, addr: &str) -> ClaimStatus {
        let Some(record) = self.epochs.get(&epoch) else {
            return ClaimStatus::default();
        };
        let entitled_amount = record.rewards.get(addr).copied();
        let already_claimed = entitled_amount
            .map(|amt| record.claimed.contains(&(addr.to_string(), amt)))
            .unwrap_or(false);
        ClaimStatus { epoch_exists: true, entitled_amount, already_claimed }
    }

    pub fn root(&self, epoch: u64) -> Option<[u8; 32]> {
        self.epochs.get(&epoch).map(|r| r.root)
    }
}
