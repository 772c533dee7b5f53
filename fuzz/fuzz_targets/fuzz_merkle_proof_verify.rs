//! Fuzz target: Merkle claim tree construction and proof verification
//!
//! Builds a claim tree from an arbitrary reward set, then checks that
//! every leaf's own proof verifies and that claiming never panics even
//! on mutated proofs or amounts.
//!
//! Run: cargo +nightly fuzz run fuzz_merkle_proof_verify

#![no_main]
use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use synapse_core::ClaimManager;

#[derive(Arbitrary, Debug)]
struct FuzzClaimInput {
    rewards: Vec<(String, u128)>,
    tamper_index: u8,
    tamper_byte: u8,
}

fuzz_target!(|input: FuzzClaimInput| {
    // Cap the set so a single fuzz case can't build an unbounded tree.
    let rewards: BTreeMap<String, u128> = input.rewards.into_iter().take(32).collect();
    if rewards.is_empty() {
        return;
    }

    let mut mgr = ClaimManager::new();
    mgr.create_claim_tree(0, rewards.clone());

    for (addr, amount) in &rewards {
        let proof = match mgr.get_claim_proof(0, addr) {
            Some(p) => p,
            None => continue,
        };

        // Tamper a byte in one proof element per fuzz case; claim_reward
        // must never panic regardless of outcome.
        let mut mutated = proof.clone();
        if !mutated.is_empty() {
            let idx = input.tamper_index as usize % mutated.len();
            mutated[idx][0] ^= input.tamper_byte;
        }
        let _ = mgr.claim_reward(0, addr, *amount, &mutated);

        // A fresh, untampered proof for the same leaf must always verify.
        let mut mgr2 = ClaimManager::new();
        mgr2.create_claim_tree(0, rewards.clone());
        let fresh_proof = mgr2.get_claim_proof(0, addr).unwrap();
        assert!(mgr2.claim_reward(0, addr, *amount, &fresh_proof).is_ok());
    }
});
