// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// NODE TIER REGISTRY
//
// Maps stake to one of four tiers by fixed threshold, and tracks per-node
// production bookkeeping. Aggregate counters (`total_nodes`, `total_stake`,
// per-tier counts) are maintained incrementally rather than recomputed on
// read, the same cached-counter discipline `los_node`'s RpcServer applies
// to `cached_block_number`/`cached_chain_id`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// One token's smallest unit (18 decimals), matching the wire amount type.
pub const ONE_TOKEN: u128 = 1_000_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeTier {
    LightNode = 0,
    FullNode = 1,
    Validator = 2,
    SuperValidator = 3,
}

impl NodeTier {
    /// Fixed thresholds, in whole tokens: {0, 10, 100, 1000}.
    pub fn from_stake(stake: u128) -> NodeTier {
        if stake >= 1000 * ONE_TOKEN {
            NodeTier::SuperValidator
        } else if stake >= 100 * ONE_TOKEN {
            NodeTier::Validator
        } else if stake >= 10 * ONE_TOKEN {
            NodeTier::FullNode
        } else {
            NodeTier::LightNode
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeInfo {
    pub address: String,
    pub stake: u128,
    pub tier: NodeTier,
    pub registered_at: u64,
    pub blocks_produced: u64,
    pub last_block: Option<u64>,
}

#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: BTreeMap<String, NodeInfo>,
    total_stake: u128,
    count_by_tier: [u64; 4],
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, addr: &str, stake: u128, block: u64) -> CoreResult<()> {
        let addr = synapse_crypto::normalize_address(addr)
            .ok_or_else(|| CoreError::InvalidInput { field: "addr", reason: addr.to_string() })?;
        if self.nodes.contains_key(&addr) {
            return Err(CoreError::AlreadyExists { what: "node", key: addr });
        }
        let tier = NodeTier::from_stake(stake);
        self.nodes.insert(
            addr.clone(),
            NodeInfo {
                address: addr,
                stake,
                tier,
                registered_at: block,
                blocks_produced: 0,
                last_block: None,
            },
        );
        self.total_stake += stake;
        self.count_by_tier[tier as usize] += 1;
        Ok(())
    }

    pub fn unregister(&mut self, addr: &str) -> CoreResult<()> {
        let addr = synapse_crypto::normalize_address(addr)
            .ok_or_else(|| CoreError::InvalidInput { field: "addr", reason: addr.to_string() })?;
        let node = self
            .nodes
            .remove(&addr)
            .ok_or_else(|| CoreError::NotFound { what: "node", key: addr })?;
        self.total_stake -= node.stake;
        self.count_by_tier[node.tier as usize] -= 1;
        Ok(())
    }

    pub fn update_stake(&mut self, addr: &str, new_stake: u128) -> CoreResult<()> {
        let addr = synapse_crypto::normalize_address(addr)
            .ok_or_else(|| CoreError::InvalidInput { field: "addr", reason: addr.to_string() })?;
        let node = self
            .nodes
            .get_mut(&addr)
            .ok_or_else(|| CoreError::NotFound { what: "node", key: addr })?;

        let old_tier = node.tier;
        let new_tier = NodeTier::from_stake(new_stake);

        self.total_stake = self.total_stake - node.stake + new_stake;
        node.stake = new_stake;
        node.tier = new_tier;

        if old_tier != new_tier {
            self.count_by_tier[old_tier as usize] -= 1;
            self.count_by_tier[new_tier as usize] += 1;
        }
        Ok(())
    }

    pub fn record_block_production(&mut self, addr: &str, block: u64) -> CoreResult<()> {
        let addr = synapse_crypto::normalize_address(addr)
            .ok_or_else(|| CoreError::InvalidInput { field: "addr", reason: addr.to_string() })?;
        let node = self
            .nodes
            .get_mut(&addr)
            .ok_or_else(|| CoreError::NotFound { what: "node", key: addr })?;
        node.blocks_produced += 1;
        node.last_block = Some(block);
        Ok(())
    }

    pub fn get(&self, addr: &str) -> Option<&NodeInfo> {
        let addr = synapse_crypto::normalize_address(addr)?;
        self.nodes.get(&addr)
    }

    /// Nodes whose tier is at or above `min_tier`, sorted by address.
    pub fn nodes_at_or_above(&self, min_tier: NodeTier) -> Vec<&NodeInfo> {
        self.nodes.values().filter(|n| n.tier >= min_tier).collect()
    }

    pub fn total_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_stake(&self) -> u128 {
        self.total_stake
    }

    pub fn count_by_tier(&self) -> [u64; 4] {
        self.count_by_tier
    }
}
