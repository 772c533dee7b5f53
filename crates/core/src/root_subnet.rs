// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ROOT SUBNET (WEIGHT VOTING)
//
// Stake-weighted voting by the top root validators allocates each
// subnet's emission share. `distribute` uses `distribute_by_scores` to
// preserve the full emission total, replacing the Python original's
// lossy `int(total_emission * share)` truncation.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use crate::bps::{distribute_by_scores, BPS_DENOMINATOR};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone)]
pub struct SubnetInfo {
    pub netuid: u64,
    pub name: String,
    pub owner: String,
    pub registered_at: u64,
}

#[derive(Debug, Clone)]
pub struct RootSubnetConfig {
    pub max_subnets: u64,
    pub max_root_validators: usize,
    pub min_stake_for_root: u128,
}

impl Default for RootSubnetConfig {
    fn default() -> Self {
        RootSubnetConfig { max_subnets: 4096, max_root_validators: 64, min_stake_for_root: 0 }
    }
}

#[derive(Debug, Default)]
pub struct RootSubnet {
    pub config: RootSubnetConfig,
    subnets: BTreeMap<u64, SubnetInfo>,
    root_validators: Vec<(String, u128)>,
    weight_matrix: BTreeMap<String, BTreeMap<u64, u64>>,
    emission_shares: BTreeMap<u64, u64>,
    next_netuid: u64,
}

impl RootSubnet {
    pub fn new(config: RootSubnetConfig) -> Self {
        RootSubnet { config, ..Default::default() }
    }

    pub fn register_subnet(&mut self, name: &str, owner: &str, block: u64) -> CoreResult<u64> {
        if self.subnets.len() as u64 >= self.config.max_subnets {
            return Err(CoreError::InvalidInput {
                field: "max_subnets",
                reason: "subnet cap reached".to_string(),
            });
        }
        let netuid = self.next_netuid;
        self.next_netuid += 1;
        self.subnets.insert(
            netuid,
            SubnetInfo { netuid, name: name.to_string(), owner: owner.to_string(), registered_at: block },
        );
        self.emission_shares.insert(netuid, 0);
        Ok(netuid)
    }

    pub fn deregister_subnet(&mut self, netuid: u64, caller: &str) -> CoreResult<()> {
        let subnet = self
            .subnets
            .get(&netuid)
            .ok_or(CoreError::NotFound { what: "subnet", key: netuid.to_string() })?;
        if subnet.owner != caller {
            return Err(CoreError::InvalidInput {
                field: "caller",
                reason: "caller is not the subnet owner".to_string(),
            });
        }
        self.subnets.remove(&netuid);
        self.emission_shares.remove(&netuid);
        for row in self.weight_matrix.values_mut() {
            row.remove(&netuid);
        }
        self.renormalize_shares();
        Ok(())
    }

    /// Replaces the root validator set with the top `max_root_validators`
    /// entries from `stakers_sorted_desc` whose stake meets the floor.
    pub fn update_root_validators(&mut self, stakers_sorted_desc: &[(String, u128)]) {
        self.root_validators = stakers_sorted_desc
            .iter()
            .filter(|(_, stake)| *stake >= self.config.min_stake_for_root)
            .take(self.config.max_root_validators)
            .cloned()
            .collect();
    }

    fn is_root_validator(&self, addr: &str) -> bool {
        self.root_validators.iter().any(|(a, _)| a == addr)
    }

    pub fn set_weights(&mut self, validator: &str, weights: &BTreeMap<u64, u64>) -> CoreResult<()> {
        if !self.is_root_validator(validator) {
            return Err(CoreError::InvalidInput {
                field: "validator",
                reason: "caller is not a root validator".to_string(),
            });
        }
        let sum: u64 = weights.values().sum();
        if sum > BPS_DENOMINATOR {
            return Err(CoreError::InvalidInput {
                field: "weights",
                reason: format!("weights sum to {sum} > {BPS_DENOMINATOR}"),
            });
        }
        for netuid in weights.keys() {
            if !self.subnets.contains_key(netuid) {
                return Err(CoreError::NotFound { what: "subnet", key: netuid.to_string() });
            }
        }

        self.weight_matrix.insert(validator.to_string(), weights.clone());
        self.recompute_emission_shares();
        Ok(())
    }

    fn recompute_emission_shares(&mut self) {
        let stake_by_validator: BTreeMap<String, u128> =
            self.root_validators.iter().cloned().collect();
        let total_stake: u128 = stake_by_validator.values().sum();

        let mut raw: BTreeMap<u64, u128> =
            self.subnets.keys().map(|&n| (n, 0u128)).collect();

        if total_stake > 0 {
            for (validator, weights) in &self.weight_matrix {
                let stake = stake_by_validator.get(validator).copied().unwrap_or(0);
                for (&netuid, &weight_bps) in weights {
                    if let Some(entry) = raw.get_mut(&netuid) {
                        *entry += stake * weight_bps as u128;
                    }
                }
            }
        }

        let total_raw: u128 = raw.values().sum();
        if total_raw == 0 {
            for v in self.emission_shares.values_mut() {
                *v = 0;
            }
            return;
        }

        let netuids: Vec<u64> = raw.keys().copied().collect();
        let raw_scaled: Vec<u64> = netuids
            .iter()
            .map(|n| (raw[n] * BPS_DENOMINATOR as u128 / total_raw) as u64)
            .collect();
        let normalized = distribute_by_scores(BPS_DENOMINATOR as u128, &raw_scaled)
            .expect("bps-denominator total always valid");

        for (netuid, share) in netuids.into_iter().zip(normalized) {
            self.emission_shares.insert(netuid, share as u64);
        }
    }

    fn renormalize_shares(&mut self) {
        self.recompute_emission_shares();
    }

    /// Splits `total_emission` across subnets by `emission_shares`,
    /// preserving the full total via `distribute_by_scores`.
    pub fn distribute(&self, total_emission: u128) -> Vec<(u64, u64, u128)> {
        if self.emission_shares.is_empty() {
            return Vec::new();
        }
        let netuids: Vec<u64> = self.emission_shares.keys().copied().collect();
        let shares: Vec<u64> = netuids.iter().map(|n| self.emission_shares[n]).collect();
        let amounts = distribute_by_scores(total_emission, &shares)
            .expect("bps shares always valid");

        netuids
            .into_iter()
            .zip(shares)
            .zip(amounts)
            .map(|((netuid, share), amount)| (netuid, share, amount))
            .collect()
    }

    pub fn emission_share(&self, netuid: u64) -> Option<u64> {
        self.emission_shares.get(&netuid).copied()
    }
}
