// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// REWARD DISTRIBUTOR
//
// Splits an epoch's emission across miners (performance-weighted),
// validators (stake-weighted), delegators (stake + lock-bonus weighted),
// subnet owners, and the DAO. Touches no supply and performs no I/O —
// purely a function of its inputs, over sorted address keys.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bps::{distribute_by_scores, proportional_share, BPS_DENOMINATOR};
use crate::error::{CoreError, CoreResult};
use crate::recycling_pool::RecyclingPool;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub miner_share_bps: u64,
    pub validator_share_bps: u64,
    pub delegator_share_bps: u64,
    pub subnet_owner_share_bps: u64,
    pub dao_share_bps: u64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        DistributionConfig {
            miner_share_bps: 3500,
            validator_share_bps: 3000,
            delegator_share_bps: 1200,
            subnet_owner_share_bps: 1000,
            dao_share_bps: 1300,
        }
    }
}

impl DistributionConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let sum = self.miner_share_bps
            + self.validator_share_bps
            + self.delegator_share_bps
            + self.subnet_owner_share_bps
            + self.dao_share_bps;
        if sum != BPS_DENOMINATOR {
            return Err(CoreError::InvalidInput {
                field: "distribution_config",
                reason: format!("shares sum to {sum}, expected {BPS_DENOMINATOR}"),
            });
        }
        Ok(())
    }
}

/// Additive BPS bonus applied to a delegator's stake before weighting,
/// capped so the weighted stake never exceeds 2x the raw stake.
pub fn lock_bonus_bps(lock_days: u32) -> u64 {
    match lock_days {
        d if d >= 365 => 10_000,
        d if d >= 180 => 5_000,
        d if d >= 90 => 2_500,
        d if d >= 30 => 1_000,
        _ => 0,
    }
}

#[derive(Debug, Clone)]
pub struct Delegation {
    pub address: String,
    pub stake: u128,
    pub lock_days: u32,
}

#[derive(Debug, Clone)]
pub struct SubnetOwnerStake {
    pub address: String,
    pub emission_weight_bps: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DistributionResult {
    pub from_pool: u128,
    pub from_mint: u128,
    pub miner_rewards: BTreeMap<String, u128>,
    pub validator_rewards: BTreeMap<String, u128>,
    pub delegator_rewards: BTreeMap<String, u128>,
    pub subnet_owner_rewards: BTreeMap<String, u128>,
    pub dao_allocation: u128,
}

#[derive(Debug, Default)]
pub struct RewardDistributor {
    pub config: DistributionConfig,
}

impl RewardDistributor {
    pub fn new(config: DistributionConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(RewardDistributor { config })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn distribute_epoch_rewards(
        &self,
        total_emission: u128,
        miner_scores: &BTreeMap<String, u64>,
        validator_stakes: &BTreeMap<String, u128>,
        delegations: &[Delegation],
        subnet_owners: &[SubnetOwnerStake],
        pool: &mut RecyclingPool,
    ) -> CoreResult<DistributionResult> {
        for &score in miner_scores.values() {
            if score > BPS_DENOMINATOR {
                return Err(CoreError::InvalidInput {
                    field: "miner_score",
                    reason: format!("{score} > {BPS_DENOMINATOR}"),
                });
            }
        }

        let (from_pool, from_mint) = pool.allocate(total_emission);

        let miner_pool = proportional_share(total_emission, self.config.miner_share_bps)?;
        let validator_pool = proportional_share(total_emission, self.config.validator_share_bps)?;
        let delegator_pool = proportional_share(total_emission, self.config.delegator_share_bps)?;
        let subnet_pool = proportional_share(total_emission, self.config.subnet_owner_share_bps)?;

        let miner_rewards = scored_rewards(miner_pool, miner_scores);
        let validator_scores: BTreeMap<String, u64> = validator_stakes
            .iter()
            .map(|(addr, stake)| (addr.clone(), (*stake).min(u64::MAX as u128) as u64))
            .collect();
        let validator_rewards = scored_rewards(validator_pool, &validator_scores);

        let mut weighted_stake: BTreeMap<String, u64> = BTreeMap::new();
        for d in delegations {
            let bonus = proportional_share(d.stake, lock_bonus_bps(d.lock_days))?;
            let weighted = (d.stake + bonus).min(d.stake * 2);
            *weighted_stake.entry(d.address.clone()).or_insert(0) +=
                weighted.min(u64::MAX as u128) as u64;
        }
        let delegator_rewards = scored_rewards(delegator_pool, &weighted_stake);

        let mut subnet_weights: BTreeMap<String, u64> = BTreeMap::new();
        for s in subnet_owners {
            *subnet_weights.entry(s.address.clone()).or_insert(0) += s.emission_weight_bps;
        }
        let subnet_owner_rewards = scored_rewards(subnet_pool, &subnet_weights);

        let allocated: u128 = miner_rewards.values().sum::<u128>()
            + validator_rewards.values().sum::<u128>()
            + delegator_rewards.values().sum::<u128>()
            + subnet_owner_rewards.values().sum::<u128>();
        let dao_allocation = total_emission.saturating_sub(allocated);

        Ok(DistributionResult {
            from_pool,
            from_mint,
            miner_rewards,
            validator_rewards,
            delegator_rewards,
            subnet_owner_rewards,
            dao_allocation,
        })
    }
}

/// `distribute_by_scores` over a sorted `(addr, score)` map, keyed back
/// into a sorted result map. Empty input yields an empty map.
fn scored_rewards(pool: u128, scores: &BTreeMap<String, u64>) -> BTreeMap<String, u128> {
    if scores.is_empty() || pool == 0 {
        return BTreeMap::new();
    }
    let addrs: Vec<&String> = scores.keys().collect();
    let values: Vec<u64> = addrs.iter().map(|a| scores[*a]).collect();
    let shares = distribute_by_scores(pool, &values).expect("bps values always valid here");
    addrs.into_iter().cloned().zip(shares).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recycling_pool::PoolSource;

    #[test]
    fn s1_basic_epoch_miner_split() {
        let distributor = RewardDistributor::new(DistributionConfig::default()).unwrap();
        let mut pool = RecyclingPool::new();
        let miner_scores = BTreeMap::from([
            ("m1".to_string(), 8000u64),
            ("m2".to_string(), 6000),
            ("m3".to_string(), 4000),
        ]);
        let validator_stakes = BTreeMap::from([
            ("v1".to_string(), 100_000u128),
            ("v2".to_string(), 50_000),
        ]);

        let result = distributor
            .distribute_epoch_rewards(690, &miner_scores, &validator_stakes, &[], &[], &mut pool)
            .unwrap();

        assert_eq!(result.from_mint, 690);
        assert_eq!(result.from_pool, 0);
        let miner_total: u128 = result.miner_rewards.values().sum();
        assert_eq!(miner_total, 241); // 690 * 3500 / 10000
        assert_eq!(result.miner_rewards["m1"], 107);
        assert_eq!(result.miner_rewards["m2"], 80);
        assert_eq!(result.miner_rewards["m3"], 54);
    }

    #[test]
    fn pool_is_drawn_before_mint() {
        let distributor = RewardDistributor::new(DistributionConfig::default()).unwrap();
        let mut pool = RecyclingPool::new();
        pool.credit(PoolSource::RegistrationFees, 5000);

        let result = distributor
            .distribute_epoch_rewards(690, &BTreeMap::new(), &BTreeMap::new(), &[], &[], &mut pool)
            .unwrap();

        assert_eq!(result.from_pool, 690);
        assert_eq!(result.from_mint, 0);
        assert_eq!(pool.pool_balance, 4310);
    }

    #[test]
    fn dao_absorbs_remainder() {
        let distributor = RewardDistributor::new(DistributionConfig::default()).unwrap();
        let mut pool = RecyclingPool::new();
        let miner_scores = BTreeMap::from([("m1".to_string(), 1u64)]);

        let result = distributor
            .distribute_epoch_rewards(1, &miner_scores, &BTreeMap::new(), &[], &[], &mut pool)
            .unwrap();

        let total = result.miner_rewards.values().sum::<u128>()
            + result.validator_rewards.values().sum::<u128>()
            + result.delegator_rewards.values().sum::<u128>()
            + result.subnet_owner_rewards.values().sum::<u128>()
            + result.dao_allocation;
        assert_eq!(total, 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = DistributionConfig { dao_share_bps: 9999, ..DistributionConfig::default() };
        assert!(RewardDistributor::new(bad).is_err());
    }

    #[test]
    fn out_of_range_miner_score_rejected() {
        let distributor = RewardDistributor::new(DistributionConfig::default()).unwrap();
        let mut pool = RecyclingPool::new();
        let miner_scores = BTreeMap::from([("m1".to_string(), 20_000u64)]);
        assert!(distributor
            .distribute_epoch_rewards(100, &miner_scores, &BTreeMap::new(), &[], &[], &mut pool)
            .is_err());
    }

    #[test]
    fn delegator_lock_bonus_capped_at_double() {
        let distributor = RewardDistributor::new(DistributionConfig::default()).unwrap();
        let mut pool = RecyclingPool::new();
        let delegations = vec![Delegation {
            address: "d1".to_string(),
            stake: 1000,
            lock_days: 400,
        }];
        let result = distributor
            .distribute_epoch_rewards(1000, &BTreeMap::new(), &BTreeMap::new(), &delegations, &[], &mut pool)
            .unwrap();
        assert!(result.delegator_rewards.contains_key("d1"));
    }
}
