// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TOKENOMICS INTEGRATION — per-epoch pipeline
//
// Wires emission, recycling, distribution, burn, supply, and the claim
// manager into the single ordered state transition each epoch must run.
// Pure over its inputs modulo the controlled mutations on the injected
// pool/burn/supply/claim-store; given the same inputs on every node it
// produces the same `claim_root` byte-for-byte.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::burn::BurnManager;
use crate::distributor::{Delegation, RewardDistributor, SubnetOwnerStake};
use crate::emission::{calculate_utility, EmissionController, UtilityWeights};
use crate::error::{CoreError, CoreResult};
use crate::merkle::ClaimManager;
use crate::recycling_pool::RecyclingPool;

#[derive(Debug, Clone)]
pub struct EpochInputs {
    pub epoch: u64,
    pub miner_scores: BTreeMap<String, u64>,
    pub validator_stakes: BTreeMap<String, u128>,
    pub delegations: Vec<Delegation>,
    pub subnet_owners: Vec<SubnetOwnerStake>,
    pub quality_bps: u64,
    pub tasks: u64,
    pub difficulty_bps: u64,
    pub participation_bps: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochTokenomics {
    pub epoch: u64,
    pub utility_bps: u64,
    pub emission_amount: u128,
    pub from_pool: u128,
    pub from_mint: u128,
    pub burned_amount: u128,
    pub miner_rewards: BTreeMap<String, u128>,
    pub validator_rewards: BTreeMap<String, u128>,
    pub dao_allocation: u128,
    #[serde(with = "hex_32")]
    pub claim_root: [u8; 32],
}

mod hex_32 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(val: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        hex::encode(val).serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(d)?;
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}

pub struct TokenomicsIntegration {
    pub emission_controller: EmissionController,
    pub recycling_pool: RecyclingPool,
    pub burn_manager: BurnManager,
    pub distributor: RewardDistributor,
    pub claim_manager: ClaimManager,
    pub utility_weights: UtilityWeights,
    pub max_expected_tasks: u64,
    pub unmet_quota_threshold_bps: u64,
}

impl TokenomicsIntegration {
    pub fn run_epoch(&mut self, inputs: EpochInputs) -> CoreResult<EpochTokenomics> {
        for addr in inputs.miner_scores.keys() {
            if inputs.validator_stakes.contains_key(addr) {
                return Err(CoreError::InvalidInput {
                    field: "validator_rewards",
                    reason: format!("address {addr} collides with a miner reward"),
                });
            }
        }

        let utility_bps = calculate_utility(
            self.utility_weights,
            inputs.tasks,
            self.max_expected_tasks,
            inputs.difficulty_bps,
            inputs.participation_bps,
        )?;

        let emission_amount = self
            .emission_controller
            .calculate_epoch_emission(inputs.epoch, utility_bps)?;

        let distribution = self.distributor.distribute_epoch_rewards(
            emission_amount,
            &inputs.miner_scores,
            &inputs.validator_stakes,
            &inputs.delegations,
            &inputs.subnet_owners,
            &mut self.recycling_pool,
        )?;

        let burned_amount = self.burn_manager.burn_unmet_quota(
            emission_amount,
            inputs.quality_bps,
            self.unmet_quota_threshold_bps,
        )?;

        if distribution.from_mint > 0 {
            self.emission_controller.update_supply(distribution.from_mint)?;
        }

        let mut all_rewards = BTreeMap::new();
        for (addr, amount) in &distribution.miner_rewards {
            all_rewards.insert(addr.clone(), *amount);
        }
        for (addr, amount) in &distribution.validator_rewards {
            all_rewards.insert(addr.clone(), *amount);
        }

        let claim_root = self.claim_manager.create_claim_tree(inputs.epoch, all_rewards);

        Ok(EpochTokenomics {
            epoch: inputs.epoch,
            utility_bps,
            emission_amount,
            from_pool: distribution.from_pool,
            from_mint: distribution.from_mint,
            burned_amount,
            miner_rewards: distribution.miner_rewards,
            validator_rewards: distribution.validator_rewards,
            dao_allocation: distribution.dao_allocation,
            claim_root,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distributor::DistributionConfig;

    fn pipeline() -> TokenomicsIntegration {
        TokenomicsIntegration {
            emission_controller: EmissionController::new(21_000_000, 0, 210_000, 1000),
            recycling_pool: RecyclingPool::new(),
            burn_manager: BurnManager::new(),
            distributor: RewardDistributor::new(DistributionConfig::default()).unwrap(),
            claim_manager: ClaimManager::new(),
            utility_weights: UtilityWeights::new(5000, 3000, 2000).unwrap(),
            max_expected_tasks: 10_000,
            unmet_quota_threshold_bps: 5000,
        }
    }

    fn s1_inputs() -> EpochInputs {
        EpochInputs {
            epoch: 0,
            miner_scores: BTreeMap::from([
                ("m1".to_string(), 8000u64),
                ("m2".to_string(), 6000),
                ("m3".to_string(), 4000),
            ]),
            validator_stakes: BTreeMap::from([
                ("v1".to_string(), 100_000u128),
                ("v2".to_string(), 50_000),
            ]),
            delegations: Vec::new(),
            subnet_owners: Vec::new(),
            quality_bps: 9000,
            tasks: 5000,
            difficulty_bps: 8000,
            participation_bps: 10_000,
        }
    }

    #[test]
    fn s1_basic_epoch() {
        let mut pipeline = pipeline();
        let result = pipeline.run_epoch(s1_inputs()).unwrap();

        assert_eq!(result.utility_bps, 6900);
        assert_eq!(result.emission_amount, 690);
        assert_eq!(result.from_mint, 690);
        assert_eq!(result.from_pool, 0);
        assert_eq!(result.burned_amount, 0);
        assert_eq!(pipeline.emission_controller.current_supply, 690);
    }

    #[test]
    fn s2_halving() {
        let mut pipeline = pipeline();
        let mut inputs = s1_inputs();
        inputs.epoch = 210_000;
        let result = pipeline.run_epoch(inputs).unwrap();
        assert_eq!(result.emission_amount, 345);
    }

    #[test]
    fn s3_pool_priority() {
        use crate::recycling_pool::PoolSource;
        let mut pipeline = pipeline();
        pipeline.recycling_pool.credit(PoolSource::RegistrationFees, 5000);
        let result = pipeline.run_epoch(s1_inputs()).unwrap();
        assert_eq!(result.from_pool, 690);
        assert_eq!(result.from_mint, 0);
        assert_eq!(pipeline.recycling_pool.pool_balance, 4310);
    }

    #[test]
    fn s4_burn_on_low_quality() {
        let mut pipeline = pipeline();
        let mut inputs = s1_inputs();
        inputs.quality_bps = 3000;
        let result = pipeline.run_epoch(inputs).unwrap();
        assert_eq!(result.burned_amount, 138);
    }

    #[test]
    fn miner_validator_address_collision_is_rejected() {
        let mut pipeline = pipeline();
        let mut inputs = s1_inputs();
        inputs.validator_stakes.insert("m1".to_string(), 100_000);
        assert!(pipeline.run_epoch(inputs).is_err());

        // rejection must leave every mutated subsystem untouched
        assert_eq!(pipeline.recycling_pool.pool_balance, 0);
        assert_eq!(pipeline.recycling_pool.total_allocated, 0);
        assert_eq!(pipeline.burn_manager.total_burned, 0);
        assert_eq!(pipeline.emission_controller.current_supply, 0);
    }

    #[test]
    fn claim_root_is_deterministic_given_same_inputs() {
        let mut a = pipeline();
        let mut b = pipeline();
        let root_a = a.run_epoch(s1_inputs()).unwrap().claim_root;
        let root_b = b.run_epoch(s1_inputs()).unwrap().claim_root;
        assert_eq!(root_a, root_b);
    }
}
