// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SCORING MANAGER
//
// Converts raw task/block/attestation events into deterministic integer
// performance scores. All quality and score fields live in BPS (0..10 000) —
// the single-unit fix for the Python original's dual `/1000` vs `0..1`
// quality scaling.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bps::BPS_DENOMINATOR;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub completion_weight_bps: u64,
    pub latency_weight_bps: u64,
    pub quality_weight_bps: u64,
    pub block_weight_bps: u64,
    pub attestation_weight_bps: u64,
    pub uptime_weight_bps: u64,
    pub score_decay_bps: u64,
    pub min_tasks_for_score: u64,
    pub latency_target_ms: u64,
    pub latency_penalty_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            completion_weight_bps: 4000,
            latency_weight_bps: 3000,
            quality_weight_bps: 3000,
            block_weight_bps: 5000,
            attestation_weight_bps: 3000,
            uptime_weight_bps: 2000,
            score_decay_bps: 9900,
            min_tasks_for_score: 10,
            latency_target_ms: 1000,
            latency_penalty_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinerMetrics {
    pub address: String,
    pub tasks_completed: u64,
    pub tasks_failed: u64,
    pub total_execution_time_ms: u64,
    pub average_quality_bps: u64,
    pub performance_score_bps: u64,
    pub last_active_unix: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorMetrics {
    pub address: String,
    pub blocks_produced: u64,
    pub blocks_missed: u64,
    pub attestations_made: u64,
    pub total_attestation_delay_ms: u64,
    pub slashing_events: u64,
    pub performance_score_bps: u64,
    pub last_active_unix: u64,
}

#[derive(Debug, Clone)]
pub enum ScoringEvent {
    TaskCompleted { miner: String, exec_ms: u64, quality_bps: u64, at_unix: u64 },
    TaskFailed { miner: String, at_unix: u64 },
    BlockProduced { validator: String, at_unix: u64 },
    BlockMissed { validator: String, at_unix: u64 },
    AttestationMade { validator: String, delay_ms: u64, at_unix: u64 },
    ValidatorSlashed { validator: String, at_unix: u64 },
}

#[derive(Debug, Default)]
pub struct ScoringManager {
    config: ScoringConfig,
    miners: BTreeMap<String, MinerMetrics>,
    validators: BTreeMap<String, ValidatorMetrics>,
}

impl ScoringManager {
    pub fn new(config: ScoringConfig) -> Self {
        ScoringManager { config, miners: BTreeMap::new(), validators: BTreeMap::new() }
    }

    pub fn process_event(&mut self, event: ScoringEvent) {
        match event {
            ScoringEvent::TaskCompleted { miner, exec_ms, quality_bps, at_unix } => {
                let m = self.miners.entry(miner.clone()).or_insert_with(|| MinerMetrics {
                    address: miner,
                    ..Default::default()
                });
                let n = m.tasks_completed + 1;
                // Running mean, multiply before divide: deterministic integer math.
                m.average_quality_bps =
                    (m.average_quality_bps * (n - 1) + quality_bps) / n;
                m.tasks_completed = n;
                m.total_execution_time_ms += exec_ms;
                m.last_active_unix = at_unix;
                self.recompute_miner_score(&m.address.clone());
            }
            ScoringEvent::TaskFailed { miner, at_unix } => {
                let m = self.miners.entry(miner.clone()).or_insert_with(|| MinerMetrics {
                    address: miner,
                    ..Default::default()
                });
                m.tasks_failed += 1;
                m.last_active_unix = at_unix;
                self.recompute_miner_score(&m.address.clone());
            }
            ScoringEvent::BlockProduced { validator, at_unix } => {
                let v = self.validators.entry(validator.clone()).or_insert_with(|| {
                    ValidatorMetrics { address: validator, ..Default::default() }
                });
                v.blocks_produced += 1;
                v.last_active_unix = at_unix;
                self.recompute_validator_score(&v.address.clone());
            }
            ScoringEvent::BlockMissed { validator, at_unix } => {
                let v = self.validators.entry(validator.clone()).or_insert_with(|| {
                    ValidatorMetrics { address: validator, ..Default::default() }
                });
                v.blocks_missed += 1;
                v.last_active_unix = at_unix;
                self.recompute_validator_score(&v.address.clone());
            }
            ScoringEvent::AttestationMade { validator, delay_ms, at_unix } => {
                let v = self.validators.entry(validator.clone()).or_insert_with(|| {
                    ValidatorMetrics { address: validator, ..Default::default() }
                });
                v.attestations_made += 1;
                v.total_attestation_delay_ms += delay_ms;
                v.last_active_unix = at_unix;
                self.recompute_validator_score(&v.address.clone());
            }
            ScoringEvent::ValidatorSlashed { validator, at_unix } => {
                let v = self.validators.entry(validator.clone()).or_insert_with(|| {
                    ValidatorMetrics { address: validator, ..Default::default() }
                });
                v.slashing_events += 1;
                v.last_active_unix = at_unix;
                self.recompute_validator_score(&v.address.clone());
            }
        }
    }

    fn recompute_miner_score(&mut self, addr: &str) {
        let c = self.config;
        let m = self.miners.get_mut(addr).expect("entry just inserted");
        let total = m.tasks_completed + m.tasks_failed;
        if total < c.min_tasks_for_score {
            m.performance_score_bps = 0;
            return;
        }
        let completion_bps = m.tasks_completed * BPS_DENOMINATOR / total;
        let avg_exec_ms = if m.tasks_completed > 0 {
            m.total_execution_time_ms / m.tasks_completed
        } else {
            0
        };
        let latency_bps = if avg_exec_ms <= c.latency_target_ms {
            BPS_DENOMINATOR
        } else {
            let over = avg_exec_ms - c.latency_target_ms;
            BPS_DENOMINATOR.saturating_sub(over * BPS_DENOMINATOR / c.latency_penalty_ms.max(1))
        };
        let quality_bps = m.average_quality_bps;

        m.performance_score_bps = (completion_bps * c.completion_weight_bps
            + latency_bps * c.latency_weight_bps
            + quality_bps * c.quality_weight_bps)
            / BPS_DENOMINATOR;
    }

    fn recompute_validator_score(&mut self, addr: &str) {
        let c = self.config;
        let v = self.validators.get_mut(addr).expect("entry just inserted");
        let total = v.blocks_produced + v.blocks_missed;
        let block_bps = if total > 0 { v.blocks_produced * BPS_DENOMINATOR / total } else { 0 };

        let attestation_bps = if v.attestations_made == 0 {
            0
        } else {
            let avg_delay = v.total_attestation_delay_ms / v.attestations_made;
            BPS_DENOMINATOR.saturating_sub(avg_delay.min(BPS_DENOMINATOR))
        };

        // Each slashing event knocks 1000 bps (10%) off uptime, floored at zero.
        let uptime_bps = BPS_DENOMINATOR.saturating_sub(v.slashing_events.saturating_mul(1_000));

        v.performance_score_bps = (block_bps * c.block_weight_bps
            + attestation_bps * c.attestation_weight_bps
            + uptime_bps * c.uptime_weight_bps)
            / BPS_DENOMINATOR;
    }

    /// Multiplies every tracked performance score by `score_decay_bps / 10 000`.
    pub fn apply_decay(&mut self) {
        let decay = self.config.score_decay_bps;
        for m in self.miners.values_mut() {
            m.performance_score_bps = m.performance_score_bps * decay / BPS_DENOMINATOR;
        }
        for v in self.validators.values_mut() {
            v.performance_score_bps = v.performance_score_bps * decay / BPS_DENOMINATOR;
        }
    }

    pub fn get_miner_score(&self, addr: &str) -> Option<u64> {
        self.miners.get(addr).map(|m| m.performance_score_bps)
    }

    pub fn get_validator_score(&self, addr: &str) -> Option<u64> {
        self.validators.get(addr).map(|v| v.performance_score_bps)
    }

    pub fn get_all_miner_scores(&self) -> BTreeMap<String, u64> {
        self.miners.iter().map(|(a, m)| (a.clone(), m.performance_score_bps)).collect()
    }

    pub fn get_all_validator_scores(&self) -> BTreeMap<String, u64> {
        self.validators.iter().map(|(a, v)| (a.clone(), v.performance_score_bps)).collect()
    }

    pub fn miner_metrics(&self, addr: &str) -> Option<&MinerMetrics> {
        self.miners.get(addr)
    }

    pub fn validator_metrics(&self, addr: &str) -> Option<&ValidatorMetrics> {
        self.validators.get(addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager_with_min_tasks(min: u64) -> ScoringManager {
        let mut cfg = ScoringConfig::default();
        cfg.min_tasks_for_score = min;
        ScoringManager::new(cfg)
    }

    #[test]
    fn miner_score_zero_before_min_tasks() {
        let mut mgr = manager_with_min_tasks(10);
        for _ in 0..5 {
            mgr.process_event(ScoringEvent::TaskCompleted {
                miner: "m1".into(),
                exec_ms: 500,
                quality_bps: 9000,
                at_unix: 1,
            });
        }
        assert_eq!(mgr.get_miner_score("m1"), Some(0));
    }

    #[test]
    fn miner_score_nonzero_after_min_tasks() {
        let mut mgr = manager_with_min_tasks(1);
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "m1".into(),
            exec_ms: 500,
            quality_bps: 9000,
            at_unix: 1,
        });
        assert!(mgr.get_miner_score("m1").unwrap() > 0);
    }

    #[test]
    fn running_mean_quality_is_deterministic() {
        let mut mgr = manager_with_min_tasks(1);
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "m1".into(),
            exec_ms: 1,
            quality_bps: 10_000,
            at_unix: 1,
        });
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "m1".into(),
            exec_ms: 1,
            quality_bps: 0,
            at_unix: 2,
        });
        assert_eq!(mgr.miner_metrics("m1").unwrap().average_quality_bps, 5000);
    }

    #[test]
    fn validator_score_blends_block_and_attestation() {
        let mut mgr = ScoringManager::new(ScoringConfig::default());
        mgr.process_event(ScoringEvent::BlockProduced { validator: "v1".into(), at_unix: 1 });
        mgr.process_event(ScoringEvent::AttestationMade {
            validator: "v1".into(),
            delay_ms: 100,
            at_unix: 2,
        });
        assert!(mgr.get_validator_score("v1").unwrap() > 0);
    }

    #[test]
    fn slashing_events_reduce_uptime_component() {
        let mut mgr = ScoringManager::new(ScoringConfig::default());
        mgr.process_event(ScoringEvent::BlockProduced { validator: "v1".into(), at_unix: 1 });
        let before = mgr.get_validator_score("v1").unwrap();

        mgr.process_event(ScoringEvent::ValidatorSlashed { validator: "v1".into(), at_unix: 2 });
        let after = mgr.get_validator_score("v1").unwrap();
        assert!(after < before);
        assert_eq!(mgr.validator_metrics("v1").unwrap().slashing_events, 1);
    }

    #[test]
    fn ten_slashing_events_zero_out_uptime() {
        let mut mgr = ScoringManager::new(ScoringConfig::default());
        for i in 0..10 {
            mgr.process_event(ScoringEvent::ValidatorSlashed {
                validator: "v1".into(),
                at_unix: i,
            });
        }
        assert_eq!(mgr.validator_metrics("v1").unwrap().slashing_events, 10);
        // block_bps and attestation_bps are both 0 with no blocks/attestations,
        // so a fully zeroed uptime term leaves the whole score at zero.
        assert_eq!(mgr.get_validator_score("v1"), Some(0));
    }

    #[test]
    fn decay_shrinks_score() {
        let mut mgr = manager_with_min_tasks(1);
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "m1".into(),
            exec_ms: 1,
            quality_bps: 10_000,
            at_unix: 1,
        });
        let before = mgr.get_miner_score("m1").unwrap();
        mgr.apply_decay();
        let after = mgr.get_miner_score("m1").unwrap();
        assert!(after <= before);
    }

    #[test]
    fn all_scores_are_sorted_maps() {
        let mut mgr = manager_with_min_tasks(1);
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "b".into(),
            exec_ms: 1,
            quality_bps: 1,
            at_unix: 1,
        });
        mgr.process_event(ScoringEvent::TaskCompleted {
            miner: "a".into(),
            exec_ms: 1,
            quality_bps: 1,
            at_unix: 1,
        });
        let keys: Vec<String> = mgr.get_all_miner_scores().into_keys().collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
