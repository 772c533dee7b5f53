// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// EMISSION CONTROLLER
//
// Per-epoch mint amount: halving schedule (bit-shift), utility-scaled,
// clamped to the supply cap. Never mutates supply itself — the caller
// commits via `update_supply` only after a distribution succeeds.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::bps::BPS_DENOMINATOR;
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy)]
pub struct UtilityWeights {
    pub w_task: u64,
    pub w_diff: u64,
    pub w_part: u64,
}

impl UtilityWeights {
    pub fn new(w_task: u64, w_diff: u64, w_part: u64) -> CoreResult<Self> {
        if w_task + w_diff + w_part != BPS_DENOMINATOR {
            return Err(CoreError::InvalidInput {
                field: "utility_weights",
                reason: format!(
                    "{w_task}+{w_diff}+{w_part} != {BPS_DENOMINATOR}"
                ),
            });
        }
        Ok(UtilityWeights { w_task, w_diff, w_part })
    }
}

/// Combines task throughput, difficulty, and participation into a single
/// BPS utility score used to scale the epoch's mint.
pub fn calculate_utility(
    weights: UtilityWeights,
    tasks: u64,
    max_expected_tasks: u64,
    difficulty_bps: u64,
    participation_bps: u64,
) -> CoreResult<u64> {
    if difficulty_bps > BPS_DENOMINATOR {
        return Err(CoreError::InvalidInput {
            field: "difficulty_bps",
            reason: format!("{difficulty_bps} > {BPS_DENOMINATOR}"),
        });
    }
    if participation_bps > BPS_DENOMINATOR {
        return Err(CoreError::InvalidInput {
            field: "participation_bps",
            reason: format!("{participation_bps} > {BPS_DENOMINATOR}"),
        });
    }
    let capped_tasks = tasks.min(max_expected_tasks);
    let task_bps = if max_expected_tasks == 0 {
        0
    } else {
        capped_tasks * BPS_DENOMINATOR / max_expected_tasks
    };

    let utility = (weights.w_task * task_bps
        + weights.w_diff * difficulty_bps
        + weights.w_part * participation_bps)
        / BPS_DENOMINATOR;
    Ok(utility)
}

#[derive(Debug, Clone)]
pub struct EmissionController {
    pub max_supply: u128,
    pub current_supply: u128,
    pub halving_interval: u64,
    pub base_reward: u128,
}

impl EmissionController {
    pub fn new(max_supply: u128, current_supply: u128, halving_interval: u64, base_reward: u128) -> Self {
        EmissionController { max_supply, current_supply, halving_interval, base_reward }
    }

    /// Mint for `epoch` under `utility_bps`, clamped to the remaining supply cap.
    /// Does not mutate `current_supply`; call [`update_supply`](Self::update_supply)
    /// after a successful distribution.
    pub fn calculate_epoch_emission(&self, epoch: u64, utility_bps: u64) -> CoreResult<u128> {
        if utility_bps > BPS_DENOMINATOR {
            return Err(CoreError::InvalidInput {
                field: "utility_bps",
                reason: format!("{utility_bps} > {BPS_DENOMINATOR}"),
            });
        }
        let halvings = epoch / self.halving_interval.max(1);
        let post_halving = if halvings >= 64 { 0 } else { self.base_reward >> halvings };
        let mint = post_halving.saturating_mul(utility_bps as u128) / BPS_DENOMINATOR as u128;

        let remaining = self.max_supply.saturating_sub(self.current_supply);
        Ok(mint.min(remaining))
    }

    pub fn update_supply(&mut self, minted: u128) -> CoreResult<()> {
        let new_supply = self.current_supply + minted;
        if new_supply > self.max_supply {
            return Err(CoreError::InvalidInput {
                field: "minted",
                reason: format!("supply {new_supply} would exceed max_supply {}", self.max_supply),
            });
        }
        self.current_supply = new_supply;
        Ok(())
    }
}
