// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RECYCLING POOL
//
// Sources rewards from previously recycled fees before the emission
// controller has to mint anything. No partial refunds: once allocated,
// an amount is permanently counted against `total_allocated`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolSource {
    RegistrationFees,
    SlashingPenalties,
    TaskFees,
    TransactionFees,
}

impl PoolSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoolSource::RegistrationFees => "registration_fees",
            PoolSource::SlashingPenalties => "slashing_penalties",
            PoolSource::TaskFees => "task_fees",
            PoolSource::TransactionFees => "transaction_fees",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "registration_fees" => Ok(PoolSource::RegistrationFees),
            "slashing_penalties" => Ok(PoolSource::SlashingPenalties),
            "task_fees" => Ok(PoolSource::TaskFees),
            "transaction_fees" => Ok(PoolSource::TransactionFees),
            other => Err(CoreError::InvalidInput {
                field: "pool_source",
                reason: format!("unknown source '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecyclingPool {
    pub pool_balance: u128,
    pub total_recycled: u128,
    pub total_allocated: u128,
    sources: BTreeMap<&'static str, u128>,
}

impl RecyclingPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, source: PoolSource, amount: u128) {
        *self.sources.entry(source.as_str()).or_insert(0) += amount;
        self.pool_balance += amount;
        self.total_recycled += amount;
    }

    pub fn source_total(&self, source: PoolSource) -> u128 {
        self.sources.get(source.as_str()).copied().unwrap_or(0)
    }

    /// Returns `(from_pool, from_mint)`. Decrements `pool_balance` by
    /// `from_pool` and commits the allocation immediately — no refund path.
    pub fn allocate(&mut self, required: u128) -> (u128, u128) {
        let from_pool = self.pool_balance.min(required);
        let from_mint = required - from_pool;
        self.pool_balance -= from_pool;
        self.total_allocated += from_pool;
        (from_pool, from_mint)
    }
}
