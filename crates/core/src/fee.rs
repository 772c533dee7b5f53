// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TRANSACTION FEE HANDLER
//
// Splits every successful transaction's gas fee 50/50 — well, by
// `burn_bps` — between burn and the recycling pool. Failed transactions
// are counted but never split: a failed transaction's gas is not shared
// with the pool or burn ledger, mirroring the Python original's
// `MDTTransactionProcessor.process_transaction`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::burn::{BurnManager, BurnReason};
use crate::bps::proportional_share;
use crate::error::{CoreError, CoreResult};
use crate::recycling_pool::{PoolSource, RecyclingPool};
use crate::transaction::{LogEntry, Transaction, TransactionReceipt};

#[derive(Debug, Clone, Copy, Default)]
pub struct FeeStats {
    pub total_fees_collected: u128,
    pub total_recycled: u128,
    pub total_burned: u128,
    pub transactions_processed: u64,
}

#[derive(Debug, Default)]
pub struct TransactionFeeHandler {
    pub burn_bps: u64,
    stats: FeeStats,
}

impl TransactionFeeHandler {
    pub fn new(burn_bps: u64) -> Self {
        TransactionFeeHandler { burn_bps, stats: FeeStats::default() }
    }

    pub fn process_transaction(
        &mut self,
        tx: &Transaction,
        receipt: &mut TransactionReceipt,
        pool: &mut RecyclingPool,
        burn: &mut BurnManager,
    ) -> CoreResult<()> {
        if receipt.gas_used > tx.gas_limit {
            return Err(CoreError::InvalidReceipt {
                gas_used: receipt.gas_used,
                gas_limit: tx.gas_limit,
            });
        }

        let fee = receipt.gas_used as u128 * tx.gas_price as u128;
        self.stats.total_fees_collected += fee;
        self.stats.transactions_processed += 1;

        if receipt.is_success() {
            let to_burn = proportional_share(fee, self.burn_bps)?;
            let to_recycle = fee - to_burn;

            pool.credit(PoolSource::TransactionFees, to_recycle);
            burn.record_burn(BurnReason::TransactionFees, to_burn);

            self.stats.total_recycled += to_recycle;
            self.stats.total_burned += to_burn;

            receipt.logs.push(LogEntry {
                log_type: "mdt_fee".to_string(),
                fields: vec![
                    ("fee".to_string(), fee.to_string()),
                    ("to_burn".to_string(), to_burn.to_string()),
                    ("to_recycle".to_string(), to_recycle.to_string()),
                ],
            });
        }

        Ok(())
    }

    pub fn get_stats(&self) -> FeeStats {
        self.stats
    }
}
