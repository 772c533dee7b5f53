// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SYNAPSE-CORE
//
// Deterministic tokenomics-and-scoring engine for a proof-of-stake network:
// emission controller, recycling pool, reward distributor, burn manager,
// Merkle claim manager, transaction signing + fee handler, node tier
// registry, scoring manager, and root subnet weight voting. Every public
// operation here must produce byte-identical output on every node given
// the same inputs — no floats, no unordered iteration, no wall-clock reads.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod bps;
pub mod burn;
pub mod config;
pub mod distributor;
pub mod emission;
pub mod error;
pub mod fee;
pub mod integration;
pub mod merkle;
pub mod node_tier;
pub mod recycling_pool;
pub mod root_subnet;
pub mod scoring;
pub mod transaction;

pub use bps::{
    bps_to_float, bps_to_percent, distribute_by_scores, float_to_bps, percent_to_bps,
    proportional_share, BPS_DENOMINATOR,
};
pub use burn::{BurnManager, BurnReason};
pub use config::{BurnConfig, NodeTierConfig, RpcConfig, TokenomicsConfig};
pub use distributor::{Delegation, DistributionConfig, DistributionResult, RewardDistributor, SubnetOwnerStake};
pub use emission::{calculate_utility, EmissionController, UtilityWeights};
pub use error::{CoreError, CoreResult};
pub use fee::{FeeStats, TransactionFeeHandler};
pub use integration::{EpochInputs, EpochTokenomics, TokenomicsIntegration};
pub use merkle::{ClaimManager, ClaimStatus};
pub use node_tier::{NodeInfo, NodeRegistry, NodeTier, ONE_TOKEN};
pub use recycling_pool::{PoolSource, RecyclingPool};
pub use root_subnet::{RootSubnet, RootSubnetConfig, SubnetInfo};
pub use scoring::{MinerMetrics, ScoringConfig, ScoringEvent, ScoringManager, ValidatorMetrics};
pub use transaction::{LogEntry, Transaction, TransactionReceipt, TxStatus};
