// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SYNAPSE-SDK
//
// Thin facade wiring synapse-core (tokenomics), synapse-crypto (signing),
// and synapse-rpc (host-chain calls) behind a single entry point for a
// host integration — the same role the teacher's root
// unauthority-integration-tests package plays, minus the test harness.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use synapse_core::{
    BurnManager, ClaimManager, CoreError, CoreResult, Delegation, DistributionConfig,
    EmissionController, EpochInputs, EpochTokenomics, RecyclingPool, RewardDistributor,
    SubnetOwnerStake, TokenomicsIntegration, Transaction, UtilityWeights,
};
use synapse_crypto::KeyPair;
use synapse_rpc::{RpcClient, RpcConfig, RpcError};

/// Wires the tokenomics pipeline together with sane defaults; callers that
/// need custom config build `TokenomicsIntegration` directly instead.
pub struct TokenomicsEngine {
    pub pipeline: TokenomicsIntegration,
    pub rpc: RpcClient,
}

impl TokenomicsEngine {
    pub fn new(
        max_supply: u128,
        current_supply: u128,
        halving_interval: u64,
        base_reward: u128,
        utility_weights: UtilityWeights,
        max_expected_tasks: u64,
        unmet_quota_threshold_bps: u64,
        distribution_config: DistributionConfig,
        rpc_config: RpcConfig,
    ) -> CoreResult<Self> {
        let distributor = RewardDistributor::new(distribution_config)?;
        let pipeline = TokenomicsIntegration {
            emission_controller: EmissionController::new(
                max_supply,
                current_supply,
                halving_interval,
                base_reward,
            ),
            recycling_pool: RecyclingPool::new(),
            burn_manager: BurnManager::new(),
            distributor,
            claim_manager: ClaimManager::new(),
            utility_weights,
            max_expected_tasks,
            unmet_quota_threshold_bps,
        };
        Ok(TokenomicsEngine { pipeline, rpc: RpcClient::new(rpc_config) })
    }

    /// Runs one epoch of the tokenomics pipeline locally — no RPC involved.
    pub fn run_epoch(
        &mut self,
        epoch: u64,
        miner_scores: std::collections::BTreeMap<String, u64>,
        validator_stakes: std::collections::BTreeMap<String, u128>,
        delegations: Vec<Delegation>,
        subnet_owners: Vec<SubnetOwnerStake>,
        quality_bps: u64,
        tasks: u64,
        difficulty_bps: u64,
        participation_bps: u64,
    ) -> CoreResult<EpochTokenomics> {
        self.pipeline.run_epoch(EpochInputs {
            epoch,
            miner_scores,
            validator_stakes,
            delegations,
            subnet_owners,
            quality_bps,
            tasks,
            difficulty_bps,
            participation_bps,
        })
    }

    /// Signs `tx` and submits it as a raw transaction: the canonical
    /// signing message followed by `v(1) || r(32) || s(32)`, hex-encoded
    /// with a `0x` prefix, per the raw transaction encoding contract.
    pub async fn submit_signed_transaction(
        &self,
        mut tx: Transaction,
        keypair: &KeyPair,
    ) -> Result<serde_json::Value, SdkError> {
        tx.sign(keypair).map_err(SdkError::Core)?;
        let signature = tx.signature.clone().ok_or(SdkError::Core(CoreError::InvalidSignature))?;
        let v = tx.v().ok_or(SdkError::Core(CoreError::InvalidSignature))?;

        let mut raw = tx.signing_message();
        raw.push(v as u8);
        raw.extend_from_slice(&signature.r);
        raw.extend_from_slice(&signature.s);
        let raw_hex = format!("0x{}", hex::encode(raw));

        self.rpc
            .call("eth_sendRawTransaction", serde_json::json!([raw_hex]))
            .await
            .map_err(SdkError::Rpc)
    }
}

#[derive(Debug)]
pub enum SdkError {
    Core(CoreError),
    Rpc(RpcError),
}

impl std::fmt::Display for SdkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SdkError::Core(e) => write!(f, "{e}"),
            SdkError::Rpc(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SdkError {}
