// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURATION
//
// Every tunable is a `Default`-implementing struct, loadable from TOML.
// TOML has no native u128, so `u128` fields round-trip through strings
// via the `u128_toml` adapter, the same pattern `ValidatorConfig` uses.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::distributor::DistributionConfig;
use crate::error::{CoreError, CoreResult};
use crate::scoring::ScoringConfig;

mod u128_toml {
    use super::*;

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        use serde::de::{self, Visitor};
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    Ok(v as u128)
                } else {
                    Err(E::custom("negative value for u128"))
                }
            }
        }

        d.deserialize_any(U128Visitor)
    }
}

fn to_toml<T: Serialize>(value: &T) -> CoreResult<String> {
    toml::to_string_pretty(value).map_err(|e| CoreError::InvalidInput {
        field: "config",
        reason: e.to_string(),
    })
}

fn from_toml<T: for<'de> Deserialize<'de>>(s: &str) -> CoreResult<T> {
    toml::from_str(s).map_err(|e| CoreError::InvalidInput {
        field: "config",
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenomicsConfig {
    #[serde(with = "u128_toml")]
    pub max_supply: u128,
    #[serde(with = "u128_toml")]
    pub base_reward: u128,
    pub halving_interval: u64,
    pub max_expected_tasks: u64,
    pub utility_weights_bps: (u64, u64, u64),
    #[serde(with = "u128_toml")]
    pub min_daily_emission: u128,
}

impl Default for TokenomicsConfig {
    fn default() -> Self {
        TokenomicsConfig {
            max_supply: 21_000_000_000_000_000_000_000_000,
            base_reward: 1000_000_000_000_000_000_000,
            halving_interval: 210_000,
            max_expected_tasks: 10_000,
            utility_weights_bps: (5000, 3000, 2000),
            min_daily_emission: 100,
        }
    }
}

impl TokenomicsConfig {
    pub fn validate(&self) -> CoreResult<()> {
        let (a, b, c) = self.utility_weights_bps;
        if a + b + c != 10_000 {
            return Err(CoreError::InvalidInput {
                field: "utility_weights_bps",
                reason: format!("{a}+{b}+{c} != 10000"),
            });
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let cfg: Self = from_toml(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnConfig {
    pub tx_fee_burn_bps: u64,
    pub subnet_registration_burn_bps: u64,
    pub unmet_quota_burn_bps: u64,
    pub slashing_burn_bps: u64,
}

impl Default for BurnConfig {
    fn default() -> Self {
        BurnConfig {
            tx_fee_burn_bps: 5000,
            subnet_registration_burn_bps: 5000,
            unmet_quota_burn_bps: 10_000,
            slashing_burn_bps: 8000,
        }
    }
}

impl BurnConfig {
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        from_toml(s)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTierConfig {
    pub light_node_min_stake: u64,
    pub full_node_min_stake: u64,
    pub validator_min_stake: u64,
    pub super_validator_min_stake: u64,
}

impl Default for NodeTierConfig {
    fn default() -> Self {
        NodeTierConfig {
            light_node_min_stake: 0,
            full_node_min_stake: 10,
            validator_min_stake: 100,
            super_validator_min_stake: 1000,
        }
    }
}

impl NodeTierConfig {
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        from_toml(s)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    pub timeout_ms: u64,
    pub max_connections: u32,
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub backoff_base: u32,
    pub max_delay_ms: u64,
    pub failure_threshold: u32,
    pub recovery_timeout_ms: u64,
    pub half_open_max_calls: u32,
    pub health_check_interval_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        RpcConfig {
            url: "http://127.0.0.1:8545".to_string(),
            timeout_ms: 30_000,
            max_connections: 100,
            max_retries: 3,
            initial_delay_ms: 1000,
            backoff_base: 2,
            max_delay_ms: 30_000,
            failure_threshold: 5,
            recovery_timeout_ms: 60_000,
            half_open_max_calls: 3,
            health_check_interval_ms: 30_000,
        }
    }
}

impl RpcConfig {
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        from_toml(s)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}

impl DistributionConfig {
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        let cfg: Self = from_toml(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}

impl ScoringConfig {
    pub fn from_toml_str(s: &str) -> CoreResult<Self> {
        from_toml(s)
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        to_toml(self)
    }
}
