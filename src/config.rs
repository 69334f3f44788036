//! Client configuration

use crate::error::{Result, TariswapError};
use crate::ledger::{Amount, ComponentAddress, ResourceAddress, TemplateAddress};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Addresses of the deployed Tariswap template and its pool
pub mod addresses {
    pub const TARISWAP_TEMPLATE: &str =
        "52c1c37b0d6e984ecb32e07bb359823d13a5768edb658278c867be1cd0261f5a";
    pub const FIRST_TOKEN_RESOURCE: &str =
        "resource_e71c7c68bd239f3c4938d98b408e680259369ef415165801db0ef56b";
    pub const SECOND_TOKEN_RESOURCE: &str =
        "resource_a9af4f7fd8233de7e03e771b70bbbcd66f2e9a0a485135ef64d5a68a";
    pub const LP_TOKEN_RESOURCE: &str =
        "resource_ce023f7d7084c63ee6503c04f024c1402e038a4b8d318a45e9c3d550";
    pub const SWAP_COMPONENT: &str =
        "component_ce023f7d7084c63ee6503c04f024c1402e038a4b135a57d1edf48152";
}

/// Pool swap fee passed to the template constructor
pub const SWAP_FEE: i64 = 50;

/// Fee paid from the account for every pool transaction
pub const TRANSACTION_FEE: i64 = 2000;

pub const DEFAULT_WALLET_URL: &str = "http://127.0.0.1:9000/json_rpc";

/// How to poll for transaction results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between result polls in milliseconds
    pub interval_ms: u64,

    /// Give up after this many polls. `None` waits until the wallet answers.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariswapConfig {
    /// Template the pools are instantiated from
    pub template_address: TemplateAddress,

    /// First token of the default pool
    pub first_token: ResourceAddress,

    /// Second token of the default pool
    pub second_token: ResourceAddress,

    /// LP token minted by the default pool
    pub lp_token: ResourceAddress,

    /// The default pool component
    pub swap_component: ComponentAddress,

    /// Swap fee for newly created pools
    pub swap_fee: Amount,

    /// Transaction fee paid from the account
    pub transaction_fee: Amount,

    /// Wallet daemon JSON-RPC endpoint
    pub wallet_url: String,

    /// Bearer token for the wallet daemon
    pub auth_token: Option<String>,

    pub poll: PollConfig,
}

fn parse_const<T: FromStr>(value: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    value.parse().expect("built-in address is valid")
}

impl Default for TariswapConfig {
    fn default() -> Self {
        Self {
            template_address: parse_const(addresses::TARISWAP_TEMPLATE),
            first_token: parse_const(addresses::FIRST_TOKEN_RESOURCE),
            second_token: parse_const(addresses::SECOND_TOKEN_RESOURCE),
            lp_token: parse_const(addresses::LP_TOKEN_RESOURCE),
            swap_component: parse_const(addresses::SWAP_COMPONENT),
            swap_fee: Amount::new(SWAP_FEE),
            transaction_fee: Amount::new(TRANSACTION_FEE),
            wallet_url: DEFAULT_WALLET_URL.to_string(),
            auth_token: None,
            poll: PollConfig::default(),
        }
    }
}

impl TariswapConfig {
    /// Load from a JSON file. Fields not present keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TariswapError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_token == self.second_token {
            return Err(TariswapError::Config(
                "first_token and second_token must differ".to_string(),
            ));
        }
        if self.poll.interval_ms == 0 {
            return Err(TariswapError::Config("poll.interval_ms must be positive".to_string()));
        }
        Ok(())
    }
}
