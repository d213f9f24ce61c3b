use crate::calculations::{
    DEFAULT_BONUS_MULTIPLIER, DEFAULT_DAILY_CREDIT_RATE, DEFAULT_NODE_OPERATOR_FEE,
    MIN_DELEGATION_AMOUNT,
};
use crate::error::ConfigError;
use crate::refresh_timer::CREDIT_REFRESH_PERIOD_MS;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const TESTNET_ACCESS_NODE: &str = "https://rest-testnet.onflow.org";

/// Deployed addresses of the system contracts scripts import.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractAddresses {
    pub staking_collection: String,
    pub id_table_staking: String,
    pub flow_token: String,
    pub fungible_token: String,
    pub locked_tokens: String,
}

impl ContractAddresses {
    pub fn testnet() -> Self {
        Self {
            staking_collection: "0x95e019a17d0e23d7".to_string(),
            id_table_staking: "0x9eca2b38b18b5dfe".to_string(),
            flow_token: "0x7e60df042a9c0868".to_string(),
            fungible_token: "0x9a0766d93b6608b7".to_string(),
            locked_tokens: "0x95e019a17d0e23d7".to_string(),
        }
    }

    /// Swaps `0xContractName` import placeholders for deployed addresses.
    pub fn resolve_imports(&self, source: &str) -> String {
        [
            ("0xFlowStakingCollection", &self.staking_collection),
            ("0xFlowIDTableStaking", &self.id_table_staking),
            ("0xFlowToken", &self.flow_token),
            ("0xFungibleToken", &self.fungible_token),
            ("0xLockedTokens", &self.locked_tokens),
        ]
        .iter()
        .fold(source.to_string(), |script, (placeholder, address)| {
            script.replace(placeholder, address)
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub network: String,
    pub primary_access_node: String,
    pub secondary_access_node: String,
    pub contracts: ContractAddresses,
    pub wallet_address: Option<String>,
    pub markets_file: Option<PathBuf>,
    pub daily_credit_rate: f64,
    pub bonus_multiplier: f64,
    pub node_operator_fee: f64,
    pub min_delegation_amount: f64,
    pub epoch_duration_ms: u64,
    pub epochs_per_year: f64,
    pub credit_refresh_period_ms: u64,
    pub parallel_limit: usize,
    pub tick_interval_secs: u64,
    pub watch: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: "testnet".to_string(),
            primary_access_node: TESTNET_ACCESS_NODE.to_string(),
            secondary_access_node: TESTNET_ACCESS_NODE.to_string(),
            contracts: ContractAddresses::testnet(),
            wallet_address: None,
            markets_file: None,
            daily_credit_rate: DEFAULT_DAILY_CREDIT_RATE,
            bonus_multiplier: DEFAULT_BONUS_MULTIPLIER,
            node_operator_fee: DEFAULT_NODE_OPERATOR_FEE,
            min_delegation_amount: MIN_DELEGATION_AMOUNT,
            // Testnet epochs last 12 hours
            epoch_duration_ms: 12 * 60 * 60 * 1000,
            epochs_per_year: 30.0,
            credit_refresh_period_ms: CREDIT_REFRESH_PERIOD_MS,
            parallel_limit: 8,
            tick_interval_secs: 1,
            watch: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source; unset variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let contracts = defaults.contracts;

        let primary_access_node =
            non_empty(&lookup, "PRIMARY_ACCESS_NODE")?.unwrap_or(defaults.primary_access_node);
        let secondary_access_node = non_empty(&lookup, "SECONDARY_ACCESS_NODE")?
            .unwrap_or_else(|| primary_access_node.clone());

        let config = Self {
            network: lookup("FLOW_NETWORK").unwrap_or(defaults.network),
            primary_access_node,
            secondary_access_node,
            contracts: ContractAddresses {
                staking_collection: lookup("STAKING_COLLECTION_ADDRESS")
                    .unwrap_or(contracts.staking_collection),
                id_table_staking: lookup("ID_TABLE_STAKING_ADDRESS")
                    .unwrap_or(contracts.id_table_staking),
                flow_token: lookup("FLOW_TOKEN_ADDRESS").unwrap_or(contracts.flow_token),
                fungible_token: lookup("FUNGIBLE_TOKEN_ADDRESS")
                    .unwrap_or(contracts.fungible_token),
                locked_tokens: lookup("LOCKED_TOKENS_ADDRESS").unwrap_or(contracts.locked_tokens),
            },
            wallet_address: lookup("WALLET_ADDRESS").filter(|a| !a.trim().is_empty()),
            markets_file: lookup("MARKETS_FILE")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            daily_credit_rate: parsed(&lookup, "DAILY_CREDIT_RATE", defaults.daily_credit_rate)?,
            bonus_multiplier: parsed(&lookup, "BONUS_MULTIPLIER", defaults.bonus_multiplier)?,
            node_operator_fee: parsed(&lookup, "NODE_OPERATOR_FEE", defaults.node_operator_fee)?,
            min_delegation_amount: parsed(
                &lookup,
                "MIN_DELEGATION_AMOUNT",
                defaults.min_delegation_amount,
            )?,
            epoch_duration_ms: parsed(&lookup, "EPOCH_DURATION_MS", defaults.epoch_duration_ms)?,
            epochs_per_year: parsed(&lookup, "EPOCHS_PER_YEAR", defaults.epochs_per_year)?,
            credit_refresh_period_ms: parsed(
                &lookup,
                "CREDIT_REFRESH_PERIOD_MS",
                defaults.credit_refresh_period_ms,
            )?,
            parallel_limit: parsed(&lookup, "PARALLEL_LIMIT", defaults.parallel_limit)?,
            tick_interval_secs: parsed(&lookup, "TICK_INTERVAL_SECS", defaults.tick_interval_secs)?,
            watch: parsed(&lookup, "WATCH", defaults.watch)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("DAILY_CREDIT_RATE", self.daily_credit_rate, 0.0, 1.0)?;
        check_range("NODE_OPERATOR_FEE", self.node_operator_fee, 0.0, 1.0)?;
        check_range("BONUS_MULTIPLIER", self.bonus_multiplier, 0.0, f64::MAX)?;
        check_range("MIN_DELEGATION_AMOUNT", self.min_delegation_amount, 0.0, f64::MAX)?;
        check_range("EPOCHS_PER_YEAR", self.epochs_per_year, 0.0, f64::MAX)?;
        if self.parallel_limit == 0 {
            return Err(ConfigError::OutOfRange {
                var: "PARALLEL_LIMIT",
                value: "0".to_string(),
            });
        }
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::OutOfRange {
                var: "TICK_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn non_empty<F>(lookup: &F, var: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) if value.trim().is_empty() => Err(ConfigError::Missing(var)),
        other => Ok(other),
    }
}

fn parsed<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn check_range(var: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            var,
            value: value.to_string(),
        });
    }
    Ok(())
}
