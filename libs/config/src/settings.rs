//! Protocol Configuration Module
//!
//! Provides configuration loading for PairSwap components.
//! Supports loading from TOML files with environment-specific overrides.

use crate::protocol::{exchange, rebase, staking, BPS_DENOMINATOR};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default location of the base configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/pairswap.toml";

/// Configuration values that parse but cannot be used
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fee of {fee_bps} bps must be below {max} bps")]
    FeeTooHigh { fee_bps: u32, max: u128 },

    #[error("rebase lag must be positive")]
    ZeroRebaseLag,

    #[error("rebase target price must be positive")]
    ZeroTargetPrice,
}

/// Main protocol configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Pair ledger parameters
    pub exchange: ExchangeSettings,

    /// Rebasing token supply policy
    pub rebase: RebaseSettings,

    /// Staking vault emission
    pub staking: StakingSettings,

    /// Log output
    pub logging: LoggingSettings,
}

/// Pair ledger parameters shared by every pair of a registry
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ExchangeSettings {
    /// Fee taken from every swap input, in basis points
    pub fee_bps: u32,
    /// Shares locked forever in the pair account at creation
    pub minimum_liquidity: u64,
}

/// Rebasing token supply policy
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RebaseSettings {
    /// Target price at 6 decimals
    pub target_price: u64,
    /// Only `1/lag` of the deviation is applied per rebase
    pub lag: u64,
}

/// Staking vault emission
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct StakingSettings {
    /// Reward tokens emitted per block, shared by all stakers
    pub reward_per_block: u64,
}

/// Log output settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            fee_bps: exchange::DEFAULT_FEE_BPS,
            minimum_liquidity: exchange::MINIMUM_LIQUIDITY,
        }
    }
}

impl Default for RebaseSettings {
    fn default() -> Self {
        Self {
            target_price: rebase::DEFAULT_TARGET_PRICE,
            lag: rebase::DEFAULT_REBASE_LAG,
        }
    }
}

impl Default for StakingSettings {
    fn default() -> Self {
        Self {
            reward_per_block: staking::DEFAULT_REWARD_PER_BLOCK,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ExchangeSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if u128::from(self.fee_bps) >= BPS_DENOMINATOR {
            return Err(ConfigError::FeeTooHigh {
                fee_bps: self.fee_bps,
                max: BPS_DENOMINATOR,
            });
        }
        Ok(())
    }
}

impl RebaseSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lag == 0 {
            return Err(ConfigError::ZeroRebaseLag);
        }
        if self.target_price == 0 {
            return Err(ConfigError::ZeroTargetPrice);
        }
        Ok(())
    }
}

impl ProtocolConfig {
    /// Load configuration from files with environment overrides
    ///
    /// Layers, lowest precedence first: the base file (`base_path`, or
    /// [`DEFAULT_CONFIG_PATH`] when present), `config/environments/<env>.toml`,
    /// then `PAIRSWAP_<SECTION>__<KEY>` environment variables.
    pub fn load(base_path: Option<&Path>, environment: Option<&str>) -> Result<Self> {
        let mut builder = match base_path {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder()
                .add_source(File::from(Path::new(DEFAULT_CONFIG_PATH)).required(false)),
        };

        // Add environment-specific overrides if specified
        if let Some(env) = environment {
            let env_file = PathBuf::from("config/environments").join(format!("{}.toml", env));

            if env_file.exists() {
                info!("Loading environment config: {:?}", env_file);
                builder = builder.add_source(File::from(env_file));
            } else {
                warn!("Environment config not found: {:?}", env_file);
            }
        }

        // Override with environment variables (PAIRSWAP_ prefix)
        builder = builder.add_source(
            Environment::with_prefix("PAIRSWAP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate().context("Invalid configuration")?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Parse a configuration from TOML text, without file or environment layers
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse TOML configuration")?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exchange.validate()?;
        self.rebase.validate()
    }
}

/// Convenience function to load configuration with defaults
pub fn load_config(environment: Option<&str>) -> Result<ProtocolConfig> {
    ProtocolConfig::load(None, environment)
}
