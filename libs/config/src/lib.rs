//! # PairSwap Centralized Configuration
//!
//! Centralized configuration management and constants for every PairSwap
//! crate.
//!
//! ## Features
//!
//! - **Protocol Constants**: fee denominators, default fee rate, minimum liquidity
//! - **Protocol Configuration**: TOML files with environment-specific and
//!   `PAIRSWAP_*` environment variable overrides
//!
//! ## Usage
//!
//! ```rust
//! use protocol_config::{protocol, ProtocolConfig};
//!
//! let config = ProtocolConfig::default();
//! assert_eq!(config.exchange.fee_bps, protocol::exchange::DEFAULT_FEE_BPS);
//! ```

pub mod protocol;
pub mod settings;

pub use protocol::*;
pub use settings::{
    load_config, ConfigError, ExchangeSettings, LoggingSettings, ProtocolConfig, RebaseSettings,
    StakingSettings,
};
