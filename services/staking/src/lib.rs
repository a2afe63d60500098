//! # PairSwap Staking Vault
//!
//! Stakers lock pair share tokens and earn a reward token at a fixed rate
//! per block, shared pro rata. The vault treats the share token as an
//! opaque [`tokens::Token`]; it never looks into the pair behind it.

pub mod error;
pub mod vault;

pub use error::{VaultError, VaultResult};
pub use vault::{StakePosition, StakingVault, UnstakeOutcome};
