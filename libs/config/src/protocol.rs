//! Protocol constants
//!
//! Values every crate agrees on. Runtime-tunable parameters take these as
//! defaults through [`crate::ProtocolConfig`].

/// Denominator for basis-point rates (10_000 bps == 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Denominator for percentage arguments (100 == 100%)
pub const PERCENT_DENOMINATOR: u128 = 100;

/// Exchange defaults
pub mod exchange {
    /// Swap fee charged on every input amount (0.30%)
    pub const DEFAULT_FEE_BPS: u32 = 30;

    /// Shares locked in the pair account at creation
    pub const MINIMUM_LIQUIDITY: u64 = 1_000;
}

/// Rebasing token defaults
pub mod rebase {
    /// Price the supply policy steers towards (1.0 at 6 decimals)
    pub const DEFAULT_TARGET_PRICE: u64 = 1_000_000;

    /// Fraction of the price deviation applied per rebase (1/lag)
    pub const DEFAULT_REBASE_LAG: u64 = 10;
}

/// Staking vault defaults
pub mod staking {
    /// Reward tokens emitted per block across all stakers
    pub const DEFAULT_REWARD_PER_BLOCK: u64 = 1_000;

    /// Scale of the accumulated reward-per-share index
    pub const REWARD_INDEX_SCALE: u128 = 1_000_000_000_000;
}
