//! # PairSwap AMM Library - Exact Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Integer mathematics for the pair ledgers: swap pricing in both directions,
//! fee skimming, ratio-matched deposits, share minting and redemption. No
//! floating point is involved in any state-changing calculation; `Decimal` is
//! only produced for display views (spot price, price impact).
//!
//! ## Integration Points
//!
//! - **Callers**: `exchange` pair ledgers and their read views
//! - **Rounding**: every division goes through [`mul_div`] with an explicit
//!   [`Rounding`], always resolved in the pool's favour
//! - **Overflow**: intermediate products are checked and surface as
//!   [`MathError::ArithmeticOverflow`]
//!
//! ## Architecture Role
//!
//! ```text
//! Pair Ledger ──► V2Math (quotes, shares) ──► fixed_point (mul_div, isqrt)
//!      ▲                                            │
//!      └──────────── SwapQuote / MathError ◄────────┘
//! ```

pub mod fixed_point;
pub mod pool_traits;
pub mod v2_math;

pub use fixed_point::{checked_add, checked_sub, div, isqrt, mul_div, MathError, Rounding};
pub use pool_traits::AmmPool;
pub use v2_math::{SwapQuote, V2Math, V2PoolState};

/// Decimal type used by display-only views
pub use rust_decimal::Decimal;
