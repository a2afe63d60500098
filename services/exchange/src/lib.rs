//! # PairSwap Exchange - Constant-Product Pair Ledgers
//!
//! ## Purpose
//!
//! Pair creation, liquidity provision and withdrawal, the four swap variants
//! and fee accounting for an x*y=k exchange. Reserves, fee balances and
//! share supply stay consistent under exact integer arithmetic, with every
//! rounding resolved in the pool's favour and collected fees kept apart
//! from swappable liquidity.
//!
//! ## Integration Points
//!
//! - **Tokens**: balances move only through [`tokens::Token`] and
//!   [`tokens::ShareToken`]
//! - **Math**: quotes and share formulas come from the `amm` crate
//! - **Configuration**: fee rate and locked minimum liquidity come from
//!   [`protocol_config::ExchangeSettings`]
//!
//! ## Architecture Role
//!
//! ```text
//! caller ──► PairRegistry ──► PairLedger (write lock) ──► Journal ──► Token
//!                │                  │                        │
//!          DashMap<PairKey,   amm::V2Math quotes       rollback on failure
//!           Arc<RwLock<..>>>
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use exchange::PairRegistry;
//! use protocol_config::ExchangeSettings;
//! use std::sync::Arc;
//! use tokens::FungibleToken;
//! use types::{Principal, TokenId};
//!
//! let lp = Principal::new("lp");
//! let x = Arc::new(FungibleToken::with_balances("x", [(&lp, 1_000_000)]).unwrap());
//! let y = Arc::new(FungibleToken::with_balances("y", [(&lp, 1_000_000)]).unwrap());
//!
//! let registry = PairRegistry::new(Principal::new("deployer"), ExchangeSettings::default());
//! registry
//!     .create_pair(x, y, Arc::new(FungibleToken::new("x-y-lp")), "x-y", 100_000, 100_000, &lp)
//!     .unwrap();
//!
//! let (x_id, y_id) = (TokenId::new("x"), TokenId::new("y"));
//! let swap = registry.swap_exact_x_for_y(&x_id, &y_id, 1_000, None, &lp).unwrap();
//! assert_eq!(swap.fee, 3);
//! assert_eq!(registry.fees_of(&x_id, &y_id).unwrap(), (3, 0));
//! ```

pub mod error;
pub mod journal;
pub mod ledger;
pub mod pair;
pub mod positions;
pub mod registry;

pub use error::{ExchangeError, ExchangeResult};
pub use journal::{atomically, Journal};
pub use ledger::{FeeCollection, LedgerSnapshot, LiquidityOutcome, PairLedger, SwapOutcome};
pub use pair::{Pair, PairInfo, PairKey, Side};
pub use positions::Position;
pub use registry::{LedgerHandle, PairRegistry};
