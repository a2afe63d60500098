//! # PairSwap Shared Types
//!
//! Identifiers and cross-crate seams used by every PairSwap crate.
//!
//! ## Design Philosophy
//!
//! - **Typed Names**: principals and tokens are distinct string newtypes
//! - **Integer Amounts**: every balance is a `u128` in the token's smallest unit
//! - **Narrow Seams**: collaborators meet through small traits ([`PriceFeed`],
//!   [`Clock`]) instead of depending on each other's crates
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{BlockClock, Clock, Principal, TokenId};
//!
//! let treasury = Principal::new("SP1EHFWKXQEQD7TW9WWRGSGJFJ52XNGN6MTJ7X462");
//! let wrapped = TokenId::new("wrapped-stx");
//! let clock = BlockClock::new(0);
//! clock.advance(1);
//! assert_eq!(clock.block_height(), 1);
//! # let _ = (treasury, wrapped);
//! ```

pub mod common;

pub use common::errors::ValidationError;
pub use common::identifiers::{Principal, TokenId};
pub use common::seams::{Amount, BlockClock, Clock, PriceFeed, PRICE_SCALE};
