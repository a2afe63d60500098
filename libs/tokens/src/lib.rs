//! # PairSwap Tokens
//!
//! The external token interface the exchange trades through, plus the three
//! concrete token kinds living beside it:
//!
//! - [`FungibleToken`]: plain balance map, also used for pair share tokens
//! - [`WrappedNative`]: 1:1 claim on a custodied native asset
//! - [`RebasingToken`]: elastic supply steered by a [`types::PriceFeed`]
//!
//! Every state change checks before it writes, so a failed call never leaves
//! a partial balance update behind.

pub mod book;
pub mod error;
pub mod fungible;
pub mod rebasing;
pub mod traits;
pub mod wrapped;

pub use book::BalanceBook;
pub use error::{TokenError, TokenResult};
pub use fungible::FungibleToken;
pub use rebasing::{RebaseOutcome, RebasingToken};
pub use traits::{ShareToken, Token, TokenKind};
pub use wrapped::WrappedNative;
