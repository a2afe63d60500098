//! External token interface
//!
//! The pair ledgers, the wrapper and the staking vault only ever see tokens
//! through these traits, shared as `Arc<dyn Token>` / `Arc<dyn ShareToken>`.

use crate::error::TokenResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::{Amount, Principal, TokenId};

/// Concrete token flavours behind the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Plain balance-map token (also used for share tokens and the native asset)
    Fungible,
    /// 1:1 claim on the native asset held in custody
    WrappedNative,
    /// Elastic supply token whose balances scale on every rebase
    Rebasing,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Fungible => "fungible",
            TokenKind::WrappedNative => "wrapped-native",
            TokenKind::Rebasing => "rebasing",
        };
        f.write_str(name)
    }
}

/// Minimal transfer/balance contract every pairable token satisfies
pub trait Token: Send + Sync + fmt::Debug {
    fn id(&self) -> &TokenId;

    fn kind(&self) -> TokenKind;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, who: &Principal) -> Amount;

    /// Move `amount` from `from` to `to`; a zero amount is a no-op
    fn transfer(&self, from: &Principal, to: &Principal, amount: Amount) -> TokenResult<()>;
}

/// Token whose supply is controlled by its issuer (liquidity shares)
pub trait ShareToken: Token {
    fn mint(&self, to: &Principal, amount: Amount) -> TokenResult<()>;

    fn burn(&self, from: &Principal, amount: Amount) -> TokenResult<()>;
}
