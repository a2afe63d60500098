//! Position accounting
//!
//! A position is never stored: it is the caller's share balance projected
//! onto the current reserves, rounded down on both sides.

use crate::error::{ExchangeError, ExchangeResult};
use crate::ledger::PairLedger;
use amm::V2Math;
use serde::{Deserialize, Serialize};
use tokens::Token;
use types::{Amount, Principal};

/// A principal's claim on one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub shares: Amount,
    pub total_shares: Amount,
    /// X redeemable for `shares` at the current reserves
    pub amount_x: Amount,
    /// Y redeemable for `shares` at the current reserves
    pub amount_y: Amount,
}

impl PairLedger {
    pub fn position_of(&self, who: &Principal) -> ExchangeResult<Position> {
        let total_shares = self.total_shares();
        if total_shares == 0 {
            return Err(ExchangeError::NoLiquidityError);
        }
        let shares = self.pair().share_token.balance_of(who);
        let (reserve_x, reserve_y) = self.reserves();
        Ok(Position {
            shares,
            total_shares,
            amount_x: V2Math::redeemable(shares, reserve_x, total_shares)?,
            amount_y: V2Math::redeemable(shares, reserve_y, total_shares)?,
        })
    }

    /// Redeemable (X, Y) for everything `who` holds
    pub fn balances_of(&self, who: &Principal) -> ExchangeResult<(Amount, Amount)> {
        let position = self.position_of(who)?;
        Ok((position.amount_x, position.amount_y))
    }
}
