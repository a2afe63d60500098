//! Balance bookkeeping shared by the balance-map tokens

use crate::error::{TokenError, TokenResult};
use std::collections::HashMap;
use types::{Amount, Principal, TokenId};

/// Per-principal balances plus the running total supply
///
/// Every mutation checks before it writes, so a failed call leaves the
/// book untouched.
#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    balances: HashMap<Principal, Amount>,
    total_supply: Amount,
}

impl BalanceBook {
    pub fn balance_of(&self, who: &Principal) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Number of principals holding a non-zero balance
    pub fn holders(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Create `amount` new units for `to`
    pub fn credit(&mut self, to: &Principal, amount: Amount) -> TokenResult<()> {
        let total = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        self.total_supply = total;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    /// Destroy `amount` units held by `from`
    pub fn debit(&mut self, token: &TokenId, from: &Principal, amount: Amount) -> TokenResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                token: token.clone(),
                holder: from.clone(),
                required: amount,
                available,
            });
        }
        self.set(from, available - amount);
        self.total_supply -= amount;
        Ok(())
    }

    pub fn move_balance(
        &mut self,
        token: &TokenId,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> TokenResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                token: token.clone(),
                holder: from.clone(),
                required: amount,
                available,
            });
        }
        if amount == 0 || from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(TokenError::ArithmeticOverflow)?;
        self.set(from, available - amount);
        self.set(to, credited);
        Ok(())
    }

    fn set(&mut self, who: &Principal, balance: Amount) {
        if balance == 0 {
            self.balances.remove(who);
        } else {
            self.balances.insert(who.clone(), balance);
        }
    }
}
