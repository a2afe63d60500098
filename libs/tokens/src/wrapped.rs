//! Wrapped native asset
//!
//! Wrapping locks native units in the wrapper's custody account and credits
//! the same number of wrapped units; unwrapping reverses it. The wrapped
//! supply always equals what custody holds on behalf of wrappers.

use crate::book::BalanceBook;
use crate::error::{TokenError, TokenResult};
use crate::traits::{Token, TokenKind};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info};
use types::{Amount, Principal, TokenId};

#[derive(Debug)]
pub struct WrappedNative {
    id: TokenId,
    native: Arc<dyn Token>,
    custody: Principal,
    book: RwLock<BalanceBook>,
}

impl WrappedNative {
    pub fn new(id: impl Into<TokenId>, native: Arc<dyn Token>) -> Self {
        let id = id.into();
        let custody = Principal::contract(format!("wrapper:{}", id));
        Self {
            id,
            native,
            custody,
            book: RwLock::new(BalanceBook::default()),
        }
    }

    /// Account holding the locked native units
    pub fn custody(&self) -> &Principal {
        &self.custody
    }

    pub fn native(&self) -> &Arc<dyn Token> {
        &self.native
    }

    /// Lock `amount` native units from `sender` and credit wrapped units
    pub fn wrap(&self, amount: Amount, sender: &Principal) -> TokenResult<()> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let mut book = self.book.write();
        self.native.transfer(sender, &self.custody, amount)?;
        if let Err(e) = book.credit(sender, amount) {
            self.release(sender, amount);
            return Err(e);
        }
        info!(token = %self.id, %sender, amount, "wrapped");
        Ok(())
    }

    /// Burn `amount` wrapped units from `sender` and release native units
    pub fn unwrap(&self, amount: Amount, sender: &Principal) -> TokenResult<()> {
        if amount == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let mut book = self.book.write();
        book.debit(&self.id, sender, amount)?;
        if let Err(e) = self.native.transfer(&self.custody, sender, amount) {
            book.credit(sender, amount)?;
            return Err(e);
        }
        info!(token = %self.id, %sender, amount, "unwrapped");
        Ok(())
    }

    fn release(&self, to: &Principal, amount: Amount) {
        if let Err(e) = self.native.transfer(&self.custody, to, amount) {
            error!(token = %self.id, %to, amount, error = %e, "failed to release native units");
        }
    }
}

impl Token for WrappedNative {
    fn id(&self) -> &TokenId {
        &self.id
    }

    fn kind(&self) -> TokenKind {
        TokenKind::WrappedNative
    }

    fn total_supply(&self) -> Amount {
        self.book.read().total_supply()
    }

    fn balance_of(&self, who: &Principal) -> Amount {
        self.book.read().balance_of(who)
    }

    fn transfer(&self, from: &Principal, to: &Principal, amount: Amount) -> TokenResult<()> {
        self.book.write().move_balance(&self.id, from, to, amount)
    }
}
