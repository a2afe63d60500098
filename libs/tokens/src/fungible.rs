//! Plain fungible token
//!
//! Used for traded tokens, for the native asset the wrapper custodies, and
//! as the liquidity-share token of each pair.

use crate::book::BalanceBook;
use crate::error::TokenResult;
use crate::traits::{ShareToken, Token, TokenKind};
use parking_lot::RwLock;
use tracing::trace;
use types::{Amount, Principal, TokenId};

#[derive(Debug)]
pub struct FungibleToken {
    id: TokenId,
    book: RwLock<BalanceBook>,
}

impl FungibleToken {
    pub fn new(id: impl Into<TokenId>) -> Self {
        Self {
            id: id.into(),
            book: RwLock::new(BalanceBook::default()),
        }
    }

    /// Token with an initial distribution
    pub fn with_balances<'a>(
        id: impl Into<TokenId>,
        balances: impl IntoIterator<Item = (&'a Principal, Amount)>,
    ) -> TokenResult<Self> {
        let token = Self::new(id);
        {
            let mut book = token.book.write();
            for (holder, amount) in balances {
                book.credit(holder, amount)?;
            }
        }
        Ok(token)
    }

    pub fn holders(&self) -> usize {
        self.book.read().holders()
    }
}

impl Token for FungibleToken {
    fn id(&self) -> &TokenId {
        &self.id
    }

    fn kind(&self) -> TokenKind {
        TokenKind::Fungible
    }

    fn total_supply(&self) -> Amount {
        self.book.read().total_supply()
    }

    fn balance_of(&self, who: &Principal) -> Amount {
        self.book.read().balance_of(who)
    }

    fn transfer(&self, from: &Principal, to: &Principal, amount: Amount) -> TokenResult<()> {
        self.book.write().move_balance(&self.id, from, to, amount)?;
        trace!(token = %self.id, %from, %to, amount, "transfer");
        Ok(())
    }
}

impl ShareToken for FungibleToken {
    fn mint(&self, to: &Principal, amount: Amount) -> TokenResult<()> {
        self.book.write().credit(to, amount)?;
        trace!(token = %self.id, %to, amount, "mint");
        Ok(())
    }

    fn burn(&self, from: &Principal, amount: Amount) -> TokenResult<()> {
        self.book.write().debit(&self.id, from, amount)?;
        trace!(token = %self.id, %from, amount, "burn");
        Ok(())
    }
}
