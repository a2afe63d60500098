//! Rollback journal for token movements
//!
//! A ledger operation issues its transfers, mints and burns through a
//! [`Journal`]. If one of them fails, [`atomically`] reverts every movement
//! already applied, newest first, so the operation either moves all of its
//! tokens or none of them.

use crate::error::ExchangeResult;
use std::sync::Arc;
use tokens::{ShareToken, Token, TokenError};
use tracing::{error, warn};
use types::{Amount, Principal};

enum Effect {
    Transfer {
        token: Arc<dyn Token>,
        from: Principal,
        to: Principal,
        amount: Amount,
    },
    Mint {
        token: Arc<dyn ShareToken>,
        to: Principal,
        amount: Amount,
    },
    Burn {
        token: Arc<dyn ShareToken>,
        from: Principal,
        amount: Amount,
    },
}

impl Effect {
    fn revert(&self) -> Result<(), TokenError> {
        match self {
            Effect::Transfer {
                token,
                from,
                to,
                amount,
            } => token.transfer(to, from, *amount),
            Effect::Mint { token, to, amount } => token.burn(to, *amount),
            Effect::Burn {
                token,
                from,
                amount,
            } => token.mint(from, *amount),
        }
    }

    fn describe(&self) -> String {
        match self {
            Effect::Transfer { token, amount, .. } => format!("transfer {} {}", amount, token.id()),
            Effect::Mint { token, amount, .. } => format!("mint {} {}", amount, token.id()),
            Effect::Burn { token, amount, .. } => format!("burn {} {}", amount, token.id()),
        }
    }
}

/// Token movements applied so far by one operation
#[derive(Default)]
pub struct Journal {
    applied: Vec<Effect>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of movements applied so far
    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Zero amounts are skipped
    pub fn transfer(
        &mut self,
        token: &Arc<dyn Token>,
        from: &Principal,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Ok(());
        }
        token.transfer(from, to, amount)?;
        self.applied.push(Effect::Transfer {
            token: Arc::clone(token),
            from: from.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    pub fn mint(
        &mut self,
        token: &Arc<dyn ShareToken>,
        to: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Ok(());
        }
        token.mint(to, amount)?;
        self.applied.push(Effect::Mint {
            token: Arc::clone(token),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    pub fn burn(
        &mut self,
        token: &Arc<dyn ShareToken>,
        from: &Principal,
        amount: Amount,
    ) -> Result<(), TokenError> {
        if amount == 0 {
            return Ok(());
        }
        token.burn(from, amount)?;
        self.applied.push(Effect::Burn {
            token: Arc::clone(token),
            from: from.clone(),
            amount,
        });
        Ok(())
    }

    /// Revert every applied movement, newest first
    pub fn rollback(mut self) {
        while let Some(effect) = self.applied.pop() {
            if let Err(e) = effect.revert() {
                error!(effect = %effect.describe(), error = %e, "failed to revert token movement");
            }
        }
    }
}

/// Run `body` against a fresh journal, reverting its movements on failure
pub fn atomically<T>(
    body: impl FnOnce(&mut Journal) -> Result<T, TokenError>,
) -> ExchangeResult<T> {
    let mut journal = Journal::new();
    match body(&mut journal) {
        Ok(value) => Ok(value),
        Err(e) => {
            if !journal.is_empty() {
                warn!(reverted = journal.len(), error = %e, "rolling back token movements");
            }
            journal.rollback();
            Err(e.into())
        }
    }
}
