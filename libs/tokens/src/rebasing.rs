//! Elastic supply token
//!
//! Balances are stored as "gons", a fixed internal unit. The external
//! balance of a holder is `gons / gons_per_fragment`, so changing the total
//! supply (and with it `gons_per_fragment`) scales every balance at once
//! without touching the per-holder map.

use crate::error::{TokenError, TokenResult};
use crate::traits::{Token, TokenKind};
use amm::{mul_div, Rounding};
use parking_lot::RwLock;
use protocol_config::RebaseSettings;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};
use types::{Amount, Principal, PriceFeed, TokenId};

/// Result of one supply adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseOutcome {
    pub epoch: u64,
    pub price: u128,
    pub previous_supply: Amount,
    pub total_supply: Amount,
}

#[derive(Debug)]
struct RebaseState {
    total_supply: Amount,
    gons_per_fragment: u128,
    gons: HashMap<Principal, u128>,
    epoch: u64,
}

pub struct RebasingToken {
    id: TokenId,
    feed: Arc<dyn PriceFeed>,
    policy: RebaseSettings,
    /// Largest multiple of the initial supply representable in gons
    total_gons: u128,
    state: RwLock<RebaseState>,
}

impl RebasingToken {
    /// Create the token with `initial_supply` held entirely by `holder`
    pub fn new(
        id: impl Into<TokenId>,
        feed: Arc<dyn PriceFeed>,
        policy: RebaseSettings,
        holder: &Principal,
        initial_supply: Amount,
    ) -> TokenResult<Self> {
        if initial_supply == 0 {
            return Err(TokenError::ZeroAmount);
        }
        let total_gons = u128::MAX - (u128::MAX % initial_supply);
        let mut gons = HashMap::new();
        gons.insert(holder.clone(), total_gons);

        Ok(Self {
            id: id.into(),
            feed,
            policy,
            total_gons,
            state: RwLock::new(RebaseState {
                total_supply: initial_supply,
                gons_per_fragment: total_gons / initial_supply,
                gons,
                epoch: 0,
            }),
        })
    }

    pub fn epoch(&self) -> u64 {
        self.state.read().epoch
    }

    pub fn policy(&self) -> &RebaseSettings {
        &self.policy
    }

    /// Recompute the total supply from the latest published price
    ///
    /// Open to any caller. Only `1/lag` of the relative deviation from the
    /// target price is applied: `delta = supply * |p - t| / t / lag`.
    pub fn rebase(&self, sender: &Principal) -> TokenResult<RebaseOutcome> {
        let price = self.feed.latest_price().ok_or_else(|| TokenError::NoPrice {
            token: self.id.clone(),
        })?;
        let target = u128::from(self.policy.target_price);
        let lag = u128::from(self.policy.lag);

        let mut state = self.state.write();
        let previous_supply = state.total_supply;

        let deviation = price.abs_diff(target);
        let scaled = mul_div(previous_supply, deviation, target, Rounding::Down)?;
        let delta = mul_div(scaled, 1, lag, Rounding::Down)?;

        let total_supply = match price.cmp(&target) {
            Ordering::Greater => previous_supply
                .checked_add(delta)
                .ok_or(TokenError::ArithmeticOverflow)?
                .min(self.total_gons),
            Ordering::Less => previous_supply.saturating_sub(delta).max(1),
            Ordering::Equal => previous_supply,
        };

        state.total_supply = total_supply;
        state.gons_per_fragment = self.total_gons / total_supply;
        state.epoch += 1;

        info!(
            token = %self.id,
            %sender,
            epoch = state.epoch,
            price,
            previous_supply,
            total_supply,
            "rebased"
        );

        Ok(RebaseOutcome {
            epoch: state.epoch,
            price,
            previous_supply,
            total_supply,
        })
    }
}

impl Token for RebasingToken {
    fn id(&self) -> &TokenId {
        &self.id
    }

    fn kind(&self) -> TokenKind {
        TokenKind::Rebasing
    }

    fn total_supply(&self) -> Amount {
        self.state.read().total_supply
    }

    fn balance_of(&self, who: &Principal) -> Amount {
        let state = self.state.read();
        state.gons.get(who).copied().unwrap_or(0) / state.gons_per_fragment
    }

    fn transfer(&self, from: &Principal, to: &Principal, amount: Amount) -> TokenResult<()> {
        let mut state = self.state.write();
        let from_gons = state.gons.get(from).copied().unwrap_or(0);
        let gon_value = amount
            .checked_mul(state.gons_per_fragment)
            .ok_or(TokenError::ArithmeticOverflow)?;

        if from_gons < gon_value {
            return Err(TokenError::InsufficientBalance {
                token: self.id.clone(),
                holder: from.clone(),
                required: amount,
                available: from_gons / state.gons_per_fragment,
            });
        }
        if amount == 0 || from == to {
            return Ok(());
        }

        let to_gons = state.gons.get(to).copied().unwrap_or(0);
        let credited = to_gons
            .checked_add(gon_value)
            .ok_or(TokenError::ArithmeticOverflow)?;
        state.gons.insert(from.clone(), from_gons - gon_value);
        state.gons.insert(to.clone(), credited);

        debug!(token = %self.id, %from, %to, amount, "transfer");
        Ok(())
    }
}

impl fmt::Debug for RebasingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("RebasingToken")
            .field("id", &self.id)
            .field("policy", &self.policy)
            .field("total_supply", &state.total_supply)
            .field("epoch", &state.epoch)
            .finish()
    }
}
