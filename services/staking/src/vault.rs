//! Reward vault with a block-linear emission
//!
//! A fixed `reward_per_block` is split pro rata across all stakers through
//! an accumulated reward-per-share index. Each position remembers the index
//! value it last settled at (`reward_debt`), so settling is O(1) per staker
//! no matter how many blocks passed.

use crate::error::{VaultError, VaultResult};
use amm::{checked_add, checked_sub, mul_div, Rounding};
use parking_lot::Mutex;
use protocol_config::protocol::staking::REWARD_INDEX_SCALE;
use protocol_config::StakingSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokens::Token;
use tracing::{error, info, warn};
use types::{Amount, Clock, Principal};

/// One staker's position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub amount: Amount,
    /// Index-weighted amount already settled
    pub reward_debt: u128,
    /// Settled but not yet paid out
    pub accrued: Amount,
}

/// What an unstake returned to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnstakeOutcome {
    pub staked: Amount,
    pub reward: Amount,
    /// Part of the earned reward the vault could not cover
    pub unpaid: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RewardIndex {
    acc_reward_per_share: u128,
    last_reward_block: u64,
}

#[derive(Debug)]
struct VaultState {
    index: RewardIndex,
    total_staked: Amount,
    positions: HashMap<Principal, StakePosition>,
}

pub struct StakingVault {
    settings: StakingSettings,
    staking_token: Arc<dyn Token>,
    reward_token: Arc<dyn Token>,
    custody: Principal,
    clock: Arc<dyn Clock>,
    state: Mutex<VaultState>,
}

impl StakingVault {
    pub fn new(
        name: &str,
        settings: StakingSettings,
        staking_token: Arc<dyn Token>,
        reward_token: Arc<dyn Token>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let start = clock.block_height();
        Self {
            settings,
            staking_token,
            reward_token,
            custody: Principal::contract(format!("vault:{}", name)),
            clock,
            state: Mutex::new(VaultState {
                index: RewardIndex {
                    acc_reward_per_share: 0,
                    last_reward_block: start,
                },
                total_staked: 0,
                positions: HashMap::new(),
            }),
        }
    }

    /// Account holding staked tokens and the reward reserve
    pub fn custody(&self) -> &Principal {
        &self.custody
    }

    pub fn total_staked(&self) -> Amount {
        self.state.lock().total_staked
    }

    pub fn position_of(&self, who: &Principal) -> Option<StakePosition> {
        self.state.lock().positions.get(who).copied()
    }

    /// Move reward tokens into the vault's reserve
    pub fn fund_rewards(&self, amount: Amount, sender: &Principal) -> VaultResult<()> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        self.reward_token.transfer(sender, &self.custody, amount)?;
        info!(%sender, amount, "reward reserve funded");
        Ok(())
    }

    /// Lock `amount` staking tokens from `sender`
    ///
    /// Rewards earned so far on an existing position are settled into
    /// `accrued` before the stake grows.
    pub fn stake(&self, amount: Amount, sender: &Principal) -> VaultResult<StakePosition> {
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }
        let mut state = self.state.lock();
        let index = self.advance_index(&state)?;

        let mut position = state.positions.get(sender).copied().unwrap_or_default();
        position.accrued = checked_add(position.accrued, earned(&position, &index)?)?;
        position.amount = checked_add(position.amount, amount)?;
        position.reward_debt = settled(position.amount, &index)?;
        let total_staked = checked_add(state.total_staked, amount)?;

        self.staking_token.transfer(sender, &self.custody, amount)?;

        state.index = index;
        state.total_staked = total_staked;
        state.positions.insert(sender.clone(), position);

        info!(%sender, amount, total_staked, "staked");
        Ok(position)
    }

    /// Return the whole stake of `sender` plus every reward it earned
    ///
    /// The reward is capped by what the reserve holds; the shortfall is
    /// reported in [`UnstakeOutcome::unpaid`] and forfeited.
    pub fn unstake(&self, sender: &Principal) -> VaultResult<UnstakeOutcome> {
        let mut state = self.state.lock();
        let position = match state.positions.get(sender) {
            Some(p) if p.amount > 0 => *p,
            _ => {
                return Err(VaultError::NothingStaked {
                    holder: sender.clone(),
                })
            }
        };
        let index = self.advance_index(&state)?;

        let owed = checked_add(position.accrued, earned(&position, &index)?)?;
        let reserve = self.reward_reserve(&state);
        let reward = owed.min(reserve);
        if reward < owed {
            warn!(%sender, owed, reserve, "reward reserve short, paying what is available");
        }
        let total_staked = checked_sub(state.total_staked, position.amount)?;

        self.staking_token
            .transfer(&self.custody, sender, position.amount)?;
        if let Err(e) = self.reward_token.transfer(&self.custody, sender, reward) {
            if let Err(revert) = self
                .staking_token
                .transfer(sender, &self.custody, position.amount)
            {
                error!(%sender, error = %revert, "failed to revert stake return");
            }
            return Err(e.into());
        }

        state.index = index;
        state.total_staked = total_staked;
        state.positions.remove(sender);

        info!(%sender, staked = position.amount, reward, "unstaked");
        Ok(UnstakeOutcome {
            staked: position.amount,
            reward,
            unpaid: owed - reward,
        })
    }

    /// Reward `who` would receive if it unstaked at the current block
    pub fn pending_reward(&self, who: &Principal) -> VaultResult<Amount> {
        let state = self.state.lock();
        let Some(position) = state.positions.get(who) else {
            return Ok(0);
        };
        let index = self.advance_index(&state)?;
        Ok(checked_add(position.accrued, earned(position, &index)?)?)
    }

    /// Reward tokens available for payout
    ///
    /// When the staking and reward token are the same, staked principal is
    /// not part of the reserve.
    fn reward_reserve(&self, state: &VaultState) -> Amount {
        let held = self.reward_token.balance_of(&self.custody);
        if self.reward_token.id() == self.staking_token.id() {
            held.saturating_sub(state.total_staked)
        } else {
            held
        }
    }

    /// Index brought forward to the current block, not yet stored
    fn advance_index(&self, state: &VaultState) -> VaultResult<RewardIndex> {
        let now = self.clock.block_height();
        let mut index = state.index;
        if now <= index.last_reward_block {
            return Ok(index);
        }
        if state.total_staked > 0 {
            let blocks = u128::from(now - index.last_reward_block);
            let emitted = blocks
                .checked_mul(u128::from(self.settings.reward_per_block))
                .ok_or(VaultError::ArithmeticOverflow)?;
            let per_share = mul_div(
                emitted,
                REWARD_INDEX_SCALE,
                state.total_staked,
                Rounding::Down,
            )?;
            index.acc_reward_per_share = checked_add(index.acc_reward_per_share, per_share)?;
        }
        index.last_reward_block = now;
        Ok(index)
    }
}

fn settled(amount: Amount, index: &RewardIndex) -> VaultResult<u128> {
    Ok(mul_div(
        amount,
        index.acc_reward_per_share,
        REWARD_INDEX_SCALE,
        Rounding::Down,
    )?)
}

/// Reward accrued since the position last settled
fn earned(position: &StakePosition, index: &RewardIndex) -> VaultResult<Amount> {
    let total = settled(position.amount, index)?;
    Ok(total.saturating_sub(position.reward_debt))
}

impl fmt::Debug for StakingVault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StakingVault")
            .field("custody", &self.custody)
            .field("staking_token", self.staking_token.id())
            .field("reward_token", self.reward_token.id())
            .field("settings", &self.settings)
            .finish()
    }
}
