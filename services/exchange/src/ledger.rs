//! Pair Ledger
//!
//! Per-pair state: reserves of X and Y, the segregated fee balances, the
//! mirrored share supply and the fee recipient. Every mutating operation
//! follows the same sequence:
//!
//! 1. validate amounts, caller balances and slippage bounds
//! 2. compute the new reserves/fees/shares with checked integer math
//! 3. move tokens through the rollback journal
//! 4. write the ledger fields, only after every movement succeeded
//!
//! A failure at any step leaves the ledger and every token balance as they
//! were before the call.

use crate::error::{ExchangeError, ExchangeResult};
use crate::journal::atomically;
use crate::pair::{Pair, Side};
use amm::{checked_add, checked_sub, mul_div, AmmPool, Decimal, Rounding, SwapQuote, V2Math, V2PoolState};
use protocol_config::{ExchangeSettings, PERCENT_DENOMINATOR};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokens::{Token, TokenError};
use tracing::{debug, info, warn};
use types::{Amount, Principal};

/// Amounts moved by a liquidity operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityOutcome {
    pub amount_x: Amount,
    pub amount_y: Amount,
    /// Shares minted to or burned from the caller
    pub shares: Amount,
}

/// Amounts moved by a swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// Side the caller paid in
    pub side_in: Side,
    /// Gross input, fee included
    pub amount_in: Amount,
    pub fee: Amount,
    pub amount_out: Amount,
}

impl SwapOutcome {
    /// Amounts as (X moved, Y moved)
    pub fn amounts(&self) -> (Amount, Amount) {
        match self.side_in {
            Side::X => (self.amount_in, self.amount_out),
            Side::Y => (self.amount_out, self.amount_in),
        }
    }
}

/// Fees paid out by one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeCollection {
    pub fee_x: Amount,
    pub fee_y: Amount,
    pub recipient: Principal,
}

/// Point-in-time copy of the ledger's accounting fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub reserve_x: Amount,
    pub reserve_y: Amount,
    pub fee_x: Amount,
    pub fee_y: Amount,
    pub total_shares: Amount,
}

#[derive(Debug)]
pub struct PairLedger {
    pair: Pair,
    owner: Principal,
    fee_bps: u32,
    minimum_liquidity: Amount,
    reserve_x: Amount,
    reserve_y: Amount,
    fee_x: Amount,
    fee_y: Amount,
    total_shares: Amount,
    fee_recipient: Option<Principal>,
}

impl PairLedger {
    /// Open a pair with its first deposit
    ///
    /// Mints `floor(sqrt(dx0 * dy0))` shares; `minimum_liquidity` of them go
    /// to the pair's own account and stay locked there.
    pub fn create(
        pair: Pair,
        owner: Principal,
        settings: &ExchangeSettings,
        dx0: Amount,
        dy0: Amount,
        sender: &Principal,
    ) -> ExchangeResult<(Self, LiquidityOutcome)> {
        if pair.token_x.id() == pair.token_y.id() {
            return Err(ExchangeError::IdenticalTokens {
                token: pair.token_x.id().clone(),
            });
        }
        // Shares must be backed by this pair's reserves alone
        let share_id = pair.share_token.id();
        if share_id == pair.token_x.id()
            || share_id == pair.token_y.id()
            || pair.share_token.total_supply() != 0
        {
            return Err(ExchangeError::ShareTokenInUse {
                token: share_id.clone(),
            });
        }
        if dx0 == 0 || dy0 == 0 {
            return Err(ExchangeError::ZeroAmount);
        }

        let shares0 = V2Math::initial_shares(dx0, dy0)?;
        let minimum = u128::from(settings.minimum_liquidity);
        if shares0 <= minimum {
            return Err(ExchangeError::InsufficientLiquidity);
        }
        let caller_shares = shares0 - minimum;

        ensure_balance(&pair.token_x, sender, dx0)?;
        ensure_balance(&pair.token_y, sender, dy0)?;

        atomically(|journal| {
            journal.transfer(&pair.token_x, sender, &pair.account, dx0)?;
            journal.transfer(&pair.token_y, sender, &pair.account, dy0)?;
            journal.mint(&pair.share_token, &pair.account, minimum)?;
            journal.mint(&pair.share_token, sender, caller_shares)
        })?;

        info!(
            pair = %pair.name,
            %sender,
            dx0,
            dy0,
            shares = shares0,
            locked = minimum,
            "pair created"
        );

        let ledger = Self {
            pair,
            owner,
            fee_bps: settings.fee_bps,
            minimum_liquidity: minimum,
            reserve_x: dx0,
            reserve_y: dy0,
            fee_x: 0,
            fee_y: 0,
            total_shares: shares0,
            fee_recipient: None,
        };
        Ok((
            ledger,
            LiquidityOutcome {
                amount_x: dx0,
                amount_y: dy0,
                shares: caller_shares,
            },
        ))
    }

    /// Deposit at the current reserve ratio, consuming at most `dx` and `dy`
    pub fn add_liquidity(
        &mut self,
        dx: Amount,
        dy: Amount,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        if dx == 0 || dy == 0 {
            return Err(ExchangeError::ZeroAmount);
        }
        self.ensure_liquidity()?;

        let (rx, ry) = (self.reserve_x, self.reserve_y);
        let matched_y = V2Math::quote(dx, rx, ry, Rounding::Up)?;
        let (ax, ay) = if matched_y <= dy {
            (dx, matched_y)
        } else {
            let matched_x = V2Math::quote(dy, ry, rx, Rounding::Up)?;
            if matched_x > dx {
                return Err(ExchangeError::InsufficientLiquidity);
            }
            (matched_x, dy)
        };

        let minted = V2Math::shares_for_deposit(ax, ay, rx, ry, self.total_shares)?;
        if minted == 0 {
            return Err(ExchangeError::InsufficientLiquidity);
        }
        let reserve_x = checked_add(rx, ax)?;
        let reserve_y = checked_add(ry, ay)?;
        let total_shares = checked_add(self.total_shares, minted)?;

        ensure_balance(&self.pair.token_x, sender, ax)?;
        ensure_balance(&self.pair.token_y, sender, ay)?;

        let pair = &self.pair;
        atomically(|journal| {
            journal.transfer(&pair.token_x, sender, &pair.account, ax)?;
            journal.transfer(&pair.token_y, sender, &pair.account, ay)?;
            journal.mint(&pair.share_token, sender, minted)
        })?;

        self.reserve_x = reserve_x;
        self.reserve_y = reserve_y;
        self.total_shares = total_shares;

        info!(pair = %self.pair.name, %sender, amount_x = ax, amount_y = ay, shares = minted, "liquidity added");
        Ok(LiquidityOutcome {
            amount_x: ax,
            amount_y: ay,
            shares: minted,
        })
    }

    /// Burn `percent` (1..=100) of the caller's shares
    pub fn remove_liquidity(
        &mut self,
        percent: u8,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        if percent == 0 || u128::from(percent) > PERCENT_DENOMINATOR {
            return Err(ExchangeError::InvalidPercentage { percent });
        }
        let balance = self.pair.share_token.balance_of(sender);
        let burn = mul_div(balance, u128::from(percent), PERCENT_DENOMINATOR, Rounding::Down)?;
        if burn == 0 {
            return Err(ExchangeError::InsufficientShares {
                required: 1,
                available: balance,
            });
        }
        self.remove_shares(burn, sender)
    }

    /// Burn exactly `shares` of the caller's shares
    pub fn remove_shares(
        &mut self,
        shares: Amount,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        if shares == 0 {
            return Err(ExchangeError::ZeroAmount);
        }
        self.ensure_liquidity()?;
        let available = self.pair.share_token.balance_of(sender);
        if available < shares {
            return Err(ExchangeError::InsufficientShares {
                required: shares,
                available,
            });
        }

        let out_x = V2Math::redeemable(shares, self.reserve_x, self.total_shares)?;
        let out_y = V2Math::redeemable(shares, self.reserve_y, self.total_shares)?;
        if out_x == 0 || out_y == 0 {
            return Err(ExchangeError::InsufficientLiquidity);
        }
        let reserve_x = checked_sub(self.reserve_x, out_x)?;
        let reserve_y = checked_sub(self.reserve_y, out_y)?;
        let total_shares = checked_sub(self.total_shares, shares)?;

        let pair = &self.pair;
        atomically(|journal| {
            journal.burn(&pair.share_token, sender, shares)?;
            journal.transfer(&pair.token_x, &pair.account, sender, out_x)?;
            journal.transfer(&pair.token_y, &pair.account, sender, out_y)
        })?;

        self.reserve_x = reserve_x;
        self.reserve_y = reserve_y;
        self.total_shares = total_shares;

        info!(pair = %self.pair.name, %sender, amount_x = out_x, amount_y = out_y, shares, "liquidity removed");
        Ok(LiquidityOutcome {
            amount_x: out_x,
            amount_y: out_y,
            shares,
        })
    }

    pub fn swap_exact_x_for_y(
        &mut self,
        dx: Amount,
        min_out: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.swap_exact_in(Side::X, dx, min_out, sender)
    }

    pub fn swap_x_for_exact_y(
        &mut self,
        dy: Amount,
        max_in: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.swap_exact_out(Side::X, dy, max_in, sender)
    }

    pub fn swap_exact_y_for_x(
        &mut self,
        dy: Amount,
        min_out: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.swap_exact_in(Side::Y, dy, min_out, sender)
    }

    pub fn swap_y_for_exact_x(
        &mut self,
        dx: Amount,
        max_in: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.swap_exact_out(Side::Y, dx, max_in, sender)
    }

    /// Sell exactly `amount_in` of `side_in`
    pub fn swap_exact_in(
        &mut self,
        side_in: Side,
        amount_in: Amount,
        min_out: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        if amount_in == 0 {
            return Err(ExchangeError::ZeroAmount);
        }
        let quote = self.pool_state(side_in).get_amount_out(amount_in)?;
        let min_out = min_out.unwrap_or(0).max(1);
        if quote.amount_out < min_out {
            return Err(ExchangeError::InsufficientOutput {
                amount_out: quote.amount_out,
                min_out,
            });
        }
        self.settle_swap(side_in, quote, sender)
    }

    /// Buy exactly `amount_out` of the side opposite `side_in`
    pub fn swap_exact_out(
        &mut self,
        side_in: Side,
        amount_out: Amount,
        max_in: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        if amount_out == 0 {
            return Err(ExchangeError::ZeroAmount);
        }
        let quote = self.pool_state(side_in).get_amount_in(amount_out)?;
        if let Some(max_in) = max_in {
            if quote.amount_in > max_in {
                return Err(ExchangeError::ExcessiveInputRequired {
                    required: quote.amount_in,
                    max_in,
                });
            }
        }
        self.settle_swap(side_in, quote, sender)
    }

    fn settle_swap(
        &mut self,
        side_in: Side,
        quote: SwapQuote,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        let (reserve_in, reserve_out) = self.oriented_reserves(side_in);
        let new_in = checked_add(reserve_in, quote.net_in)?;
        let new_out = checked_sub(reserve_out, quote.amount_out)?;
        let new_fee = checked_add(self.fee_balance(side_in), quote.fee)?;

        let token_in = self.pair.token(side_in);
        let token_out = self.pair.token(side_in.other());
        ensure_balance(token_in, sender, quote.amount_in)?;

        let account = &self.pair.account;
        atomically(|journal| {
            journal.transfer(token_in, sender, account, quote.amount_in)?;
            journal.transfer(token_out, account, sender, quote.amount_out)
        })?;

        match side_in {
            Side::X => {
                self.reserve_x = new_in;
                self.reserve_y = new_out;
                self.fee_x = new_fee;
            }
            Side::Y => {
                self.reserve_y = new_in;
                self.reserve_x = new_out;
                self.fee_y = new_fee;
            }
        }

        debug!(
            pair = %self.pair.name,
            %sender,
            ?side_in,
            amount_in = quote.amount_in,
            fee = quote.fee,
            net_in = quote.net_in,
            amount_out = quote.amount_out,
            "swap settled"
        );
        Ok(SwapOutcome {
            side_in,
            amount_in: quote.amount_in,
            fee: quote.fee,
            amount_out: quote.amount_out,
        })
    }

    pub fn set_fee_recipient(
        &mut self,
        recipient: Principal,
        sender: &Principal,
    ) -> ExchangeResult<()> {
        self.ensure_owner(sender)?;
        info!(pair = %self.pair.name, %recipient, "fee recipient set");
        self.fee_recipient = Some(recipient);
        Ok(())
    }

    pub fn reset_fee_recipient(&mut self, sender: &Principal) -> ExchangeResult<()> {
        self.ensure_owner(sender)?;
        info!(pair = %self.pair.name, "fee recipient cleared");
        self.fee_recipient = None;
        Ok(())
    }

    /// Pay both fee balances to the fee recipient; open to any caller
    pub fn collect_fees(&mut self, sender: &Principal) -> ExchangeResult<FeeCollection> {
        let recipient = self
            .fee_recipient
            .clone()
            .ok_or(ExchangeError::NoFeeRecipientSet)?;
        let (fee_x, fee_y) = (self.fee_x, self.fee_y);
        if fee_x == 0 && fee_y == 0 {
            return Ok(FeeCollection {
                fee_x,
                fee_y,
                recipient,
            });
        }

        let pair = &self.pair;
        atomically(|journal| {
            journal.transfer(&pair.token_x, &pair.account, &recipient, fee_x)?;
            journal.transfer(&pair.token_y, &pair.account, &recipient, fee_y)
        })?;

        self.fee_x = 0;
        self.fee_y = 0;

        info!(pair = %self.pair.name, %sender, %recipient, fee_x, fee_y, "fees collected");
        Ok(FeeCollection {
            fee_x,
            fee_y,
            recipient,
        })
    }

    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn fee_bps(&self) -> u32 {
        self.fee_bps
    }

    pub fn minimum_liquidity(&self) -> Amount {
        self.minimum_liquidity
    }

    pub fn fee_recipient(&self) -> Option<&Principal> {
        self.fee_recipient.as_ref()
    }

    /// Reserves as (X, Y), fees excluded
    pub fn reserves(&self) -> (Amount, Amount) {
        (self.reserve_x, self.reserve_y)
    }

    /// Uncollected fees as (X, Y)
    pub fn fees(&self) -> (Amount, Amount) {
        (self.fee_x, self.fee_y)
    }

    pub fn total_shares(&self) -> Amount {
        self.total_shares
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            reserve_x: self.reserve_x,
            reserve_y: self.reserve_y,
            fee_x: self.fee_x,
            fee_y: self.fee_y,
            total_shares: self.total_shares,
        }
    }

    /// Price selling `amount_in` of `side_in` without touching state
    pub fn quote_exact_in(&self, side_in: Side, amount_in: Amount) -> ExchangeResult<SwapQuote> {
        Ok(self.pool_state(side_in).get_amount_out(amount_in)?)
    }

    /// Price buying `amount_out` of the opposite side without touching state
    pub fn quote_exact_out(&self, side_in: Side, amount_out: Amount) -> ExchangeResult<SwapQuote> {
        Ok(self.pool_state(side_in).get_amount_in(amount_out)?)
    }

    /// Y per X at the current reserves (display only)
    pub fn spot_price(&self) -> Option<Decimal> {
        V2Math::spot_price(self.reserve_x, self.reserve_y)
    }

    /// Percentage move of the spot price caused by selling `amount_in`
    pub fn price_impact(&self, side_in: Side, amount_in: Amount) -> ExchangeResult<Decimal> {
        let (reserve_in, reserve_out) = self.oriented_reserves(side_in);
        Ok(V2Math::calculate_price_impact(amount_in, reserve_in, reserve_out)?)
    }

    fn pool_state(&self, side_in: Side) -> V2PoolState {
        let (reserve_in, reserve_out) = self.oriented_reserves(side_in);
        V2PoolState {
            reserve_in,
            reserve_out,
            fee_bps: self.fee_bps,
        }
    }

    fn oriented_reserves(&self, side_in: Side) -> (Amount, Amount) {
        match side_in {
            Side::X => (self.reserve_x, self.reserve_y),
            Side::Y => (self.reserve_y, self.reserve_x),
        }
    }

    fn fee_balance(&self, side: Side) -> Amount {
        match side {
            Side::X => self.fee_x,
            Side::Y => self.fee_y,
        }
    }

    pub(crate) fn ensure_liquidity(&self) -> ExchangeResult<()> {
        if self.total_shares == 0 || self.reserve_x == 0 || self.reserve_y == 0 {
            return Err(ExchangeError::NoLiquidityError);
        }
        Ok(())
    }

    fn ensure_owner(&self, sender: &Principal) -> ExchangeResult<()> {
        if *sender != self.owner {
            warn!(pair = %self.pair.name, %sender, "privileged call rejected");
            return Err(ExchangeError::NotOwnerError {
                sender: sender.clone(),
            });
        }
        Ok(())
    }
}

/// Fail before any movement when `who` cannot pay `amount`
fn ensure_balance(token: &Arc<dyn Token>, who: &Principal, amount: Amount) -> ExchangeResult<()> {
    let available = token.balance_of(who);
    if available < amount {
        return Err(TokenError::InsufficientBalance {
            token: token.id().clone(),
            holder: who.clone(),
            required: amount,
            available,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokens::{FungibleToken, ShareToken};
    use types::TokenId;

    struct Fixture {
        x: Arc<FungibleToken>,
        y: Arc<FungibleToken>,
        lp: Arc<FungibleToken>,
        owner: Principal,
        alice: Principal,
    }

    fn fixture(balance: Amount) -> Fixture {
        let owner = Principal::new("deployer");
        let alice = Principal::new("alice");
        Fixture {
            x: Arc::new(FungibleToken::with_balances("x", [(&alice, balance)]).unwrap()),
            y: Arc::new(FungibleToken::with_balances("y", [(&alice, balance)]).unwrap()),
            lp: Arc::new(FungibleToken::new("lp")),
            owner,
            alice,
        }
    }

    impl Fixture {
        fn pair(&self) -> Pair {
            Pair::new(self.x.clone(), self.y.clone(), self.lp.clone(), "x-y")
        }

        fn ledger(&self, dx0: Amount, dy0: Amount) -> PairLedger {
            let (ledger, _) = PairLedger::create(
                self.pair(),
                self.owner.clone(),
                &ExchangeSettings::default(),
                dx0,
                dy0,
                &self.alice,
            )
            .unwrap();
            ledger
        }
    }

    #[test]
    fn test_create_locks_minimum_liquidity() {
        let f = fixture(1_000_000);
        let (ledger, outcome) = PairLedger::create(
            f.pair(),
            f.owner.clone(),
            &ExchangeSettings::default(),
            10_000,
            40_000,
            &f.alice,
        )
        .unwrap();

        assert_eq!(ledger.total_shares(), 20_000);
        assert_eq!(outcome.shares, 19_000);
        assert_eq!(f.lp.balance_of(&f.alice), 19_000);
        assert_eq!(f.lp.balance_of(&ledger.pair().account), 1_000);
        assert_eq!(ledger.reserves(), (10_000, 40_000));
        assert_eq!(f.x.balance_of(&ledger.pair().account), 10_000);
    }

    #[test]
    fn test_create_rejects_tiny_deposit() {
        let f = fixture(1_000_000);
        // sqrt(1_000 * 1_000) == MINIMUM_LIQUIDITY
        let err = PairLedger::create(
            f.pair(),
            f.owner.clone(),
            &ExchangeSettings::default(),
            1_000,
            1_000,
            &f.alice,
        )
        .unwrap_err();
        assert_eq!(err, ExchangeError::InsufficientLiquidity);
        assert_eq!(f.x.balance_of(&f.alice), 1_000_000);
        assert_eq!(f.lp.total_supply(), 0);
    }

    #[test]
    fn test_create_rejects_identical_tokens() {
        let f = fixture(1_000_000);
        let pair = Pair::new(f.x.clone(), f.x.clone(), f.lp.clone(), "x-x");
        assert_matches!(
            PairLedger::create(pair, f.owner.clone(), &ExchangeSettings::default(), 5_000, 5_000, &f.alice),
            Err(ExchangeError::IdenticalTokens { .. })
        );
    }

    #[test]
    fn test_create_rejects_share_token_with_supply() {
        let f = fixture(1_000_000);
        f.lp.mint(&f.alice, 1).unwrap();
        assert_matches!(
            PairLedger::create(f.pair(), f.owner.clone(), &ExchangeSettings::default(), 50_000, 50_000, &f.alice),
            Err(ExchangeError::ShareTokenInUse { token }) if token == TokenId::new("lp")
        );
        assert_eq!(f.x.balance_of(&f.alice), 1_000_000);
        assert_eq!(f.lp.total_supply(), 1);
    }

    #[test]
    fn test_create_rejects_traded_token_as_share_token() {
        let f = fixture(1_000_000);
        let empty = Arc::new(FungibleToken::new("lp"));
        let pair = Pair::new(f.x.clone(), empty.clone(), empty, "x-lp");
        assert_matches!(
            PairLedger::create(pair, f.owner.clone(), &ExchangeSettings::default(), 50_000, 50_000, &f.alice),
            Err(ExchangeError::ShareTokenInUse { .. })
        );
    }

    #[test]
    fn test_overflowing_swaps_leave_ledger_untouched() {
        // k = 2^127 fits, but swap intermediates do not
        let dx0: Amount = 1 << 110;
        let dy0: Amount = 1 << 17;
        let f = fixture(1 << 120);
        let mut ledger = f.ledger(dx0, dy0);
        let before = ledger.snapshot();

        // reserve_x * net overflows on the output leg
        assert_eq!(
            ledger.swap_exact_y_for_x(1 << 20, None, &f.alice),
            Err(ExchangeError::ArithmeticOverflow)
        );
        // required net * 10_000 overflows on the fee gross-up
        assert_eq!(
            ledger.swap_x_for_exact_y(dy0 - 1, None, &f.alice),
            Err(ExchangeError::ArithmeticOverflow)
        );

        assert_eq!(ledger.snapshot(), before);
        assert_eq!(f.x.balance_of(&f.alice), (1 << 120) - dx0);
        assert_eq!(f.y.balance_of(&f.alice), (1 << 120) - dy0);
    }

    #[test]
    fn test_add_liquidity_consumes_matched_amounts() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(100_000, 50_000);

        // Y offered exceeds the match for X
        let outcome = ledger.add_liquidity(10_000, 9_000, &f.alice).unwrap();
        assert_eq!((outcome.amount_x, outcome.amount_y), (10_000, 5_000));
        // T = floor(sqrt(5e9)) = 70_710
        assert_eq!(outcome.shares, 7_071);

        // X offered exceeds the match for Y
        let outcome = ledger.add_liquidity(50_000, 1_000, &f.alice).unwrap();
        assert_eq!((outcome.amount_x, outcome.amount_y), (2_000, 1_000));
        assert_eq!(ledger.reserves(), (112_000, 56_000));
    }

    #[test]
    fn test_add_liquidity_too_small_to_mint() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 4_000_000);
        let before = ledger.snapshot();
        // Consumes (1, 1) but floor(1 * T / reserve_y) is zero
        assert_eq!(
            ledger.add_liquidity(1, 1, &f.alice),
            Err(ExchangeError::InsufficientLiquidity)
        );
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_remove_liquidity_percentages() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(40_000, 10_000);
        // T = 20_000, alice holds 19_000

        let outcome = ledger.remove_liquidity(50, &f.alice).unwrap();
        assert_eq!(outcome.shares, 9_500);
        assert_eq!((outcome.amount_x, outcome.amount_y), (19_000, 4_750));
        assert_eq!(ledger.total_shares(), 10_500);

        assert_eq!(
            ledger.remove_liquidity(0, &f.alice),
            Err(ExchangeError::InvalidPercentage { percent: 0 })
        );
        assert_eq!(
            ledger.remove_liquidity(101, &f.alice),
            Err(ExchangeError::InvalidPercentage { percent: 101 })
        );
        assert_matches!(
            ledger.remove_shares(9_501, &f.alice),
            Err(ExchangeError::InsufficientShares {
                required: 9_501,
                available: 9_500
            })
        );
        assert_matches!(
            ledger.remove_liquidity(100, &Principal::new("nobody")),
            Err(ExchangeError::InsufficientShares { .. })
        );
    }

    #[test]
    fn test_swap_exact_in_segregates_fee() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(500_020, 250_010);

        let outcome = ledger.swap_exact_x_for_y(10_000, None, &f.alice).unwrap();
        assert_eq!(outcome.fee, 30);
        assert_eq!(outcome.amount_out, 4_887);
        assert_eq!(outcome.amounts(), (10_000, 4_887));
        assert_eq!(ledger.reserves(), (509_990, 245_123));
        assert_eq!(ledger.fees(), (30, 0));
        // The pair account holds reserves plus fees
        assert_eq!(f.x.balance_of(&ledger.pair().account), 510_020);
    }

    #[test]
    fn test_swap_exact_out_charges_rounded_input() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(471_653, 265_113);

        let outcome = ledger.swap_x_for_exact_y(25_000, Some(49_256), &f.alice).unwrap();
        assert_eq!(outcome.amount_in, 49_256);
        assert_eq!(outcome.fee, 148);
        assert_eq!(outcome.amount_out, 25_000);
        assert_eq!(ledger.fees(), (148, 0));
    }

    #[test]
    fn test_slippage_bounds_leave_state_unchanged() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 1_000_000);
        let before = ledger.snapshot();

        assert_matches!(
            ledger.swap_exact_y_for_x(1_000, Some(1_000), &f.alice),
            Err(ExchangeError::InsufficientOutput { .. })
        );
        assert_matches!(
            ledger.swap_y_for_exact_x(1_000, Some(1_000), &f.alice),
            Err(ExchangeError::ExcessiveInputRequired { .. })
        );
        assert_eq!(
            ledger.swap_y_for_exact_x(1_000_000, None, &f.alice),
            Err(ExchangeError::InsufficientLiquidity)
        );
        assert_eq!(ledger.swap_exact_x_for_y(0, None, &f.alice), Err(ExchangeError::ZeroAmount));
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn test_zero_output_swap_rejected() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 2_000);
        assert_matches!(
            ledger.swap_exact_x_for_y(100, None, &f.alice),
            Err(ExchangeError::InsufficientOutput { amount_out: 0, .. })
        );
    }

    #[test]
    fn test_zero_reserve_rejects_every_swap() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 1_000_000);
        ledger.reserve_y = 0;

        assert_eq!(ledger.swap_exact_x_for_y(10, None, &f.alice), Err(ExchangeError::NoLiquidityError));
        assert_eq!(ledger.swap_x_for_exact_y(10, None, &f.alice), Err(ExchangeError::NoLiquidityError));
        assert_eq!(ledger.swap_exact_y_for_x(10, None, &f.alice), Err(ExchangeError::NoLiquidityError));
        assert_eq!(ledger.swap_y_for_exact_x(10, None, &f.alice), Err(ExchangeError::NoLiquidityError));
    }

    #[test]
    fn test_fee_recipient_is_owner_only() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 1_000_000);
        let treasury = Principal::new("treasury");

        assert_eq!(
            ledger.set_fee_recipient(treasury.clone(), &f.alice),
            Err(ExchangeError::NotOwnerError {
                sender: f.alice.clone()
            })
        );
        assert_eq!(ledger.fee_recipient(), None);
        assert_eq!(ledger.collect_fees(&f.alice), Err(ExchangeError::NoFeeRecipientSet));

        ledger.set_fee_recipient(treasury.clone(), &f.owner).unwrap();
        assert_eq!(ledger.fee_recipient(), Some(&treasury));
        ledger.reset_fee_recipient(&f.owner).unwrap();
        assert_eq!(ledger.fee_recipient(), None);
    }

    #[test]
    fn test_collect_fees_pays_and_zeroes() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 1_000_000);
        let treasury = Principal::new("treasury");
        ledger.set_fee_recipient(treasury.clone(), &f.owner).unwrap();

        ledger.swap_exact_x_for_y(10_000, None, &f.alice).unwrap();
        ledger.swap_exact_y_for_x(20_000, None, &f.alice).unwrap();

        let collected = ledger.collect_fees(&f.alice).unwrap();
        assert_eq!((collected.fee_x, collected.fee_y), (30, 60));
        assert_eq!(f.x.balance_of(&treasury), 30);
        assert_eq!(f.y.balance_of(&treasury), 60);
        assert_eq!(ledger.fees(), (0, 0));

        let again = ledger.collect_fees(&f.alice).unwrap();
        assert_eq!((again.fee_x, again.fee_y), (0, 0));
        assert_eq!(f.x.balance_of(&treasury), 30);
    }

    #[test]
    fn test_failed_share_mint_rolls_back_deposit() {
        let f = fixture(10_000_000);
        let mut ledger = f.ledger(1_000_000, 1_000_000);
        // Saturate the share token so the next mint overflows
        f.lp.mint(&Principal::new("whale"), u128::MAX - f.lp.total_supply()).unwrap();
        let before = ledger.snapshot();
        let alice_x = f.x.balance_of(&f.alice);

        assert_matches!(
            ledger.add_liquidity(1_000, 1_000, &f.alice),
            Err(ExchangeError::TransferError(TokenError::ArithmeticOverflow))
        );
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(f.x.balance_of(&f.alice), alice_x);
    }

    #[test]
    fn test_views() {
        let f = fixture(10_000_000);
        let ledger = f.ledger(1_000, 4_000_000);
        assert_eq!(ledger.spot_price(), Some(Decimal::from(4_000)));
        assert_eq!(ledger.fee_bps(), 30);
        assert_eq!(ledger.minimum_liquidity(), 1_000);
        let quote = ledger.quote_exact_in(Side::Y, 4_000).unwrap();
        assert_eq!(quote.fee, 12);
        assert!(ledger.price_impact(Side::X, 100).unwrap() > Decimal::ZERO);
    }
}
