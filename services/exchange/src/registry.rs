//! Pair Registry
//!
//! Maps each unordered token combination to exactly one [`PairLedger`].
//! Ledgers live behind `Arc<RwLock<..>>` in a `DashMap`, so operations on
//! different pairs never contend, while every operation on one pair holds
//! that pair's write lock for its whole duration.
//!
//! Lookups are orientation-strict: a pair created as (X, Y) is found for
//! `(x, y)` only. Asking for `(y, x)` yields `PairNotFound`, even though
//! creating (Y, X) is rejected as a duplicate.

use crate::error::{ExchangeError, ExchangeResult};
use crate::ledger::{FeeCollection, LedgerSnapshot, LiquidityOutcome, PairLedger, SwapOutcome};
use crate::pair::{Pair, PairInfo, PairKey, Side};
use crate::positions::Position;
use amm::{Decimal, SwapQuote};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use protocol_config::{ExchangeSettings, ProtocolConfig};
use std::sync::Arc;
use tokens::{ShareToken, Token};
use tracing::info;
use types::{Amount, Principal, TokenId};

/// Shared handle to one pair's ledger
pub type LedgerHandle = Arc<RwLock<PairLedger>>;

/// Registry of every pair of one exchange deployment
pub struct PairRegistry {
    /// Deployer; owner of every pair for privileged operations
    owner: Principal,
    settings: ExchangeSettings,
    pairs: DashMap<PairKey, LedgerHandle>,
}

impl PairRegistry {
    pub fn new(owner: Principal, settings: ExchangeSettings) -> Self {
        info!(%owner, fee_bps = settings.fee_bps, "pair registry created");
        Self {
            owner,
            settings,
            pairs: DashMap::new(),
        }
    }

    pub fn from_config(owner: Principal, config: &ProtocolConfig) -> Self {
        Self::new(owner, config.exchange)
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Register a pair and make its first deposit
    ///
    /// The pair is only registered once the deposit fully succeeded.
    #[allow(clippy::too_many_arguments)]
    pub fn create_pair(
        &self,
        token_x: Arc<dyn Token>,
        token_y: Arc<dyn Token>,
        share_token: Arc<dyn ShareToken>,
        name: impl Into<String>,
        dx0: Amount,
        dy0: Amount,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        let pair = Pair::new(token_x, token_y, share_token, name);
        match self.pairs.entry(pair.key()) {
            Entry::Occupied(_) => Err(ExchangeError::PairAlreadyExists {
                token_x: pair.token_x.id().clone(),
                token_y: pair.token_y.id().clone(),
            }),
            Entry::Vacant(slot) => {
                let (ledger, outcome) = PairLedger::create(
                    pair,
                    self.owner.clone(),
                    &self.settings,
                    dx0,
                    dy0,
                    sender,
                )?;
                slot.insert(Arc::new(RwLock::new(ledger)));
                Ok(outcome)
            }
        }
    }

    /// Ledger of the pair created as `(x, y)`
    pub fn ledger(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<LedgerHandle> {
        let not_found = || ExchangeError::PairNotFound {
            token_x: x.clone(),
            token_y: y.clone(),
        };
        // Clone the handle out so the map shard is released before locking
        let handle = self
            .pairs
            .get(&PairKey::new(x, y))
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(not_found)?;
        if !handle.read().pair().matches(x, y) {
            return Err(not_found());
        }
        Ok(handle)
    }

    fn with_ledger<T>(
        &self,
        x: &TokenId,
        y: &TokenId,
        f: impl FnOnce(&PairLedger) -> ExchangeResult<T>,
    ) -> ExchangeResult<T> {
        let handle = self.ledger(x, y)?;
        let ledger = handle.read();
        f(&ledger)
    }

    fn with_ledger_mut<T>(
        &self,
        x: &TokenId,
        y: &TokenId,
        f: impl FnOnce(&mut PairLedger) -> ExchangeResult<T>,
    ) -> ExchangeResult<T> {
        let handle = self.ledger(x, y)?;
        let mut ledger = handle.write();
        f(&mut ledger)
    }

    pub fn add_liquidity(
        &self,
        x: &TokenId,
        y: &TokenId,
        dx: Amount,
        dy: Amount,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.add_liquidity(dx, dy, sender))
    }

    pub fn remove_liquidity(
        &self,
        x: &TokenId,
        y: &TokenId,
        percent: u8,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.remove_liquidity(percent, sender))
    }

    pub fn remove_shares(
        &self,
        x: &TokenId,
        y: &TokenId,
        shares: Amount,
        sender: &Principal,
    ) -> ExchangeResult<LiquidityOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.remove_shares(shares, sender))
    }

    pub fn swap_exact_x_for_y(
        &self,
        x: &TokenId,
        y: &TokenId,
        dx: Amount,
        min_out: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.swap_exact_x_for_y(dx, min_out, sender))
    }

    pub fn swap_x_for_exact_y(
        &self,
        x: &TokenId,
        y: &TokenId,
        dy: Amount,
        max_in: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.swap_x_for_exact_y(dy, max_in, sender))
    }

    pub fn swap_exact_y_for_x(
        &self,
        x: &TokenId,
        y: &TokenId,
        dy: Amount,
        min_out: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.swap_exact_y_for_x(dy, min_out, sender))
    }

    pub fn swap_y_for_exact_x(
        &self,
        x: &TokenId,
        y: &TokenId,
        dx: Amount,
        max_in: Option<Amount>,
        sender: &Principal,
    ) -> ExchangeResult<SwapOutcome> {
        self.with_ledger_mut(x, y, |ledger| ledger.swap_y_for_exact_x(dx, max_in, sender))
    }

    pub fn set_fee_recipient(
        &self,
        x: &TokenId,
        y: &TokenId,
        recipient: Principal,
        sender: &Principal,
    ) -> ExchangeResult<()> {
        self.with_ledger_mut(x, y, |ledger| ledger.set_fee_recipient(recipient, sender))
    }

    pub fn reset_fee_recipient(
        &self,
        x: &TokenId,
        y: &TokenId,
        sender: &Principal,
    ) -> ExchangeResult<()> {
        self.with_ledger_mut(x, y, |ledger| ledger.reset_fee_recipient(sender))
    }

    pub fn collect_fees(
        &self,
        x: &TokenId,
        y: &TokenId,
        sender: &Principal,
    ) -> ExchangeResult<FeeCollection> {
        self.with_ledger_mut(x, y, |ledger| ledger.collect_fees(sender))
    }

    pub fn fee_recipient(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<Option<Principal>> {
        self.with_ledger(x, y, |ledger| Ok(ledger.fee_recipient().cloned()))
    }

    pub fn reserves_of(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<(Amount, Amount)> {
        self.with_ledger(x, y, |ledger| Ok(ledger.reserves()))
    }

    pub fn fees_of(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<(Amount, Amount)> {
        self.with_ledger(x, y, |ledger| Ok(ledger.fees()))
    }

    pub fn total_shares_of(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<Amount> {
        self.with_ledger(x, y, |ledger| Ok(ledger.total_shares()))
    }

    pub fn snapshot_of(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<LedgerSnapshot> {
        self.with_ledger(x, y, |ledger| Ok(ledger.snapshot()))
    }

    pub fn position_of(
        &self,
        who: &Principal,
        x: &TokenId,
        y: &TokenId,
    ) -> ExchangeResult<Position> {
        self.with_ledger(x, y, |ledger| ledger.position_of(who))
    }

    pub fn balances_of(
        &self,
        who: &Principal,
        x: &TokenId,
        y: &TokenId,
    ) -> ExchangeResult<(Amount, Amount)> {
        self.with_ledger(x, y, |ledger| ledger.balances_of(who))
    }

    pub fn quote_exact_in(
        &self,
        x: &TokenId,
        y: &TokenId,
        side_in: Side,
        amount_in: Amount,
    ) -> ExchangeResult<SwapQuote> {
        self.with_ledger(x, y, |ledger| ledger.quote_exact_in(side_in, amount_in))
    }

    pub fn quote_exact_out(
        &self,
        x: &TokenId,
        y: &TokenId,
        side_in: Side,
        amount_out: Amount,
    ) -> ExchangeResult<SwapQuote> {
        self.with_ledger(x, y, |ledger| ledger.quote_exact_out(side_in, amount_out))
    }

    pub fn spot_price(&self, x: &TokenId, y: &TokenId) -> ExchangeResult<Option<Decimal>> {
        self.with_ledger(x, y, |ledger| Ok(ledger.spot_price()))
    }

    pub fn price_impact(
        &self,
        x: &TokenId,
        y: &TokenId,
        side_in: Side,
        amount_in: Amount,
    ) -> ExchangeResult<Decimal> {
        self.with_ledger(x, y, |ledger| ledger.price_impact(side_in, amount_in))
    }

    /// Every registered pair, ordered by key
    pub fn pairs(&self) -> Vec<PairInfo> {
        let mut handles: Vec<(PairKey, LedgerHandle)> = self
            .pairs
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));
        handles
            .into_iter()
            .map(|(_, handle)| handle.read().pair().info())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
