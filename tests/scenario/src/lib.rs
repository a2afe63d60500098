//! # PairSwap Protocol Scenario
//!
//! Replays one full protocol session against in-memory state:
//!
//! 1. the treasury wraps native units and opens an elastic/wrapped pair
//! 2. alice buys elastic tokens, adds a position and stakes her shares
//! 3. bob and zoe trade back and forth for five rounds; after each round the
//!    oracle publishes a new price and the elastic token rebases
//! 4. alice unstakes and the treasury collects the pair's fees
//!
//! Every step advances the block clock by one block.

use anyhow::{ensure, Context, Result};
use exchange::{ExchangeResult, FeeCollection, LedgerSnapshot, PairRegistry, SwapOutcome};
use oracle::PriceOracle;
use protocol_config::ProtocolConfig;
use serde::Serialize;
use staking::{StakingVault, UnstakeOutcome};
use std::sync::Arc;
use tokens::{FungibleToken, RebaseOutcome, RebasingToken, Token, WrappedNative};
use tracing::info;
use types::{Amount, BlockClock, Clock, Principal, PriceFeed, TokenId};

/// Amounts used by the replay
pub mod amounts {
    use types::Amount;

    pub const ELASTIC_SUPPLY: Amount = 1_000_000_000_000_000;
    pub const POOL_SIDE: Amount = 50_000_000_000_000;
    pub const TREASURY_NATIVE: Amount = 60_000_000_000_000;
    pub const REWARD_RESERVE: Amount = 1_000_000_000_000;

    pub const ALICE_WRAP: Amount = 100_000_000_000;
    pub const ALICE_BUY: Amount = 40_000_000_000;
    pub const ALICE_DEPOSIT: Amount = 40_000_000_000;

    pub const TRADER_WRAP: Amount = 50_000_000_000;
    pub const ZOE_BUY: Amount = 50_000_000_000;
    pub const ROUND_TRADE: Amount = 2_000_000_000;

    /// Oracle prices published after each trading round
    pub const PRICES: [u128; 5] = [1_100_000, 1_150_000, 1_050_000, 950_000, 900_000];
}

/// Final state of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub elastic_supply: Amount,
    pub rebases: Vec<RebaseOutcome>,
    pub pair: LedgerSnapshot,
    pub alice_staked: Amount,
    /// Elastic tokens alice kept back when adding her position
    pub alice_idle_elastic: Amount,
    /// Alice's elastic balance once everything settled, rewards included
    pub alice_final_elastic: Amount,
    pub blocks_staked: u64,
    pub alice_unstake: UnstakeOutcome,
    pub collected: FeeCollection,
    pub swaps: usize,
}

struct Actors {
    treasury: Principal,
    alice: Principal,
    bob: Principal,
    zoe: Principal,
}

impl Actors {
    fn new() -> Self {
        Self {
            treasury: Principal::new("treasury"),
            alice: Principal::new("alice"),
            bob: Principal::new("bob"),
            zoe: Principal::new("zoe"),
        }
    }
}

/// Run the full scenario with the given protocol parameters
pub fn run(config: &ProtocolConfig) -> Result<ScenarioReport> {
    use amounts::*;

    let who = Actors::new();
    let clock = Arc::new(BlockClock::new(1));

    let native = Arc::new(
        FungibleToken::with_balances(
            "stx",
            [
                (&who.treasury, TREASURY_NATIVE),
                (&who.alice, ALICE_WRAP),
                (&who.bob, TRADER_WRAP),
                (&who.zoe, TRADER_WRAP),
            ],
        )
        .context("Failed to mint native balances")?,
    );
    let wrapped = Arc::new(WrappedNative::new("wrapped-stx", native.clone()));
    let oracle = Arc::new(PriceOracle::new(who.treasury.clone(), who.zoe.clone()));
    let feed: Arc<dyn PriceFeed> = oracle.clone();
    let elastic = Arc::new(
        RebasingToken::new(
            "elastic-token",
            feed,
            config.rebase,
            &who.treasury,
            ELASTIC_SUPPLY,
        )
        .context("Failed to create elastic token")?,
    );
    let shares = Arc::new(FungibleToken::new("elastic-wrapped-lp"));

    let registry = PairRegistry::from_config(who.treasury.clone(), config);
    let vault = StakingVault::new(
        "elastic-wrapped",
        config.staking,
        shares.clone(),
        elastic.clone(),
        clock.clone(),
    );
    let x = TokenId::new("elastic-token");
    let y = TokenId::new("wrapped-stx");

    wrapped
        .wrap(POOL_SIDE, &who.treasury)
        .context("treasury wrap")?;
    clock.advance(1);
    let created = registry
        .create_pair(
            elastic.clone(),
            wrapped.clone(),
            shares.clone(),
            "elastic-wrapped",
            POOL_SIDE,
            POOL_SIDE,
            &who.treasury,
        )
        .context("create pair")?;
    info!(shares = created.shares, "pair opened");
    vault
        .fund_rewards(REWARD_RESERVE, &who.treasury)
        .context("fund rewards")?;
    clock.advance(1);

    // k must never decrease across a swap
    let mut swaps = 0usize;
    let mut k = product(&registry, &x, &y)?;
    let mut checked_swap = |label: &str, result: ExchangeResult<SwapOutcome>| -> Result<()> {
        let outcome = result.with_context(|| format!("swap: {}", label))?;
        let next = product(&registry, &x, &y)?;
        ensure!(next >= k, "k decreased after {}: {} -> {}", label, k, next);
        info!(
            label,
            amount_in = outcome.amount_in,
            amount_out = outcome.amount_out,
            fee = outcome.fee,
            "swap settled"
        );
        k = next;
        swaps += 1;
        Ok(())
    };

    wrapped.wrap(ALICE_WRAP, &who.alice).context("alice wrap")?;
    clock.advance(1);
    checked_swap(
        "alice buys elastic",
        registry.swap_y_for_exact_x(&x, &y, ALICE_BUY, None, &who.alice),
    )?;
    clock.advance(1);
    registry
        .add_liquidity(&x, &y, ALICE_DEPOSIT, ALICE_DEPOSIT, &who.alice)
        .context("alice adds position")?;
    clock.advance(1);

    let alice_idle_elastic = elastic.balance_of(&who.alice);
    let alice_staked = shares.balance_of(&who.alice);
    vault
        .stake(alice_staked, &who.alice)
        .context("alice stakes")?;
    let staked_at = clock.block_height();
    clock.advance(1);

    wrapped.wrap(TRADER_WRAP, &who.bob).context("bob wrap")?;
    clock.advance(1);
    wrapped.wrap(TRADER_WRAP, &who.zoe).context("zoe wrap")?;
    clock.advance(1);
    checked_swap(
        "zoe buys elastic",
        registry.swap_exact_y_for_x(&x, &y, ZOE_BUY, None, &who.zoe),
    )?;
    clock.advance(1);

    let mut rebases = Vec::with_capacity(PRICES.len());
    for (round, price) in PRICES.iter().enumerate() {
        info!(round, "trading round");
        checked_swap(
            "bob buys elastic",
            registry.swap_exact_y_for_x(&x, &y, ROUND_TRADE, None, &who.bob),
        )?;
        clock.advance(1);
        checked_swap(
            "zoe sells elastic",
            registry.swap_exact_x_for_y(&x, &y, ROUND_TRADE, None, &who.zoe),
        )?;
        clock.advance(1);

        oracle
            .update_price(*price, &who.zoe)
            .context("oracle update")?;
        rebases.push(elastic.rebase(&who.zoe).context("rebase")?);
        clock.advance(1);
    }

    let blocks_staked = clock.block_height() - staked_at;
    let alice_unstake = vault.unstake(&who.alice).context("alice unstakes")?;
    clock.advance(1);

    registry
        .set_fee_recipient(&x, &y, who.treasury.clone(), &who.treasury)
        .context("set fee recipient")?;
    let collected = registry
        .collect_fees(&x, &y, &who.treasury)
        .context("collect fees")?;

    let report = ScenarioReport {
        elastic_supply: elastic.total_supply(),
        rebases,
        pair: registry.snapshot_of(&x, &y)?,
        alice_staked,
        alice_idle_elastic,
        alice_final_elastic: elastic.balance_of(&who.alice),
        blocks_staked,
        alice_unstake,
        collected,
        swaps,
    };
    info!(
        elastic_supply = report.elastic_supply,
        reward = report.alice_unstake.reward,
        alice_elastic = report.alice_final_elastic,
        swaps = report.swaps,
        "scenario complete"
    );
    Ok(report)
}

fn product(registry: &PairRegistry, x: &TokenId, y: &TokenId) -> Result<u128> {
    let (rx, ry) = registry.reserves_of(x, y)?;
    rx.checked_mul(ry).context("reserve product overflows u128")
}
