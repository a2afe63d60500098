//! Cross-crate seams: price publication and block height
//!
//! The rebasing token reads prices without depending on the oracle crate,
//! and the staking vault reads block height without depending on any host.

use std::sync::atomic::{AtomicU64, Ordering};

/// Amount of any token, in its smallest indivisible unit
pub type Amount = u128;

/// Fixed-point scale for published prices (6 decimals, `1_000_000 == 1.0`)
pub const PRICE_SCALE: u128 = 1_000_000;

/// Source of the latest published price
pub trait PriceFeed: Send + Sync {
    /// Latest price scaled by [`PRICE_SCALE`], `None` until first publication
    fn latest_price(&self) -> Option<u128>;
}

/// Source of the current block height
pub trait Clock: Send + Sync {
    fn block_height(&self) -> u64;
}

/// Manually advanced block clock
///
/// Hosts advance it once per block; tests advance it to simulate elapsed
/// blocks.
#[derive(Debug, Default)]
pub struct BlockClock {
    height: AtomicU64,
}

impl BlockClock {
    pub fn new(height: u64) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Advance by `blocks` and return the new height
    pub fn advance(&self, blocks: u64) -> u64 {
        self.height.fetch_add(blocks, Ordering::SeqCst) + blocks
    }

    pub fn set(&self, height: u64) {
        self.height.store(height, Ordering::SeqCst);
    }
}

impl Clock for BlockClock {
    fn block_height(&self) -> u64 {
        self.height.load(Ordering::SeqCst)
    }
}
