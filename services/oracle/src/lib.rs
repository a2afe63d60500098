//! # PairSwap Price Oracle
//!
//! Publishes one price at 6 decimals ([`types::PRICE_SCALE`]). Only the
//! authorized reporter may publish; only the owner may replace the reporter.
//! Consumers read it through [`types::PriceFeed`].

use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use types::{Principal, PriceFeed};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("{sender} is not the authorized price reporter")]
    NotReporter { sender: Principal },

    #[error("{sender} is not the oracle owner")]
    NotOwner { sender: Principal },
}

/// Snapshot of the published price
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Latest price, `None` before the first publication
    pub price: Option<u128>,
    /// Number of accepted updates
    pub updates: u64,
}

#[derive(Debug)]
pub struct PriceOracle {
    owner: Principal,
    reporter: RwLock<Principal>,
    record: RwLock<PriceRecord>,
}

impl PriceOracle {
    pub fn new(owner: Principal, reporter: Principal) -> Self {
        Self {
            owner,
            reporter: RwLock::new(reporter),
            record: RwLock::new(PriceRecord::default()),
        }
    }

    pub fn owner(&self) -> &Principal {
        &self.owner
    }

    pub fn reporter(&self) -> Principal {
        self.reporter.read().clone()
    }

    /// Publish a new price (6 decimals)
    pub fn update_price(&self, value: u128, sender: &Principal) -> Result<(), OracleError> {
        if *sender != *self.reporter.read() {
            warn!(%sender, value, "price update rejected");
            return Err(OracleError::NotReporter {
                sender: sender.clone(),
            });
        }
        let mut record = self.record.write();
        record.price = Some(value);
        record.updates += 1;
        info!(price = value, updates = record.updates, "price updated");
        Ok(())
    }

    pub fn set_reporter(&self, reporter: Principal, sender: &Principal) -> Result<(), OracleError> {
        if *sender != self.owner {
            warn!(%sender, "reporter change rejected");
            return Err(OracleError::NotOwner {
                sender: sender.clone(),
            });
        }
        info!(%reporter, "price reporter changed");
        *self.reporter.write() = reporter;
        Ok(())
    }

    pub fn price(&self) -> Option<u128> {
        self.record.read().price
    }

    pub fn record(&self) -> PriceRecord {
        *self.record.read()
    }

    /// Latest price as a decimal number (display only)
    pub fn price_decimal(&self) -> Option<Decimal> {
        let price = i64::try_from(self.price()?).ok()?;
        Some(Decimal::new(price, 6))
    }
}

impl PriceFeed for PriceOracle {
    fn latest_price(&self) -> Option<u128> {
        self.price()
    }
}
