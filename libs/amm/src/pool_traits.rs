//! Pool trait definitions for a unified quoting interface

use crate::{MathError, SwapQuote, V2Math, V2PoolState};

/// Unified pool interface for swap quoting
pub trait AmmPool {
    /// Calculate output amount for given input
    fn get_amount_out(&self, amount_in: u128) -> Result<SwapQuote, MathError>;

    /// Calculate required input for desired output
    fn get_amount_in(&self, amount_out: u128) -> Result<SwapQuote, MathError>;

    /// Get current reserves as (input side, output side)
    fn get_liquidity(&self) -> (u128, u128);

    /// Get fee tier
    fn get_fee_bps(&self) -> u32;
}

impl AmmPool for V2PoolState {
    fn get_amount_out(&self, amount_in: u128) -> Result<SwapQuote, MathError> {
        V2Math::calculate_output_amount(amount_in, self.reserve_in, self.reserve_out, self.fee_bps)
    }

    fn get_amount_in(&self, amount_out: u128) -> Result<SwapQuote, MathError> {
        V2Math::calculate_input_amount(amount_out, self.reserve_in, self.reserve_out, self.fee_bps)
    }

    fn get_liquidity(&self) -> (u128, u128) {
        (self.reserve_in, self.reserve_out)
    }

    fn get_fee_bps(&self) -> u32 {
        self.fee_bps
    }
}

impl V2PoolState {
    /// The same pool seen from the other direction
    pub fn reversed(&self) -> Self {
        Self {
            reserve_in: self.reserve_out,
            reserve_out: self.reserve_in,
            fee_bps: self.fee_bps,
        }
    }
}
