//! Constant-product (x*y=k) AMM math with exact integer calculations
//!
//! All quantities are `u128` amounts in the tokens' smallest units. The fee
//! is taken from the input side and never re-enters the pricing formula, so
//! a quote returns both the gross input and the net amount that reaches the
//! reserves.

use crate::fixed_point::{checked_add, checked_sub, isqrt, mul_div, MathError, Rounding};
use protocol_config::BPS_DENOMINATOR;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Reserves and fee structure of one pool direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct V2PoolState {
    pub reserve_in: u128,
    pub reserve_out: u128,
    pub fee_bps: u32, // Fee in basis points (30 = 0.3%)
}

/// Result of pricing one swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Gross amount the caller pays
    pub amount_in: u128,
    /// Part of `amount_in` diverted to the fee balance
    pub fee: u128,
    /// Part of `amount_in` credited to the input reserve
    pub net_in: u128,
    /// Amount the caller receives
    pub amount_out: u128,
}

/// Constant-product math functions
pub struct V2Math;

impl V2Math {
    /// Fee charged on a gross input amount, rounded up
    pub fn fee_on(amount_in: u128, fee_bps: u32) -> Result<u128, MathError> {
        mul_div(amount_in, u128::from(fee_bps), BPS_DENOMINATOR, Rounding::Up)
    }

    /// Price a swap with a fixed input amount
    ///
    /// `amount_out = floor(reserve_out * net_in / (reserve_in + net_in))`
    /// where `net_in = amount_in - fee_on(amount_in)`.
    pub fn calculate_output_amount(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee_bps: u32,
    ) -> Result<SwapQuote, MathError> {
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::EmptyReserves);
        }

        let fee = Self::fee_on(amount_in, fee_bps)?;
        let net_in = checked_sub(amount_in, fee)?;
        let denominator = checked_add(reserve_in, net_in)?;
        let amount_out = mul_div(reserve_out, net_in, denominator, Rounding::Down)?;

        Ok(SwapQuote {
            amount_in,
            fee,
            net_in,
            amount_out,
        })
    }

    /// Price a swap with a fixed output amount (reverse calculation)
    ///
    /// The net input needed to keep `k` is rounded up, then grossed up for
    /// the fee, again rounding up, so the pool is never shorted.
    pub fn calculate_input_amount(
        amount_out: u128,
        reserve_in: u128,
        reserve_out: u128,
        fee_bps: u32,
    ) -> Result<SwapQuote, MathError> {
        if reserve_in == 0 || reserve_out == 0 {
            return Err(MathError::EmptyReserves);
        }
        if amount_out >= reserve_out {
            return Err(MathError::InsufficientReserve {
                requested: amount_out,
                reserve: reserve_out,
            });
        }

        let required_net = mul_div(
            reserve_in,
            amount_out,
            reserve_out - amount_out,
            Rounding::Up,
        )?;
        let fee_complement = checked_sub(BPS_DENOMINATOR, u128::from(fee_bps))?;
        let amount_in = mul_div(required_net, BPS_DENOMINATOR, fee_complement, Rounding::Up)?;
        let fee = Self::fee_on(amount_in, fee_bps)?;
        let net_in = checked_sub(amount_in, fee)?;

        Ok(SwapQuote {
            amount_in,
            fee,
            net_in,
            amount_out,
        })
    }

    /// Amount of token B matching `amount_a` at the current reserve ratio
    pub fn quote(
        amount_a: u128,
        reserve_a: u128,
        reserve_b: u128,
        rounding: Rounding,
    ) -> Result<u128, MathError> {
        if reserve_a == 0 || reserve_b == 0 {
            return Err(MathError::EmptyReserves);
        }
        mul_div(amount_a, reserve_b, reserve_a, rounding)
    }

    /// Geometric-mean share supply for a pool's first deposit
    pub fn initial_shares(amount_x: u128, amount_y: u128) -> Result<u128, MathError> {
        let product = amount_x
            .checked_mul(amount_y)
            .ok_or(MathError::ArithmeticOverflow)?;
        Ok(isqrt(product))
    }

    /// Shares minted for a ratio-matched deposit, the smaller of both sides
    pub fn shares_for_deposit(
        amount_x: u128,
        amount_y: u128,
        reserve_x: u128,
        reserve_y: u128,
        total_shares: u128,
    ) -> Result<u128, MathError> {
        let by_x = mul_div(amount_x, total_shares, reserve_x, Rounding::Down)?;
        let by_y = mul_div(amount_y, total_shares, reserve_y, Rounding::Down)?;
        Ok(by_x.min(by_y))
    }

    /// Reserve amount redeemable for `shares` out of `total_shares`
    pub fn redeemable(shares: u128, reserve: u128, total_shares: u128) -> Result<u128, MathError> {
        mul_div(reserve, shares, total_shares, Rounding::Down)
    }

    /// Spot price of the input token in output-token units (display only)
    pub fn spot_price(reserve_in: u128, reserve_out: u128) -> Option<Decimal> {
        let reserve_in = Decimal::from_u128(reserve_in)?;
        let reserve_out = Decimal::from_u128(reserve_out)?;
        if reserve_in.is_zero() {
            return None;
        }
        reserve_out.checked_div(reserve_in)
    }

    /// Calculate price impact of a trade, as a percentage (display only)
    pub fn calculate_price_impact(
        amount_in: u128,
        reserve_in: u128,
        reserve_out: u128,
    ) -> Result<Decimal, MathError> {
        // Price impact ignores the fee
        let quote = Self::calculate_output_amount(amount_in, reserve_in, reserve_out, 0)?;

        let price_before =
            Self::spot_price(reserve_in, reserve_out).ok_or(MathError::ArithmeticOverflow)?;
        let price_after = Self::spot_price(
            checked_add(reserve_in, quote.net_in)?,
            checked_sub(reserve_out, quote.amount_out)?,
        )
        .unwrap_or(Decimal::ZERO);

        // A price below Decimal's resolution reads as zero
        let impact = (price_before - price_after)
            .abs()
            .checked_div(price_before)
            .ok_or(MathError::DivisionByZero)?;
        impact
            .checked_mul(dec!(100))
            .ok_or(MathError::ArithmeticOverflow)
    }
}
