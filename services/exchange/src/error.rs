//! Exchange error types

use amm::MathError;
use thiserror::Error;
use tokens::TokenError;
use types::{Principal, TokenId};

/// Failures of pair registry and pair ledger operations
///
/// Every variant is returned before any state change, or after the
/// rollback journal has reverted the token movements already applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("pair {token_x}/{token_y} already exists")]
    PairAlreadyExists { token_x: TokenId, token_y: TokenId },

    #[error("no pair {token_x}/{token_y}")]
    PairNotFound { token_x: TokenId, token_y: TokenId },

    #[error("cannot pair {token} with itself")]
    IdenticalTokens { token: TokenId },

    #[error("share token {token} already has holders or trades in the pair")]
    ShareTokenInUse { token: TokenId },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    #[error("holds {available} shares, needs {required}")]
    InsufficientShares { required: u128, available: u128 },

    #[error("percentage must be within 1..=100, got {percent}")]
    InvalidPercentage { percent: u8 },

    #[error("pair has no liquidity")]
    NoLiquidityError,

    #[error("swap needs {required} input, limit is {max_in}")]
    ExcessiveInputRequired { required: u128, max_in: u128 },

    #[error("swap yields {amount_out}, minimum is {min_out}")]
    InsufficientOutput { amount_out: u128, min_out: u128 },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("token transfer failed: {0}")]
    TransferError(#[from] TokenError),

    #[error("{sender} is not the pair owner")]
    NotOwnerError { sender: Principal },

    #[error("no fee recipient set")]
    NoFeeRecipientSet,
}

impl From<MathError> for ExchangeError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::EmptyReserves => ExchangeError::NoLiquidityError,
            MathError::InsufficientReserve { .. } => ExchangeError::InsufficientLiquidity,
            MathError::ArithmeticOverflow | MathError::Underflow | MathError::DivisionByZero => {
                ExchangeError::ArithmeticOverflow
            }
        }
    }
}

pub type ExchangeResult<T> = Result<T, ExchangeError>;
