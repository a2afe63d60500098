//! Token error types

use amm::MathError;
use thiserror::Error;
use types::{Principal, TokenId};

/// Errors raised by token operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("{holder} holds {available} {token}, needs {required}")]
    InsufficientBalance {
        token: TokenId,
        holder: Principal,
        required: u128,
        available: u128,
    },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("token arithmetic overflow")]
    ArithmeticOverflow,

    /// The rebasing token's price feed never published
    #[error("no price published for {token}")]
    NoPrice { token: TokenId },
}

impl From<MathError> for TokenError {
    fn from(_: MathError) -> Self {
        TokenError::ArithmeticOverflow
    }
}

pub type TokenResult<T> = Result<T, TokenError>;
