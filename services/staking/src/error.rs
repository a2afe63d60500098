//! Staking vault errors

use amm::MathError;
use thiserror::Error;
use tokens::TokenError;
use types::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("amount must be positive")]
    ZeroAmount,

    #[error("{holder} has nothing staked")]
    NothingStaked { holder: Principal },

    #[error("token transfer failed: {0}")]
    Token(#[from] TokenError),

    #[error("reward arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<MathError> for VaultError {
    fn from(_: MathError) -> Self {
        VaultError::ArithmeticOverflow
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
