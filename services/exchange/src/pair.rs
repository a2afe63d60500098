//! Pair identity
//!
//! A pair is stored once per unordered token combination under a
//! [`PairKey`], but keeps the (X, Y) orientation it was created with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokens::{ShareToken, Token};
use types::{Principal, TokenId};

/// Canonical registry key, token ids ordered lexicographically
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(TokenId, TokenId);

impl PairKey {
    pub fn new(a: &TokenId, b: &TokenId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, self.1)
    }
}

/// Side of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    X,
    Y,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::X => Side::Y,
            Side::Y => Side::X,
        }
    }
}

/// Tokens and custody account of one pair
#[derive(Clone)]
pub struct Pair {
    pub token_x: Arc<dyn Token>,
    pub token_y: Arc<dyn Token>,
    pub share_token: Arc<dyn ShareToken>,
    pub name: String,
    /// Contract account holding reserves, fees and the locked shares
    pub account: Principal,
}

impl Pair {
    pub fn new(
        token_x: Arc<dyn Token>,
        token_y: Arc<dyn Token>,
        share_token: Arc<dyn ShareToken>,
        name: impl Into<String>,
    ) -> Self {
        let account = Principal::contract(format!("pair:{}/{}", token_x.id(), token_y.id()));
        Self {
            token_x,
            token_y,
            share_token,
            name: name.into(),
            account,
        }
    }

    pub fn key(&self) -> PairKey {
        PairKey::new(self.token_x.id(), self.token_y.id())
    }

    pub fn token(&self, side: Side) -> &Arc<dyn Token> {
        match side {
            Side::X => &self.token_x,
            Side::Y => &self.token_y,
        }
    }

    /// Whether `(x, y)` names this pair in its creation orientation
    pub fn matches(&self, x: &TokenId, y: &TokenId) -> bool {
        self.token_x.id() == x && self.token_y.id() == y
    }

    pub fn info(&self) -> PairInfo {
        PairInfo {
            token_x: self.token_x.id().clone(),
            token_y: self.token_y.id().clone(),
            share_token: self.share_token.id().clone(),
            name: self.name.clone(),
            account: self.account.clone(),
        }
    }
}

impl fmt::Debug for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pair")
            .field("token_x", self.token_x.id())
            .field("token_y", self.token_y.id())
            .field("share_token", self.share_token.id())
            .field("name", &self.name)
            .finish()
    }
}

/// Serializable description of a registered pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairInfo {
    pub token_x: TokenId,
    pub token_y: TokenId,
    pub share_token: TokenId,
    pub name: String,
    pub account: Principal,
}
