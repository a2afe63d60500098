//! # Typed Name Identifiers
//!
//! String-backed identifiers for everything that holds or moves value in the
//! protocol: principals (user accounts and contract accounts) and tokens.
//!
//! Both wrap a plain `String` but are distinct types, so a token id can never
//! be passed where a principal is expected:
//!
//! ```rust
//! use types::{Principal, TokenId};
//!
//! let alice = Principal::new("SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7");
//! let elastic = TokenId::new("elastic-token");
//!
//! fn balance_of(_token: &TokenId, _who: &Principal) -> u128 { 0 }
//! assert_eq!(balance_of(&elastic, &alice), 0);
//! ```

use crate::common::errors::ValidationError;
use serde::{Deserialize, Serialize};

/// Generates a string-backed identifier newtype with validation helpers
macro_rules! define_typed_name {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier without validation
            pub fn new(name: impl Into<String>) -> Self {
                Self(name.into())
            }

            /// Create a new identifier, rejecting empty or whitespace-bearing names
            pub fn new_validated(name: impl Into<String>) -> Result<Self, ValidationError> {
                let name = name.into();
                if name.is_empty() {
                    return Err(ValidationError::EmptyName);
                }
                if name.chars().any(char::is_whitespace) {
                    return Err(ValidationError::InvalidCharacter { name });
                }
                Ok(Self(name))
            }

            /// Borrow the underlying name
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self(name.to_string())
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self(name)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_typed_name!(
    /// An account able to hold balances and call operations
    ///
    /// Users and contract accounts (pair custody, wrapper custody, vault
    /// custody) share this type.
    Principal
);

define_typed_name!(
    /// Stable identifier of a fungible token
    TokenId
);

impl Principal {
    /// Contract-owned account derived from a contract name
    ///
    /// Contract accounts are namespaced with a `contract:` prefix so they can
    /// never collide with a user principal.
    pub fn contract(name: impl AsRef<str>) -> Self {
        Self(format!("contract:{}", name.as_ref()))
    }

    /// Whether this principal was created by [`Principal::contract`]
    pub fn is_contract(&self) -> bool {
        self.0.starts_with("contract:")
    }
}
