//! Denominations, addresses and coins.
//!
//! Denominations follow the ledger's coin naming rule: 3 to 16 characters,
//! a lowercase ASCII letter followed by lowercase letters or digits.
//! Addresses are opaque lowercase alphanumeric account identifiers.
//!
//! Both are thin `String` newtypes. Construction never validates; stateless
//! message validation calls [`Denom::validate`] / [`Address::validate`] so that
//! decoded messages can be rejected with a typed error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::types::amount::Amount;

/// Minimum denomination length.
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum denomination length.
pub const MAX_DENOM_LEN: usize = 16;

/// Maximum address length (bech32 upper bound).
pub const MAX_ADDRESS_LEN: usize = 90;

// ============================================================================
// Denom
// ============================================================================

/// Name of a fungible asset, e.g. `gard`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denom(String);

impl Denom {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the coin naming rule.
    pub fn validate(&self) -> Result<(), ExchangeError> {
        let s = self.0.as_str();
        if s.len() < MIN_DENOM_LEN || s.len() > MAX_DENOM_LEN {
            return Err(ExchangeError::InvalidDenomination {
                reason: format!(
                    "{:?} must be {}..={} characters",
                    s, MIN_DENOM_LEN, MAX_DENOM_LEN
                ),
            });
        }

        let mut chars = s.chars();
        let first_ok = chars.next().map_or(false, |c| c.is_ascii_lowercase());
        let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !first_ok || !rest_ok {
            return Err(ExchangeError::InvalidDenomination {
                reason: format!("{:?} must match [a-z][a-z0-9]*", s),
            });
        }
        Ok(())
    }
}

impl From<&str> for Denom {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Denom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Address
// ============================================================================

/// Account identifier of an order owner or taker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn validate(&self) -> Result<(), ExchangeError> {
        let s = self.0.as_str();
        if s.is_empty() {
            return Err(ExchangeError::InvalidAddress {
                reason: "address is empty".to_string(),
            });
        }
        if s.len() > MAX_ADDRESS_LEN {
            return Err(ExchangeError::InvalidAddress {
                reason: format!("address longer than {} characters", MAX_ADDRESS_LEN),
            });
        }
        if !s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            return Err(ExchangeError::InvalidAddress {
                reason: format!("{:?} contains characters outside [a-z0-9]", s),
            });
        }
        Ok(())
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Coin
// ============================================================================

/// A quantity of one denomination.
///
/// Serialized to JSON as `{"denom":"gard","amount":"1000"}`; the amount is a
/// string so 128-bit values survive JSON consumers.
///
/// ```
/// use token_exchange::types::Coin;
///
/// let coin: Coin = "1000gard".parse().unwrap();
/// assert_eq!(coin.amount, 1000);
/// assert_eq!(coin.denom.as_str(), "gard");
/// assert_eq!(coin.to_string(), "1000gard");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coin {
    pub denom: Denom,
    #[serde(with = "amount_string")]
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: Denom::new(denom),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same denomination, different amount.
    pub fn with_amount(&self, amount: Amount) -> Self {
        Self {
            denom: self.denom.clone(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = ExchangeError;

    /// Parse `"<integer><denom>"`, e.g. `"800apple"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| ExchangeError::InvalidDenomination {
                reason: format!("{:?} has no denomination", s),
            })?;
        let (digits, denom) = s.split_at(split);
        if digits.is_empty() {
            return Err(ExchangeError::ZeroAmount);
        }

        let amount: Amount = digits.parse().map_err(|_| ExchangeError::InvalidDenomination {
            reason: format!("{:?} amount is out of range", s),
        })?;
        let denom = Denom::from(denom);
        denom.validate()?;

        Ok(Coin { denom, amount })
    }
}

/// Serde helper rendering an `Amount` as a decimal string.
pub mod amount_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::types::amount::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<Amount>().map_err(de::Error::custom)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denom_validate() {
        assert!(Denom::from("gard").validate().is_ok());
        assert!(Denom::from("apple2").validate().is_ok());
        assert!(Denom::from("abc").validate().is_ok());

        assert!(Denom::from("ab").validate().is_err());
        assert!(Denom::from("2abc").validate().is_err());
        assert!(Denom::from("Gard").validate().is_err());
        assert!(Denom::from("ga/rd").validate().is_err());
        assert!(Denom::from("abcdefghijklmnopq").validate().is_err());
    }

    #[test]
    fn test_address_validate() {
        assert!(Address::from("gard1qyz8").validate().is_ok());
        assert!(matches!(
            Address::from("").validate(),
            Err(ExchangeError::InvalidAddress { .. })
        ));
        assert!(Address::from("alice/bob").validate().is_err());
        assert!(Address::new("a".repeat(MAX_ADDRESS_LEN + 1)).validate().is_err());
    }

    #[test]
    fn test_coin_parse() {
        let coin: Coin = "100gard".parse().unwrap();
        assert_eq!(coin, Coin::new("gard", 100));

        let coin: Coin = " 800apple ".parse().unwrap();
        assert_eq!(coin, Coin::new("apple", 800));
    }

    #[test]
    fn test_coin_parse_rejects() {
        assert!(matches!("gard".parse::<Coin>(), Err(ExchangeError::ZeroAmount)));
        assert!("100".parse::<Coin>().is_err());
        assert!("100GARD".parse::<Coin>().is_err());
        assert!("999999999999999999999999999999999999999999gard".parse::<Coin>().is_err());
    }

    #[test]
    fn test_coin_json() {
        let coin = Coin::new("gard", 1000);
        let json = serde_json::to_string(&coin).unwrap();
        assert_eq!(json, r#"{"denom":"gard","amount":"1000"}"#);

        let back: Coin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, coin);
    }

    #[test]
    fn test_coin_json_large_amount() {
        let coin = Coin::new("wei", u128::MAX);
        let json = serde_json::to_string(&coin).unwrap();
        let back: Coin = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount, u128::MAX);
    }
}
