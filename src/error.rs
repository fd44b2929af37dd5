//! Error taxonomy for the exchange module.
//!
//! Two classes of failure exist:
//!
//! - **User errors**: the transaction is rejected and leaves no trace in state.
//! - **Invariant violations**: escrow or store accounting no longer adds up.
//!   These are never swallowed; the host treats them as a consistency failure.

use thiserror::Error;

use crate::types::{Address, Amount, Denom};

/// Errors produced by the exchange state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("insufficient balance for {owner}: required {required}{denom}, available {available}{denom}")]
    InsufficientBalance {
        owner: Address,
        denom: Denom,
        required: Amount,
        available: Amount,
    },

    #[error("take amount {amount} is below the minimum fill threshold {threshold}")]
    BelowMinimumThreshold { amount: Amount, threshold: Amount },

    #[error("order {order_id} not found")]
    OrderNotFound { order_id: u64 },

    #[error("{sender} is not the owner of order {order_id}")]
    Unauthorized { order_id: u64, sender: Address },

    #[error("amount must be positive")]
    ZeroAmount,

    #[error("invalid denomination: {reason}")]
    InvalidDenomination { reason: String },

    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

impl ExchangeError {
    /// True for accounting corruption; false for ordinary rejections.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, ExchangeError::InvariantViolation(_))
    }

    /// Stable result code reported to the host alongside a rejected transaction.
    pub fn code(&self) -> u32 {
        match self {
            ExchangeError::InsufficientBalance { .. } => 1,
            ExchangeError::BelowMinimumThreshold { .. } => 2,
            ExchangeError::OrderNotFound { .. } => 3,
            ExchangeError::Unauthorized { .. } => 4,
            ExchangeError::ZeroAmount => 5,
            ExchangeError::InvalidDenomination { .. } => 6,
            ExchangeError::InvalidAddress { .. } => 7,
            ExchangeError::InvariantViolation(_) => 100,
        }
    }

    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        ExchangeError::InvariantViolation(msg.into())
    }
}

/// Errors returned by the raw query routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown query route: {0}")]
    UnknownRoute(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExchangeError::InsufficientBalance {
            owner: Address::from("alice"),
            denom: Denom::from("gard"),
            required: 100,
            available: 40,
        };
        assert_eq!(
            err.to_string(),
            "insufficient balance for alice: required 100gard, available 40gard"
        );
    }

    #[test]
    fn test_invariant_classification() {
        assert!(ExchangeError::invariant("frozen underflow").is_invariant_violation());
        assert!(!ExchangeError::ZeroAmount.is_invariant_violation());
        assert!(!ExchangeError::OrderNotFound { order_id: 1 }.is_invariant_violation());
    }

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            ExchangeError::InsufficientBalance {
                owner: Address::from("a1b"),
                denom: Denom::from("gard"),
                required: 1,
                available: 0,
            },
            ExchangeError::BelowMinimumThreshold { amount: 1, threshold: 2 },
            ExchangeError::OrderNotFound { order_id: 1 },
            ExchangeError::Unauthorized { order_id: 1, sender: Address::from("bob") },
            ExchangeError::ZeroAmount,
            ExchangeError::InvalidDenomination { reason: "x".into() },
            ExchangeError::InvalidAddress { reason: "x".into() },
            ExchangeError::invariant("x"),
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_query_error_from_exchange() {
        let err: QueryError = ExchangeError::OrderNotFound { order_id: 9 }.into();
        assert!(matches!(err, QueryError::Exchange(ExchangeError::OrderNotFound { order_id: 9 })));
    }
}
