//! Matching engine for the exchange.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Same input always produces same output
//! 2. **Integer Math**: Proportional fills use a 256-bit intermediate and floor
//! 3. **Pure Computation**: The engine never reads or writes state
//!
//! ## Matching Rules
//!
//! - A take covering the remaining target **fully fills** the order
//! - A smaller take at or above the threshold **partially fills** it
//! - A smaller take below the threshold is **rejected**
//! - Rounding remainders stay with the owner
//!
//! ## Example
//!
//! ```
//! use token_exchange::engine::{match_take, FillThreshold};
//! use token_exchange::types::{Address, Coin, Order};
//!
//! let order = Order::new(1, Address::from("alice"), Coin::new("gard", 1000), Coin::new("apple", 500), 0);
//! let threshold = FillThreshold::Fixed { amount: 100 }.threshold_for(&order);
//!
//! let fill = match_take(Some(&order), 500, threshold).unwrap();
//! assert!(fill.is_full());
//! assert_eq!(fill.supply_paid, 1000);
//! ```

pub mod matcher;

pub use matcher::{match_take, FillKind, MatchResult};

use serde::{Deserialize, Serialize};

use crate::types::amount::ceil_div;
use crate::types::{Amount, Order};

/// How the minimum partial-fill threshold of a take is chosen.
///
/// Configured as `{ policy = "one_supply_unit" }` or
/// `{ policy = "fixed", amount = 100 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FillThreshold {
    /// Smallest take that buys at least one base unit of supply:
    /// `ceil(target / supply)`
    #[default]
    OneSupplyUnit,

    /// Same threshold for every order, in target base units
    Fixed { amount: u64 },
}

impl FillThreshold {
    pub fn threshold_for(&self, order: &Order) -> Amount {
        match self {
            FillThreshold::OneSupplyUnit => {
                ceil_div(order.target.amount, order.supply.amount).unwrap_or(order.target.amount)
            }
            FillThreshold::Fixed { amount } => Amount::from(*amount),
        }
    }
}
