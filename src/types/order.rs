//! Order type for the exchange.
//!
//! An order offers `supply` in exchange for `target`. Both amounts shrink as
//! the order is filled: `target.amount` is the part still owed to the owner and
//! `supply.amount` is the part still held in escrow for takers.
//!
//! ## Lifecycle
//!
//! ```text
//! Open --take (partial)--> Open
//! Open --take (full)-----> Filled     (removed from the store)
//! Open --withdraw--------> Withdrawn  (removed from the store)
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::types::amount::Amount;
use crate::types::coin::{Address, Coin};

/// A standing offer to exchange `supply` for `target`.
///
/// ## Example
///
/// ```
/// use token_exchange::types::{Address, Coin, Order};
///
/// let order = Order::new(
///     1,                          // id
///     Address::from("alice"),     // owner
///     Coin::new("gard", 1000),    // supply
///     Coin::new("apple", 500),    // target
///     10,                         // created_at (block time)
/// );
/// assert!(!order.is_filled());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier, never reused
    #[serde(rename = "order_id")]
    pub id: u64,

    /// Account that created the order and receives settlement or refunds
    pub owner: Address,

    /// Asset still on offer (held in escrow)
    pub supply: Coin,

    /// Asset still owed to the owner
    pub target: Coin,

    /// Logical block time at creation
    pub created_at: u64,
}

impl Order {
    pub fn new(id: u64, owner: Address, supply: Coin, target: Coin, created_at: u64) -> Self {
        Self {
            id,
            owner,
            supply,
            target,
            created_at,
        }
    }

    /// An order with nothing left to receive is terminal.
    pub fn is_filled(&self) -> bool {
        self.target.amount == 0
    }

    /// Reduce the order by a partial fill.
    ///
    /// `supply_paid` leaves escrow towards the taker, `target_settled` is what
    /// the owner received for it.
    pub fn apply_fill(
        &mut self,
        supply_paid: Amount,
        target_settled: Amount,
    ) -> Result<(), ExchangeError> {
        let supply = self.supply.amount.checked_sub(supply_paid).ok_or_else(|| {
            ExchangeError::invariant(format!(
                "order {} pays {} but only {} supply remains",
                self.id, supply_paid, self.supply.amount
            ))
        })?;
        let target = self.target.amount.checked_sub(target_settled).ok_or_else(|| {
            ExchangeError::invariant(format!(
                "order {} settles {} but only {} target remains",
                self.id, target_settled, self.target.amount
            ))
        })?;

        self.supply.amount = supply;
        self.target.amount = target;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
