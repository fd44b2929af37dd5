//! Take-order fill computation.
//!
//! [`match_take`] is a pure function: it reads an order and a take request
//! and reports what a fill would do, without touching any store. The keeper
//! applies the result.

use crate::error::ExchangeError;
use crate::types::amount::mul_div_floor;
use crate::types::{Amount, Order};

/// Whether a take closes the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillKind {
    /// Order stays open with reduced supply and target
    Partial,
    /// Remaining target fully settled; order is terminal
    Full,
}

/// Effect of a take against an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub kind: FillKind,

    /// Supply released from escrow to the taker
    pub supply_paid: Amount,

    /// Target paid by the taker to the owner
    pub target_settled: Amount,

    /// Part of the take amount above the remaining target, kept by the taker
    pub excess: Amount,

    /// Supply still frozen after the fill (zero on a full fill)
    pub remaining_supply: Amount,

    /// Target still owed after the fill (zero on a full fill)
    pub remaining_target: Amount,
}

impl MatchResult {
    pub fn is_full(&self) -> bool {
        self.kind == FillKind::Full
    }
}

/// Compute the fill of `take_amount` against `order`.
///
/// # Arguments
///
/// * `order` - The order being taken, `None` if the id was not found
/// * `take_amount` - Amount of the order's target denom the taker offers
/// * `threshold` - Smallest take accepted for a partial fill
///
/// # Rules
///
/// 1. Missing order is `OrderNotFound` (the id is unknown here, so it reports
///    0; the keeper resolves ids before calling); a zero take is `ZeroAmount`.
/// 2. `take_amount >= remaining target` is a full fill: the remaining target is
///    settled, the whole remaining supply is paid, the rest is excess.
/// 3. Below `threshold` is `BelowMinimumThreshold`.
/// 4. Otherwise a partial fill pays `floor(supply * take / target)`, which
///    can be zero when the threshold is below `ceil(target / supply)`.
///
/// Flooring keeps any rounding remainder in escrow for the owner.
///
/// # Example
///
/// ```
/// use token_exchange::engine::match_take;
/// use token_exchange::types::{Address, Coin, Order};
///
/// let order = Order::new(1, Address::from("alice"), Coin::new("gard", 1000), Coin::new("apple", 500), 0);
/// let fill = match_take(Some(&order), 200, 100).unwrap();
///
/// assert_eq!(fill.supply_paid, 400);
/// assert_eq!(fill.remaining_supply, 600);
/// assert_eq!(fill.remaining_target, 300);
/// ```
pub fn match_take(
    order: Option<&Order>,
    take_amount: Amount,
    threshold: Amount,
) -> Result<MatchResult, ExchangeError> {
    let order = order.ok_or(ExchangeError::OrderNotFound { order_id: 0 })?;
    if take_amount == 0 {
        return Err(ExchangeError::ZeroAmount);
    }

    let supply = order.supply.amount;
    let remaining = order.target.amount;

    if take_amount >= remaining {
        return Ok(MatchResult {
            kind: FillKind::Full,
            supply_paid: supply,
            target_settled: remaining,
            excess: take_amount - remaining,
            remaining_supply: 0,
            remaining_target: 0,
        });
    }

    if take_amount < threshold {
        return Err(ExchangeError::BelowMinimumThreshold {
            amount: take_amount,
            threshold,
        });
    }

    let supply_paid = mul_div_floor(supply, take_amount, remaining).ok_or_else(|| {
        ExchangeError::invariant(format!("fill of order {} overflows", order.id))
    })?;

    Ok(MatchResult {
        kind: FillKind::Partial,
        supply_paid,
        target_settled: take_amount,
        excess: 0,
        remaining_supply: supply - supply_paid,
        remaining_target: remaining - take_amount,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Coin};

    fn order(supply: Amount, target: Amount) -> Order {
        Order::new(
            1,
            Address::from("alice"),
            Coin::new("gard", supply),
            Coin::new("apple", target),
            0,
        )
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(
            match_take(None, 10, 0),
            Err(ExchangeError::OrderNotFound { .. })
        ));
    }

    #[test]
    fn test_zero_take() {
        assert_eq!(
            match_take(Some(&order(1000, 500)), 0, 0),
            Err(ExchangeError::ZeroAmount)
        );
    }

    #[test]
    fn test_partial_fill_proportional() {
        let result = match_take(Some(&order(1000, 500)), 200, 100).unwrap();
        assert_eq!(result.kind, FillKind::Partial);
        assert_eq!(result.supply_paid, 400);
        assert_eq!(result.target_settled, 200);
        assert_eq!(result.excess, 0);
        assert_eq!(result.remaining_supply, 600);
        assert_eq!(result.remaining_target, 300);
    }

    #[test]
    fn test_exact_full_fill() {
        let result = match_take(Some(&order(600, 300)), 300, 100).unwrap();
        assert!(result.is_full());
        assert_eq!(result.supply_paid, 600);
        assert_eq!(result.target_settled, 300);
        assert_eq!(result.excess, 0);
        assert_eq!(result.remaining_supply, 0);
        assert_eq!(result.remaining_target, 0);
    }

    #[test]
    fn test_full_fill_with_excess() {
        let result = match_take(Some(&order(600, 300)), 450, 100).unwrap();
        assert!(result.is_full());
        assert_eq!(result.target_settled, 300);
        assert_eq!(result.excess, 150);
    }

    #[test]
    fn test_full_fill_ignores_threshold() {
        // Remaining target below the threshold can still be closed out
        let result = match_take(Some(&order(10, 5)), 5, 100).unwrap();
        assert!(result.is_full());
    }

    #[test]
    fn test_below_threshold() {
        assert_eq!(
            match_take(Some(&order(1000, 500)), 99, 100),
            Err(ExchangeError::BelowMinimumThreshold {
                amount: 99,
                threshold: 100
            })
        );
    }

    #[test]
    fn test_rounding_favors_owner() {
        // 7 * 2 / 3 = 4.67 -> 4
        let result = match_take(Some(&order(7, 3)), 2, 1).unwrap();
        assert_eq!(result.supply_paid, 4);
        assert_eq!(result.remaining_supply, 3);
        assert_eq!(result.remaining_target, 1);
    }

    #[test]
    fn test_fixed_threshold_partial_fill_may_pay_nothing() {
        // 10 * 100 / 10000 = 0.1 -> 0, still a partial fill at the threshold
        let result = match_take(Some(&order(10, 10_000)), 100, 100).unwrap();
        assert_eq!(result.kind, FillKind::Partial);
        assert_eq!(result.supply_paid, 0);
        assert_eq!(result.target_settled, 100);
        assert_eq!(result.remaining_supply, 10);
        assert_eq!(result.remaining_target, 9_900);
    }

    #[test]
    fn test_partial_fill_never_drains_supply() {
        // take < target keeps floor(supply * take / target) < supply
        let result = match_take(Some(&order(3, 1_000)), 999, 1).unwrap();
        assert_eq!(result.kind, FillKind::Partial);
        assert_eq!(result.supply_paid, 2);
        assert_eq!(result.remaining_supply, 1);
    }

    #[test]
    fn test_large_amounts_no_overflow() {
        let big = u128::MAX / 2;
        let result = match_take(Some(&order(big, big)), big / 4, 1).unwrap();
        assert_eq!(result.supply_paid, big / 4);
    }

    #[test]
    fn test_conservation_over_many_fills() {
        let mut o = order(1_000_003, 777);
        let mut paid: Amount = 0;
        loop {
            let result = match_take(Some(&o), 13, 1).unwrap();
            paid += result.supply_paid;
            if result.is_full() {
                break;
            }
            o.apply_fill(result.supply_paid, result.target_settled).unwrap();
        }
        assert_eq!(paid, 1_000_003);
    }
}
