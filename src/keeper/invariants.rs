//! Escrow and order-store consistency checks.
//!
//! Run by the host at every commit. Any failure means accounting corruption
//! and is reported as `InvariantViolation`.

use std::collections::BTreeMap;

use crate::error::ExchangeError;
use crate::escrow::all_frozen;
use crate::orderbook;
use crate::store::keys::{id_from_key, owner_order_key, ORDER_BY_OWNER_PREFIX};
use crate::store::KvStore;
use crate::types::{Address, Amount, Denom};

/// Check every exchange invariant against `store`.
///
/// - every open order has positive supply and target in distinct denoms,
///   an owner index entry, and an id below the sequence
/// - every owner index entry points at an order of that owner
/// - `frozen(owner, denom)` equals the remaining supply of the owner's open
///   orders in `denom`, with no frozen entry left unbacked
pub fn check_invariants(store: &dyn KvStore) -> Result<(), ExchangeError> {
    let next_id = orderbook::peek_next_id(store)?;
    let mut backing: BTreeMap<(Address, Denom), Amount> = BTreeMap::new();

    for order in orderbook::all_orders(store)? {
        if order.supply.amount == 0 || order.target.amount == 0 {
            return Err(ExchangeError::invariant(format!(
                "open order {} has supply {} and target {}",
                order.id, order.supply, order.target
            )));
        }
        if order.supply.denom == order.target.denom {
            return Err(ExchangeError::invariant(format!(
                "order {} trades {} for itself",
                order.id, order.supply.denom
            )));
        }
        if order.id >= next_id {
            return Err(ExchangeError::invariant(format!(
                "order {} is not below the sequence {}",
                order.id, next_id
            )));
        }
        if !store.has(&owner_order_key(&order.owner, order.id)) {
            return Err(ExchangeError::invariant(format!(
                "order {} missing from the index of {}",
                order.id, order.owner
            )));
        }

        let sum = backing
            .entry((order.owner.clone(), order.supply.denom.clone()))
            .or_insert(0);
        *sum = sum
            .checked_add(order.supply.amount)
            .ok_or_else(|| ExchangeError::invariant("remaining supply overflow"))?;
    }

    for (key, _) in store.prefix_scan(ORDER_BY_OWNER_PREFIX) {
        let id = id_from_key(&key).ok_or_else(|| ExchangeError::invariant("malformed owner index key"))?;
        let order = orderbook::get(store, id)?
            .ok_or_else(|| ExchangeError::invariant(format!("owner index points at missing order {}", id)))?;
        if key != owner_order_key(&order.owner, id) {
            return Err(ExchangeError::invariant(format!(
                "order {} indexed under the wrong owner",
                id
            )));
        }
    }

    for (owner, coin) in all_frozen(store)? {
        let expected = backing.remove(&(owner.clone(), coin.denom.clone())).unwrap_or(0);
        if coin.amount != expected {
            return Err(ExchangeError::invariant(format!(
                "frozen {} of {} but open orders hold {}{}",
                coin, owner, expected, coin.denom
            )));
        }
    }

    if let Some(((owner, denom), amount)) = backing.into_iter().next() {
        return Err(ExchangeError::invariant(format!(
            "open orders of {} hold {}{} with nothing frozen",
            owner, amount, denom
        )));
    }

    Ok(())
}
