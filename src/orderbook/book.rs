//! Persisted order book operations.
//!
//! Every function takes the store explicitly so that the caller decides which
//! view (working state, transaction overlay, committed snapshot) it acts on.

use crate::error::ExchangeError;
use crate::store::codec::{decode_order, decode_u64, encode_order, encode_u64};
use crate::store::keys::{
    id_from_key, order_key, owner_order_key, owner_orders_prefix, ORDER_PREFIX, ORDER_SEQ_KEY,
};
use crate::store::KvStore;
use crate::types::{Address, Order};

/// First id handed out on a fresh store.
pub const FIRST_ORDER_ID: u64 = 1;

/// Marker stored under each owner index key.
const INDEX_MARKER: [u8; 1] = [1];

// ===== Sequence =====

/// Id the next call to [`next_id`] will return.
pub fn peek_next_id(store: &dyn KvStore) -> Result<u64, ExchangeError> {
    match store.get(ORDER_SEQ_KEY) {
        Some(bytes) => decode_u64(&bytes),
        None => Ok(FIRST_ORDER_ID),
    }
}

/// Allocate a fresh order id and advance the persisted sequence.
///
/// Ids are strictly increasing and never reused, including across restarts,
/// since the sequence lives in the store next to the orders.
pub fn next_id(store: &mut dyn KvStore) -> Result<u64, ExchangeError> {
    let id = peek_next_id(store)?;
    let following = id
        .checked_add(1)
        .ok_or_else(|| ExchangeError::invariant("order id sequence exhausted"))?;
    store.set(ORDER_SEQ_KEY, encode_u64(following)?);
    Ok(id)
}

// ===== Records =====

/// Insert or overwrite an order and its owner index entry.
pub fn put(store: &mut dyn KvStore, order: &Order) -> Result<(), ExchangeError> {
    store.set(&order_key(order.id), encode_order(order)?);
    store.set(&owner_order_key(&order.owner, order.id), INDEX_MARKER.to_vec());
    Ok(())
}

pub fn get(store: &dyn KvStore, id: u64) -> Result<Option<Order>, ExchangeError> {
    store.get(&order_key(id)).map(|bytes| decode_order(&bytes)).transpose()
}

/// Like [`get`], with a missing order mapped to `OrderNotFound`.
pub fn must_get(store: &dyn KvStore, id: u64) -> Result<Order, ExchangeError> {
    get(store, id)?.ok_or(ExchangeError::OrderNotFound { order_id: id })
}

/// Remove an order and its owner index entry.
///
/// Returns the removed order, or `None` if no order had this id.
pub fn delete(store: &mut dyn KvStore, id: u64) -> Result<Option<Order>, ExchangeError> {
    let order = match get(store, id)? {
        Some(order) => order,
        None => return Ok(None),
    };
    store.delete(&order_key(id));
    store.delete(&owner_order_key(&order.owner, id));
    Ok(Some(order))
}

/// Open orders of `owner`, ascending by id.
pub fn list_by_owner(store: &dyn KvStore, owner: &Address) -> Result<Vec<Order>, ExchangeError> {
    let mut orders = Vec::new();
    for (key, _) in store.prefix_scan(&owner_orders_prefix(owner)) {
        let id = id_from_key(&key).ok_or_else(|| ExchangeError::invariant("malformed owner index key"))?;
        let order = get(store, id)?.ok_or_else(|| {
            ExchangeError::invariant(format!("owner index of {} points at missing order {}", owner, id))
        })?;
        orders.push(order);
    }
    Ok(orders)
}

/// Every open order, ascending by id.
pub fn all_orders(store: &dyn KvStore) -> Result<Vec<Order>, ExchangeError> {
    store
        .prefix_scan(ORDER_PREFIX)
        .into_iter()
        .map(|(_, value)| decode_order(&value))
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================
