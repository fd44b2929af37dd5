//! Read-only projections over committed state.
//!
//! ## Routes
//!
//! | Route    | Params                        | Response            |
//! |----------|-------------------------------|---------------------|
//! | `order`  | `{"order_id": 1}`             | `Order`             |
//! | `orders` | `{"owner": "alice"}`          | `[Order]` by id     |
//! | `frozen` | `{"owner": "alice"}`          | `[Coin]` by denom   |
//!
//! A [`Querier`] borrows a store immutably, so it can only be built over a
//! committed snapshot, never over a transaction in flight.

use serde::{Deserialize, Serialize};

use crate::error::{ExchangeError, QueryError};
use crate::escrow;
use crate::orderbook;
use crate::store::KvStore;
use crate::types::{Address, Coin, Order};

pub const ROUTE_ORDER: &str = "order";
pub const ROUTE_ORDERS: &str = "orders";
pub const ROUTE_FROZEN: &str = "frozen";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderParams {
    pub order_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersParams {
    pub owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenFundParams {
    pub owner: Address,
}

/// Query handle over one store snapshot.
pub struct Querier<'a> {
    store: &'a dyn KvStore,
}

impl<'a> Querier<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// `OrderNotFound` if no open order has this id.
    pub fn order_by_id(&self, order_id: u64) -> Result<Order, ExchangeError> {
        orderbook::must_get(self.store, order_id)
    }

    /// Empty for owners with no open orders.
    pub fn orders_by_owner(&self, owner: &Address) -> Result<Vec<Order>, ExchangeError> {
        orderbook::list_by_owner(self.store, owner)
    }

    pub fn frozen_funds_by_owner(&self, owner: &Address) -> Result<Vec<Coin>, ExchangeError> {
        escrow::frozen_by_owner(self.store, owner)
    }

    /// Answer a raw JSON query the way the gateway submits it.
    pub fn query(&self, route: &str, data: &[u8]) -> Result<Vec<u8>, QueryError> {
        match route {
            ROUTE_ORDER => {
                let params: OrderParams = parse_params(data)?;
                to_json(&self.order_by_id(params.order_id)?)
            }
            ROUTE_ORDERS => {
                let params: OrdersParams = parse_params(data)?;
                to_json(&self.orders_by_owner(&params.owner)?)
            }
            ROUTE_FROZEN => {
                let params: FrozenFundParams = parse_params(data)?;
                to_json(&self.frozen_funds_by_owner(&params.owner)?)
            }
            other => Err(QueryError::UnknownRoute(other.to_string())),
        }
    }
}

fn parse_params<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, QueryError> {
    serde_json::from_slice(data).map_err(|e| QueryError::BadRequest(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>, QueryError> {
    serde_json::to_vec(value).map_err(|e| QueryError::BadRequest(e.to_string()))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escrow::{BankKeeper, Escrow, StoreBank};
    use crate::store::MemStore;

    fn populated() -> MemStore {
        let mut store = MemStore::new();
        let alice = Address::from("alice");
        let bank = StoreBank::new();
        bank.add_coins(&mut store, &alice, &Coin::new("gard", 100)).unwrap();
        Escrow::new(&bank).freeze(&mut store, &alice, &Coin::new("gard", 30)).unwrap();

        for _ in 0..2 {
            let id = orderbook::next_id(&mut store).unwrap();
            let order = Order::new(id, alice.clone(), Coin::new("gard", 15), Coin::new("apple", 5), 0);
            orderbook::put(&mut store, &order).unwrap();
        }
        store
    }

    #[test]
    fn test_typed_queries() {
        let store = populated();
        let querier = Querier::new(&store);

        assert_eq!(querier.order_by_id(2).unwrap().id, 2);
        assert_eq!(querier.order_by_id(3), Err(ExchangeError::OrderNotFound { order_id: 3 }));
        assert_eq!(querier.orders_by_owner(&Address::from("alice")).unwrap().len(), 2);
        assert!(querier.orders_by_owner(&Address::from("nobody")).unwrap().is_empty());
        assert_eq!(
            querier.frozen_funds_by_owner(&Address::from("alice")).unwrap(),
            vec![Coin::new("gard", 30)]
        );
        assert!(querier.frozen_funds_by_owner(&Address::from("nobody")).unwrap().is_empty());
    }

    #[test]
    fn test_raw_order_route() {
        let store = populated();
        let querier = Querier::new(&store);

        let bytes = querier.query(ROUTE_ORDER, br#"{"order_id":1}"#).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["order_id"], 1);
        assert_eq!(value["owner"], "alice");
        assert_eq!(value["supply"]["amount"], "15");
    }

    #[test]
    fn test_raw_frozen_route() {
        let store = populated();
        let querier = Querier::new(&store);

        let bytes = querier.query(ROUTE_FROZEN, br#"{"owner":"alice"}"#).unwrap();
        let coins: Vec<Coin> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(coins, vec![Coin::new("gard", 30)]);
    }

    #[test]
    fn test_raw_orders_route_sorted() {
        let store = populated();
        let querier = Querier::new(&store);

        let bytes = querier.query(ROUTE_ORDERS, br#"{"owner":"alice"}"#).unwrap();
        let orders: Vec<Order> = serde_json::from_slice(&bytes).unwrap();
        let ids: Vec<u64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_raw_errors() {
        let store = populated();
        let querier = Querier::new(&store);

        assert!(matches!(
            querier.query("balances", b"{}"),
            Err(QueryError::UnknownRoute(route)) if route == "balances"
        ));
        assert!(matches!(
            querier.query(ROUTE_ORDER, b"not json"),
            Err(QueryError::BadRequest(_))
        ));
        assert_eq!(
            querier.query(ROUTE_ORDER, br#"{"order_id":9}"#),
            Err(QueryError::Exchange(ExchangeError::OrderNotFound { order_id: 9 }))
        );
    }
}
