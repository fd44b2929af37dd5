//! Order store for the exchange.
//!
//! ## Layout
//!
//! Orders live in the key-value store under the exchange namespace:
//!
//! - `order/<id>`: the order record
//! - `order_by_owner/<owner>/<id>`: owner index marker
//! - `order_seq`: next id to hand out
//!
//! Only the keeper mutates entries; queries and invariant checks read them.
//!
//! ## Complexity
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Get / Put / Delete | O(log n) |
//! | List by owner | O(k log n) |
//! | Next id | O(log n) |
//!
//! ## Example
//!
//! ```
//! use token_exchange::orderbook;
//! use token_exchange::store::MemStore;
//! use token_exchange::types::{Address, Coin, Order};
//!
//! let mut store = MemStore::new();
//! let id = orderbook::next_id(&mut store).unwrap();
//! let order = Order::new(id, Address::from("alice"), Coin::new("gard", 10), Coin::new("apple", 5), 0);
//! orderbook::put(&mut store, &order).unwrap();
//!
//! assert_eq!(orderbook::list_by_owner(&store, &Address::from("alice")).unwrap(), vec![order]);
//! ```

pub mod book;

pub use book::{
    all_orders, delete, get, list_by_owner, must_get, next_id, peek_next_id, put, FIRST_ORDER_ID,
};
