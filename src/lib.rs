//! # Token Exchange
//!
//! Deterministic order/take token exchange with escrowed ("frozen") funds,
//! run as a module of a replicated ledger.
//!
//! ## Architecture
//!
//! The exchange consists of:
//! - **Types**: Core data structures (Coin, Order, Msg, ExchangeEvent, BlockReceipt)
//! - **Store**: Ordered key-value view with per-transaction overlays
//! - **Escrow**: Frozen-fund ledger over a bank collaborator
//! - **OrderBook**: Persisted orders, owner index and id sequence
//! - **Engine**: Pure fill computation for takes
//! - **Keeper**: Create / Take / Withdraw lifecycle
//! - **Query**: Read-only projections over committed state
//! - **App**: Block harness (begin, deliver, commit)
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical transaction order yields an identical state root
//! 2. **No Floating Point**: `u128` base units, 256-bit intermediates, explicit floor
//! 3. **Atomic Transactions**: A rejected transaction leaves no trace
//! 4. **Loud Corruption**: Escrow mismatches surface as invariant violations
//!
//! ## Example
//!
//! ```
//! use token_exchange::{ExchangeApp, ExchangeParams};
//! use token_exchange::types::{Address, Coin, MsgCreateOrder, MsgTakeOrder};
//!
//! let mut app = ExchangeApp::new(ExchangeParams::default());
//! app.fund(&Address::from("alice"), &Coin::new("gard", 1000)).unwrap();
//! app.fund(&Address::from("bob"), &Coin::new("apple", 500)).unwrap();
//!
//! app.begin_block(1, 1_700_000_000);
//! app.deliver_tx(&MsgCreateOrder::new(
//!     Address::from("alice"),
//!     Coin::new("gard", 1000),
//!     Coin::new("apple", 500),
//! ).into()).unwrap();
//! app.deliver_tx(&MsgTakeOrder::new(1, Address::from("bob"), Coin::new("apple", 200)).into()).unwrap();
//! app.commit().unwrap();
//!
//! let order = app.querier().order_by_id(1).unwrap();
//! assert_eq!(order.supply.amount, 600);
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error taxonomy
pub mod error;

/// Core data types: Coin, Order, Msg, events, receipts
pub mod types;

/// Key-value storage, key layout and SSZ codec
pub mod store;

/// Frozen-fund ledger and bank collaborator
pub mod escrow;

/// Persisted order store
pub mod orderbook;

/// Matching engine: Take-order fill computation
pub mod engine;

/// Order lifecycle controller and invariants
pub mod keeper;

/// Read-only queries
pub mod query;

/// Block-level host harness
pub mod app;

/// Layered configuration
pub mod config;

/// Tracing setup
pub mod logging;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use app::{ExchangeApp, TxOutcome};
pub use engine::{match_take, FillThreshold, MatchResult};
pub use error::{ExchangeError, QueryError};
pub use keeper::{ExchangeParams, FillReport, HandleResult, Keeper};
pub use query::Querier;
pub use types::{Address, BlockReceipt, Coin, Denom, ExchangeEvent, Msg, Order};
