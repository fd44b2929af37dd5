//! Core data types for the exchange.
//!
//! ## Types
//!
//! - [`Coin`], [`Denom`], [`Address`]: assets and accounts
//! - [`Order`]: a standing supply-for-target offer
//! - [`Msg`]: the closed set of transaction messages
//! - [`ExchangeEvent`]: indexer-facing record of a committed action
//! - [`BlockReceipt`]: per-block summary with the state root
//!
//! ## Integer Amounts
//!
//! All quantities are `u128` base units. Display decimals live in
//! [`amount`] and are never consulted by state transitions.

pub mod amount;
mod coin;
mod event;
mod msg;
mod order;
mod receipt;

pub use amount::Amount;
pub use coin::{amount_string, Address, Coin, Denom, MAX_ADDRESS_LEN, MAX_DENOM_LEN, MIN_DENOM_LEN};
pub use event::{Action, ExchangeEvent};
pub use msg::{Msg, MsgCreateOrder, MsgTakeOrder, MsgWithdrawOrder};
pub use order::Order;
pub use receipt::BlockReceipt;

/// Logical coordinates of the block a transaction executes in.
///
/// Supplied by the host; the exchange never reads a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    pub height: u64,
    pub block_time: u64,
}

impl Context {
    pub fn new(height: u64, block_time: u64) -> Self {
        Self { height, block_time }
    }
}
