//! Order lifecycle controller.
//!
//! The keeper orchestrates `CreateOrder`, `TakeOrder` and `WithdrawOrder`
//! against the order store and the escrow ledger:
//!
//! ```text
//! Open --take (partial)--> Open
//! Open --take (full)-----> Filled     (order deleted, `fill` event)
//! Open --withdraw--------> Withdrawn  (order deleted, `withdraw` event)
//! ```
//!
//! ## Atomicity
//!
//! Handlers write straight into the store they are given and may leave it
//! half-updated when they return an error. The host runs each message inside a
//! [`CacheStore`](crate::store::CacheStore) and discards the overlay on error,
//! so a rejected transaction is never visible.

pub mod invariants;

pub use invariants::check_invariants;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{match_take, FillThreshold};
use crate::error::ExchangeError;
use crate::escrow::{BankKeeper, Escrow, StoreBank};
use crate::orderbook;
use crate::store::KvStore;
use crate::types::{
    Action, Coin, Context, ExchangeEvent, Msg, MsgCreateOrder, MsgTakeOrder, MsgWithdrawOrder,
    Order,
};

/// Module parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExchangeParams {
    #[serde(default)]
    pub fill_threshold: FillThreshold,
}

/// Settlement of a take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillReport {
    /// Supply paid from escrow to the taker
    pub supply_paid: Coin,
    /// Target paid by the taker to the owner
    pub target_settled: Coin,
    /// Part of the offered amount left with the taker
    pub refunded: Coin,
}

/// Result of an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleResult {
    pub order_id: u64,
    pub events: Vec<ExchangeEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillReport>,
}

/// Exchange state machine.
#[derive(Debug, Clone, Default)]
pub struct Keeper<B: BankKeeper = StoreBank> {
    bank: B,
    params: ExchangeParams,
}

impl<B: BankKeeper> Keeper<B> {
    pub fn new(bank: B, params: ExchangeParams) -> Self {
        Self { bank, params }
    }

    pub fn bank(&self) -> &B {
        &self.bank
    }

    pub fn params(&self) -> &ExchangeParams {
        &self.params
    }

    fn escrow(&self) -> Escrow<'_, B> {
        Escrow::new(&self.bank)
    }

    /// Dispatch a message to its handler.
    pub fn handle(
        &self,
        store: &mut dyn KvStore,
        ctx: &Context,
        msg: &Msg,
    ) -> Result<HandleResult, ExchangeError> {
        match msg {
            Msg::CreateOrder(msg) => self.create_order(store, ctx, msg),
            Msg::TakeOrder(msg) => self.take_order(store, msg),
            Msg::WithdrawOrder(msg) => self.withdraw_order(store, msg),
        }
    }

    /// Freeze the supply and open a new order.
    pub fn create_order(
        &self,
        store: &mut dyn KvStore,
        ctx: &Context,
        msg: &MsgCreateOrder,
    ) -> Result<HandleResult, ExchangeError> {
        msg.validate_basic()?;

        self.escrow().freeze(store, &msg.sender, &msg.supply)?;

        let id = orderbook::next_id(store)?;
        let order = Order::new(
            id,
            msg.sender.clone(),
            msg.supply.clone(),
            msg.target.clone(),
            ctx.block_time,
        );
        orderbook::put(store, &order)?;

        debug!(
            order_id = id,
            owner = %order.owner,
            supply = %order.supply,
            target = %order.target,
            "order created"
        );

        Ok(HandleResult {
            order_id: id,
            events: vec![ExchangeEvent::new(Action::Create, id, order.owner)],
            fill: None,
        })
    }

    /// Fill (part of) an order.
    ///
    /// The taker is debited only the settled target amount; anything offered
    /// above the remaining target is reported as `refunded` and never leaves
    /// the taker's balance.
    pub fn take_order(
        &self,
        store: &mut dyn KvStore,
        msg: &MsgTakeOrder,
    ) -> Result<HandleResult, ExchangeError> {
        msg.validate_basic()?;

        let mut order = orderbook::must_get(store, msg.order_id)?;
        if msg.amount.denom != order.target.denom {
            return Err(ExchangeError::InvalidDenomination {
                reason: format!(
                    "order {} wants {}, got {}",
                    order.id, order.target.denom, msg.amount.denom
                ),
            });
        }

        let available = self.bank.spendable(store, &msg.sender, &msg.amount.denom)?;
        if available < msg.amount.amount {
            return Err(ExchangeError::InsufficientBalance {
                owner: msg.sender.clone(),
                denom: msg.amount.denom.clone(),
                required: msg.amount.amount,
                available,
            });
        }

        let threshold = self.params.fill_threshold.threshold_for(&order);
        let fill = match_take(Some(&order), msg.amount.amount, threshold)?;

        let supply_paid = order.supply.with_amount(fill.supply_paid);
        let target_settled = order.target.with_amount(fill.target_settled);
        let refunded = msg.amount.with_amount(fill.excess);

        self.bank
            .send_coins(store, &msg.sender, &order.owner, &target_settled)?;
        self.escrow()
            .transfer_spendable(store, &order.owner, &msg.sender, &supply_paid)?;

        let action = if fill.is_full() {
            orderbook::delete(store, order.id)?;
            Action::Fill
        } else {
            order.apply_fill(fill.supply_paid, fill.target_settled)?;
            orderbook::put(store, &order)?;
            Action::Take
        };

        debug!(
            order_id = order.id,
            taker = %msg.sender,
            supply_paid = %supply_paid,
            target_settled = %target_settled,
            refunded = %refunded,
            full = fill.is_full(),
            "order taken"
        );

        Ok(HandleResult {
            order_id: order.id,
            events: vec![ExchangeEvent::new(action, order.id, order.owner.clone())
                .with_counterparty(msg.sender.clone())],
            fill: Some(FillReport {
                supply_paid,
                target_settled,
                refunded,
            }),
        })
    }

    /// Cancel an order and return its remaining supply to the owner.
    pub fn withdraw_order(
        &self,
        store: &mut dyn KvStore,
        msg: &MsgWithdrawOrder,
    ) -> Result<HandleResult, ExchangeError> {
        msg.validate_basic()?;

        let order = orderbook::must_get(store, msg.order_id)?;
        if order.owner != msg.sender {
            return Err(ExchangeError::Unauthorized {
                order_id: order.id,
                sender: msg.sender.clone(),
            });
        }

        self.escrow().unfreeze(store, &order.owner, &order.supply)?;
        orderbook::delete(store, order.id)?;

        debug!(order_id = order.id, owner = %order.owner, returned = %order.supply, "order withdrawn");

        Ok(HandleResult {
            order_id: order.id,
            events: vec![ExchangeEvent::new(Action::Withdraw, order.id, order.owner)],
            fill: None,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
