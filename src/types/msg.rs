//! Transaction messages handled by the exchange.
//!
//! The message set is closed: a host decodes a transaction into [`Msg`] and the
//! keeper dispatches on the variant. Signatures are verified upstream; the
//! `sender` field is already authenticated when a message reaches this crate.
//!
//! JSON form (internally tagged):
//!
//! ```json
//! {"type":"create_order","sender":"alice","supply":{"denom":"gard","amount":"100"},"target":{"denom":"apple","amount":"800"}}
//! {"type":"take_order","order_id":3,"sender":"bob","amount":{"denom":"apple","amount":"800"}}
//! {"type":"withdraw_order","order_id":3,"sender":"alice"}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ExchangeError;
use crate::types::coin::{Address, Coin};

/// Create a new order, freezing `supply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateOrder {
    pub sender: Address,
    pub supply: Coin,
    pub target: Coin,
}

/// Take (part of) an existing order by paying `amount` of its target denom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTakeOrder {
    pub order_id: u64,
    pub sender: Address,
    pub amount: Coin,
}

/// Cancel an order and return its remaining supply to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgWithdrawOrder {
    pub order_id: u64,
    pub sender: Address,
}

/// Every message kind the exchange accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Msg {
    CreateOrder(MsgCreateOrder),
    TakeOrder(MsgTakeOrder),
    WithdrawOrder(MsgWithdrawOrder),
}

impl MsgCreateOrder {
    pub fn new(sender: Address, supply: Coin, target: Coin) -> Self {
        Self {
            sender,
            supply,
            target,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ExchangeError> {
        self.sender.validate()?;
        self.supply.denom.validate()?;
        self.target.denom.validate()?;
        if self.supply.is_zero() || self.target.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        if self.supply.denom == self.target.denom {
            return Err(ExchangeError::InvalidDenomination {
                reason: format!("supply and target are both {}", self.supply.denom),
            });
        }
        Ok(())
    }
}

impl MsgTakeOrder {
    pub fn new(order_id: u64, sender: Address, amount: Coin) -> Self {
        Self {
            order_id,
            sender,
            amount,
        }
    }

    pub fn validate_basic(&self) -> Result<(), ExchangeError> {
        self.sender.validate()?;
        self.amount.denom.validate()?;
        if self.amount.is_zero() {
            return Err(ExchangeError::ZeroAmount);
        }
        Ok(())
    }
}

impl MsgWithdrawOrder {
    pub fn new(order_id: u64, sender: Address) -> Self {
        Self { order_id, sender }
    }

    pub fn validate_basic(&self) -> Result<(), ExchangeError> {
        self.sender.validate()
    }
}

impl Msg {
    /// Stateless checks run before a message reaches the keeper.
    pub fn validate_basic(&self) -> Result<(), ExchangeError> {
        match self {
            Msg::CreateOrder(msg) => msg.validate_basic(),
            Msg::TakeOrder(msg) => msg.validate_basic(),
            Msg::WithdrawOrder(msg) => msg.validate_basic(),
        }
    }

    pub fn sender(&self) -> &Address {
        match self {
            Msg::CreateOrder(msg) => &msg.sender,
            Msg::TakeOrder(msg) => &msg.sender,
            Msg::WithdrawOrder(msg) => &msg.sender,
        }
    }

    /// Short route name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::CreateOrder(_) => "create_order",
            Msg::TakeOrder(_) => "take_order",
            Msg::WithdrawOrder(_) => "withdraw_order",
        }
    }
}

impl From<MsgCreateOrder> for Msg {
    fn from(msg: MsgCreateOrder) -> Self {
        Msg::CreateOrder(msg)
    }
}

impl From<MsgTakeOrder> for Msg {
    fn from(msg: MsgTakeOrder) -> Self {
        Msg::TakeOrder(msg)
    }
}

impl From<MsgWithdrawOrder> for Msg {
    fn from(msg: MsgWithdrawOrder) -> Self {
        Msg::WithdrawOrder(msg)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
