//! Events emitted by committed exchange transactions.
//!
//! External indexers consume these to follow order lifecycles without
//! replaying state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::coin::Address;

/// What happened to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Order created and supply frozen
    Create,
    /// Partial fill; the order stays open
    Take,
    /// Owner cancelled; remaining supply returned
    Withdraw,
    /// Full fill; the order is gone
    Fill,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Take => "take",
            Action::Withdraw => "withdraw",
            Action::Fill => "fill",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event record: `{action, order_id, owner, counterparty?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeEvent {
    pub action: Action,
    pub order_id: u64,
    pub owner: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty: Option<Address>,
}

impl ExchangeEvent {
    pub fn new(action: Action, order_id: u64, owner: Address) -> Self {
        Self {
            action,
            order_id,
            owner,
            counterparty: None,
        }
    }

    pub fn with_counterparty(mut self, counterparty: Address) -> Self {
        self.counterparty = Some(counterparty);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_without_counterparty() {
        let event = ExchangeEvent::new(Action::Create, 3, Address::from("alice"));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"action":"create","order_id":3,"owner":"alice"}"#);
    }

    #[test]
    fn test_event_json_with_counterparty() {
        let event = ExchangeEvent::new(Action::Fill, 3, Address::from("alice"))
            .with_counterparty(Address::from("bob"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["action"], "fill");
        assert_eq!(json["counterparty"], "bob");
    }

    #[test]
    fn test_action_labels() {
        assert_eq!(Action::Take.to_string(), "take");
        assert_eq!(Action::Withdraw.as_str(), "withdraw");
    }
}
