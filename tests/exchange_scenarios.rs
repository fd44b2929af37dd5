//! End-to-end scenarios through the block harness.

use token_exchange::escrow::BankKeeper;
use token_exchange::query::{ROUTE_FROZEN, ROUTE_ORDERS};
use token_exchange::types::{Action, Denom, MsgCreateOrder, MsgTakeOrder, MsgWithdrawOrder};
use token_exchange::{
    Address, Coin, ExchangeApp, ExchangeError, ExchangeEvent, ExchangeParams, FillThreshold,
    Msg, TxOutcome,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn owner() -> Address {
    Address::from("owner")
}

fn taker_a() -> Address {
    Address::from("takera")
}

fn taker_b() -> Address {
    Address::from("takerb")
}

/// Owner holds 1000 aaa, both takers hold 1000 bbb; threshold 100 bbb.
fn setup() -> ExchangeApp {
    let mut app = ExchangeApp::new(ExchangeParams {
        fill_threshold: FillThreshold::Fixed { amount: 100 },
    });
    app.fund(&owner(), &Coin::new("aaa", 1000)).unwrap();
    app.fund(&taker_a(), &Coin::new("bbb", 1000)).unwrap();
    app.fund(&taker_b(), &Coin::new("bbb", 1000)).unwrap();
    app.begin_block(0, 0);
    app.commit().unwrap();
    app
}

fn deliver(app: &mut ExchangeApp, height: u64, msg: Msg) -> TxOutcome {
    app.begin_block(height, 1_000 + height);
    let outcome = app.deliver_tx(&msg).unwrap();
    app.commit().unwrap();
    outcome
}

fn create_order(app: &mut ExchangeApp) -> u64 {
    let msg = MsgCreateOrder::new(owner(), Coin::new("aaa", 1000), Coin::new("bbb", 500));
    match deliver(app, 1, msg.into()) {
        TxOutcome::Accepted(result) => result.order_id,
        other => panic!("create rejected: {:?}", other),
    }
}

fn spendable(app: &ExchangeApp, who: &Address, denom: &str) -> u128 {
    app.keeper()
        .bank()
        .spendable(app.committed_store(), who, &Denom::from(denom))
        .unwrap()
}

fn frozen(app: &ExchangeApp, who: &Address) -> Vec<Coin> {
    app.querier().frozen_funds_by_owner(who).unwrap()
}

// ============================================================================
// SCENARIOS
// ============================================================================

/// 1000 aaa for 500 bbb, taken 200 then 300.
#[test]
fn partial_then_full_fill() {
    let mut app = setup();
    let id = create_order(&mut app);
    assert_eq!(frozen(&app, &owner()), vec![Coin::new("aaa", 1000)]);

    let outcome = deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 200)).into());
    let TxOutcome::Accepted(result) = outcome else {
        panic!("partial take rejected");
    };
    assert_eq!(
        result.events,
        vec![ExchangeEvent::new(Action::Take, id, owner()).with_counterparty(taker_a())]
    );
    assert_eq!(spendable(&app, &taker_a(), "aaa"), 400);

    let order = app.querier().order_by_id(id).unwrap();
    assert_eq!(order.supply, Coin::new("aaa", 600));
    assert_eq!(order.target, Coin::new("bbb", 300));

    let outcome = deliver(&mut app, 3, MsgTakeOrder::new(id, taker_b(), Coin::new("bbb", 300)).into());
    let TxOutcome::Accepted(result) = outcome else {
        panic!("full take rejected");
    };
    assert_eq!(result.events[0].action, Action::Fill);
    assert_eq!(result.events[0].counterparty, Some(taker_b()));

    assert_eq!(spendable(&app, &taker_b(), "aaa"), 600);
    assert_eq!(spendable(&app, &owner(), "bbb"), 500);
    assert!(frozen(&app, &owner()).is_empty());
    assert_eq!(
        app.querier().order_by_id(id),
        Err(ExchangeError::OrderNotFound { order_id: id })
    );
}

#[test]
fn immediate_withdraw_restores_balance() {
    let mut app = setup();
    let id = create_order(&mut app);
    assert_eq!(spendable(&app, &owner(), "aaa"), 0);

    let outcome = deliver(&mut app, 2, MsgWithdrawOrder::new(id, owner()).into());
    assert!(outcome.is_accepted());

    assert_eq!(spendable(&app, &owner(), "aaa"), 1000);
    assert!(frozen(&app, &owner()).is_empty());
    assert!(app.querier().order_by_id(id).is_err());
}

#[test]
fn withdraw_by_non_owner_is_unauthorized_and_changes_nothing() {
    let mut app = setup();
    let id = create_order(&mut app);
    let root_before = app.committed_store().state_root();

    let outcome = deliver(&mut app, 2, MsgWithdrawOrder::new(id, taker_a()).into());
    assert!(matches!(outcome, TxOutcome::Rejected { code: 4, .. }));
    assert_eq!(app.committed_store().state_root(), root_before);
}

#[test]
fn take_below_threshold_is_a_no_op() {
    let mut app = setup();
    let id = create_order(&mut app);
    let store_before = app.committed_store().clone();

    let outcome = deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 99)).into());
    match outcome {
        TxOutcome::Rejected { code, log } => {
            assert_eq!(code, 2);
            assert!(log.contains("threshold 100"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(app.committed_store(), &store_before);
}

#[test]
fn take_after_full_fill_is_not_found() {
    let mut app = setup();
    let id = create_order(&mut app);
    deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 500)).into());

    let outcome = deliver(&mut app, 3, MsgTakeOrder::new(id, taker_b(), Coin::new("bbb", 500)).into());
    assert!(matches!(outcome, TxOutcome::Rejected { code: 3, .. }));
}

#[test]
fn excess_take_is_refunded_in_same_transaction() {
    let mut app = setup();
    let id = create_order(&mut app);

    let outcome = deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 750)).into());
    let TxOutcome::Accepted(result) = outcome else {
        panic!("take rejected");
    };
    let fill = result.fill.unwrap();
    assert_eq!(fill.target_settled, Coin::new("bbb", 500));
    assert_eq!(fill.refunded, Coin::new("bbb", 250));
    assert_eq!(spendable(&app, &taker_a(), "bbb"), 500);
    assert_eq!(spendable(&app, &taker_a(), "aaa"), 1000);
}

#[test]
fn order_ids_are_never_reused() {
    let mut app = setup();
    let first = create_order(&mut app);
    deliver(&mut app, 2, MsgWithdrawOrder::new(first, owner()).into());
    let second = create_order(&mut app);
    assert!(second > first);
}

#[test]
fn raw_query_routes() {
    let mut app = setup();
    let id = create_order(&mut app);

    let bytes = app
        .querier()
        .query(ROUTE_ORDERS, br#"{"owner":"owner"}"#)
        .unwrap();
    let orders: Vec<serde_json::Value> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["order_id"], id);

    let bytes = app
        .querier()
        .query(ROUTE_FROZEN, br#"{"owner":"owner"}"#)
        .unwrap();
    let coins: Vec<Coin> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(coins, vec![Coin::new("aaa", 1000)]);
}

#[test]
fn rounding_remainder_returned_on_withdraw() {
    let mut app = ExchangeApp::new(ExchangeParams::default());
    app.fund(&owner(), &Coin::new("aaa", 7)).unwrap();
    app.fund(&taker_a(), &Coin::new("bbb", 10)).unwrap();

    let create = MsgCreateOrder::new(owner(), Coin::new("aaa", 7), Coin::new("bbb", 3));
    let TxOutcome::Accepted(result) = deliver(&mut app, 1, create.into()) else {
        panic!("create rejected");
    };
    let id = result.order_id;

    // floor(7 * 2 / 3) = 4
    deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 2)).into());
    assert_eq!(spendable(&app, &taker_a(), "aaa"), 4);

    deliver(&mut app, 3, MsgWithdrawOrder::new(id, owner()).into());
    assert_eq!(spendable(&app, &owner(), "aaa"), 3);
    assert_eq!(spendable(&app, &owner(), "bbb"), 2);
}

/// Fixed threshold at 100 bbb on a 10 aaa for 10000 bbb order: a take at the
/// threshold is a partial fill even though its floor payout is zero.
#[test]
fn fixed_threshold_take_with_zero_payout_is_partial_fill() {
    let mut app = setup();
    let create = MsgCreateOrder::new(owner(), Coin::new("aaa", 10), Coin::new("bbb", 10_000));
    let TxOutcome::Accepted(created) = deliver(&mut app, 1, create.into()) else {
        panic!("create rejected");
    };
    let id = created.order_id;

    let outcome = deliver(&mut app, 2, MsgTakeOrder::new(id, taker_a(), Coin::new("bbb", 100)).into());
    let TxOutcome::Accepted(result) = outcome else {
        panic!("take at threshold rejected");
    };
    assert_eq!(result.events[0].action, Action::Take);
    let fill = result.fill.unwrap();
    assert_eq!(fill.supply_paid, Coin::new("aaa", 0));
    assert_eq!(fill.target_settled, Coin::new("bbb", 100));

    assert_eq!(spendable(&app, &taker_a(), "bbb"), 900);
    assert_eq!(spendable(&app, &taker_a(), "aaa"), 0);
    assert_eq!(spendable(&app, &owner(), "bbb"), 100);

    let order = app.querier().order_by_id(id).unwrap();
    assert_eq!(order.supply, Coin::new("aaa", 10));
    assert_eq!(order.target, Coin::new("bbb", 9_900));
    assert_eq!(frozen(&app, &owner()), vec![Coin::new("aaa", 10)]);
}
