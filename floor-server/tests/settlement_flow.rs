//! Settlement integration tests: atomicity of the payment transaction,
//! at-most-one settlement, split-payment arithmetic, revenue aggregation and
//! the audit chain.

mod common;

use common::*;
use floor_server::audit::storage as audit_storage;
use floor_server::db::repository::{daily_revenue, dining_table, order as order_repo, payment};
use floor_server::orders::{OrderError, lifecycle, settlement};
use floor_server::reports;
use shared::models::{
    OrderEdit, OrderStatus, PaymentMethod, SplitSettlementRequest, TableStatus,
};

fn split(cash: f64, online: f64) -> SplitSettlementRequest {
    SplitSettlementRequest {
        cash_amount: cash,
        online_amount: online,
    }
}

#[tokio::test]
async fn cash_settlement_commits_all_effects_together() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 25.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 2).await;

    let receipt = settlement::confirm_payment(&pool, &boss, &order.id, PaymentMethod::Cash)
        .await
        .unwrap();
    assert_eq!(receipt.amount, 50.00);
    assert_eq!(receipt.method, PaymentMethod::Cash);

    // Order is terminally paid with the method recorded
    let paid = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);
    assert_eq!(paid.payment_method, Some(PaymentMethod::Cash));

    // Exactly one payment record, summing to the order total
    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].amount, 50.00);
    assert_eq!(payments[0].method, PaymentMethod::Cash);

    // The table was released
    let table_row = dining_table::find_by_id(&pool, table).await.unwrap().unwrap();
    assert_eq!(table_row.status, TableStatus::Empty);

    // The running aggregate moved by exactly the cash amount
    let date = shared::util::business_date();
    let aggregate = daily_revenue::find_by_date(&pool, &date).await.unwrap().unwrap();
    assert_eq!(aggregate.cash_total, 50.00);
    assert_eq!(aggregate.online_total, 0.00);
    assert_eq!(aggregate.total_revenue(), 50.00);
}

#[tokio::test]
async fn settling_twice_fails_and_writes_nothing_new() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 10.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 1).await;

    settlement::confirm_payment(&pool, &boss, &order.id, PaymentMethod::Online)
        .await
        .unwrap();

    // Both entry points observe PAID and refuse
    let err = settlement::confirm_payment(&pool, &boss, &order.id, PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AlreadyPaid(_)));
    let err = settlement::confirm_split_payment(&pool, &boss, &order.id, split(5.0, 5.0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AlreadyPaid(_)));

    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    assert_eq!(payments.len(), 1);

    // The aggregate was not double-counted
    let date = shared::util::business_date();
    let aggregate = daily_revenue::find_by_date(&pool, &date).await.unwrap().unwrap();
    assert_eq!(aggregate.total_revenue(), 10.00);

    // No operation moves a paid order anywhere: not a status advance, not
    // an edit — for anyone
    let err = lifecycle::advance_status(&pool, &boss, &order.id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::OrderFinalized));
    let err = lifecycle::edit_order(
        &pool,
        &boss,
        &order.id,
        OrderEdit {
            items: vec![],
            total_price: 0.0,
            status: None,
            table_id: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, OrderError::OrderFinalized));
    let reloaded = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, OrderStatus::Paid);
}

#[tokio::test]
async fn settlement_requires_admin_and_delivered_status() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 10.00).await;
    let table = seed_table(&pool, 1).await;
    let order = create_order(&pool, &employee(1), table, tea, 1).await;

    // Employees never settle, verified or not
    let err = settlement::confirm_payment(&pool, &employee(1), &order.id, PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Forbidden(_)));

    // TAKEN order is not yet settleable
    let err = settlement::confirm_payment(&pool, &admin(9), &order.id, PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotYetDelivered(_)));

    // Nothing was written by the failed attempts
    assert!(payment::find_by_order(&pool, &order.id).await.unwrap().is_empty());
    let reloaded = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, OrderStatus::Taken);

    let err = settlement::confirm_payment(&pool, &admin(9), "missing", PaymentMethod::Cash)
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound(_)));
}

#[tokio::test]
async fn split_settlement_writes_one_record_per_nonzero_method() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Gongfu Set", 50.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 2).await;
    assert_eq!(order.total_price, 100.00);

    let receipt = settlement::confirm_split_payment(&pool, &boss, &order.id, split(60.0, 40.0))
        .await
        .unwrap();
    assert_eq!(receipt.cash_amount, 60.00);
    assert_eq!(receipt.online_amount, 40.00);
    assert_eq!(receipt.total, 100.00);

    let paid = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(paid.payment_method, Some(PaymentMethod::Split));

    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    assert_eq!(payments.len(), 2);
    let cash_row = payments.iter().find(|p| p.method == PaymentMethod::Cash).unwrap();
    let online_row = payments.iter().find(|p| p.method == PaymentMethod::Online).unwrap();
    assert_eq!(cash_row.amount, 60.00);
    assert_eq!(online_row.amount, 40.00);

    // Both deltas landed in one upsert
    let date = shared::util::business_date();
    let aggregate = daily_revenue::find_by_date(&pool, &date).await.unwrap().unwrap();
    assert_eq!(aggregate.cash_total, 60.00);
    assert_eq!(aggregate.online_total, 40.00);
}

#[tokio::test]
async fn split_validation_rejects_mismatch_zero_and_negative() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Gongfu Set", 50.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 2).await;

    let err = settlement::confirm_split_payment(&pool, &boss, &order.id, split(60.0, 39.0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::AmountMismatch { .. }));

    let err = settlement::confirm_split_payment(&pool, &boss, &order.id, split(0.0, 0.0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::ZeroPayment));

    let err = settlement::confirm_split_payment(&pool, &boss, &order.id, split(-10.0, 110.0))
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::InvalidAmount(_)));

    // One cent off is inside the fixed tolerance
    settlement::confirm_split_payment(&pool, &boss, &order.id, split(60.0, 39.99))
        .await
        .unwrap();

    // All failed attempts left no records behind; the success left two
    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
async fn degenerate_split_produces_single_record_but_split_method() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Gongfu Set", 50.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 2).await;

    settlement::confirm_split_payment(&pool, &boss, &order.id, split(100.0, 0.0))
        .await
        .unwrap();

    // No spurious zero-amount online record
    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].method, PaymentMethod::Cash);
    assert_eq!(payments[0].amount, 100.00);

    let paid = order_repo::find_by_id(&pool, &order.id).await.unwrap().unwrap();
    assert_eq!(paid.payment_method, Some(PaymentMethod::Split));
}

#[tokio::test]
async fn daily_summary_recomputes_from_payments_and_expenses() {
    use floor_server::db::repository::expense;
    use shared::models::ExpenseCreate;

    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 25.00).await;
    let boss = admin(9);

    let t1 = seed_table(&pool, 1).await;
    let order1 = create_delivered_order(&pool, &employee(1), t1, tea, 2).await;
    settlement::confirm_payment(&pool, &boss, &order1.id, PaymentMethod::Cash)
        .await
        .unwrap();

    let t2 = seed_table(&pool, 2).await;
    let order2 = create_delivered_order(&pool, &employee(2), t2, tea, 4).await;
    settlement::confirm_split_payment(&pool, &boss, &order2.id, split(40.0, 60.0))
        .await
        .unwrap();

    expense::create(
        &pool,
        ExpenseCreate { title: "Tea leaves".into(), amount: 30.0 },
        boss.id,
    )
    .await
    .unwrap();

    let date = shared::util::business_date();
    let summary = reports::get_daily_summary(&pool, &boss, &date).await.unwrap();
    assert_eq!(summary.cash_revenue, 90.00);
    assert_eq!(summary.online_revenue, 60.00);
    assert_eq!(summary.total_revenue, 150.00);
    assert_eq!(summary.total_expenses, 30.00);
    assert_eq!(summary.net_profit, 120.00);
    // Each settled order counts exactly once, split or not
    assert_eq!(summary.order_count, 2);

    // The incrementally maintained aggregate agrees with the recomputation
    let aggregate = daily_revenue::find_by_date(&pool, &date).await.unwrap().unwrap();
    assert_eq!(aggregate.cash_total, summary.cash_revenue);
    assert_eq!(aggregate.online_total, summary.online_revenue);

    // Revenue reads are admin-only
    let err = reports::get_daily_summary(&pool, &employee(1), &date).await.unwrap_err();
    assert!(matches!(err, floor_server::AppError::Forbidden(_)));
}

#[tokio::test]
async fn concurrent_settlement_attempts_have_exactly_one_winner() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 50.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);
    let order = create_delivered_order(&pool, &employee(1), table, tea, 2).await;

    // Both race for the same DELIVERED → PAID claim; the loser must observe
    // PAID and fail, leaving a single settlement behind
    let (single, split_result) = tokio::join!(
        settlement::confirm_payment(&pool, &boss, &order.id, PaymentMethod::Cash),
        settlement::confirm_split_payment(&pool, &boss, &order.id, split(60.0, 40.0)),
    );

    let winners = [single.is_ok(), split_result.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(winners, 1);
    if let Err(e) = single {
        assert!(matches!(e, OrderError::AlreadyPaid(_)));
    }
    if let Err(e) = split_result {
        assert!(matches!(e, OrderError::AlreadyPaid(_)));
    }

    // Whichever entry point won, the ledger agrees with exactly one of them
    let payments = payment::find_by_order(&pool, &order.id).await.unwrap();
    let paid_sum: f64 = payments.iter().map(|p| p.amount).sum();
    assert_eq!(paid_sum, 100.00);
    let date = shared::util::business_date();
    let aggregate = daily_revenue::find_by_date(&pool, &date).await.unwrap().unwrap();
    assert_eq!(aggregate.total_revenue(), 100.00);
}

#[tokio::test]
async fn audit_chain_stays_valid_across_the_whole_flow() {
    let pool = test_pool().await;
    let tea = seed_menu_item(&pool, "Oolong", 10.00).await;
    let table = seed_table(&pool, 1).await;
    let boss = admin(9);

    let order = create_delivered_order(&pool, &employee(1), table, tea, 1).await;
    settlement::confirm_payment(&pool, &boss, &order.id, PaymentMethod::Cash)
        .await
        .unwrap();

    let verification = audit_storage::verify_chain(&pool).await.unwrap();
    assert!(verification.valid);
    // Creation and settlement are audited; the status advance is not
    assert_eq!(verification.checked, 2);
    assert_eq!(verification.broken_at, None);
}
