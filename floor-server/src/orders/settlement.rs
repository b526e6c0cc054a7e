//! Payment settlement engine
//!
//! The only path to `PAID`. Both entry points are admin-only, require the
//! order to be `DELIVERED`, and run as one SQLite transaction: payment
//! record(s), order status, revenue upsert, table release and audit entry
//! commit together or not at all.
//!
//! At-most-one settlement per order is enforced by the status-guarded
//! `DELIVERED → PAID` update: the second of two concurrent settlements
//! claims zero rows, re-reads the order and fails `AlreadyPaid`.

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use uuid::Uuid;

use shared::models::{
    Order, Payment, PaymentMethod, SettlementReceipt, SplitReceipt, SplitSettlementRequest,
};

use crate::audit::{AuditAction, AuditRecord, storage as audit_storage};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::db::repository::{RepoError, daily_revenue, dining_table, order as order_repo, payment};

use super::money;
use super::OrderError;

/// Settle an order in full with a single method (cash or online).
pub async fn confirm_payment(
    pool: &SqlitePool,
    caller: &CurrentUser,
    order_id: &str,
    method: PaymentMethod,
) -> Result<SettlementReceipt, OrderError> {
    policy::authorize(caller, Action::SettlePayment)?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let order = load_delivered(&mut tx, order_id).await?;

    // Split is not a settlement method; it is what the split entry point
    // records on the order after writing two per-method payment rows
    if method == PaymentMethod::Split {
        return Err(OrderError::InvalidMethod("SPLIT".to_string()));
    }

    claim_paid(&mut tx, order_id, method).await?;

    let amount = money::to_f64(money::to_decimal(order.total_price));
    let business_date = shared::util::business_date();
    let now = shared::util::now_millis();

    payment::insert_tx(
        &mut tx,
        &Payment {
            id: Uuid::new_v4().to_string(),
            order_id: order_id.to_string(),
            method,
            amount,
            recorded_by: caller.id,
            recorded_by_name: caller.username.clone(),
            business_date: business_date.clone(),
            created_at: now,
        },
    )
    .await?;

    // Only the settled method's running total moves; the other gets a zero
    let (cash_delta, online_delta) = match method {
        PaymentMethod::Cash => (amount, 0.0),
        PaymentMethod::Online => (0.0, amount),
        PaymentMethod::Split => unreachable!("rejected above"),
    };
    daily_revenue::upsert_tx(&mut tx, &business_date, cash_delta, online_delta).await?;

    if let Some(table_id) = order.table_id {
        dining_table::release(&mut tx, table_id).await?;
    }

    audit_storage::append(
        &mut tx,
        AuditRecord {
            action: AuditAction::PaymentConfirmed,
            resource_type: "order".to_string(),
            resource_id: order_id.to_string(),
            operator_id: Some(caller.id),
            operator_name: Some(caller.username.clone()),
            details: serde_json::json!({
                "amount": amount,
                "method": method,
            }),
        },
    )
    .await
    .map_err(|e| RepoError::Database(e.to_string()))?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(order_id, amount, ?method, "Payment confirmed");
    Ok(SettlementReceipt {
        order_id: order_id.to_string(),
        amount,
        method,
    })
}

/// Settle an order split across cash and online.
///
/// The two amounts must sum to the order total within ±0.01. A zero side
/// produces no payment record — a split that degenerates to one method
/// yields exactly one row, never a zero-amount one.
pub async fn confirm_split_payment(
    pool: &SqlitePool,
    caller: &CurrentUser,
    order_id: &str,
    request: SplitSettlementRequest,
) -> Result<SplitReceipt, OrderError> {
    policy::authorize(caller, Action::SettlePayment)?;

    let mut tx = pool.begin().await.map_err(RepoError::from)?;

    let order = load_delivered(&mut tx, order_id).await?;

    for (label, value) in [("cash", request.cash_amount), ("online", request.online_amount)] {
        if !value.is_finite() || value < 0.0 {
            return Err(OrderError::InvalidAmount(format!(
                "{label} amount must be non-negative, got {value}"
            )));
        }
    }

    let cash = money::to_decimal(request.cash_amount);
    let online = money::to_decimal(request.online_amount);
    let paid_total = cash + online;

    if paid_total <= Decimal::ZERO {
        return Err(OrderError::ZeroPayment);
    }
    if !money::within_tolerance(paid_total, money::to_decimal(order.total_price)) {
        return Err(OrderError::AmountMismatch {
            cash: request.cash_amount,
            online: request.online_amount,
            total: order.total_price,
        });
    }

    claim_paid(&mut tx, order_id, PaymentMethod::Split).await?;

    let business_date = shared::util::business_date();
    let now = shared::util::now_millis();
    let cash_amount = money::to_f64(cash);
    let online_amount = money::to_f64(online);

    for (method, amount) in [
        (PaymentMethod::Cash, cash_amount),
        (PaymentMethod::Online, online_amount),
    ] {
        if amount <= 0.0 {
            continue;
        }
        payment::insert_tx(
            &mut tx,
            &Payment {
                id: Uuid::new_v4().to_string(),
                order_id: order_id.to_string(),
                method,
                amount,
                recorded_by: caller.id,
                recorded_by_name: caller.username.clone(),
                business_date: business_date.clone(),
                created_at: now,
            },
        )
        .await?;
    }

    // Zero deltas are harmless no-ops in the upsert
    daily_revenue::upsert_tx(&mut tx, &business_date, cash_amount, online_amount).await?;

    if let Some(table_id) = order.table_id {
        dining_table::release(&mut tx, table_id).await?;
    }

    audit_storage::append(
        &mut tx,
        AuditRecord {
            action: AuditAction::SplitPaymentConfirmed,
            resource_type: "order".to_string(),
            resource_id: order_id.to_string(),
            operator_id: Some(caller.id),
            operator_name: Some(caller.username.clone()),
            details: serde_json::json!({
                "cash_amount": cash_amount,
                "online_amount": online_amount,
                "total": order.total_price,
            }),
        },
    )
    .await
    .map_err(|e| RepoError::Database(e.to_string()))?;

    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(order_id, cash_amount, online_amount, "Split payment confirmed");
    Ok(SplitReceipt {
        order_id: order_id.to_string(),
        cash_amount,
        online_amount,
        total: order.total_price,
    })
}

/// Load the order and require `DELIVERED` status.
async fn load_delivered(
    tx: &mut sqlx::SqliteConnection,
    order_id: &str,
) -> Result<Order, OrderError> {
    let order = order_repo::find_by_id_tx(tx, order_id)
        .await?
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

    match order.status {
        shared::models::OrderStatus::Paid => Err(OrderError::AlreadyPaid(order_id.to_string())),
        shared::models::OrderStatus::Delivered => Ok(order),
        _ => Err(OrderError::NotYetDelivered(order_id.to_string())),
    }
}

/// Execute the guarded `DELIVERED → PAID` claim; on a lost race, re-read to
/// report the reason the order slipped away.
async fn claim_paid(
    tx: &mut sqlx::SqliteConnection,
    order_id: &str,
    method: PaymentMethod,
) -> Result<(), OrderError> {
    if order_repo::claim_paid_tx(tx, order_id, method).await? {
        return Ok(());
    }
    match order_repo::find_by_id_tx(tx, order_id).await? {
        Some(order) if order.status.is_paid() => Err(OrderError::AlreadyPaid(order_id.to_string())),
        Some(_) => Err(OrderError::NotYetDelivered(order_id.to_string())),
        None => Err(OrderError::NotFound(order_id.to_string())),
    }
}
