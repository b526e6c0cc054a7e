//! Order Repository
//!
//! Line items are stored as a JSON snapshot column; the row type is private
//! and converted to the typed [`Order`] model at the boundary.

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderItem, OrderStatus, PaymentMethod};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, table_id, creator_id, items, total_price, status, payment_method, created_at, updated_at";

/// Raw row; `items` is the JSON snapshot text
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    table_id: Option<i64>,
    creator_id: i64,
    items: String,
    total_price: f64,
    status: OrderStatus,
    payment_method: Option<PaymentMethod>,
    created_at: i64,
    updated_at: i64,
}

impl OrderRow {
    fn into_order(self) -> RepoResult<Order> {
        let items: Vec<OrderItem> = serde_json::from_str(&self.items)?;
        Ok(Order {
            id: self.id,
            table_id: self.table_id,
            creator_id: self.creator_id,
            items,
            total_price: self.total_price,
            status: self.status,
            payment_method: self.payment_method,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

/// Transaction-scoped load — the settlement and edit paths read the order
/// inside the same transaction that mutates it.
pub async fn find_by_id_tx(conn: &mut SqliteConnection, id: &str) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!("SELECT {COLUMNS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    row.map(OrderRow::into_order).transpose()
}

/// List orders, newest first, optionally filtered by status and/or table
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<OrderStatus>,
    table_id: Option<i64>,
) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {COLUMNS} FROM orders WHERE (? IS NULL OR status = ?) AND (? IS NULL OR table_id = ?) ORDER BY created_at DESC"
    ))
    .bind(status)
    .bind(status)
    .bind(table_id)
    .bind(table_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(OrderRow::into_order).collect()
}

pub async fn insert_tx(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    let items_json = serde_json::to_string(&order.items)?;
    sqlx::query(
        "INSERT INTO orders (id, table_id, creator_id, items, total_price, status, payment_method, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&order.id)
    .bind(order.table_id)
    .bind(order.creator_id)
    .bind(items_json)
    .bind(order.total_price)
    .bind(order.status)
    .bind(order.payment_method)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Replace content fields from an edit (items, total, status, table)
pub async fn update_content_tx(
    conn: &mut SqliteConnection,
    id: &str,
    items: &[OrderItem],
    total_price: f64,
    status: OrderStatus,
    table_id: Option<i64>,
) -> RepoResult<()> {
    let items_json = serde_json::to_string(items)?;
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET items = ?, total_price = ?, status = ?, table_id = ?, updated_at = ? WHERE id = ?",
    )
    .bind(items_json)
    .bind(total_price)
    .bind(status)
    .bind(table_id)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Plain status move (kitchen progress); no audit, no side effects
pub async fn update_status(pool: &SqlitePool, id: &str, status: OrderStatus) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Guarded terminal transition: DELIVERED → PAID.
///
/// Returns `true` only for the transaction that actually claimed the order;
/// a concurrent settlement observes zero affected rows and re-reads the
/// status to report why. This is the at-most-one-settlement mechanism.
pub async fn claim_paid_tx(
    conn: &mut SqliteConnection,
    id: &str,
    method: PaymentMethod,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE orders SET status = 'PAID', payment_method = ?, updated_at = ? WHERE id = ? AND status = 'DELIVERED'",
    )
    .bind(method)
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}
