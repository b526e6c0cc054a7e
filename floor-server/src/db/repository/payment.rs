//! Payment Repository
//!
//! Payment rows are written only from inside a settlement transaction and
//! never mutated afterwards. The `(order_id, method)` UNIQUE index backs the
//! exactly-once guarantee per method.

use super::RepoResult;
use shared::models::Payment;
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str =
    "id, order_id, method, amount, recorded_by, recorded_by_name, business_date, created_at";

pub async fn insert_tx(conn: &mut SqliteConnection, payment: &Payment) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO payment (id, order_id, method, amount, recorded_by, recorded_by_name, business_date, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&payment.id)
    .bind(&payment.order_id)
    .bind(payment.method)
    .bind(payment.amount)
    .bind(payment.recorded_by)
    .bind(&payment.recorded_by_name)
    .bind(&payment.business_date)
    .bind(payment.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_order(pool: &SqlitePool, order_id: &str) -> RepoResult<Vec<Payment>> {
    let payments = sqlx::query_as::<_, Payment>(&format!(
        "SELECT {COLUMNS} FROM payment WHERE order_id = ? ORDER BY created_at"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(payments)
}

/// Per-method totals and distinct paid-order count for one business date.
///
/// This is the read-side ground truth the daily summary is computed from,
/// deliberately independent of the `daily_revenue` running aggregate.
pub async fn summarize_date(pool: &SqlitePool, business_date: &str) -> RepoResult<(f64, f64, i64)> {
    let row: (Option<f64>, Option<f64>, i64) = sqlx::query_as(
        r#"
        SELECT
            SUM(CASE WHEN method = 'CASH'   THEN amount END),
            SUM(CASE WHEN method = 'ONLINE' THEN amount END),
            COUNT(DISTINCT order_id)
        FROM payment
        WHERE business_date = ?
        "#,
    )
    .bind(business_date)
    .fetch_one(pool)
    .await?;

    Ok((row.0.unwrap_or(0.0), row.1.unwrap_or(0.0), row.2))
}
