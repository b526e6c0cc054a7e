//! Daily Revenue Repository
//!
//! The running aggregate is upserted incrementally at each settlement —
//! never recomputed from scratch. Only `cash_total` and `online_total` are
//! stored; the grand total is derived in the model.

use super::RepoResult;
use shared::models::DailyRevenue;
use sqlx::{SqliteConnection, SqlitePool};

/// Add settlement deltas to the day's running totals. A zero delta leaves
/// the other method's total untouched.
pub async fn upsert_tx(
    conn: &mut SqliteConnection,
    business_date: &str,
    cash_delta: f64,
    online_delta: f64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        r#"
        INSERT INTO daily_revenue (business_date, cash_total, online_total, updated_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(business_date) DO UPDATE SET
            cash_total   = cash_total + excluded.cash_total,
            online_total = online_total + excluded.online_total,
            updated_at   = excluded.updated_at
        "#,
    )
    .bind(business_date)
    .bind(cash_delta)
    .bind(online_delta)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_date(pool: &SqlitePool, business_date: &str) -> RepoResult<Option<DailyRevenue>> {
    let revenue = sqlx::query_as::<_, DailyRevenue>(
        "SELECT business_date, cash_total, online_total, updated_at FROM daily_revenue WHERE business_date = ?",
    )
    .bind(business_date)
    .fetch_optional(pool)
    .await?;
    Ok(revenue)
}
