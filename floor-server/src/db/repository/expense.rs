//! Expense Repository

use super::{RepoError, RepoResult};
use shared::models::{Expense, ExpenseCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, title, amount, recorded_by, business_date, created_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Expense>> {
    let expense = sqlx::query_as::<_, Expense>(&format!(
        "SELECT {COLUMNS} FROM expense WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(expense)
}

pub async fn find_all(pool: &SqlitePool, limit: i64, offset: i64) -> RepoResult<Vec<Expense>> {
    let expenses = sqlx::query_as::<_, Expense>(&format!(
        "SELECT {COLUMNS} FROM expense ORDER BY created_at DESC LIMIT ? OFFSET ?"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(expenses)
}

pub async fn create(pool: &SqlitePool, data: ExpenseCreate, recorded_by: i64) -> RepoResult<Expense> {
    if data.title.trim().is_empty() {
        return Err(RepoError::Validation("Title cannot be empty".into()));
    }
    if !data.amount.is_finite() || data.amount < 0.0 {
        return Err(RepoError::Validation(format!(
            "Amount must be a non-negative number, got {}",
            data.amount
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let business_date = shared::util::business_date();
    sqlx::query(
        "INSERT INTO expense (id, title, amount, recorded_by, business_date, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(data.title.trim())
    .bind(data.amount)
    .bind(recorded_by)
    .bind(&business_date)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create expense".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM expense WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Total expenses for one business date
pub async fn sum_by_date(pool: &SqlitePool, business_date: &str) -> RepoResult<f64> {
    let total: Option<f64> =
        sqlx::query_scalar("SELECT SUM(amount) FROM expense WHERE business_date = ?")
            .bind(business_date)
            .fetch_one(pool)
            .await?;
    Ok(total.unwrap_or(0.0))
}
