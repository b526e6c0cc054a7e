//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, number, status, created_at, updated_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let tables = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table ORDER BY number"
    ))
    .fetch_all(pool)
    .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(table)
}

/// Transaction-scoped lookup, used inside order creation
pub async fn find_by_id_tx(
    conn: &mut SqliteConnection,
    id: i64,
) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLUMNS} FROM dining_table WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(table)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if data.number <= 0 {
        return Err(RepoError::Validation(format!(
            "Table number must be positive, got {}",
            data.number
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let result = sqlx::query(
        "INSERT INTO dining_table (id, number, status, created_at, updated_at) VALUES (?, ?, 'EMPTY', ?, ?)",
    )
    .bind(id)
    .bind(data.number)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) if e.to_string().to_lowercase().contains("unique") => {
            return Err(RepoError::Duplicate(format!(
                "Table number {} already exists",
                data.number
            )));
        }
        Err(e) => return Err(e.into()),
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create dining table".into()))
}

/// Delete a table. Orders referencing it keep existing with a null table
/// reference (FK `ON DELETE SET NULL`).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM dining_table WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Guarded occupancy claim: flips EMPTY → OCCUPIED.
///
/// Returns `false` if the table exists but is already occupied. The guard in
/// the WHERE clause is what makes two concurrent order creations against the
/// same table serialize to one winner.
pub async fn try_occupy(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE dining_table SET status = 'OCCUPIED', updated_at = ? WHERE id = ? AND status = 'EMPTY'",
    )
    .bind(now)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Release a table at settlement (best effort — no error if the table has
/// been deleted meanwhile)
pub async fn release(conn: &mut SqliteConnection, id: i64) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE dining_table SET status = 'EMPTY', updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
