//! Employee Repository

use super::{RepoError, RepoResult};
use crate::auth::password;
use shared::models::{Employee, EmployeeCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, username, password_hash, display_name, role, verified, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

/// Create an employee account. New accounts start unverified; an admin
/// approves them through [`set_verified`].
pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    if data.username.trim().is_empty() {
        return Err(RepoError::Validation("Username cannot be empty".into()));
    }
    if data.password.len() < 4 {
        return Err(RepoError::Validation("Password too short".into()));
    }
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' already exists",
            data.username
        )));
    }

    let hash = password::hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO employee (id, username, password_hash, display_name, role, verified, created_at, updated_at) VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&hash)
    .bind(&data.display_name)
    .bind(data.role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create employee".into()))
}

/// Flip the verified flag (admin approval / revocation)
pub async fn set_verified(pool: &SqlitePool, id: i64, verified: bool) -> RepoResult<Employee> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE employee SET verified = ?, updated_at = ? WHERE id = ?")
        .bind(verified)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Employee {id} not found")))
}
