//! 审计日志存储
//!
//! SQLite `audit_log` 表的 append-only 访问层。写入必须走
//! [`append`]（可在调用方事务内执行，保证与业务写入同生共死），
//! 不存在 update/delete 路径。

use sha2::{Digest, Sha256};
use sqlx::{SqliteConnection, SqlitePool};
use thiserror::Error;

use super::types::{AuditAction, AuditChainVerification, AuditEntry, AuditQuery};

/// 存储错误
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for AuditStorageError {
    fn from(err: sqlx::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

/// 待写入的审计记录
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<i64>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// Raw row — `action` and `details` are stored as JSON text
#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: i64,
    timestamp: i64,
    action: String,
    resource_type: String,
    resource_id: String,
    operator_id: Option<i64>,
    operator_name: Option<String>,
    details: String,
    prev_hash: String,
    curr_hash: String,
}

impl AuditRow {
    fn into_entry(self) -> AuditStorageResult<AuditEntry> {
        Ok(AuditEntry {
            id: self.id,
            timestamp: self.timestamp,
            action: serde_json::from_str(&self.action)?,
            resource_type: self.resource_type,
            resource_id: self.resource_id,
            operator_id: self.operator_id,
            operator_name: self.operator_name,
            details: serde_json::from_str(&self.details)?,
            prev_hash: self.prev_hash,
            curr_hash: self.curr_hash,
        })
    }
}

/// 追加一条审计记录（在调用方连接/事务上执行）
///
/// 读取链尾哈希 → 计算当前哈希 → 插入。调用方若处于事务中，
/// 读尾与插入之间天然互斥；独立调用时由 SQLite 写锁串行化。
pub async fn append(
    conn: &mut SqliteConnection,
    record: AuditRecord,
) -> AuditStorageResult<AuditEntry> {
    // 1. 链尾
    let last: Option<(i64, String)> =
        sqlx::query_as("SELECT id, curr_hash FROM audit_log ORDER BY id DESC LIMIT 1")
            .fetch_optional(&mut *conn)
            .await?;
    let (next_id, prev_hash) = match last {
        Some((id, hash)) => (id + 1, hash),
        None => (1, "genesis".to_string()),
    };

    // 2. 计算哈希（所有存储字段参与）
    let timestamp = shared::util::now_millis();
    let details_json = serde_json::to_string(&record.details)?;
    let curr_hash = compute_audit_hash(
        &prev_hash,
        next_id,
        timestamp,
        &record.action,
        &record.resource_type,
        &record.resource_id,
        record.operator_id,
        record.operator_name.as_deref(),
        &details_json,
    );

    let action_json = serde_json::to_string(&record.action)?;
    sqlx::query(
        "INSERT INTO audit_log (id, timestamp, action, resource_type, resource_id, operator_id, operator_name, details, prev_hash, curr_hash) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(next_id)
    .bind(timestamp)
    .bind(&action_json)
    .bind(&record.resource_type)
    .bind(&record.resource_id)
    .bind(record.operator_id)
    .bind(&record.operator_name)
    .bind(&details_json)
    .bind(&prev_hash)
    .bind(&curr_hash)
    .execute(&mut *conn)
    .await?;

    Ok(AuditEntry {
        id: next_id,
        timestamp,
        action: record.action,
        resource_type: record.resource_type,
        resource_id: record.resource_id,
        operator_id: record.operator_id,
        operator_name: record.operator_name,
        details: record.details,
        prev_hash,
        curr_hash,
    })
}

/// 查询审计日志（倒序）
pub async fn list(pool: &SqlitePool, query: &AuditQuery) -> AuditStorageResult<Vec<AuditEntry>> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = sqlx::query_as::<_, AuditRow>(
        r#"
        SELECT id, timestamp, action, resource_type, resource_id, operator_id, operator_name, details, prev_hash, curr_hash
        FROM audit_log
        WHERE (? IS NULL OR resource_type = ?)
          AND (? IS NULL OR resource_id = ?)
        ORDER BY id DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(&query.resource_type)
    .bind(&query.resource_type)
    .bind(&query.resource_id)
    .bind(&query.resource_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AuditRow::into_entry).collect()
}

/// 验证整条哈希链
pub async fn verify_chain(pool: &SqlitePool) -> AuditStorageResult<AuditChainVerification> {
    let rows = sqlx::query_as::<_, AuditRow>(
        "SELECT id, timestamp, action, resource_type, resource_id, operator_id, operator_name, details, prev_hash, curr_hash FROM audit_log ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut expected_prev = "genesis".to_string();
    let mut checked = 0i64;

    for row in rows {
        let action: AuditAction = serde_json::from_str(&row.action)?;
        let recomputed = compute_audit_hash(
            &row.prev_hash,
            row.id,
            row.timestamp,
            &action,
            &row.resource_type,
            &row.resource_id,
            row.operator_id,
            row.operator_name.as_deref(),
            &row.details,
        );

        if row.prev_hash != expected_prev || row.curr_hash != recomputed {
            return Ok(AuditChainVerification {
                valid: false,
                checked,
                broken_at: Some(row.id),
            });
        }

        expected_prev = row.curr_hash;
        checked += 1;
    }

    Ok(AuditChainVerification {
        valid: true,
        checked,
        broken_at: None,
    })
}

/// SHA256 哈希：链接前一条哈希 + 全部存储字段，变长字段用 \x00 隔离
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    id: i64,
    timestamp: i64,
    action: &AuditAction,
    resource_type: &str,
    resource_id: &str,
    operator_id: Option<i64>,
    operator_name: Option<&str>,
    details_json: &str,
) -> String {
    let mut hasher = Sha256::new();

    // 链接前一条哈希
    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    // 定长字段
    hasher.update(id.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());
    hasher.update(operator_id.unwrap_or(0).to_le_bytes());

    // action — serde snake_case (稳定格式，与 DB 存储一致)
    let action_str = serde_json::to_string(action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    // 变长字符串字段 — 分隔符隔离
    hasher.update(resource_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(resource_id.as_bytes());
    hasher.update(b"\x00");
    hasher.update(operator_name.unwrap_or("").as_bytes());
    hasher.update(b"\x00");
    hasher.update(details_json.as_bytes());

    hex::encode(hasher.finalize())
}
