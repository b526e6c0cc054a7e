//! Expenses API Handlers (仅管理员)

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{Expense, ExpenseCreate};

use crate::audit::{AuditAction, AuditRecord};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::db::repository::expense;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/expenses - 支出列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;
    let expenses = expense::find_all(&state.db.pool, query.limit.clamp(1, 1000), query.offset.max(0))
        .await
        .map_err(AppError::from)?;
    Ok(Json(expenses))
}

/// POST /api/expenses - 记一笔支出
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ExpenseCreate>,
) -> AppResult<Json<Expense>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let created = expense::create(&state.db.pool, payload, user.id)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: AuditAction::ExpenseRecorded,
        resource_type: "expense".to_string(),
        resource_id: created.id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"title": created.title, "amount": created.amount}),
    });

    Ok(Json(created))
}

/// DELETE /api/expenses/{id} - 删除支出
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let deleted = expense::delete(&state.db.pool, id)
        .await
        .map_err(AppError::from)?;

    if deleted {
        state.audit.log(AuditRecord {
            action: AuditAction::ExpenseDeleted,
            resource_type: "expense".to_string(),
            resource_id: id.to_string(),
            operator_id: Some(user.id),
            operator_name: Some(user.username.clone()),
            details: serde_json::json!({}),
        });
    }

    Ok(Json(deleted))
}
