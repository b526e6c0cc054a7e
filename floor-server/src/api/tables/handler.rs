//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{DiningTable, DiningTableCreate};

use crate::audit::{AuditAction, AuditRecord};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<DiningTable>>> {
    if !user.verified {
        return Err(AppError::forbidden("account is not verified by an admin"));
    }
    let tables = dining_table::find_all(&state.db.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    if !user.verified {
        return Err(AppError::forbidden("account is not verified by an admin"));
    }
    let table = dining_table::find_by_id(&state.db.pool, id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Table {id} not found")))?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台（仅管理员）
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let table = dining_table::create(&state.db.pool, payload)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: AuditAction::TableCreated,
        resource_type: "dining_table".to_string(),
        resource_id: table.id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"number": table.number}),
    });

    Ok(Json(table))
}

/// DELETE /api/tables/{id} - 删除桌台（仅管理员）
///
/// 桌台上的订单保留，其桌台引用被置空（孤儿化，不删除订单）。
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let deleted = dining_table::delete(&state.db.pool, id)
        .await
        .map_err(AppError::from)?;

    if deleted {
        state.audit.log(AuditRecord {
            action: AuditAction::TableDeleted,
            resource_type: "dining_table".to_string(),
            resource_id: id.to_string(),
            operator_id: Some(user.id),
            operator_name: Some(user.username.clone()),
            details: serde_json::json!({}),
        });
    }

    Ok(Json(deleted))
}