//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{MenuItem, MenuItemCreate, MenuItemUpdate};

use crate::audit::{AuditAction, AuditRecord};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::db::repository::menu_item;
use crate::utils::{AppError, AppResult};

/// GET /api/menu - 在售菜单
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<MenuItem>>> {
    if !user.verified {
        return Err(AppError::forbidden("account is not verified by an admin"));
    }
    let items = menu_item::find_all(&state.db.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(items))
}

/// POST /api/menu - 新增菜品（仅管理员）
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let item = menu_item::create(&state.db.pool, payload)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: AuditAction::MenuItemCreated,
        resource_type: "menu_item".to_string(),
        resource_id: item.id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"name": item.name, "price": item.price}),
    });

    Ok(Json(item))
}

/// PUT /api/menu/{id} - 修改菜品（仅管理员）
///
/// 价格变更不会回溯影响已有订单的快照。
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let item = menu_item::update(&state.db.pool, id, payload)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: AuditAction::MenuItemUpdated,
        resource_type: "menu_item".to_string(),
        resource_id: id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"name": item.name, "price": item.price}),
    });

    Ok(Json(item))
}

/// DELETE /api/menu/{id} - 下架菜品（仅管理员，软删除）
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let deleted = menu_item::delete(&state.db.pool, id)
        .await
        .map_err(AppError::from)?;

    if deleted {
        state.audit.log(AuditRecord {
            action: AuditAction::MenuItemDeleted,
            resource_type: "menu_item".to_string(),
            resource_id: id.to_string(),
            operator_id: Some(user.id),
            operator_name: Some(user.username.clone()),
            details: serde_json::json!({}),
        });
    }

    Ok(Json(deleted))
}
