//! Employees API Handlers (仅管理员)

use axum::{
    Json,
    extract::{Path, State},
};

use shared::models::{Employee, EmployeeCreate};

use crate::audit::{AuditAction, AuditRecord};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::utils::{AppError, AppResult};

/// GET /api/employees - 员工列表
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Employee>>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;
    let employees = employee::find_all(&state.db.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(employees))
}

/// POST /api/employees - 创建员工账号（初始为未审核）
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let created = employee::create(&state.db.pool, payload)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: AuditAction::EmployeeCreated,
        resource_type: "employee".to_string(),
        resource_id: created.id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"username": created.username, "role": created.role}),
    });

    Ok(Json(created))
}

/// POST /api/employees/{id}/verify - 审核通过
pub async fn verify(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    set_verified(state, user, id, true).await
}

/// POST /api/employees/{id}/revoke - 撤销审核
pub async fn revoke(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Employee>> {
    set_verified(state, user, id, false).await
}

async fn set_verified(
    state: ServerState,
    user: CurrentUser,
    id: i64,
    verified: bool,
) -> AppResult<Json<Employee>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let updated = employee::set_verified(&state.db.pool, id, verified)
        .await
        .map_err(AppError::from)?;

    state.audit.log(AuditRecord {
        action: if verified {
            AuditAction::EmployeeVerified
        } else {
            AuditAction::EmployeeRevoked
        },
        resource_type: "employee".to_string(),
        resource_id: id.to_string(),
        operator_id: Some(user.id),
        operator_name: Some(user.username.clone()),
        details: serde_json::json!({"username": updated.username}),
    });

    Ok(Json(updated))
}
