//! Auth API Handlers

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditAction, AuditRecord};
use crate::auth::{CurrentUser, password};
use crate::core::ServerState;
use crate::db::repository::employee;
use crate::security_log;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub role: shared::models::Role,
    pub verified: bool,
}

/// POST /api/auth/login - 用户名密码登录，签发 JWT
///
/// 未审核员工可以登录（只能查看自己的资料），其余操作由授权策略拒绝。
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let pool = &state.db.pool;

    let found = employee::find_by_username(pool, &req.username)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let Some(emp) = found else {
        // 统一错误信息，防止用户名枚举
        security_log!("WARN", "login_failed", username = req.username.clone());
        state.audit.log(AuditRecord {
            action: AuditAction::LoginFailed,
            resource_type: "employee".to_string(),
            resource_id: req.username.clone(),
            operator_id: None,
            operator_name: Some(req.username.clone()),
            details: serde_json::json!({"reason": "unknown_username"}),
        });
        return Err(AppError::invalid_credentials());
    };

    if !password::verify_password(&req.password, &emp.password_hash) {
        security_log!("WARN", "login_failed", username = req.username.clone());
        state.audit.log(AuditRecord {
            action: AuditAction::LoginFailed,
            resource_type: "employee".to_string(),
            resource_id: emp.id.to_string(),
            operator_id: Some(emp.id),
            operator_name: Some(emp.username.clone()),
            details: serde_json::json!({"reason": "bad_password"}),
        });
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt_service
        .generate_token(emp.id, &emp.username, emp.role, emp.verified)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    state.audit.log(AuditRecord {
        action: AuditAction::LoginSuccess,
        resource_type: "employee".to_string(),
        resource_id: emp.id.to_string(),
        operator_id: Some(emp.id),
        operator_name: Some(emp.username.clone()),
        details: serde_json::json!({}),
    });

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: emp.id,
            username: emp.username,
            display_name: emp.display_name,
            role: emp.role,
            verified: emp.verified,
        },
    }))
}

/// GET /api/auth/me - 当前用户资料（未审核员工也可访问）
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let emp = employee::find_by_id(&state.db.pool, user.id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", user.id)))?;

    Ok(Json(UserInfo {
        id: emp.id,
        username: emp.username,
        display_name: emp.display_name,
        role: emp.role,
        verified: emp.verified,
    }))
}
