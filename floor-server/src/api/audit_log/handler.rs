//! Audit Log API Handlers (仅管理员)

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditChainVerification, AuditEntry, AuditQuery, storage};
use crate::auth::CurrentUser;
use crate::auth::policy::{self, Action};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/audit - 审计日志（倒序，可按资源过滤）
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<AuditEntry>>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let entries = storage::list(&state.db.pool, &query)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(entries))
}

/// GET /api/audit/verify - 验证哈希链完整性
pub async fn verify_chain(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AuditChainVerification>> {
    policy::authorize(&user, Action::Administrate).map_err(AppError::from)?;

    let verification = storage::verify_chain(&state.db.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(verification))
}
