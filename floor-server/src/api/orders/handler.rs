//! Orders API Handlers
//!
//! Thin transport layer: deserialize, hand to the order core, map errors.
//! All authorization decisions live in the core's policy, not here.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use shared::models::{
    Order, OrderCreate, OrderEdit, OrderStatus, PaymentMethod, SettlementReceipt, SplitReceipt,
    SplitSettlementRequest, StatusAdvance,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{order as order_repo, payment};
use crate::orders::{OrderError, lifecycle, settlement};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
}

/// GET /api/orders - 订单列表（可按状态/桌台过滤）
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    require_verified(&user)?;
    let orders = order_repo::find_all(&state.db.pool, query.status, query.table_id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 单个订单（附支付记录）
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    require_verified(&user)?;
    let order = order_repo::find_by_id(&state.db.pool, &id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let payments = payment::find_by_order(&state.db.pool, &id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "order": order,
        "payments": payments,
    })))
}

/// POST /api/orders - 开台下单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = lifecycle::create_order(&state.db.pool, &user, payload).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id} - 修改订单内容/状态/桌台
pub async fn edit(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderEdit>,
) -> AppResult<Json<Order>> {
    let order = lifecycle::edit_order(&state.db.pool, &user, &id, payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/{id}/status - 厨房进度推进
pub async fn advance_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusAdvance>,
) -> AppResult<Json<serde_json::Value>> {
    lifecycle::advance_status(&state.db.pool, &user, &id, payload.status).await?;
    Ok(Json(serde_json::json!({"order_id": id, "status": payload.status})))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub method: String,
}

/// POST /api/orders/{id}/payment - 单一方式结账（仅管理员）
pub async fn confirm_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<SettlementReceipt>> {
    // Wire-level method string; anything unknown is rejected before the core
    let method = PaymentMethod::parse(&payload.method)
        .ok_or_else(|| AppError::from(OrderError::InvalidMethod(payload.method.clone())))?;

    let receipt = settlement::confirm_payment(&state.db.pool, &user, &id, method).await?;
    Ok(Json(receipt))
}

/// POST /api/orders/{id}/split-payment - 拆分结账（仅管理员）
pub async fn confirm_split_payment(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<SplitSettlementRequest>,
) -> AppResult<Json<SplitReceipt>> {
    let receipt = settlement::confirm_split_payment(&state.db.pool, &user, &id, payload).await?;
    Ok(Json(receipt))
}

/// Reads are open to any verified user; unverified accounts see nothing
/// beyond their own profile.
fn require_verified(user: &CurrentUser) -> AppResult<()> {
    if !user.verified {
        return Err(AppError::forbidden("account is not verified by an admin"));
    }
    Ok(())
}
